use std::path::Path;

use anyhow::Result;
use colored::*;
use rigger_core::configs::versions::DependencyVersions;
use rigger_core::generators::application::{application_generator, ApplicationGeneratorOptions};
use rigger_core::generators::blackbox_project::{
    blackbox_project_generator, BlackboxProjectOptions,
};
use rigger_core::generators::oidc_server_mock::{
    oidc_server_mock_generator, OidcServerMockOptions,
};
use rigger_core::generators::openapi_library::{openapi_library_generator, OpenApiLibraryOptions};
use rigger_core::generators::wiremock::{wiremock_generator, WiremockOptions};
use rigger_core::generators::{run_callbacks, GeneratorCallback};
use rigger_core::tree::{FileChange, Tree};

use crate::GenerateCommands;

pub async fn execute(
    workspace_root: &Path,
    generator: GenerateCommands,
    dry_run: bool,
) -> Result<()> {
    let mut tree = Tree::new(workspace_root);

    let callbacks = run_generator(&mut tree, generator).await?;
    print_changes(&tree);

    if dry_run {
        println!();
        println!("{}", "Dry run: nothing was written to disk".yellow());
        return Ok(());
    }

    tree.flush_changes()?;
    run_callbacks(callbacks, workspace_root)?;

    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        "Generation completed successfully!".green().bold()
    );

    Ok(())
}

async fn run_generator(
    tree: &mut Tree,
    generator: GenerateCommands,
) -> Result<Vec<GeneratorCallback>> {
    let versions = DependencyVersions::default();

    let callbacks = match generator {
        GenerateCommands::Application {
            name,
            directory,
            tags,
            no_blackbox_project,
            openapi_client_library,
        } => {
            application_generator(
                tree,
                ApplicationGeneratorOptions {
                    name,
                    directory,
                    tags,
                    blackbox_project: Some(!no_blackbox_project),
                    openapi_client_library,
                },
                &versions,
            )
            .await?
        }
        GenerateCommands::BlackboxProject {
            project,
            port,
            name,
            directory,
            tags,
        } => {
            vec![
                blackbox_project_generator(
                    tree,
                    BlackboxProjectOptions {
                        project,
                        port,
                        name,
                        directory,
                        tags,
                    },
                )
                .await?,
            ]
        }
        GenerateCommands::Wiremock { project } => {
            vec![wiremock_generator(tree, WiremockOptions { project }, &versions).await?]
        }
        GenerateCommands::OidcServerMock { project } => {
            oidc_server_mock_generator(tree, OidcServerMockOptions { project }).await?;
            Vec::new()
        }
        GenerateCommands::OpenapiLibrary {
            name,
            spec_url,
            directory,
            tags,
            import_path,
            publishable,
        } => {
            openapi_library_generator(
                tree,
                OpenApiLibraryOptions {
                    name,
                    spec_url,
                    directory,
                    tags,
                    import_path,
                    publishable,
                },
                &versions,
            )
            .await?
        }
    };

    Ok(callbacks)
}

fn print_changes(tree: &Tree) {
    for (path, change) in tree.changes() {
        match change {
            FileChange::Write(_) => {
                if tree.root().join(path).exists() {
                    println!("{} {}", "UPDATE".yellow().bold(), path.display());
                } else {
                    println!("{} {}", "CREATE".green().bold(), path.display());
                }
            }
            FileChange::Delete => {
                println!("{} {}", "DELETE".red().bold(), path.display());
            }
        }
    }
}
