use std::path::Path;

use anyhow::{anyhow, Result};
use colored::*;
use rigger_core::executors::generate_sources::{generate_sources_executor, GenerateSourcesOptions};
use rigger_core::registry::read_project_configuration;
use rigger_core::tree::Tree;

pub async fn generate_sources(workspace_root: &Path, project: &str) -> Result<()> {
    let tree = Tree::new(workspace_root);
    let config = read_project_configuration(&tree, project)?;

    let target = config.targets.get("generate-sources").ok_or_else(|| {
        anyhow!("project '{project}' has no generate-sources target")
    })?;
    let options: GenerateSourcesOptions =
        serde_json::from_value(serde_json::Value::Object(target.options.clone()))?;

    println!(
        "{} {}",
        "Generating sources for".bold(),
        project.cyan()
    );
    println!();

    let result = generate_sources_executor(&options, workspace_root, project).await;
    if !result.success {
        // The executor already reported the failure
        std::process::exit(1);
    }

    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        "Sources generated successfully!".green().bold()
    );

    Ok(())
}
