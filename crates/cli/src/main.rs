use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Rigger - workspace scaffolding for service monorepos
#[derive(Parser)]
#[command(name = "rigger")]
#[command(about = "Generators and executors for service monorepos")]
#[command(version)]
struct Cli {
    /// Path to the workspace root (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate workspace projects and configuration
    Generate {
        #[command(subcommand)]
        generator: GenerateCommands,

        /// Print staged changes without writing anything to disk
        #[arg(long, global = true)]
        dry_run: bool,
    },
    /// Run an executor for a project
    Run {
        #[command(subcommand)]
        executor: RunCommands,
    },
}

#[derive(Subcommand)]
enum GenerateCommands {
    /// Generate a service application, with a blackbox harness by default
    Application {
        name: String,
        /// Directory under the apps dir to nest the project in
        #[arg(long)]
        directory: Option<String>,
        /// Comma-separated tags to annotate the project with
        #[arg(long)]
        tags: Option<String>,
        /// Skip generating the blackbox harness project
        #[arg(long)]
        no_blackbox_project: bool,
        /// Also generate a publishable OpenAPI client library
        #[arg(long)]
        openapi_client_library: bool,
    },
    /// Generate a blackbox test harness for an existing project
    BlackboxProject {
        /// Name of the project under test
        project: String,
        /// Port the tested project listens on
        #[arg(long)]
        port: Option<u16>,
        /// Name of the harness project (defaults to "<project>-e2e")
        #[arg(long)]
        name: Option<String>,
        /// Directory under the apps dir to nest the project in
        #[arg(long)]
        directory: Option<String>,
        /// Comma-separated tags to annotate the project with
        #[arg(long)]
        tags: Option<String>,
    },
    /// Add a WireMock service to a blackbox harness
    Wiremock {
        /// Name of the blackbox harness project
        project: String,
    },
    /// Add an OIDC server mock service to a blackbox harness
    OidcServerMock {
        /// Name of the blackbox harness project
        project: String,
    },
    /// Generate a library holding an API client generated from an OpenAPI document
    OpenapiLibrary {
        name: String,
        /// URL of the OpenAPI document the client is generated from
        #[arg(long)]
        spec_url: String,
        /// Directory under the libs dir to nest the project in
        #[arg(long)]
        directory: Option<String>,
        /// Comma-separated tags to annotate the project with
        #[arg(long)]
        tags: Option<String>,
        /// Import path of the library (defaults to the project name)
        #[arg(long)]
        import_path: Option<String>,
        /// Prepare the library for publishing to a registry
        #[arg(long)]
        publishable: bool,
    },
}

#[derive(Subcommand)]
enum RunCommands {
    /// Generate API client sources for a project's generate-sources target
    GenerateSources {
        #[arg(long)]
        project: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { generator, dry_run } => {
            commands::generate::execute(&cli.workspace, generator, dry_run).await
        }
        Commands::Run { executor } => match executor {
            RunCommands::GenerateSources { project } => {
                commands::run::generate_sources(&cli.workspace, &project).await
            }
        },
    }
}
