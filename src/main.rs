use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stagehand_core::fixtures::{
    FixtureConfig, FixtureRegistry, PathResolver, SafeRemover, Scaffolder, WatchSession,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(about = "Fixture provisioning for Stagehand system tests")]
struct Cli {
    /// Path to a stagehand.toml naming the fixture roots
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// System-tests base directory holding projects/ and project-fixtures/
    /// (ignored when --config is given)
    #[arg(long, global = true, default_value = ".")]
    base: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold one project, or every project, into the workspace
    Scaffold { project: Option<String> },
    /// Remove one project's workspace, or the whole workspace root
    Remove { project: Option<String> },
    /// Clear leftover node_modules from a source project tree
    ClearModules { project: String },
    /// Mirror live source edits into the workspace until interrupted
    Watch,
    /// Print the workspace path a project scaffolds to
    Path { project: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    stagehand_core::util::init_logging();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FixtureConfig::load(path)?,
        None => FixtureConfig::from_base(&cli.base),
    };
    let paths = PathResolver::new(config);

    match cli.command {
        Commands::Scaffold { project } => {
            let registry = FixtureRegistry::load(paths.fixtures_root())?;
            let scaffolder = Scaffolder::new(&paths, &registry);
            match project {
                Some(name) => {
                    let workspace = scaffolder.scaffold_project(&name).await?;
                    println!("{}", workspace.display());
                }
                None => scaffolder.scaffold_all().await?,
            }
        }
        Commands::Remove { project } => {
            let remover = SafeRemover::new(&paths);
            match project {
                Some(name) => remover.remove_project(&name).await?,
                None => remover.remove_all().await?,
            }
        }
        Commands::ClearModules { project } => {
            SafeRemover::new(&paths)
                .clear_project_node_modules(&project)
                .await?;
        }
        Commands::Watch => {
            let _session = WatchSession::start(&paths)?;
            info!("Watch session running until Ctrl-C");
            tokio::signal::ctrl_c().await?;
        }
        Commands::Path { project } => {
            println!("{}", paths.workspace_dir(&project).display());
        }
    }

    Ok(())
}
