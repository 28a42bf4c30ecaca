mod commands;
mod reporter;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "https://maze-multicloud.com";
const DEFAULT_DESCRIPTION: &str = "Created with maze-cli";

#[derive(Parser)]
#[command(name = "maze")]
#[command(about = "Plan terraform projects on MAZE MultiCloud", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload terraform files and create a planned project
    Plan {
        /// Directory holding the terraform files
        #[arg(short, long, default_value = "./")]
        dir: PathBuf,
        /// Profile whose token authenticates the run
        #[arg(short, long, env = "MAZE_PROFILE", default_value = "default")]
        profile: String,
        /// MAZE server URL
        #[arg(short, long, env = "MAZE_URL", default_value = DEFAULT_URL)]
        url: String,
        /// Project name
        #[arg(short, long, default_value = "default")]
        name: String,
        /// Cloud provider (aws, azure, gcp); prompted for when missing or invalid
        #[arg(long)]
        provider: Option<String>,
        /// Also download the canvas image
        #[arg(short, long)]
        image: bool,
        /// Project description
        #[arg(long, default_value = DEFAULT_DESCRIPTION)]
        description: String,
    },
    /// Manage authentication profiles
    Configure {
        /// List saved profiles
        #[arg(short, long)]
        list: bool,
        /// Delete a profile
        #[arg(short, long, conflicts_with = "list")]
        delete: bool,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match cli.command {
        Commands::Version => {
            println!("maze {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Configure { list, delete } => commands::configure::handle(list, delete),
        Commands::Plan {
            dir,
            profile,
            url,
            name,
            provider,
            image,
            description,
        } => {
            commands::plan::handle(commands::plan::PlanArgs {
                dir,
                profile,
                url,
                name,
                provider,
                image,
                description,
            })
            .await
        }
    }
}
