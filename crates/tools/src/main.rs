use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toolchain_config::shared;
use toolchain_tools::{summary, Selection};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "toolcfg", version)]
#[command(about = "Inspect and validate smart-contract toolchain configuration")]
struct Cli {
    /// Configuration file (.json or .toml); falls back to TOOLCHAIN_CONFIG, then discovery
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the configuration and report whether it is valid
    Validate,
    /// Print the endpoint of a network profile
    Resolve {
        /// Profile name (defaults to TOOLCHAIN_NETWORK, then defaultNetwork)
        name: Option<String>,
    },
    /// List network profiles
    Networks,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("Failed to read working directory")?;

    let network_flag = match &cli.command {
        Commands::Resolve { name } => name.clone(),
        _ => None,
    };
    let selection = Selection::resolve(cli.config, network_flag, cwd)?;
    let config = selection
        .load()
        .context("Failed to load toolchain configuration")?;
    let config = shared::install(config)?;

    match cli.command {
        Commands::Show { json } => {
            if json {
                println!("{}", config.to_json()?);
            } else {
                print!("{}", summary::render(config, selection.project_root()));
            }
        }
        Commands::Validate => {
            println!(
                "Configuration valid: compiler {}, {} network profile(s)",
                config.compiler_version(),
                config.networks().len()
            );
        }
        Commands::Resolve { .. } => {
            let (name, params) = selection.network(config)?;
            tracing::debug!(network = name, "resolved network profile");
            println!("{}", params.endpoint());
        }
        Commands::Networks => {
            print!("{}", summary::network_list(config));
        }
    }

    Ok(())
}
