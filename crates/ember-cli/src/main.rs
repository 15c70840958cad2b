//! `ember` command-line entry point

use clap::{Parser, Subcommand};
use ember_cli::{describe_method, migrate_file, validate_caveat_file};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Ember wallet core tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a persisted state file to the latest version
    Migrate {
        /// State file to read
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the migrated state (optional, printed otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how an RPC method is permissioned
    Method {
        /// Method name
        name: String,
    },

    /// Validate a CAIP-25 caveat value
    ValidateCaveat {
        /// Caveat value JSON file
        #[arg(long)]
        value: PathBuf,

        /// Environment JSON file (accounts and networks)
        #[arg(long)]
        env: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { input, output } => {
            let report = migrate_file(&input, output.as_deref()).await?;
            info!(
                from = report.from_version,
                to = report.to_version,
                anomalies = report.anomalies.len(),
                "Migration finished"
            );
            for anomaly in &report.anomalies {
                println!("anomaly: {}", anomaly);
            }
            if output.is_none() {
                println!("{}", report.migrated.to_json_pretty()?);
            }
        }
        Commands::Method { name } => {
            println!("{}", describe_method(&name));
        }
        Commands::ValidateCaveat { value, env } => {
            validate_caveat_file(&value, &env).await?;
            println!("valid");
        }
    }

    Ok(())
}
