//! statebot CLI: run the life-event tracker bot. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use statebot_cli::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
    }
}
