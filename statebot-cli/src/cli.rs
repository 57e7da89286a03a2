//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use statebot_telegram::TelegramConfig;

#[derive(Parser)]
#[command(name = "statebot")]
#[command(about = "Life-event tracker Telegram bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

/// Load TelegramConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<TelegramConfig> {
    TelegramConfig::load(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_token() {
        let cli = Cli::try_parse_from(["statebot", "run", "--token", "abc"]).unwrap();
        let Commands::Run { token } = cli.command;
        assert_eq!(token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["statebot"]).is_err());
    }
}
