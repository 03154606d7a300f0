//! Command line arguments.
//!
//! Every setting can also come from a `KEEPER_*` environment variable. An
//! explicit flag wins over the environment.

use std::{path::PathBuf, time::Duration};

use clap::{Args as ClapArgs, Parser, Subcommand};
use keeper_app::{AppConfig, DEFAULT_ORIGIN};
use keeper_client::transport::{DEFAULT_API_URL, GatewayConfig};

/// Keeper one-time secret client
#[derive(Parser, Debug)]
#[command(name = "keeper")]
#[command(about = "Share secrets that can be read exactly once")]
#[command(version)]
pub struct Args {
    /// Settings shared by every command
    #[command(flatten)]
    pub settings: Settings,

    /// What to do. Starts the terminal UI when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings shared by every command.
#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the backend API
    #[arg(long, global = true, env = "KEEPER_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Origin share links are composed under
    #[arg(long, global = true, env = "KEEPER_ORIGIN", default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "KEEPER_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "KEEPER_LOG", default_value = "info")]
    pub log_level: String,

    /// Write logs to this file. The terminal UI discards logs otherwise.
    #[arg(long, global = true, env = "KEEPER_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Report transport failures as "could not load" instead of "not found"
    #[arg(long, global = true, env = "KEEPER_DISTINGUISH_FAILURES")]
    pub distinguish_failures: bool,
}

impl Settings {
    /// Gateway settings.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..GatewayConfig::default()
        }
    }

    /// App settings.
    pub fn app_config(&self) -> AppConfig {
        AppConfig { origin: self.origin.clone(), distinguish_failures: self.distinguish_failures }
    }
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the terminal UI
    Ui {
        /// Share link to open on start
        #[arg(long)]
        open: Option<String>,
    },

    /// Store a secret and print its share link
    Create {
        /// Secret text. Read from stdin when omitted.
        message: Option<String>,

        /// Lifetime in hours: 0 (never), 1, 3, 6, 12, 24, 48, 120 or 168
        #[arg(long, default_value_t = 0)]
        ttl: u32,

        /// Passphrase the recipient must enter
        #[arg(long, env = "KEEPER_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },

    /// Reveal the secret behind a share link and print it
    Open {
        /// Share link or `/secrets/{key}` path
        link: String,

        /// Passphrase for protected links
        #[arg(long, env = "KEEPER_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },

    /// Probe the backend health endpoint
    Health,
}

impl Args {
    /// Command to run, defaulting to the terminal UI.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Ui { open: None })
    }

    /// Whether the command takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command(), Command::Ui { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("keeper").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_subcommand_starts_ui() {
        let args = parse(&[]);
        assert_eq!(args.command(), Command::Ui { open: None });
        assert!(args.is_interactive());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = parse(&["open", "/secrets/abc", "--distinguish-failures", "--timeout-secs", "3"]);
        assert!(args.settings.distinguish_failures);
        assert_eq!(args.settings.gateway_config().timeout, Duration::from_secs(3));
        assert!(args.settings.app_config().distinguish_failures);
        assert!(!args.is_interactive());
    }

    #[test]
    fn create_arguments() {
        let args = parse(&["create", "hello world", "--ttl", "24", "--passphrase", "pw-x"]);
        assert_eq!(args.command(), Command::Create {
            message: Some("hello world".to_string()),
            ttl: 24,
            passphrase: Some("pw-x".to_string()),
        });
    }

    #[test]
    fn origin_and_api_url() {
        let args = parse(&["--api-url", "https://api.test/api", "--origin", "https://share.test", "health"]);
        assert_eq!(args.settings.gateway_config().api_url, "https://api.test/api");
        assert_eq!(args.settings.app_config().origin, "https://share.test");
        assert_eq!(args.command(), Command::Health);
    }
}
