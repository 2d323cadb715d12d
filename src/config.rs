//! Command-line interface, API configuration and logging setup.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::api::{API_URL_ENV, ApiConfig};
use crate::error::{Context, Result};

const DEFAULT_LOG_FILTER: &str = "userdesk=info";

/// Register and browse users of a user-management API.
#[derive(Debug, Parser)]
#[command(name = "userdesk", version, about)]
pub struct Cli {
    /// Base URL of the backend API.
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Log file used by the interactive UI.
    #[arg(long, global = true, default_value = "userdesk.log")]
    pub log_file: PathBuf,

    /// Theme configuration file.
    #[arg(long, global = true, default_value = "theme.conf")]
    pub theme: String,

    /// Key bindings configuration file.
    #[arg(long, global = true, default_value = "keybinds.conf")]
    pub keybinds: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the interactive terminal UI (default).
    Tui,
    /// Register a new user.
    Register(RegisterArgs),
    /// List registered users.
    Users {
        /// Print the users as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub password: String,
}

impl Cli {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api_url.as_deref())
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Command::Tui))
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Send logs to `path`; the terminal belongs to the UI.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| crate::error::simple_error(format!("init logging: {e}")))
}

/// Send logs to stderr for one-shot commands.
pub fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| crate::error::simple_error(format!("init logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_tui() {
        let cli = Cli::try_parse_from(["userdesk", "--api-url", "http://api.test/"]).unwrap();
        assert!(cli.is_interactive());
        assert_eq!(cli.api_config().base_url(), "http://api.test");
        assert_eq!(cli.theme, "theme.conf");
    }

    #[test]
    fn parses_register_subcommand() {
        let cli = Cli::try_parse_from([
            "userdesk",
            "register",
            "--email",
            "a@b.co",
            "--name",
            "Ann",
            "--password",
            "secret1",
        ])
        .unwrap();
        assert!(!cli.is_interactive());
        match cli.command {
            Some(Command::Register(args)) => {
                assert_eq!(args.email, "a@b.co");
                assert_eq!(args.name, "Ann");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_users_json_flag() {
        let cli = Cli::try_parse_from(["userdesk", "users", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Users { json: true })));
    }
}
