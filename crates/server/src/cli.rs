//! CLI argument parsing and config overrides.

use clap::{Parser, Subcommand};
use pooltask_core::Config;

/// Admission-controlled task pool with completion callbacks.
#[derive(Parser, Debug)]
#[command(name = "pooltask", version, about)]
pub struct Cli {
    /// Config profile; keys are looked up as `{PROFILE}_{KEY}` before `{KEY}`.
    #[arg(long, env = "POOLTASK_PROFILE", default_value = "", global = true)]
    pub profile: String,

    /// Bind address (overrides HOST).
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Listen port (overrides PORT).
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Concurrent task ceiling (overrides MAX_WORKERS).
    #[arg(long, global = true)]
    pub max_workers: Option<usize>,

    /// Completion callback endpoint (overrides CALLBACK_URL).
    #[arg(long, global = true)]
    pub callback_url: Option<String>,

    /// Callback request timeout in seconds (overrides CALLBACK_TIMEOUT_SECS).
    #[arg(long, global = true)]
    pub callback_timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Print the effective configuration as JSON and exit.
    Config,
}

impl Cli {
    /// Environment config for the selected profile with CLI flags applied on top.
    pub fn load_config(&self) -> Config {
        self.apply(Config::for_profile(&self.profile))
    }

    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(max_workers) = self.max_workers {
            config.pool.max_workers = max_workers;
        }
        if let Some(url) = &self.callback_url {
            config.callback.url = url.clone();
        }
        if let Some(timeout) = self.callback_timeout_secs {
            config.callback.timeout_secs = timeout;
        }
        config
    }

    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
