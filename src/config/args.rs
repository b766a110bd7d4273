//! Command-line arguments
//!
//! Only process-level switches live here; everything else comes from
//! `config.toml` and `SS__*` environment variables.

use clap::Parser;

use super::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "shortstat", version, about = "URL shortener with best-effort link analytics")]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Override server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Override server.port
    #[arg(long)]
    pub port: Option<u16>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
