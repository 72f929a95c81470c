// src/cli.rs

use crate::config::SettingsOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "group-config-admin",
    version,
    about = "Web admin panel for editing the groups configuration file",
    long_about = "Serves a login-protected browser editor for a JSON file listing email groups. \
                  Settings come from the environment (optionally a .env file) and can be overridden here."
)]
pub struct Cli {
    /// Groups JSON file (overrides CONFIG_FILE_PATH)
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Server bind address (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Server port (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding the login page, editor page and scripts (overrides PUBLIC_DIR)
    #[arg(long, value_name = "DIR")]
    pub public_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the admin panel (default)
    Serve,

    /// Load the settings and the groups file, report what was found, and exit
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            config_file_path: self.config_file.clone(),
            host: self.host.clone(),
            port: self.port,
            public_dir: self.public_dir.clone(),
        }
    }
}
