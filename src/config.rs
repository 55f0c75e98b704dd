//! Configuration management for the LaTeX language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - Server-side build defaults from a user config file

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::build::BuildConfig;

/// Command-line arguments for the LaTeX language server
#[derive(Debug, Parser)]
#[command(name = "latex-language-server")]
#[command(about = "Language server for LaTeX projects")]
#[command(version)]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(long, help = "Configuration file with default build settings")]
    pub config: Option<PathBuf>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: String,
    /// Build settings used when the client cannot supply any
    pub build: BuildConfig,
}

/// Shape of the on-disk configuration file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    build: Option<BuildConfig>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        // An explicit --config must exist; the default location is optional
        let path = args.config.or_else(|| {
            dirs::config_dir().map(|dir| dir.join("latex-ls").join("config.toml"))
        });

        let build = match path {
            Some(path) if path.exists() => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                let file: ConfigFile = toml::from_str(&text)
                    .with_context(|| format!("cannot parse {}", path.display()))?;
                file.build.unwrap_or_default()
            }
            _ => BuildConfig::default(),
        };

        Ok(Config {
            log_level: args.log_level,
            build,
        })
    }
}
