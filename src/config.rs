//! Process configuration
//!
//! Settings are merged in priority order: command-line argument, then
//! environment variable (wired through clap), then the optional TOML config
//! file, then the compiled default.

use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use tokio::time::Duration;

use crate::error::{Error, Result};

const DEFAULT_PORT: u16 = 5740;
const DEFAULT_COMMAND_DEADLINE_MS: u64 = 5_000;

/// Command-line arguments for phonod
#[derive(Parser, Debug)]
#[command(name = "phonod")]
#[command(about = "Remote-controlled music player service")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PHONO_PORT")]
    port: Option<u16>,

    /// Playlist store file; omit for a memory-only playlist
    #[arg(short = 'f', long, env = "PHONO_STORE_FILE")]
    store_file: Option<PathBuf>,

    /// Skip restoring the playlist store at startup
    #[arg(long, env = "PHONO_NO_RESTORE")]
    no_restore: bool,

    /// TOML config file
    #[arg(short, long, env = "PHONO_CONFIG")]
    config: Option<PathBuf>,
}

/// Keys recognized in the TOML config file
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    port: Option<u16>,
    store_file: Option<PathBuf>,
    restore: Option<bool>,
    command_deadline_ms: Option<u64>,
}

/// Resolved process configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,
    /// Playlist snapshot file; `None` keeps the playlist memory-only
    pub store_file: Option<PathBuf>,
    /// Whether to replay the snapshot at startup
    pub restore: bool,
    /// Bound on a single player command, enqueue and reply included
    pub command_deadline: Duration,
}

impl Config {
    /// Resolve the configuration from parsed arguments
    pub fn load(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("invalid {}: {}", path.display(), e)))?
            }
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: &Args, file: FileConfig) -> Self {
        Self {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            store_file: args.store_file.clone().or(file.store_file),
            restore: if args.no_restore {
                false
            } else {
                file.restore.unwrap_or(true)
            },
            command_deadline: Duration::from_millis(
                file.command_deadline_ms
                    .unwrap_or(DEFAULT_COMMAND_DEADLINE_MS),
            ),
        }
    }

    /// True when no store file is configured
    pub fn is_store_in_memory(&self) -> bool {
        self.store_file.is_none()
    }
}
