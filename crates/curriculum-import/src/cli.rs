//! Command-line arguments shared by both importers
//!
//! Every flag falls back to an environment variable; a `.env` file is loaded
//! before parsing.

use crate::config::DEFAULT_CURRICULUM_DIR;
use crate::discovery::Discovery;
use clap::{builder::BoolishValueParser, Args};
use curriculum_common::logging::{init_logging, LogConfig, LogLevel, WorkerGuard};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Base directory searched recursively for *_expanded.json files
    #[arg(long, env = "CURRICULUM_DIR", default_value = DEFAULT_CURRICULUM_DIR)]
    pub dir: PathBuf,

    /// Visit files in name order instead of file-system order
    #[arg(long, env = "CURRICULUM_SORTED", value_parser = BoolishValueParser::new())]
    pub sorted: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn discovery(&self) -> Discovery {
        Discovery::new(&self.dir).sorted(self.sorted)
    }

    /// Initialize logging; `LOG_*` environment variables take precedence.
    ///
    /// The caller keeps the returned guard alive for the rest of the run.
    pub fn init_logging(&self, log_file_prefix: &str) -> anyhow::Result<Option<WorkerGuard>> {
        let level = if self.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };

        let config = LogConfig::builder()
            .level(level)
            .log_file_prefix(log_file_prefix)
            .build()
            .with_env_overrides()?;

        init_logging(&config)
    }
}
