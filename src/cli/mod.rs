// CLI module for command-line interface

pub mod index;
pub mod info;
pub mod search;
pub mod version;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::config::{ConfigParser, IndexerConfig};
use crate::utils::error::Result;

use self::index::IndexCommand;
use self::info::InfoCommand;
use self::search::SearchCommand;
use self::version::VersionCommand;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "freqidx")]
#[command(about = "Normalize word-frequency lists and bulk-index them into Elasticsearch/OpenSearch")]
#[command(long_about = r#"freqidx reads a word-frequency list (one "word count" pair per line),
normalizes the counts and bulk-indexes one document per word into an
Elasticsearch or OpenSearch cluster.

Examples:
  freqidx index en_full.txt                      Index with defaults (index "words")
  freqidx index en_full.txt --batch-size 500     Larger bulk requests
  freqidx index en.txt --normalization softmax   Softmax instead of words-per-million
  freqidx info                                   Show cluster name and versions
  freqidx search hello                           Look up an indexed word
  freqidx version 7.10.2 1.2.3.4-beta --sort     Parse and reformat version strings

Configuration is read from --config, or from the platform config directory
(freqidx/config.toml) when present. Flags override the file."#)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// All available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a frequency file and bulk-index it
    Index(IndexCommand),

    /// Show cluster name, distribution and version information
    Info(InfoCommand),

    /// Search indexed words
    Search(SearchCommand),

    /// Parse and reformat version strings (offline)
    #[command(long_about = r#"Parse version strings of the form
major.minor[.build[.revision]][-tag] and print them back.

Examples:
  freqidx version 7.10.2                 Canonical form
  freqidx version 1.2.3.4-beta --fields 2   Only major.minor (tag kept)
  freqidx version 2.0 1.10 1.2 --sort    Sort by component
  freqidx version 1.x 1.2 --lenient      Skip malformed input"#)]
    Version(VersionCommand),
}

/// Cluster connection flags shared by commands that talk to the cluster
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Configuration file (TOML)
    #[arg(long, env = "FREQIDX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cluster base URL
    #[arg(long, env = "FREQIDX_URL")]
    pub url: Option<String>,

    /// Basic auth credentials as user:password
    #[arg(long, env = "FREQIDX_CREDENTIALS", hide_env_values = true)]
    pub credentials: Option<String>,

    /// Verify TLS certificates (overrides `insecure = true` in the config)
    #[arg(long)]
    pub verify_tls: bool,
}

impl ConnectionArgs {
    /// Load the configuration, apply connection overrides and validate
    pub fn load_config(&self) -> Result<IndexerConfig> {
        let config = self.merged_config()?;
        ConfigParser::validate(&config)?;
        Ok(config)
    }

    /// Configuration with connection overrides applied, not yet validated
    pub fn merged_config(&self) -> Result<IndexerConfig> {
        let mut config = ConfigParser::load_or_default(self.config.as_deref())?;

        if let Some(url) = &self.url {
            config.elastic.url.clone_from(url);
        }
        if let Some(credentials) = &self.credentials {
            config.elastic.credentials.clone_from(credentials);
        }
        if self.verify_tls {
            config.elastic.insecure = false;
        }

        Ok(config)
    }
}

/// CLI command dispatcher
pub struct CliDispatcher;

impl CliDispatcher {
    /// Execute a CLI command
    pub async fn execute(command: Commands) -> Result<()> {
        match command {
            Commands::Index(cmd) => cmd.run().await,
            Commands::Info(cmd) => cmd.run().await,
            Commands::Search(cmd) => cmd.run().await,
            Commands::Version(cmd) => cmd.run(),
        }
    }
}
