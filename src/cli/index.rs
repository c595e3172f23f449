use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::ConnectionArgs;
use crate::models::version::Version;
use crate::services::elastic_client::ElasticClient;
use crate::services::frequency_reader::FrequencyTable;
use crate::services::indexer::{IndexSummary, Indexer};
use crate::services::normalizer::Normalization;
use crate::utils::config::{ConfigParser, IndexerConfig};
use crate::utils::error::Result;
use crate::utils::validation;

/// Normalize a word-frequency file and bulk-index it
#[derive(Debug, Args)]
pub struct IndexCommand {
    /// Frequency file with one `word count` pair per line
    pub file: PathBuf,

    /// Target index (default: "words")
    #[arg(long)]
    pub index: Option<String>,

    /// Documents per bulk request (default: 20)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Bulk requests in flight at once (default: 1)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// words-per-million or softmax
    #[arg(long)]
    pub normalization: Option<Normalization>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Read and normalize the file without contacting the cluster
    #[arg(long)]
    pub dry_run: bool,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

/// Statistics of the input file
#[derive(Debug, Serialize)]
pub struct FileStats {
    pub path: String,
    pub words: usize,
    pub skipped_lines: usize,
    pub min: u64,
    pub max: u64,
    pub sum: u128,
}

/// JSON response format for index command
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub status: String,
    pub file: FileStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<IndexSummary>,
}

impl IndexCommand {
    /// Execute the index command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        validation::validate_input_file(&self.file)?;

        let table = FrequencyTable::from_path(&self.file).await?;
        let stats = FileStats {
            path: self.file.display().to_string(),
            words: table.len(),
            skipped_lines: table.skipped_lines(),
            min: table.min().unwrap_or_default(),
            max: table.max().unwrap_or_default(),
            sum: table.sum(),
        };

        if !self.json {
            println!(
                "Found: {} words (max: {}, min: {}, sum: {})",
                stats.words, stats.max, stats.min, stats.sum
            );
            if stats.skipped_lines > 0 {
                println!("Skipped {} malformed line(s)", stats.skipped_lines);
            }
        }

        let documents = Indexer::build_documents(&table, &config.index);

        if self.dry_run {
            tracing::info!(documents = documents.len(), "Dry run, nothing sent");
            return self.report(IndexResponse {
                status: "dry-run".to_string(),
                file: stats,
                cluster_version: None,
                summary: None,
            });
        }

        let client = ElasticClient::new(&config.elastic)?;
        let info = client.cluster_info().await?;
        tracing::info!(
            cluster = %info.cluster_name,
            distribution = info.distribution(),
            version = %info.version.number,
            "Connected to cluster"
        );
        if !self.json {
            println!(
                "Connected to {} ({} {})",
                info.cluster_name,
                info.distribution(),
                info.version.number
            );
        }

        let indexer = Indexer::new(client, config.index.clone());
        let summary = indexer.run(&documents).await?;

        let status = if summary.has_failures() { "partial" } else { "success" };
        self.report(IndexResponse {
            status: status.to_string(),
            file: stats,
            cluster_version: Some(info.version.number),
            summary: Some(summary),
        })
    }

    /// Merge the config file with command-line overrides
    fn load_config(&self) -> Result<IndexerConfig> {
        let mut config = self.connection.merged_config()?;

        if let Some(index) = &self.index {
            config.index.name.clone_from(index);
        }
        if let Some(batch_size) = self.batch_size {
            config.index.batch_size = batch_size;
        }
        if let Some(concurrency) = self.concurrency {
            config.index.concurrency = concurrency;
        }
        if let Some(normalization) = self.normalization {
            config.index.normalization = normalization;
        }

        ConfigParser::validate(&config)?;
        Ok(config)
    }

    fn report(&self, response: IndexResponse) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }

        match &response.summary {
            Some(summary) => {
                println!(
                    "Indexed {} documents into '{}' in {} batches ({} ms)",
                    summary.documents, summary.index, summary.batches, summary.total_took_ms
                );
                if summary.has_failures() {
                    println!("⚠ {} item(s) were rejected by the cluster", summary.failed_items);
                }
            }
            None => println!("Dry run: {} documents prepared, nothing sent", response.file.words),
        }
        Ok(())
    }
}
