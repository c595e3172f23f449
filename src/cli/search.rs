use clap::Args;
use serde_json::{json, Value};

use crate::cli::ConnectionArgs;
use crate::models::word::WordData;
use crate::services::elastic_client::ElasticClient;
use crate::utils::error::Result;
use crate::utils::validation;

/// Search indexed words
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Word to look up
    pub word: String,

    /// Index to search (default: from config)
    #[arg(long)]
    pub index: Option<String>,

    /// Maximum number of hits
    #[arg(long, default_value_t = 10)]
    pub size: usize,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print the raw search response
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    /// Execute the search command
    pub async fn run(&self) -> Result<()> {
        let config = self.connection.load_config()?;
        let index = self.index.as_deref().unwrap_or(&config.index.name);
        validation::validate_index_name(index)?;

        let client = ElasticClient::new(&config.elastic)?;
        let response = client.search(Some(index), &self.query()).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }

        let hits = hits(&response);
        if hits.is_empty() {
            println!("No match for '{}' in '{index}'", self.word);
            return Ok(());
        }

        for hit in hits {
            println!(
                "{:>8}  {:<24} frequency: {:<12} norm: {}",
                hit.id, hit.word, hit.frequency, hit.norm_frequency
            );
        }
        Ok(())
    }

    /// `match` query on the `word` field
    pub fn query(&self) -> Value {
        json!({
            "size": self.size,
            "query": {
                "match": {
                    "word": self.word
                }
            }
        })
    }
}

/// Word documents under `hits.hits[]._source`; hits of another shape are skipped
pub fn hits(response: &Value) -> Vec<WordData> {
    response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.get("_source"))
                .filter_map(|source| serde_json::from_value(source.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
