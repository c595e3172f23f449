use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::pin::pin;

use crate::models::bulk::BulkDocument;
use crate::models::word::WordData;
use crate::services::elastic_client::{ElasticClient, ElasticError};
use crate::services::frequency_reader::FrequencyTable;
use crate::services::normalizer::{words_per_million, Normalization, SoftMax};
use crate::utils::config::IndexSettings;

/// Outcome of one indexing run
#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub index: String,
    pub batches: usize,
    pub documents: usize,
    /// Bulk items the cluster reported as failed
    pub failed_items: usize,
    /// Sum of server-side `took` across batches
    pub total_took_ms: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl IndexSummary {
    pub fn has_failures(&self) -> bool {
        self.failed_items > 0
    }
}

/// Normalizes a frequency table and pushes it to the cluster in bulk batches
#[derive(Debug, Clone)]
pub struct Indexer {
    client: ElasticClient,
    settings: IndexSettings,
}

impl Indexer {
    pub fn new(client: ElasticClient, settings: IndexSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    /// One `index` action per word, ids assigned from 0 in file order
    pub fn build_documents(
        table: &FrequencyTable,
        settings: &IndexSettings,
    ) -> Vec<BulkDocument<WordData>> {
        let pairs = table.pairs();
        let normalized = match settings.normalization {
            Normalization::WordsPerMillion => words_per_million(&pairs, settings.factor),
            Normalization::Softmax => SoftMax::map(&pairs, settings.softmax_min, settings.softmax_max),
        };

        table
            .entries()
            .iter()
            .zip(0_u64..)
            .map(|(entry, id)| {
                let norm = normalized.get(entry.word.as_str()).copied().unwrap_or_default();
                let word = WordData::new(id, entry.word.clone(), entry.count, norm);
                BulkDocument::index(settings.name.clone(), word.document_id(), word)
            })
            .collect()
    }

    /// Send documents in `batch_size` chunks, up to `concurrency` requests in flight.
    ///
    /// Stops at the first batch whose request fails outright. Per-item failures
    /// reported inside a bulk response are counted, not fatal.
    pub async fn run(
        &self,
        documents: &[BulkDocument<WordData>],
    ) -> Result<IndexSummary, ElasticError> {
        let started_at = Utc::now();
        let batch_size = self.settings.batch_size.max(1);
        let concurrency = self.settings.concurrency.max(1);

        let mut summary = IndexSummary {
            index: self.settings.name.clone(),
            batches: 0,
            documents: 0,
            failed_items: 0,
            total_took_ms: 0,
            started_at,
            finished_at: started_at,
        };

        tracing::info!(
            index = %self.settings.name,
            documents = documents.len(),
            batch_size,
            concurrency,
            "Starting bulk indexing"
        );

        let mut batches = pin!(stream::iter(documents.chunks(batch_size).enumerate())
            .map(|(batch, chunk)| async move {
                let response = self.client.bulk(chunk, None).await?;
                Ok::<_, ElasticError>((batch, chunk.len(), response))
            })
            .buffer_unordered(concurrency));

        while let Some(result) = batches.next().await {
            let (batch, sent, response) = result?;
            let failed = response.failed_items();

            tracing::info!(
                batch,
                took = response.took,
                items = response.items.len(),
                errors = response.errors,
                "Bulk batch indexed"
            );
            if failed > 0 {
                tracing::warn!(batch, failed, "Bulk batch reported failed items");
            }

            summary.batches += 1;
            summary.documents += sent;
            summary.failed_items += failed;
            summary.total_took_ms += response.took;
        }

        summary.finished_at = Utc::now();
        tracing::info!(
            batches = summary.batches,
            documents = summary.documents,
            failed = summary.failed_items,
            "Bulk indexing finished"
        );
        Ok(summary)
    }
}
