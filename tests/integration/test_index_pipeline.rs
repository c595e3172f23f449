use mockito::{Matcher, Server};
use reqwest::Client;
use serde_json::json;

use freqidx::services::elastic_client::{ElasticClient, ElasticError};
use freqidx::services::frequency_reader::FrequencyTable;
use freqidx::services::indexer::Indexer;
use freqidx::services::normalizer::Normalization;
use freqidx::utils::config::IndexSettings;

fn bulk_ok(took: u64) -> String {
    json!({"took": took, "errors": false, "items": []}).to_string()
}

async fn table() -> FrequencyTable {
    FrequencyTable::from_reader("you 50\ni 30\nthe 15\nto 5\nmalformed\n".as_bytes())
        .await
        .unwrap()
}

/// Test documents are split into batches of `batch_size`
#[tokio::test]
async fn test_pipeline_batches_documents() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/_bulk")
        .match_header("content-type", "application/x-ndjson")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(bulk_ok(4))
        .expect(2)
        .create_async()
        .await;

    let settings = IndexSettings {
        batch_size: 3,
        ..IndexSettings::default()
    };
    let table = table().await;
    let documents = Indexer::build_documents(&table, &settings);
    assert_eq!(documents.len(), 4);
    assert_eq!(table.skipped_lines(), 1);

    let client = ElasticClient::with_client(Client::new(), server.url());
    let summary = Indexer::new(client, settings).run(&documents).await.unwrap();

    mock.assert_async().await;
    assert_eq!(summary.index, "words");
    assert_eq!(summary.batches, 2);
    assert_eq!(summary.documents, 4);
    assert_eq!(summary.total_took_ms, 8);
    assert!(!summary.has_failures());
    assert!(summary.finished_at >= summary.started_at);
}

/// Test concurrent batches with softmax normalization
#[tokio::test]
async fn test_pipeline_concurrent_softmax() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/_bulk")
        .match_body(Matcher::Regex(r#""_index":"words-softmax""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(bulk_ok(1))
        .expect(4)
        .create_async()
        .await;

    let settings = IndexSettings {
        name: "words-softmax".to_string(),
        batch_size: 1,
        concurrency: 4,
        normalization: Normalization::Softmax,
        ..IndexSettings::default()
    };
    let documents = Indexer::build_documents(&table().await, &settings);
    let total: f64 = documents
        .iter()
        .filter_map(|doc| doc.document.as_ref())
        .map(|word| word.norm_frequency)
        .sum();
    assert!((total - 1.0).abs() < 1e-9);

    let client = ElasticClient::with_client(Client::new(), server.url());
    let summary = Indexer::new(client, settings).run(&documents).await.unwrap();

    mock.assert_async().await;
    assert_eq!(summary.batches, 4);
    assert_eq!(summary.documents, 4);
}

/// Test item-level failures are counted but not fatal
#[tokio::test]
async fn test_pipeline_counts_failed_items() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/_bulk")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "took": 3,
                "errors": true,
                "items": [
                    {"index": {"_index": "words", "_id": "0", "status": 201, "result": "created"}},
                    {"index": {"_index": "words", "_id": "1", "status": 429,
                               "error": {"type": "es_rejected_execution_exception", "reason": "queue full"}}}
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let settings = IndexSettings {
        batch_size: 10,
        ..IndexSettings::default()
    };
    let documents = Indexer::build_documents(&table().await, &settings);

    let client = ElasticClient::with_client(Client::new(), server.url());
    let summary = Indexer::new(client, settings).run(&documents).await.unwrap();

    mock.assert_async().await;
    assert_eq!(summary.failed_items, 1);
    assert!(summary.has_failures());
}

/// Test a rejected request stops the run
#[tokio::test]
async fn test_pipeline_stops_on_request_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/_bulk")
        .with_status(403)
        .create_async()
        .await;

    let settings = IndexSettings::default();
    let documents = Indexer::build_documents(&table().await, &settings);

    let client = ElasticClient::with_client(Client::new(), server.url());
    let result = Indexer::new(client, settings).run(&documents).await;

    assert!(matches!(result, Err(ElasticError::Unauthorized(403))));
}
