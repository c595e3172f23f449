use freqidx::services::frequency_reader::{FrequencyError, FrequencyTable};
use std::fs;
use tempfile::TempDir;

async fn read(input: &str) -> Result<FrequencyTable, FrequencyError> {
    FrequencyTable::from_reader(input.as_bytes()).await
}

#[tokio::test]
async fn test_reads_pairs_in_file_order() {
    let table = read("you 22484400\ni 19975318\nthe 17594291\n").await.unwrap();

    assert_eq!(table.len(), 3);
    let words: Vec<&str> = table.entries().iter().map(|entry| entry.word.as_str()).collect();
    assert_eq!(words, ["you", "i", "the"]);
    assert_eq!(table.get("i"), Some(19_975_318));
    assert_eq!(table.max(), Some(22_484_400));
    assert_eq!(table.min(), Some(17_594_291));
    assert_eq!(table.sum(), 22_484_400 + 19_975_318 + 17_594_291);
}

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
    let table = read("the 10\n\nno-count\ntoo many parts 3\nof 4\n").await.unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.skipped_lines(), 3);
}

#[tokio::test]
async fn test_invalid_count_fails() {
    let err = read("the 10\nof ten\n").await.unwrap_err();

    match err {
        FrequencyError::InvalidCount { line, value } => {
            assert_eq!(line, 2);
            assert_eq!(value, "ten");
        }
        other => panic!("Expected InvalidCount, got {other:?}"),
    }
}

#[tokio::test]
async fn test_duplicate_word_overwrites() {
    let table = read("the 10\nof 4\nthe 12\n").await.unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.get("the"), Some(12));
    assert_eq!(table.entries()[0].word, "the");
    assert_eq!(table.pairs(), vec![("the", 12), ("of", 4)]);
}

#[tokio::test]
async fn test_empty_input() {
    let table = read("").await.unwrap();

    assert!(table.is_empty());
    assert_eq!(table.min(), None);
    assert_eq!(table.sum(), 0);
}

#[tokio::test]
async fn test_from_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("en_50k.txt");
    fs::write(&path, "you 100\ni 90\n").unwrap();

    let table = FrequencyTable::from_path(&path).await.unwrap();
    assert_eq!(table.len(), 2);

    let missing = FrequencyTable::from_path(dir.path().join("missing.txt")).await;
    assert!(matches!(missing, Err(FrequencyError::Io(_))));
}

#[tokio::test]
async fn test_maximal_counts_normalize() {
    let table = read("the 18446744073709551615\nof 18446744073709551615\nand 1\n")
        .await
        .unwrap();

    assert_eq!(table.sum(), u128::from(u64::MAX) * 2 + 1);

    let map = freqidx::services::normalizer::words_per_million(&table.pairs(), 1_000_000.0);
    assert!((map["the"] - 500_000.0).abs() < 1e-6);
    assert!(map["and"] < 1e-6);
}
