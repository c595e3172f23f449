use std::collections::HashMap;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Word-count ingestion errors
#[derive(Debug, thiserror::Error)]
pub enum FrequencyError {
    /// The frequency file could not be opened or read
    #[error("Failed to read frequency file: {0}")]
    Io(#[from] std::io::Error),

    /// A `word count` line had a count that is not a non-negative integer
    #[error("Invalid count '{value}' on line {line}")]
    InvalidCount { line: usize, value: String },
}

/// A single `word count` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// Word counts in file order, with running min/max/sum
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<WordCount>,
    positions: HashMap<String, usize>,
    skipped_lines: usize,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `word count` lines from a file on disk
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FrequencyError> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        let table = Self::from_reader(BufReader::new(file)).await?;

        tracing::info!(
            path = %path.display(),
            words = table.len(),
            skipped = table.skipped_lines(),
            "Loaded frequency file"
        );
        Ok(table)
    }

    /// Read `word count` lines from any buffered async reader.
    ///
    /// Lines that do not split into exactly two parts on a single space are skipped.
    pub async fn from_reader<R: AsyncBufRead + Unpin>(reader: R) -> Result<Self, FrequencyError> {
        let mut table = Self::new();
        let mut lines = reader.lines();
        let mut line_number = 0;

        while let Some(line) = lines.next_line().await? {
            line_number += 1;
            let parts: Vec<&str> = line.split(' ').collect();
            let [word, count] = parts.as_slice() else {
                tracing::debug!(line = line_number, "Skipping malformed frequency line");
                table.skipped_lines += 1;
                continue;
            };

            let count = count.parse::<u64>().map_err(|_| FrequencyError::InvalidCount {
                line: line_number,
                value: (*count).to_string(),
            })?;
            table.insert(word, count);
        }

        Ok(table)
    }

    /// Insert or overwrite a word count. Overwrites keep the original position.
    pub fn insert(&mut self, word: &str, count: u64) {
        if let Some(&position) = self.positions.get(word) {
            self.entries[position].count = count;
            return;
        }
        self.positions.insert(word.to_string(), self.entries.len());
        self.entries.push(WordCount {
            word: word.to_string(),
            count,
        });
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.positions.get(word).map(|&position| self.entries[position].count)
    }

    pub fn entries(&self) -> &[WordCount] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lines skipped because they were not `word count`
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn min(&self) -> Option<u64> {
        self.entries.iter().map(|entry| entry.count).min()
    }

    pub fn max(&self) -> Option<u64> {
        self.entries.iter().map(|entry| entry.count).max()
    }

    /// Total of all counts, widened so it cannot overflow
    pub fn sum(&self) -> u128 {
        self.entries.iter().map(|entry| u128::from(entry.count)).sum()
    }

    /// `(word, count)` pairs in file order, as consumed by the normalizer
    pub fn pairs(&self) -> Vec<(&str, u64)> {
        self.entries
            .iter()
            .map(|entry| (entry.word.as_str(), entry.count))
            .collect()
    }
}
