use serde::{Deserialize, Serialize};

/// One indexed word with its raw and normalized frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordData {
    /// Sequential document id, in file order
    pub id: u64,
    /// The word itself
    pub word: String,
    /// Raw occurrence count from the frequency file
    pub frequency: u64,
    /// Frequency after normalization (words-per-million or softmax)
    pub norm_frequency: f64,
}

impl WordData {
    pub fn new(id: u64, word: impl Into<String>, frequency: u64, norm_frequency: f64) -> Self {
        Self {
            id,
            word: word.into(),
            frequency,
            norm_frequency,
        }
    }

    /// Document id as sent in the bulk metadata line
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }
}
