// Common validation utilities for freqidx CLI commands

use crate::utils::error::{IndexerError, Result};
use std::path::Path;

const INDEX_NAME_FORBIDDEN: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':'];

/// Validate an index name against the cluster's naming rules
pub fn validate_index_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(IndexerError::Validation(
            "Index name cannot be empty.\n\nProvide an index name:\n  freqidx index words.txt --index words".to_string()
        ));
    }

    if name == "." || name == ".." {
        return Err(IndexerError::Validation(format!("Index name '{name}' is reserved.")));
    }

    if name.len() > 255 {
        return Err(IndexerError::Validation(format!(
            "Index name '{name}' is too long (max 255 bytes)."
        )));
    }

    if name != name.to_lowercase() {
        return Err(IndexerError::Validation(format!(
            "Index name '{name}' contains uppercase letters.\n\nIndex names must be lowercase:\n  ✓ words\n  ✗ Words"
        )));
    }

    if name.starts_with(['-', '_', '+']) {
        return Err(IndexerError::Validation(format!(
            "Index name '{name}' cannot start with '-', '_' or '+'."
        )));
    }

    if let Some(c) = name.chars().find(|c| INDEX_NAME_FORBIDDEN.contains(c)) {
        return Err(IndexerError::Validation(format!(
            "Index name '{name}' contains forbidden character '{c}'."
        )));
    }

    Ok(())
}

/// Validate `user:password` credentials for Basic auth
pub fn validate_credentials(credentials: &str) -> Result<()> {
    // Empty credentials disable the Authorization header
    if credentials.is_empty() {
        return Ok(());
    }

    match credentials.split_once(':') {
        Some((user, _)) if !user.is_empty() => Ok(()),
        _ => Err(IndexerError::Validation(
            "Credentials must have the form 'user:password'.\n\nExample:\n  freqidx index words.txt --credentials admin:admin".to_string()
        )),
    }
}

/// Validate the cluster base URL
pub fn validate_url(url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| IndexerError::Validation(format!("Invalid cluster URL '{url}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(IndexerError::Validation(format!(
            "Cluster URL '{url}' must use http or https."
        )));
    }

    Ok(())
}

/// Validate the frequency file exists and is a regular file
pub fn validate_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(IndexerError::Validation(format!(
            "Frequency file '{}' not found.",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(IndexerError::Validation(format!(
            "'{}' is not a file.\n\nExpected a text file with one 'word count' pair per line.",
            path.display()
        )));
    }

    Ok(())
}
