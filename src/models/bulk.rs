use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Operation carried by one entry of a `_bulk` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Create,
    Delete,
    Index,
    Update,
}

impl BulkAction {
    /// Key used for this action in the NDJSON metadata line
    pub fn as_str(self) -> &'static str {
        match self {
            BulkAction::Create => "create",
            BulkAction::Delete => "delete",
            BulkAction::Index => "index",
            BulkAction::Update => "update",
        }
    }

    /// Whether the action is followed by a source line
    pub fn has_source(self) -> bool {
        !matches!(self, BulkAction::Delete)
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a bulk action (`{"_index": ..., "_id": ...}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMeta {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl IndexMeta {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: id.into(),
            version: None,
        }
    }
}

/// One entry of a bulk request: an action, its target and (except for deletes) a document
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDocument<T> {
    pub id: String,
    pub index: String,
    pub action: BulkAction,
    pub document: Option<T>,
}

impl<T: Serialize> BulkDocument<T> {
    pub fn new(action: BulkAction, index: impl Into<String>, id: impl Into<String>, document: T) -> Self {
        Self {
            id: id.into(),
            index: index.into(),
            action,
            document: Some(document),
        }
    }

    /// Index (create or replace) a document
    pub fn index(index: impl Into<String>, id: impl Into<String>, document: T) -> Self {
        Self::new(BulkAction::Index, index, id, document)
    }

    /// Delete a document; no source line is sent
    pub fn delete(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            index: index.into(),
            action: BulkAction::Delete,
            document: None,
        }
    }

    pub fn meta(&self) -> IndexMeta {
        IndexMeta::new(self.index.clone(), self.id.clone())
    }

    /// Metadata line, e.g. `{"index":{"_index":"words","_id":"0"}}`
    pub fn action_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&BTreeMap::from([(self.action.as_str(), self.meta())]))
    }

    /// Source line following the metadata line, if the action takes one.
    ///
    /// Updates wrap the document as a partial `{"doc": ...}`.
    pub fn source_line(&self) -> Result<Option<String>, serde_json::Error> {
        if !self.action.has_source() {
            return Ok(None);
        }
        let Some(document) = &self.document else {
            return Ok(None);
        };

        let line = if self.action == BulkAction::Update {
            serde_json::to_string(&PartialDoc { doc: document })?
        } else {
            serde_json::to_string(document)?
        };
        Ok(Some(line))
    }

    /// Append this entry to an NDJSON body, newline-terminated
    pub fn write_ndjson(&self, body: &mut String) -> Result<(), serde_json::Error> {
        body.push_str(&self.action_line()?);
        body.push('\n');
        if let Some(source) = self.source_line()? {
            body.push_str(&source);
            body.push('\n');
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct PartialDoc<'a, T> {
    doc: &'a T,
}

/// Shard acknowledgement counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardInfo {
    pub total: u32,
    pub successful: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<u32>,
    pub failed: u32,
}

/// Outcome of a single-document write, also used per bulk item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// `created`, `updated`, `deleted`, `noop` or `not_found`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(rename = "_shards", default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(rename = "_seq_no", default, skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i64>,
    #[serde(rename = "_primary_term", default, skip_serializing_if = "Option::is_none")]
    pub primary_term: Option<i64>,
    /// Present when this item failed inside an otherwise successful bulk call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl DocumentResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// One item of a bulk response, keyed by the action that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkItem {
    Create(DocumentResult),
    Delete(DocumentResult),
    Index(DocumentResult),
    Update(DocumentResult),
}

impl BulkItem {
    pub fn action(&self) -> BulkAction {
        match self {
            BulkItem::Create(_) => BulkAction::Create,
            BulkItem::Delete(_) => BulkAction::Delete,
            BulkItem::Index(_) => BulkAction::Index,
            BulkItem::Update(_) => BulkAction::Update,
        }
    }

    pub fn result(&self) -> &DocumentResult {
        match self {
            BulkItem::Create(result)
            | BulkItem::Delete(result)
            | BulkItem::Index(result)
            | BulkItem::Update(result) => result,
        }
    }
}

/// Response body of `POST /_bulk`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    /// Server-side processing time in milliseconds
    pub took: u64,
    /// True when at least one item failed
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

impl BulkResponse {
    pub fn failed_items(&self) -> usize {
        self.items.iter().filter(|item| item.result().is_error()).count()
    }
}
