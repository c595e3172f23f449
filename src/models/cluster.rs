use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::version::Version;

/// Response body of `GET /` on an Elasticsearch or OpenSearch node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// Node name
    pub name: String,
    pub cluster_name: String,
    pub cluster_uuid: String,
    pub version: ClusterVersion,
    pub tagline: String,
}

/// Version block of the cluster info response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterVersion {
    /// `opensearch` on OpenSearch, absent on Elasticsearch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    pub number: Version,
    pub build_type: String,
    pub build_hash: String,
    pub build_date: DateTime<Utc>,
    pub build_snapshot: bool,
    pub lucene_version: Version,
    pub minimum_wire_compatibility_version: Version,
    pub minimum_index_compatibility_version: Version,
}

impl ClusterInfo {
    /// Distribution name, defaulting to `elasticsearch`
    pub fn distribution(&self) -> &str {
        self.version.distribution.as_deref().unwrap_or("elasticsearch")
    }

    /// Whether a client speaking `version` is at or above the node's wire minimum
    pub fn supports_wire(&self, version: &Version) -> bool {
        numeric_key(version) >= numeric_key(&self.version.minimum_wire_compatibility_version)
    }
}

fn numeric_key(version: &Version) -> (u32, u32, u32, u32) {
    (
        version.major(),
        version.minor(),
        version.build().unwrap_or_default(),
        version.revision().unwrap_or_default(),
    )
}
