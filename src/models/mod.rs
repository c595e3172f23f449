// Models module for data structures
pub mod bulk;
pub mod cluster;
pub mod version;
pub mod word;

pub use bulk::{BulkAction, BulkDocument, BulkItem, BulkResponse, DocumentResult, IndexMeta, ShardInfo};
pub use cluster::{ClusterInfo, ClusterVersion};
pub use version::{Component, Version, VersionError};
pub use word::WordData;
