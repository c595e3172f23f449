use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::models::bulk::{BulkDocument, BulkResponse, DocumentResult};
use crate::models::cluster::ClusterInfo;
use crate::utils::config::ElasticConfig;

const NDJSON: &str = "application/x-ndjson";

/// REST client for an Elasticsearch or OpenSearch cluster
#[derive(Debug, Clone)]
pub struct ElasticClient {
    /// HTTP client carrying the default auth header
    client: Client,
    /// Cluster base URL without a trailing slash
    base_url: String,
}

/// Cluster client errors
#[derive(Debug, thiserror::Error)]
pub enum ElasticError {
    /// HTTP request failed before a response arrived
    #[error("Cluster request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Credentials were rejected
    #[error("Cluster rejected the credentials (HTTP {0})")]
    Unauthorized(u16),

    /// Any other non-success status
    #[error("Cluster returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to parse cluster response: {0}")]
    ParseError(String),

    /// Client could not be built from the configuration
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Request body could not be serialized
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ElasticClient {
    /// Build a client with Basic auth, TLS and timeout settings from the config
    pub fn new(config: &ElasticConfig) -> Result<Self, ElasticError> {
        let mut headers = HeaderMap::new();
        if !config.credentials.is_empty() {
            let encoded = general_purpose::STANDARD.encode(config.credentials.as_bytes());
            let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
                .map_err(|e| ElasticError::InvalidConfig(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        if config.insecure {
            tracing::warn!(url = %config.url, "TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(format!("freqidx/{}", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(config.insecure)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ElasticError::InvalidConfig(e.to_string()))?;

        Ok(Self::with_client(client, config.url.clone()))
    }

    /// Wrap an existing HTTP client (for testing)
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `/{index}/{action}/{id}`, leaving out the parts that are not given
    pub fn url(&self, action: &str, id: Option<&str>, index: Option<&str>) -> String {
        let path = match (index, id) {
            (None, None) => format!("/{action}"),
            (None, Some(id)) => format!("/{action}/{id}"),
            (Some(index), None) => format!("/{index}/{action}"),
            (Some(index), Some(id)) => format!("/{index}/{action}/{id}"),
        };
        format!("{}{}", self.base_url, path)
    }

    /// `GET /`: node name, cluster name and version block
    pub async fn cluster_info(&self) -> Result<ClusterInfo, ElasticError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .header("Accept", "application/json")
            .send()
            .await?;

        let info: ClusterInfo = Self::read_json(response).await?;
        tracing::debug!(
            cluster = %info.cluster_name,
            version = %info.version.number,
            "Fetched cluster info"
        );
        Ok(info)
    }

    /// `POST /{index}/_bulk` with an NDJSON body
    pub async fn bulk<T: Serialize>(
        &self,
        documents: &[BulkDocument<T>],
        index: Option<&str>,
    ) -> Result<BulkResponse, ElasticError> {
        if documents.is_empty() {
            return Ok(BulkResponse {
                took: 0,
                errors: false,
                items: Vec::new(),
            });
        }

        let mut body = String::new();
        for document in documents {
            document.write_ndjson(&mut body)?;
        }

        let response = self
            .client
            .post(self.url("_bulk", None, index))
            .header(CONTENT_TYPE, NDJSON)
            .body(body)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// `POST /{index}/_doc/{id}` with a single JSON document
    pub async fn post_document<T: Serialize>(
        &self,
        document: &T,
        id: Option<&str>,
        index: Option<&str>,
    ) -> Result<DocumentResult, ElasticError> {
        let response = self
            .client
            .post(self.url("_doc", id, index))
            .json(document)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// `POST /{index}/_search`, returning the raw response
    pub async fn search(
        &self,
        index: Option<&str>,
        query: &serde_json::Value,
    ) -> Result<serde_json::Value, ElasticError> {
        let response = self
            .client
            .post(self.url("_search", None, index))
            .json(query)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ElasticError> {
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ElasticError::ParseError(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, ElasticError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ElasticError::Unauthorized(status.as_u16()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(ElasticError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
