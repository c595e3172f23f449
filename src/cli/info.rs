use clap::Args;
use serde::Serialize;

use crate::cli::ConnectionArgs;
use crate::models::cluster::ClusterInfo;
use crate::models::version::Version;
use crate::services::elastic_client::ElasticClient;
use crate::utils::error::Result;

/// Oldest wire protocol the bulk requests are written against
const CLIENT_WIRE_VERSION: (i32, i32, i32) = (7, 10, 0);

/// Show cluster name, distribution and version information
#[derive(Debug, Args)]
pub struct InfoCommand {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Number of version components to print (2-4)
    #[arg(long)]
    pub fields: Option<usize>,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

/// JSON response format for info command
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: String,
    pub cluster_name: String,
    pub distribution: String,
    pub version: String,
    pub lucene_version: String,
    pub minimum_wire_compatibility_version: String,
    pub minimum_index_compatibility_version: String,
    pub client_wire_compatible: bool,
}

impl InfoResponse {
    /// Render the cluster versions with `fields` components
    pub fn from_cluster(info: &ClusterInfo, fields: Option<usize>) -> Result<Self> {
        let (major, minor, build) = CLIENT_WIRE_VERSION;
        let client_version = Version::with_build(major, minor, build)?;

        Ok(Self {
            name: info.name.clone(),
            cluster_name: info.cluster_name.clone(),
            distribution: info.distribution().to_string(),
            version: info.version.number.format(fields)?,
            lucene_version: info.version.lucene_version.format(fields)?,
            minimum_wire_compatibility_version: info
                .version
                .minimum_wire_compatibility_version
                .format(fields)?,
            minimum_index_compatibility_version: info
                .version
                .minimum_index_compatibility_version
                .format(fields)?,
            client_wire_compatible: info.supports_wire(&client_version),
        })
    }
}

impl InfoCommand {
    /// Execute the info command
    pub async fn run(&self) -> Result<()> {
        let config = self.connection.load_config()?;
        let client = ElasticClient::new(&config.elastic)?;
        let info = client.cluster_info().await?;
        let response = InfoResponse::from_cluster(&info, self.fields)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }

        println!("Node:         {}", response.name);
        println!("Cluster:      {}", response.cluster_name);
        println!("Distribution: {}", response.distribution);
        println!("Version:      {}", response.version);
        println!("Lucene:       {}", response.lucene_version);
        println!("Wire compat:  {}", response.minimum_wire_compatibility_version);
        println!("Index compat: {}", response.minimum_index_compatibility_version);
        if !response.client_wire_compatible {
            println!("⚠ Cluster requires a newer wire protocol than 7.10.0");
        }

        Ok(())
    }
}
