use clap::Args;
use serde::Serialize;

use crate::models::version::Version;
use crate::utils::error::Result;

/// Parse and reformat version strings
#[derive(Debug, Args)]
pub struct VersionCommand {
    /// Version strings (major.minor[.build[.revision]][-tag])
    #[arg(required = true)]
    pub versions: Vec<String>,

    /// Number of components to print (2-4, default: all present)
    #[arg(long)]
    pub fields: Option<usize>,

    /// Print in ascending version order
    #[arg(long)]
    pub sort: bool,

    /// Skip malformed input instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

/// JSON entry for one parsed version
#[derive(Debug, Serialize)]
pub struct VersionReport {
    pub input: String,
    pub formatted: String,
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
    pub major_revision: Option<i16>,
    pub minor_revision: Option<i16>,
    pub digest: u32,
}

impl VersionReport {
    pub fn new(input: &str, version: &Version, fields: Option<usize>) -> Result<Self> {
        Ok(Self {
            input: input.to_string(),
            formatted: version.format(fields)?,
            major: version.major(),
            minor: version.minor(),
            build: version.build(),
            revision: version.revision(),
            tag: version.tag().to_string(),
            major_revision: version.major_revision(),
            minor_revision: version.minor_revision(),
            digest: version.digest(),
        })
    }
}

impl VersionCommand {
    /// Execute the version command
    pub fn run(&self) -> Result<()> {
        let reports = self.reports()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
            return Ok(());
        }

        for report in &reports {
            println!("{}", report.formatted);
        }
        Ok(())
    }

    /// Parse every input, optionally sort, and render
    pub fn reports(&self) -> Result<Vec<VersionReport>> {
        let mut parsed = Vec::with_capacity(self.versions.len());
        for input in &self.versions {
            if self.lenient {
                match Version::try_parse(input) {
                    Some(version) => parsed.push((input.as_str(), version)),
                    None => tracing::warn!(input = %input, "Skipping malformed version"),
                }
            } else {
                parsed.push((input.as_str(), Version::parse(input)?));
            }
        }

        if self.sort {
            parsed.sort_by(|(_, a), (_, b)| a.cmp(b));
        }

        parsed
            .iter()
            .map(|(input, version)| VersionReport::new(input, version, self.fields))
            .collect()
    }
}
