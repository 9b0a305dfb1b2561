use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TRAVERSAL_DEPTH: usize = 32;

/// Connection and engine settings for one store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SPARQL 1.1 query endpoint.
    pub query_endpoint: String,
    /// SPARQL 1.1 update endpoint. Defaults to the query endpoint, which is
    /// what single-endpoint stores expose.
    pub update_endpoint: String,
    /// Per-request timeout; there is no retry on top of it.
    pub request_timeout: Duration,
    /// Depth bound for hydration and nested creates. Traversal beyond the
    /// bound degrades to stubs instead of recursing further.
    pub max_traversal_depth: usize,
}

impl StoreConfig {
    /// Build a configuration from an optional file plus environment
    /// overrides (`PLANTGRAPH_QUERY_ENDPOINT`, `PLANTGRAPH_UPDATE_ENDPOINT`,
    /// `PLANTGRAPH_REQUEST_TIMEOUT_SECS`, `PLANTGRAPH_MAX_DEPTH`).
    pub fn from_sources(config_file: Option<&Path>) -> Result<Self> {
        let file_config = if let Some(path) = config_file {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let query_endpoint = env::var("PLANTGRAPH_QUERY_ENDPOINT")
            .ok()
            .or(file_config.query_endpoint)
            .context("query endpoint must be configured")?;

        let update_endpoint = env::var("PLANTGRAPH_UPDATE_ENDPOINT")
            .ok()
            .or(file_config.update_endpoint)
            .unwrap_or_else(|| query_endpoint.clone());

        let timeout_secs = env::var("PLANTGRAPH_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .or(file_config.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let max_traversal_depth = env::var("PLANTGRAPH_MAX_DEPTH")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .or(file_config.max_traversal_depth)
            .unwrap_or(DEFAULT_MAX_TRAVERSAL_DEPTH);

        let config = StoreConfig {
            query_endpoint,
            update_endpoint,
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            max_traversal_depth: max_traversal_depth.max(1),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.query_endpoint.starts_with("http://")
                || self.query_endpoint.starts_with("https://"),
            "query endpoint must be an http(s) URL, got {:?}",
            self.query_endpoint
        );
        anyhow::ensure!(
            self.update_endpoint.starts_with("http://")
                || self.update_endpoint.starts_with("https://"),
            "update endpoint must be an http(s) URL, got {:?}",
            self.update_endpoint
        );
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    query_endpoint: Option<String>,
    update_endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
    max_traversal_depth: Option<usize>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
