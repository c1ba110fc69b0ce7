//! Runtime configuration for talking to the search index.
//!
//! Settings come from the process environment, after loading a `.env` file if
//! one exists. The configuration is read once at startup and passed by
//! reference to the search client; missing required settings fail fast and are
//! reported together.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose;

pub const ENV_CLOUD_ID: &str = "ELASTIC_SEARCH_CLOUD_ID";
pub const ENV_URL: &str = "ELASTIC_SEARCH_URL";
pub const ENV_API_KEY: &str = "ELASTIC_SEARCH_API_KEY";
pub const ENV_DETAIL_URL: &str = "CONV_DETAIL_URL";
pub const ENV_INDEX: &str = "ELASTIC_SEARCH_INDEX";
pub const ENV_TIMEOUT_SECS: &str = "ELASTIC_SEARCH_TIMEOUT_SECS";

pub const DEFAULT_INDEX: &str = "vcon-index";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_CLOUD_PORT: u16 = 443;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the Elasticsearch deployment, without a trailing slash
    pub endpoint: String,
    pub api_key: String,
    /// Detail page link template; `{uuid}` is replaced by the record id
    pub detail_url: String,
    pub index: String,
    pub timeout: Duration,
}

impl Config {
    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as missing
    ///
    /// # Errors
    ///
    /// Returns an error naming every missing required variable, or if the
    /// cloud id or timeout cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let url = get(ENV_URL);
        let cloud_id = get(ENV_CLOUD_ID);
        let api_key = get(ENV_API_KEY);
        let detail_url = get(ENV_DETAIL_URL);

        let mut missing = Vec::new();
        if url.is_none() && cloud_id.is_none() {
            missing.push(format!("{} (or {})", ENV_CLOUD_ID, ENV_URL));
        }
        if api_key.is_none() {
            missing.push(ENV_API_KEY.to_string());
        }
        if detail_url.is_none() {
            missing.push(ENV_DETAIL_URL.to_string());
        }
        if !missing.is_empty() {
            bail!("Missing required configuration: {}", missing.join(", "));
        }

        // An explicit URL wins over the cloud id
        let endpoint = match (url, cloud_id) {
            (Some(url), _) => url,
            (None, Some(cloud_id)) => decode_cloud_id(&cloud_id)?,
            (None, None) => bail!("Missing required configuration: {} (or {})", ENV_CLOUD_ID, ENV_URL),
        };

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.unwrap_or_default(),
            detail_url: detail_url.unwrap_or_default(),
            index: get(ENV_INDEX).unwrap_or_else(|| DEFAULT_INDEX.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Resolve an Elastic Cloud ID into the deployment's HTTPS endpoint
///
/// A cloud id is `name:base64(host[:port]$es_uuid[:port]$kibana_uuid)`; the
/// `name:` prefix is optional.
///
/// # Examples
///
/// ```
/// use vcon_search::config::decode_cloud_id;
///
/// // base64("example.io$es1$kb1")
/// let url = decode_cloud_id("prod:ZXhhbXBsZS5pbyRlczEka2Ix").unwrap();
/// assert_eq!(url, "https://es1.example.io:443");
/// ```
pub fn decode_cloud_id(cloud_id: &str) -> Result<String> {
    let encoded = match cloud_id.split_once(':') {
        Some((_, encoded)) => encoded,
        None => cloud_id,
    };

    let decoded = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("Cloud ID is not valid base64")?;
    let decoded = String::from_utf8(decoded).context("Cloud ID does not decode to UTF-8")?;

    let mut parts = decoded.split('$');
    let host = parts.next().filter(|h| !h.is_empty());
    let es_uuid = parts.next().filter(|u| !u.is_empty());
    let (host, es_uuid) = host
        .zip(es_uuid)
        .ok_or_else(|| anyhow!("Cloud ID is missing the host or Elasticsearch id"))?;

    let (host, mut port) = split_port(host)?;
    let (es_uuid, es_port) = split_port(es_uuid)?;
    if es_port.is_some() {
        port = es_port;
    }

    Ok(format!("https://{}.{}:{}", es_uuid, host, port.unwrap_or(DEFAULT_CLOUD_PORT)))
}

fn split_port(value: &str) -> Result<(&str, Option<u16>)> {
    match value.rsplit_once(':') {
        Some((name, port)) => {
            let port = port.parse::<u16>().with_context(|| format!("Invalid port in Cloud ID: {}", port))?;
            Ok((name, Some(port)))
        }
        None => Ok((value, None)),
    }
}
