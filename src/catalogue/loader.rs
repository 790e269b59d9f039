use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::record::RawRecord;
use super::CatalogueError;

pub const DEFAULT_USER_AGENT: &str = concat!("wavecat/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Url(reqwest::Url),
    File(PathBuf),
}

impl Source {
    pub fn parse(value: &str) -> Result<Self, CatalogueError> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err(CatalogueError::InvalidSource {
                source_ref: value.to_string(),
                message: "source is empty".to_string(),
            });
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = reqwest::Url::parse(raw).map_err(|e| CatalogueError::InvalidSource {
                source_ref: raw.to_string(),
                message: e.to_string(),
            })?;
            return Ok(Self::Url(url));
        }
        if lower.starts_with("file://") {
            let url = reqwest::Url::parse(raw).map_err(|e| CatalogueError::InvalidSource {
                source_ref: raw.to_string(),
                message: e.to_string(),
            })?;
            let path = url
                .to_file_path()
                .map_err(|_| CatalogueError::InvalidSource {
                    source_ref: raw.to_string(),
                    message: "not a local file URL".to_string(),
                })?;
            return Ok(Self::File(path));
        }
        Ok(Self::File(crate::config::expand_tilde(raw)))
    }

    /// Resolves `name` next to this source, e.g. a per-coin document beside
    /// `coins.json`.
    pub fn sibling(&self, name: &str) -> Result<Self, CatalogueError> {
        match self {
            Self::Url(url) => url
                .join(name)
                .map(Self::Url)
                .map_err(|e| CatalogueError::InvalidSource {
                    source_ref: name.to_string(),
                    message: e.to_string(),
                }),
            Self::File(path) => {
                let base = if path.is_dir() {
                    path.clone()
                } else {
                    path.parent().map(PathBuf::from).unwrap_or_default()
                };
                Ok(Self::File(base.join(name)))
            }
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Url(url) => url.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoaderOptions {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetches catalogue documents. Every HTTP request bypasses caches; there is
/// no retry.
#[derive(Clone, Debug)]
pub struct Loader {
    client: reqwest::Client,
}

impl Loader {
    pub fn new(options: &LoaderOptions) -> Result<Self, CatalogueError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CACHE_CONTROL,
            reqwest::header::HeaderValue::from_static("no-store, no-cache"),
        );
        headers.insert(
            reqwest::header::PRAGMA,
            reqwest::header::HeaderValue::from_static("no-cache"),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(options.user_agent.clone())
            .timeout(Duration::from_secs(options.timeout_seconds.max(1)))
            .build()
            .map_err(|source| CatalogueError::HttpClientBuild { source })?;
        Ok(Self { client })
    }

    pub async fn fetch_bytes(&self, source: &Source) -> Result<Vec<u8>, CatalogueError> {
        match source {
            Source::Url(url) => {
                debug!("GET {}", url);
                let resp = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|source| CatalogueError::Network {
                        url: url.to_string(),
                        source,
                    })?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(CatalogueError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                let body = resp
                    .bytes()
                    .await
                    .map_err(|source| CatalogueError::Network {
                        url: url.to_string(),
                        source,
                    })?;
                debug!("{} returned {} bytes", url, body.len());
                Ok(body.to_vec())
            }
            Source::File(path) => {
                debug!("reading {}", path.display());
                tokio::fs::read(path)
                    .await
                    .map_err(|source| CatalogueError::Read {
                        path: path.display().to_string(),
                        source,
                    })
            }
        }
    }

    pub async fn fetch_json(&self, source: &Source) -> Result<Value, CatalogueError> {
        let body = self.fetch_bytes(source).await?;
        serde_json::from_slice(&body).map_err(|e| CatalogueError::Parse {
            origin: source.display(),
            message: e.to_string(),
        })
    }

    pub async fn load(
        &self,
        source: &Source,
        collection_key: Option<&str>,
    ) -> Result<Vec<RawRecord>, CatalogueError> {
        let doc = self.fetch_json(source).await?;
        parse_document(doc, collection_key).map_err(|message| CatalogueError::Parse {
            origin: source.display(),
            message,
        })
    }
}

/// Extracts records from either a bare array or an object wrapping one.
/// A wrapper without the requested key yields no records.
pub fn parse_document(doc: Value, collection_key: Option<&str>) -> Result<Vec<RawRecord>, String> {
    let items = match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let picked = match collection_key {
                Some(key) => map.remove(key),
                None => {
                    let key = map
                        .iter()
                        .find(|(_, v)| v.is_array())
                        .map(|(k, _)| k.clone());
                    key.and_then(|k| map.remove(&k))
                }
            };
            match picked {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        other => {
            return Err(format!(
                "expected a JSON array or object, found {}",
                json_kind(&other)
            ))
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!("skipping entry {} ({} is not an object)", idx, json_kind(&item));
            continue;
        }
        match serde_json::from_value::<RawRecord>(item) {
            Ok(record) => out.push(record),
            Err(e) => warn!("skipping entry {}: {}", idx, e),
        }
    }
    Ok(out)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
