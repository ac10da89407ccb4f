use std::fmt;
use std::fs;
use std::path::PathBuf;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use thiserror::Error;

use crate::http_client::http_client;
use crate::snapshot::{Snapshot, parse_snapshot_json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PicksSource {
    Url(String),
    File(PathBuf),
}

impl PicksSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            PicksSource::Url(trimmed.to_string())
        } else {
            PicksSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for PicksSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PicksSource::Url(url) => f.write_str(url),
            PicksSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0:#}")]
    Transport(#[from] anyhow::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid picks json: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    /// Banner text shown in place of the picks.
    pub fn user_message(&self, source: &PicksSource) -> String {
        format!("Could not load picks.json. Check the picks source ({source}). Error: {self}")
    }
}

/// Fetches and parses the snapshot once, bypassing any cache.
pub fn load_snapshot(source: &PicksSource) -> Result<Snapshot, LoadError> {
    let body = match source {
        PicksSource::Url(url) => fetch_no_cache(url)?,
        PicksSource::File(path) => fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.display().to_string(),
            source,
        })?,
    };
    Ok(parse_snapshot_json(&body)?)
}

fn fetch_no_cache(url: &str) -> Result<String, LoadError> {
    let client = http_client()?;
    let resp = client
        .get(url)
        .header(CACHE_CONTROL, "no-cache, no-store")
        .header(PRAGMA, "no-cache")
        .send()
        .map_err(anyhow::Error::from)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }
    let body = resp.text().map_err(anyhow::Error::from)?;
    Ok(body)
}
