//! Input locations: local paths or http(s) URLs

use super::arff::{parse_arff, read_arff};
use super::table::Table;
use crate::error::{EvalError, Result};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const USER_AGENT: &str = concat!("evaluar/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Where an input table is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(PathBuf),
    /// `http://` or `https://` URL
    Remote(String),
}

impl Location {
    /// Classify a location string by its scheme
    pub fn parse(raw: &str) -> Self {
        if is_url(raw) {
            Location::Remote(raw.to_string())
        } else {
            Location::Local(PathBuf::from(raw))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Remote(_))
    }
}

fn is_url(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl FromStr for Location {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Location::parse(s))
    }
}

impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Location::parse(raw)
    }
}

impl From<String> for Location {
    fn from(raw: String) -> Self {
        Location::parse(&raw)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        match path.to_str() {
            Some(raw) if is_url(raw) => Location::Remote(raw.to_string()),
            _ => Location::Local(path.to_path_buf()),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::from(path.as_path())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Local(path) => write!(f, "{}", path.display()),
            Location::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Read an ARFF table from a local file or a URL
pub fn read_table(location: &Location) -> Result<Table> {
    match location {
        Location::Local(path) => read_arff(path),
        Location::Remote(url) => {
            tracing::debug!(%url, "fetching input");
            let body = fetch(url)?;
            parse_arff(url, &body)
        }
    }
}

/// Blocking GET of a text body
fn fetch(url: &str) -> Result<String> {
    let fetch_error = |message: String| EvalError::Fetch {
        url: url.to_string(),
        message,
    };

    let mut builder = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT);
    if is_loopback(url) {
        builder = builder.no_proxy();
    }
    let client = builder
        .build()
        .map_err(|e| fetch_error(format!("failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| fetch_error(format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("server returned {status}")));
    }

    response
        .text()
        .map_err(|e| fetch_error(format!("failed to read body: {e}")))
}

fn is_loopback(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]"))
        .unwrap_or(false)
}
