//! Config loading from disk or HTTP.
//!
//! # Responsibilities
//! - Fetch raw config bytes from a local path or an HTTP(S) URL
//! - Strict-decode them into [`Config`] (unknown keys rejected)
//! - Classify decode failures into typed errors the use case translates
//!   into UI-routable [`ConfigError`](crate::config::errors::ConfigError)s
//!
//! # Design Decisions
//! - Decoding runs through `serde_path_to_error` so the failing field path
//!   survives classification; message sniffing stays confined to this module
//! - Unreachable URLs and missing files both classify as `NotFound`: to the
//!   dashboard author they are the same mistake

use async_trait::async_trait;
use thiserror::Error;

use crate::config::schema::Config;
use crate::config::version::VERSION_FORMAT_MARKER;

/// Recognised top-level and tile keys, rendered into `UnknownField` hints.
pub const RECOGNISED_KEYS: &str = "version, columns, zoom, tiles, type, label, rowSpan, \
                                   columnSpan, tiles, url, initialMaxDelay, params, configVariant";

/// What went wrong inside a strict JSON decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    UnknownField { field: String },
    TypeMismatch { field: String, expected: String },
    InvalidEscape { highlight: String },
    Other,
}

/// Error type for config loading.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("config not found at {path_or_url}")]
    NotFound { path_or_url: String },

    #[error("{VERSION_FORMAT_MARKER} {wrong_version:?}")]
    VersionFormat { wrong_version: String },

    #[error("unable to decode config: {message}")]
    Unmarshal {
        kind: DecodeErrorKind,
        message: String,
        raw_config: String,
    },

    #[error("transport error: {message}")]
    Transport { message: String },
}

/// Source of raw dashboard configs.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn get_config_from_path(&self, path: &str) -> Result<Config, RepositoryError>;
    async fn get_config_from_url(&self, url: &str) -> Result<Config, RepositoryError>;
}

/// File and HTTP backed repository used in production.
pub struct DefaultConfigRepository {
    client: reqwest::Client,
}

impl Default for DefaultConfigRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultConfigRepository {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ConfigRepository for DefaultConfigRepository {
    async fn get_config_from_path(&self, path: &str) -> Result<Config, RepositoryError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| {
                tracing::debug!(path = %path, error = %err, "config file unreadable");
                RepositoryError::NotFound {
                    path_or_url: path.to_string(),
                }
            })?;
        parse_config(&raw)
    }

    async fn get_config_from_url(&self, url: &str) -> Result<Config, RepositoryError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| {
                tracing::debug!(url = %url, error = %err, "config URL unreachable");
                RepositoryError::NotFound {
                    path_or_url: url.to_string(),
                }
            })?;
        let raw = response
            .text()
            .await
            .map_err(|err| RepositoryError::Transport {
                message: err.to_string(),
            })?;
        parse_config(&raw)
    }
}

/// Strict-decode a raw config document.
pub fn parse_config(raw: &str) -> Result<Config, RepositoryError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, Config>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(err) => Err(classify_decode_error(&err, raw)),
    }
}

fn classify_decode_error(
    err: &serde_path_to_error::Error<serde_json::Error>,
    raw: &str,
) -> RepositoryError {
    let inner = err.inner().to_string();
    let message = strip_position(&inner).to_string();

    if let Some(wrong_version) = message
        .strip_prefix(VERSION_FORMAT_MARKER)
        .and_then(extract_quoted)
    {
        return RepositoryError::VersionFormat { wrong_version };
    }

    let kind = if message.starts_with("unknown field") {
        match extract_backticked(&message) {
            Some(field) => DecodeErrorKind::UnknownField { field },
            None => DecodeErrorKind::Other,
        }
    } else if message.starts_with("invalid type") || message.starts_with("invalid value") {
        let field = err
            .path()
            .iter()
            .filter_map(|segment| match segment {
                serde_path_to_error::Segment::Map { key } => Some(key.clone()),
                _ => None,
            })
            .last();
        match (field, extract_expected(&message)) {
            (Some(field), Some(expected)) => DecodeErrorKind::TypeMismatch {
                field,
                expected: friendly_type(&expected),
            },
            _ => DecodeErrorKind::Other,
        }
    } else if message.contains("invalid escape") || message.contains("control character") {
        match find_invalid_escape(raw) {
            Some(highlight) => DecodeErrorKind::InvalidEscape { highlight },
            None => DecodeErrorKind::Other,
        }
    } else {
        DecodeErrorKind::Other
    };

    RepositoryError::Unmarshal {
        kind,
        message,
        raw_config: raw.to_string(),
    }
}

/// Drop serde_json's trailing ` at line L column C` location suffix.
fn strip_position(message: &str) -> &str {
    match message.rfind(" at line ") {
        Some(index) => &message[..index],
        None => message,
    }
}

fn extract_quoted(message: &str) -> Option<String> {
    let start = message.find('"')?;
    let end = message.rfind('"')?;
    (end > start).then(|| message[start + 1..end].to_string())
}

fn extract_backticked(message: &str) -> Option<String> {
    let start = message.find('`')?;
    let rest = &message[start + 1..];
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

fn extract_expected(message: &str) -> Option<String> {
    message
        .split("expected ")
        .nth(1)
        .map(|expected| expected.trim().to_string())
}

/// serde type hints, rendered the way the UI shows them.
fn friendly_type(expected: &str) -> String {
    if expected.starts_with("a string") {
        "string".to_string()
    } else if expected.starts_with("a boolean") {
        "bool".to_string()
    } else if expected.starts_with("f32") || expected.starts_with("f64") {
        "float".to_string()
    } else if expected.starts_with('i') || expected.starts_with('u') {
        "int".to_string()
    } else if expected.starts_with("a sequence") {
        "list".to_string()
    } else if expected.starts_with("a map") || expected.starts_with("struct") {
        "object".to_string()
    } else {
        expected.to_string()
    }
}

/// Locate the first invalid string escape in the raw text and render the
/// highlight the UI marks inside the extract (`\s` → `\\s`).
fn find_invalid_escape(raw: &str) -> Option<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut index = 0;
    while index + 1 < chars.len() {
        if chars[index] == '\\' {
            let escaped = chars[index + 1];
            if matches!(escaped, '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u') {
                index += 2;
                continue;
            }
            return Some(format!("\\\\{escaped}"));
        }
        index += 1;
    }
    None
}
