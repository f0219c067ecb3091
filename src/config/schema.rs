//! Dashboard config data model.
//!
//! This module defines the authored config structure and the per-request
//! envelope ([`ConfigBag`]) every pipeline stage returns. All types derive
//! Serde traits; decoding is strict (unknown keys rejected) and
//! serialisation is canonical: declared field order, `None` fields skipped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::errors::ConfigError;
use crate::config::version::ConfigVersion;

/// Prefix marking a tile as a dynamic generator tile.
pub const GENERATOR_PREFIX: &str = "GENERATE:";

/// Placeholder tile type rendered as an empty cell.
pub const EMPTY_TILE_TYPE: &str = "EMPTY";

/// Grouping tile type holding child tiles.
pub const GROUP_TILE_TYPE: &str = "GROUP";

/// A tile type name, e.g. `PING` or `GENERATE:JENKINS-BUILD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileType(String);

impl TileType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty_tile(&self) -> bool {
        self.0 == EMPTY_TILE_TYPE
    }

    pub fn is_group(&self) -> bool {
        self.0 == GROUP_TILE_TYPE
    }

    pub fn is_generator(&self) -> bool {
        self.0.starts_with(GENERATOR_PREFIX)
    }

    /// The tile type a generator tile expands into (`GENERATE:X` → `X`).
    pub fn generated(&self) -> TileType {
        match self.0.strip_prefix(GENERATOR_PREFIX) {
            Some(base) => TileType::new(base),
            None => self.clone(),
        }
    }

    /// The generator key for a base tile type (`X` → `GENERATE:X`).
    pub fn as_generator(&self) -> TileType {
        if self.is_generator() {
            self.clone()
        } else {
            TileType::new(format!("{GENERATOR_PREFIX}{}", self.0))
        }
    }
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Named configuration of a tile type (e.g. one of several Jenkins servers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantName(String);

impl VariantName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VariantName {
    fn default() -> Self {
        Self("default".to_string())
    }
}

impl std::fmt::Display for VariantName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Root of an authored dashboard config.
///
/// Fields are optional so Verify can report missing ones itself instead of
/// failing the whole decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ConfigVersion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<Tile>>,
}

/// One authored tile. `url` and `initialMaxDelay` are computed outputs;
/// they are tolerated on input for forward compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Tile {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tile_type: Option<TileType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_span: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_span: Option<i64>,

    /// Child tiles, used only by `GROUP` tiles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<Tile>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_variant: Option<VariantName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_max_delay: Option<u64>,
}

/// A tile emitted by a generator builder, waiting to be hydrated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub params: Map<String, Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_variant: Option<VariantName>,
}

/// The per-request envelope returned by every pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigBag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,

    pub errors: Vec<ConfigError>,
}

impl ConfigBag {
    pub fn add_error(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Entry of the named-config listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub name: String,
}
