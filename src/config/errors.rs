//! Config pipeline error envelope.
//!
//! Every problem the pipeline detects becomes a [`ConfigError`] appended to
//! the request's bag. The `id` is a stable identifier the UI routes on; the
//! `data` payload carries rendering hints, including a `configExtract` — the
//! canonical re-serialisation of the offending subtree — and optionally a
//! highlight substring the UI marks inside the extract.

use serde::{Deserialize, Serialize};

/// Stable error identifiers. Serialised verbatim; renaming one is a
/// breaking change for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigErrorId {
    ConfigNotFound,
    UnableToParseConfig,
    UnsupportedVersion,
    UnknownField,
    FieldTypeMismatch,
    InvalidEscapedCharacter,
    MissingRequiredField,
    InvalidFieldValue,
    UnauthorizedField,
    UnauthorizedSubtileType,
    UnknownTileType,
    UnknownGeneratorTileType,
    UnknownVariant,
    DisabledVariant,
    UnsupportedTileInThisVersion,
    UnsupportedTileParamInThisVersion,
    UnableToHydrate,
    UnknownNamedConfig,
    UnexpectedError,
}

/// Structured rendering hints attached to an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_extract: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_extract_highlight: Option<String>,
}

/// One error recorded by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigError {
    pub id: ConfigErrorId,
    pub message: String,
    pub data: ConfigErrorData,
}

impl ConfigError {
    pub fn new(id: ConfigErrorId, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
            data: ConfigErrorData::default(),
        }
    }

    pub fn with_field(mut self, field_name: impl Into<String>) -> Self {
        self.data.field_name = Some(field_name.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.data.value = Some(value.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.data.expected = Some(expected.into());
        self
    }

    pub fn with_extract(mut self, extract: impl Into<String>) -> Self {
        self.data.config_extract = Some(extract.into());
        self
    }

    pub fn with_highlight(mut self, highlight: impl Into<String>) -> Self {
        self.data.config_extract_highlight = Some(highlight.into());
        self
    }
}

/// Canonical minified serialisation of a config subtree, as embedded in
/// `configExtract` fields.
pub fn config_extract<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// JSON string literal representation of a value, as embedded in `value`
/// fields (e.g. `"disabledVariant"` with quotes).
pub fn json_quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
