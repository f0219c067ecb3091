//! Declarative tile parameter schemas.
//!
//! # Responsibilities
//! - Describe the expected shape of a tile's `params` object as a flat list
//!   of [`FieldSpec`] entries (name, kind, required, query position,
//!   version gate)
//! - Check raw params against a schema and report the first failure
//! - Synthesise the query string appended to a tile's backend route
//!
//! # Design Decisions
//! - Schemas are data interpreted at runtime, not derive machinery; a
//!   provider declares its fields once and the same list drives validation
//!   and URL synthesis
//! - Validation reports the FIRST failure in the order
//!   parse → version gate → custom check → required, so the root cause
//!   surfaces instead of derived symptoms
//! - Query encoding is strict percent-encoding; spaces become `%20`,
//!   never `+`

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use crate::config::version::ConfigVersion;

/// RFC 3986 unreserved characters stay literal, everything else is encoded.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Value kinds a params field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Float,
    Bool,
    StrList,
    IntList,
}

impl FieldKind {
    /// Human-readable kind name used in `expected` hints.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Str => "string",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::StrList => "list of string",
            FieldKind::IntList => "list of int",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Str => value.is_string(),
            FieldKind::Int => value.as_i64().is_some(),
            FieldKind::Float => value.is_number(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::StrList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::IntList => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| item.as_i64().is_some())),
        }
    }
}

/// Declarative description of one params field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub query: bool,
    pub available_since: Option<ConfigVersion>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            query: false,
            available_since: None,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            query: false,
            available_since: None,
        }
    }

    /// Mark the field as part of the synthesised query string.
    pub const fn query(mut self) -> Self {
        self.query = true;
        self
    }

    /// Gate the field on a minimum config version.
    pub const fn available_since(mut self, version: ConfigVersion) -> Self {
        self.available_since = Some(version);
        self
    }
}

/// A violation reported by a schema's custom check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub expected: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, expected: impl Into<String>) -> Self {
        Self {
            field,
            expected: expected.into(),
        }
    }
}

/// Custom value check run after shape validation.
pub type ParamsCheck = fn(&ParamsValues) -> Vec<FieldViolation>;

/// Schema of one tile variant's params object.
#[derive(Clone)]
pub struct ParamsSchema {
    fields: Vec<FieldSpec>,
    check: Option<ParamsCheck>,
}

impl ParamsSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            check: None,
        }
    }

    pub fn with_check(mut self, check: ParamsCheck) -> Self {
        self.check = Some(check);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn recognised_keys(&self) -> String {
        self.fields
            .iter()
            .map(|field| field.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Debug for ParamsSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamsSchema")
            .field("fields", &self.fields)
            .field("check", &self.check.map(|_| "fn"))
            .finish()
    }
}

/// Raw params that passed shape validation, with typed accessors for
/// custom checks and generator builders.
#[derive(Debug, Clone, Default)]
pub struct ParamsValues(Map<String, Value>);

impl ParamsValues {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn str_value(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn int_value(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// First failure detected while checking params against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    UnknownField { field: String, expected: String },
    TypeMismatch { field: String, expected: &'static str },
    UnsupportedInVersion { field: &'static str, since: ConfigVersion },
    InvalidValue { field: String, expected: String },
    MissingRequired { field: &'static str },
}

/// Check raw params against a schema at a given config version.
///
/// Returns the first failure in the order parse → version gate → custom
/// check → required.
pub fn validate_params(
    schema: &ParamsSchema,
    raw: &Map<String, Value>,
    version: ConfigVersion,
) -> Result<ParamsValues, ParamsError> {
    for (key, value) in raw {
        let Some(field) = schema.field(key) else {
            return Err(ParamsError::UnknownField {
                field: key.clone(),
                expected: schema.recognised_keys(),
            });
        };
        if !field.kind.matches(value) {
            return Err(ParamsError::TypeMismatch {
                field: key.clone(),
                expected: field.kind.name(),
            });
        }
    }

    for field in &schema.fields {
        if let Some(since) = field.available_since {
            if raw.contains_key(field.name) && since > version {
                return Err(ParamsError::UnsupportedInVersion {
                    field: field.name,
                    since,
                });
            }
        }
    }

    let values = ParamsValues(raw.clone());

    if let Some(check) = schema.check {
        if let Some(violation) = check(&values).into_iter().next() {
            return Err(ParamsError::InvalidValue {
                field: violation.field.to_string(),
                expected: violation.expected,
            });
        }
    }

    for field in &schema.fields {
        if field.required && !raw.contains_key(field.name) {
            return Err(ParamsError::MissingRequired { field: field.name });
        }
    }

    Ok(values)
}

/// Synthesise the backend URL for a route template and validated params.
pub fn build_url(route: &str, schema: &ParamsSchema, values: &ParamsValues) -> String {
    let query = build_query(schema, values);
    if query.is_empty() {
        route.to_string()
    } else {
        format!("{route}?{query}")
    }
}

/// Concatenate `key=value` pairs for every present query field, in declared
/// order, repeating the key for list-valued fields.
pub fn build_query(schema: &ParamsSchema, values: &ParamsValues) -> String {
    let mut pairs = Vec::new();
    for field in &schema.fields {
        if !field.query {
            continue;
        }
        let Some(value) = values.raw().get(field.name) else {
            continue;
        };
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push(format!("{}={}", field.name, encode_value(item)));
                }
            }
            other => pairs.push(format!("{}={}", field.name, encode_value(other))),
        }
    }
    pairs.join("&")
}

fn encode_value(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    utf8_percent_encode(&raw, QUERY_ENCODE_SET).to_string()
}
