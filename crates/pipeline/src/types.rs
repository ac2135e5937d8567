//! Core types flowing through the ranking pipeline.
//!
//! A [`MovieRecord`] is whatever JSON object the caller sent us. The only
//! field we read is `description`; everything else is carried through
//! untouched and written back in its original field order.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{RankingError, Result};

/// Name of the field holding the text that gets embedded
pub const DESCRIPTION_FIELD: &str = "description";

/// Name of the optional field used for display purposes
pub const TITLE_FIELD: &str = "title";

/// A caller-supplied movie, kept as an opaque JSON object.
///
/// Construction guarantees that `description` exists and is a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct MovieRecord {
    fields: Map<String, Value>,
}

impl MovieRecord {
    /// Wrap a JSON object, checking that it carries a text description.
    pub fn new(fields: Map<String, Value>) -> Result<Self> {
        match fields.get(DESCRIPTION_FIELD) {
            Some(Value::String(_)) => Ok(Self { fields }),
            Some(other) => Err(RankingError::InvalidRecord(format!(
                "field `{}` must be a string, found {}",
                DESCRIPTION_FIELD,
                json_type_name(other)
            ))),
            None => Err(RankingError::InvalidRecord(format!(
                "missing field `{}`",
                DESCRIPTION_FIELD
            ))),
        }
    }

    /// Build a record that only has a description.
    pub fn with_description(description: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(DESCRIPTION_FIELD.to_string(), Value::String(description.into()));
        Self { fields }
    }

    /// Add or replace a field (builder pattern).
    ///
    /// Replacing `description` with a non-string value is ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == DESCRIPTION_FIELD && !value.is_string() {
            return self;
        }
        self.fields.insert(key, value);
        self
    }

    /// The text handed to the embedding provider.
    pub fn description(&self) -> &str {
        self.fields
            .get(DESCRIPTION_FIELD)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// The `title` field, if the caller sent one as a string.
    pub fn title(&self) -> Option<&str> {
        self.fields.get(TITLE_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl TryFrom<Map<String, Value>> for MovieRecord {
    type Error = RankingError;

    fn try_from(fields: Map<String, Value>) -> Result<Self> {
        MovieRecord::new(fields)
    }
}

impl Serialize for MovieRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A movie paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Index of the movie in the caller's list
    pub position: usize,
    pub record: MovieRecord,
    pub score: f32,
}

impl Candidate {
    pub fn new(position: usize, record: MovieRecord, score: f32) -> Self {
        Self {
            position,
            record,
            score,
        }
    }
}
