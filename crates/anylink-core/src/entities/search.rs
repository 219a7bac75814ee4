use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::LayoutKind;

/// Detail keys read when normalizing a remote record.
pub mod keys {
    pub const SPACE_ID: &str = "spaceId";
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const LAYOUT: &str = "layout";
    pub const UNIQUE_KEY: &str = "uniqueKey";
}

/// Full-text query sent through the search facade.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    /// Full-text needle. Empty lists every object.
    pub full_text: String,
    /// Ask the remote for highlight snippets.
    pub with_highlights: bool,
}

impl SearchQuery {
    /// Full-text query with highlight snippets.
    #[must_use]
    pub fn highlighted(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            with_highlights: true,
        }
    }

    /// Full-text query without highlight snippets.
    #[must_use]
    pub fn plain(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            with_highlights: false,
        }
    }

    /// Query matching every object.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }
}

/// One object returned by a search call. Read-only to consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub object_id: String,
    pub space_id: Option<String>,
    pub name: String,
    /// Object id of the record's type (the `type` detail), not its unique key.
    pub type_id: Option<String>,
    pub layout: LayoutKind,
    pub fields: BTreeMap<String, Value>,
    pub highlights: Vec<String>,
}

impl SearchResult {
    /// Build a result from the object's detail map, lifting the well-known
    /// keys into typed fields.
    #[must_use]
    pub fn from_details(
        object_id: impl Into<String>,
        fields: BTreeMap<String, Value>,
        highlights: Vec<String>,
    ) -> Self {
        let space_id = first_str(&fields, keys::SPACE_ID).map(str::to_string);
        let name = first_str(&fields, keys::NAME).unwrap_or_default().to_string();
        let type_id = first_str(&fields, keys::TYPE).map(str::to_string);
        let layout = fields
            .get(keys::LAYOUT)
            .and_then(Value::as_f64)
            .map_or(LayoutKind::Basic, |code| {
                #[allow(clippy::cast_possible_truncation)]
                LayoutKind::from_code(code as i64)
            });

        Self {
            object_id: object_id.into(),
            space_id,
            name,
            type_id,
            layout,
            fields,
            highlights,
        }
    }

    /// String value of a detail, or the first element when the detail is a
    /// list of strings.
    #[must_use]
    pub fn field_str(&self, key: &str) -> Option<&str> {
        first_str(&self.fields, key)
    }

    /// Unique key of an object-type record.
    #[must_use]
    pub fn unique_key(&self) -> Option<&str> {
        self.field_str(keys::UNIQUE_KEY)
    }

    #[must_use]
    pub fn is_object_type(&self) -> bool {
        self.layout == LayoutKind::ObjectType
    }
}

fn first_str<'a>(fields: &'a BTreeMap<String, Value>, key: &str) -> Option<&'a str> {
    match fields.get(key)? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.first().and_then(Value::as_str),
        _ => None,
    }
}
