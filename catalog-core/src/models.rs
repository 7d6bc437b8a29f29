use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::settings::Settings;

/// Current version of the persisted state shape
pub const STATE_VERSION: u32 = 1;

/// The four fixed record collections of the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Services,
    Components,
    Requests,
    Technical,
}

impl Collection {
    /// All collections, in display order
    pub const ALL: [Collection; 4] = [
        Collection::Services,
        Collection::Components,
        Collection::Requests,
        Collection::Technical,
    ];

    /// Parses a collection from its persisted name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "services" => Some(Collection::Services),
            "components" => Some(Collection::Components),
            "requests" => Some(Collection::Requests),
            "technical" => Some(Collection::Technical),
            _ => None,
        }
    }

    /// The persisted name of the collection
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Components => "components",
            Collection::Requests => "requests",
            Collection::Technical => "technical",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field value inside a record.
///
/// Untagged so records keep the flat JSON shape the catalog has always
/// persisted: text fields are strings, number fields are numbers, and
/// multi-valued relations are arrays of target ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Many(Vec<String>),
}

impl FieldValue {
    /// The text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True for an empty string or an empty id list
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
            FieldValue::Many(ids) => ids.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Many(ids) => write!(f, "{}", ids.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(ids: Vec<String>) -> Self {
        FieldValue::Many(ids)
    }
}

/// A single catalog entry within a collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Unique identifier, assigned once at creation
    pub id: String,

    /// When the record was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// Schema-declared field and relation values, keyed by field name.
    /// A field never set is simply absent.
    #[serde(flatten)]
    pub values: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates a record with a fresh id and creation timestamp
    pub fn new(values: BTreeMap<String, FieldValue>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            values,
        }
    }

    /// Gets a field value by name
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Gets a field's text content by name
    pub fn text(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(FieldValue::as_text)
    }

    /// Merges the given values over the existing ones. Keys present in
    /// `updates` overwrite (including to an explicit empty string), keys
    /// absent are preserved. The id and creation timestamp never change.
    pub fn merge(&mut self, updates: BTreeMap<String, FieldValue>) {
        for (key, value) in updates {
            self.values.insert(key, value);
        }
    }
}

/// The whole persisted catalog: four record sequences plus the settings table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub services: Vec<Record>,
    #[serde(default)]
    pub components: Vec<Record>,
    #[serde(default)]
    pub requests: Vec<Record>,
    #[serde(default)]
    pub technical: Vec<Record>,
    #[serde(default)]
    pub settings: Settings,
}

impl CatalogState {
    /// Creates the empty default state
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            services: Vec::new(),
            components: Vec::new(),
            requests: Vec::new(),
            technical: Vec::new(),
            settings: Settings::default(),
        }
    }

    /// The record sequence for a collection
    pub fn records(&self, collection: Collection) -> &Vec<Record> {
        match collection {
            Collection::Services => &self.services,
            Collection::Components => &self.components,
            Collection::Requests => &self.requests,
            Collection::Technical => &self.technical,
        }
    }

    /// Mutable record sequence for a collection
    pub fn records_mut(&mut self, collection: Collection) -> &mut Vec<Record> {
        match collection {
            Collection::Services => &mut self.services,
            Collection::Components => &mut self.components,
            Collection::Requests => &mut self.requests,
            Collection::Technical => &mut self.technical,
        }
    }

    /// Applies pending load-time migrations in version order.
    /// Returns true if the state changed and should be written back.
    pub fn migrate(&mut self) -> bool {
        let mut changed = false;

        // v0 -> v1: blobs written before the settings table existed. The
        // missing lists are filled with defaults during deserialization;
        // recording the version keeps the fill one-shot.
        if self.version < 1 {
            self.version = 1;
            changed = true;
        }

        changed
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}
