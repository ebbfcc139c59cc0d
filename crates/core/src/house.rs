//! Documents of the `houses` collection.
//!
//! Listings are schemaless: whatever object a client submits is stored as-is.
//! The only structure is the fixed field set an update overwrites.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::HouseId;

/// An update body. Only the fixed field set is taken from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseFields(Map<String, Value>);

impl HouseFields {
    /// JSON names of the overwritten field set, in document order.
    pub const NAMES: [&'static str; 11] = [
        "name",
        "address",
        "city",
        "bedroom",
        "bathroom",
        "roomSize",
        "rent",
        "available",
        "phone",
        "description",
        "image",
    ];

    pub fn new(body: Map<String, Value>) -> Self {
        Self(body)
    }

    /// Every name in [`Self::NAMES`] with its submitted value, or `null`
    /// when the body left it out. Keys outside the set are dropped.
    pub fn to_patch(&self) -> Map<String, Value> {
        Self::NAMES
            .iter()
            .map(|name| (name.to_string(), self.0.get(*name).cloned().unwrap_or(Value::Null)))
            .collect()
    }
}

impl From<Map<String, Value>> for HouseFields {
    fn from(body: Map<String, Value>) -> Self {
        Self::new(body)
    }
}

/// A listing as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct House {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl House {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The `city` field, when it holds a string.
    pub fn city(&self) -> Option<&str> {
        self.get("city").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for House {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// A stored listing: the submitted document plus its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseDocument {
    #[serde(rename = "_id")]
    pub id: HouseId,

    #[serde(flatten)]
    pub house: House,
}

impl HouseDocument {
    pub fn new(id: HouseId, mut house: House) -> Self {
        house.fields.remove("_id");
        Self { id, house }
    }

    /// Overwrite the fixed field set, storing `null` for fields the update
    /// left out. Returns whether anything changed.
    pub fn overwrite(&mut self, fields: &HouseFields) -> bool {
        let mut modified = false;
        for (name, value) in fields.to_patch() {
            if self.house.fields.get(&name) != Some(&value) {
                self.house.fields.insert(name, value);
                modified = true;
            }
        }
        modified
    }

    /// Value of a top-level field by its JSON name, if present.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == "_id" {
            return Some(Value::String(self.id.to_string()));
        }
        self.house.get(name).cloned()
    }
}
