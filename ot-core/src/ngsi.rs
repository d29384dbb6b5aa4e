//! Generic NGSI-LD entity representation.
//!
//! An [`Entity`] carries the three fixed keys every NGSI-LD entity has (`@context`, `type`, `id`)
//! plus a list of named [`Attribute`]s. Attributes are kept in insertion order so the serialized
//! JSON lists them in the order the mapper produced them.
use serde::ser::SerializeMap;
use serde::{
    Deserialize,
    Serialize,
    Serializer,
};

/// JSON-LD context attached to every entity.
pub const DATA_MODEL_CONTEXT: &str = "https://fiware.github.io/data-models/context.jsonld";

/// Literal value held by a Property attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Free-text or enumeration value.
    Text(String),
    /// Integer value, e.g. seconds since the epoch.
    Integer(i64),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// A single NGSI-LD attribute: either a literal (`Property`) or an edge to another entity
/// (`Relationship`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Attribute {
    /// `{"type": "Property", "value": <literal>}`
    Property {
        /// The literal value.
        value: PropertyValue,
    },
    /// `{"type": "Relationship", "object": <entity id>}`
    Relationship {
        /// Id of the target entity.
        object: String,
    },
}

/// NGSI-LD entity as sent to the broker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    /// JSON-LD `@context` URI.
    context: String,
    /// Semantic type tag, serialized as `type`.
    entity_type: String,
    /// `urn:ngsi-ld:<type>:<slug>`
    id: String,
    /// Named attributes in insertion order; names are unique.
    attributes: Vec<(String, Attribute)>,
}

impl Entity {
    /// Create an entity with no attributes, bound to [`DATA_MODEL_CONTEXT`].
    #[must_use]
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            context: DATA_MODEL_CONTEXT.to_owned(),
            entity_type: entity_type.into(),
            id: id.into(),
            attributes: Vec::new(),
        }
    }

    /// JSON-LD context URI.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Entity type, e.g. `location`.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Entity id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set a Property attribute. Re-using a name replaces the earlier attribute in place.
    pub fn put_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.put(name.into(), Attribute::Property { value: value.into() });
    }

    /// Set a Relationship attribute. Re-using a name replaces the earlier attribute in place.
    pub fn put_relationship(&mut self, name: impl Into<String>, object: impl Into<String>) {
        self.put(name.into(), Attribute::Relationship { object: object.into() });
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|(n, _)| n == name).map(|(_, attr)| attr)
    }

    /// Whether an attribute called `name` is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Attribute names in insertion order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(name, _)| name.as_str())
    }

    /// All `(name, attribute)` pairs in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, Attribute)] {
        &self.attributes
    }

    /// Insert `attribute`, or overwrite the one already called `name` without moving it.
    fn put(&mut self, name: String, attribute: Attribute) {
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = attribute,
            None => self.attributes.push((name, attribute)),
        }
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.attributes.len()))?;
        map.serialize_entry("@context", &self.context)?;
        map.serialize_entry("type", &self.entity_type)?;
        map.serialize_entry("id", &self.id)?;
        for (name, attribute) in &self.attributes {
            map.serialize_entry(name, attribute)?;
        }
        map.end()
    }
}
