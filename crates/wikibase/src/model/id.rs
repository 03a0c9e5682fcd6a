//! Entity identifiers.
//!
//! Items are identified by `Q` + number, properties by `P` + number. The
//! serialization string is the identity: two ids are equal iff their
//! serializations are equal.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

/// Pattern every item id serialization must match.
pub const ITEM_ID_PATTERN: &str = "^Q[1-9][0-9]*$";

/// Pattern every property id serialization must match.
pub const PROPERTY_ID_PATTERN: &str = "^P[1-9][0-9]*$";

lazy_static! {
    // SAFETY: both patterns are constant and known to compile
    static ref ITEM_ID_RE: Regex = Regex::new(ITEM_ID_PATTERN).unwrap();
    static ref PROPERTY_ID_RE: Regex = Regex::new(PROPERTY_ID_PATTERN).unwrap();
}

/// The kind of entity an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Item,
    Property,
}

impl EntityType {
    /// Returns the wire name ("item" or "property").
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Item => "item",
            EntityType::Property => "property",
        }
    }

    /// Parses a wire name.
    pub fn from_name(name: &str) -> Option<EntityType> {
        match name {
            "item" => Some(EntityType::Item),
            "property" => Some(EntityType::Property),
            _ => None,
        }
    }

    /// Returns the serialization prefix letter.
    pub fn prefix(&self) -> char {
        match self {
            EntityType::Item => 'Q',
            EntityType::Property => 'P',
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks a serialization against a pattern and extracts the numeric part.
fn validate(
    serialization: &str,
    re: &Regex,
    expected: &'static str,
    pattern: &'static str,
) -> Result<u64> {
    let invalid = || Error::InvalidId {
        expected,
        found: serialization.to_string(),
        pattern,
    };
    if !re.is_match(serialization) {
        return Err(invalid());
    }
    // Matches the pattern, so only overflow can fail here.
    serialization[1..].parse().map_err(|_| invalid())
}

/// Identifier of an item (`Q42`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    serialization: String,
    numeric: u64,
}

impl ItemId {
    /// Creates an item id from its serialization.
    pub fn new(serialization: impl Into<String>) -> Result<Self> {
        let serialization = serialization.into();
        let numeric = validate(&serialization, &ITEM_ID_RE, "item", ITEM_ID_PATTERN)?;
        Ok(Self { serialization, numeric })
    }

    /// Creates an item id from its numeric part.
    pub fn from_numeric(numeric: u64) -> Result<Self> {
        Self::new(format!("Q{numeric}"))
    }

    /// Returns the serialization (`Q42`).
    pub fn serialization(&self) -> &str {
        &self.serialization
    }

    /// Returns the numeric part (`42`).
    pub fn numeric_id(&self) -> u64 {
        self.numeric
    }
}

/// Identifier of a property (`P31`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId {
    serialization: String,
    numeric: u64,
}

impl PropertyId {
    /// Creates a property id from its serialization.
    pub fn new(serialization: impl Into<String>) -> Result<Self> {
        let serialization = serialization.into();
        let numeric = validate(&serialization, &PROPERTY_ID_RE, "property", PROPERTY_ID_PATTERN)?;
        Ok(Self { serialization, numeric })
    }

    /// Creates a property id from its numeric part.
    pub fn from_numeric(numeric: u64) -> Result<Self> {
        Self::new(format!("P{numeric}"))
    }

    /// Parses an argument that must name a property.
    ///
    /// Unlike [`PropertyId::new`], a well-formed item id is reported as
    /// [`Error::NotAPropertyId`] rather than as a malformed id.
    pub fn from_argument(serialization: &str) -> Result<Self> {
        EntityId::parse(serialization)?.into_property()
    }

    /// Returns the serialization (`P31`).
    pub fn serialization(&self) -> &str {
        &self.serialization
    }

    /// Returns the numeric part (`31`).
    pub fn numeric_id(&self) -> u64 {
        self.numeric
    }
}

/// Identifier of any entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Item(ItemId),
    Property(PropertyId),
}

impl EntityId {
    /// Parses a serialization, dispatching on its prefix letter.
    pub fn parse(serialization: &str) -> Result<Self> {
        match serialization.chars().next() {
            Some('Q') => ItemId::new(serialization).map(EntityId::Item),
            Some('P') => PropertyId::new(serialization).map(EntityId::Property),
            _ => Err(Error::InvalidId {
                expected: "entity",
                found: serialization.to_string(),
                pattern: "^[QP][1-9][0-9]*$",
            }),
        }
    }

    /// Builds an id from an entity type and numeric part.
    pub fn from_parts(entity_type: EntityType, numeric: u64) -> Result<Self> {
        match entity_type {
            EntityType::Item => ItemId::from_numeric(numeric).map(EntityId::Item),
            EntityType::Property => PropertyId::from_numeric(numeric).map(EntityId::Property),
        }
    }

    /// Returns the serialization.
    pub fn serialization(&self) -> &str {
        match self {
            EntityId::Item(id) => id.serialization(),
            EntityId::Property(id) => id.serialization(),
        }
    }

    /// Returns the numeric part.
    pub fn numeric_id(&self) -> u64 {
        match self {
            EntityId::Item(id) => id.numeric_id(),
            EntityId::Property(id) => id.numeric_id(),
        }
    }

    /// Returns the type of entity this id refers to.
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityId::Item(_) => EntityType::Item,
            EntityId::Property(_) => EntityType::Property,
        }
    }

    /// Returns the property id, if this is one.
    pub fn as_property(&self) -> Option<&PropertyId> {
        match self {
            EntityId::Property(id) => Some(id),
            EntityId::Item(_) => None,
        }
    }

    /// Converts into a property id, failing for item ids.
    pub fn into_property(self) -> Result<PropertyId> {
        match self {
            EntityId::Property(id) => Ok(id),
            EntityId::Item(id) => Err(Error::NotAPropertyId {
                found: id.serialization,
            }),
        }
    }
}

impl From<ItemId> for EntityId {
    fn from(id: ItemId) -> Self {
        EntityId::Item(id)
    }
}

impl From<PropertyId> for EntityId {
    fn from(id: PropertyId) -> Self {
        EntityId::Property(id)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ItemId::new(s)
    }
}

impl FromStr for PropertyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PropertyId::new(s)
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EntityId::parse(s)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.serialization
    }
}

impl AsRef<str> for PropertyId {
    fn as_ref(&self) -> &str {
        &self.serialization
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        self.serialization()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialization)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialization)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.serialization())
    }
}
