//! Snaks: a property paired with a value, or with the assertion that there
//! is no value or an unknown one.

use std::fmt;

use serde_json::Value;

use crate::codec::snak::{decode_snak, encode_snak};
use crate::error::{Error, Result};
use crate::model::{DataValue, PropertyId};

/// Snak type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnakType {
    Value,
    NoValue,
    SomeValue,
}

impl SnakType {
    /// Returns the wire name (`value`, `novalue`, `somevalue`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SnakType::Value => "value",
            SnakType::NoValue => "novalue",
            SnakType::SomeValue => "somevalue",
        }
    }

    /// Parses a wire name.
    pub fn from_name(name: &str) -> Option<SnakType> {
        match name {
            "value" => Some(SnakType::Value),
            "novalue" => Some(SnakType::NoValue),
            "somevalue" => Some(SnakType::SomeValue),
            _ => None,
        }
    }
}

impl fmt::Display for SnakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property with a value, no value or some unknown value.
#[derive(Debug, Clone, PartialEq)]
pub enum Snak {
    Value {
        property: PropertyId,
        value: DataValue,
    },
    NoValue {
        property: PropertyId,
    },
    SomeValue {
        property: PropertyId,
    },
}

impl Snak {
    /// Builds a snak of the given type.
    ///
    /// A value snak needs a data value; the other two must not have one.
    pub fn new(snak_type: SnakType, property: PropertyId, value: Option<DataValue>) -> Result<Self> {
        match (snak_type, value) {
            (SnakType::Value, Some(value)) => Ok(Snak::Value { property, value }),
            (SnakType::Value, None) => Err(Error::MissingDataValue {
                snak_type: SnakType::Value.as_str(),
            }),
            (SnakType::NoValue, None) => Ok(Snak::NoValue { property }),
            (SnakType::SomeValue, None) => Ok(Snak::SomeValue { property }),
            (other, Some(_)) => Err(Error::UnexpectedDataValue {
                snak_type: other.as_str(),
            }),
        }
    }

    /// Value snak for a property serialization such as `"P31"`.
    pub fn value(property: &str, value: impl Into<DataValue>) -> Result<Self> {
        Ok(Snak::Value {
            property: PropertyId::from_argument(property)?,
            value: value.into(),
        })
    }

    /// No-value snak for a property serialization.
    pub fn no_value(property: &str) -> Result<Self> {
        Ok(Snak::NoValue {
            property: PropertyId::from_argument(property)?,
        })
    }

    /// Some-value snak for a property serialization.
    pub fn some_value(property: &str) -> Result<Self> {
        Ok(Snak::SomeValue {
            property: PropertyId::from_argument(property)?,
        })
    }

    pub fn property(&self) -> &PropertyId {
        match self {
            Snak::Value { property, .. }
            | Snak::NoValue { property }
            | Snak::SomeValue { property } => property,
        }
    }

    pub fn snak_type(&self) -> SnakType {
        match self {
            Snak::Value { .. } => SnakType::Value,
            Snak::NoValue { .. } => SnakType::NoValue,
            Snak::SomeValue { .. } => SnakType::SomeValue,
        }
    }

    /// Returns the data value of a value snak.
    pub fn data_value(&self) -> Option<&DataValue> {
        match self {
            Snak::Value { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Key of this snak inside a reference's per-property group.
    ///
    /// Value snaks use their data value hash; valueless snaks have at most
    /// one slot per property and use their type name.
    pub fn value_hash(&self) -> Result<String> {
        match self {
            Snak::Value { value, .. } => value.hash(),
            other => Ok(other.snak_type().as_str().to_string()),
        }
    }

    /// Encodes `{"snaktype", "property", "datavalue"?}`.
    pub fn encode(&self) -> Result<Value> {
        encode_snak(self)
    }

    /// Decodes a snak object.
    pub fn from_json(json: &Value) -> Result<Self> {
        decode_snak(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_constructors() {
        let snak = Snak::value("P31", DataValue::string("human")).unwrap();
        assert_eq!(snak.property().serialization(), "P31");
        assert_eq!(snak.snak_type(), SnakType::Value);
        assert!(snak.data_value().is_some());

        assert_eq!(Snak::no_value("P42").unwrap().snak_type(), SnakType::NoValue);
        assert_eq!(Snak::some_value("P42").unwrap().data_value(), None);
    }

    #[test]
    fn test_item_id_rejected_as_property() {
        let err = Snak::no_value("Q42").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert!(Snak::value("junk", DataValue::string("x")).is_err());
    }

    #[test]
    fn test_new_checks_value_presence() {
        let p = PropertyId::new("P1").unwrap();
        let err = Snak::new(SnakType::Value, p.clone(), None).unwrap_err();
        assert_eq!(err, Error::MissingDataValue { snak_type: "value" });
        assert_eq!(err.kind(), ErrorKind::Argument);

        let err = Snak::new(SnakType::NoValue, p.clone(), Some(DataValue::string("x"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);

        assert_eq!(
            Snak::new(SnakType::SomeValue, p.clone(), None).unwrap(),
            Snak::SomeValue { property: p }
        );
    }

    #[test]
    fn test_value_hash() {
        let a = Snak::value("P1", DataValue::string("x")).unwrap();
        let b = Snak::value("P2", DataValue::string("x")).unwrap();
        // Only the value contributes.
        assert_eq!(a.value_hash().unwrap(), b.value_hash().unwrap());
        assert_eq!(a.value_hash().unwrap(), DataValue::string("x").hash().unwrap());
        assert_eq!(Snak::no_value("P1").unwrap().value_hash().unwrap(), "novalue");
    }

    #[test]
    fn test_snak_type_names() {
        for t in [SnakType::Value, SnakType::NoValue, SnakType::SomeValue] {
            assert_eq!(SnakType::from_name(t.as_str()), Some(t));
        }
        assert_eq!(SnakType::from_name("VALUE"), None);
    }
}
