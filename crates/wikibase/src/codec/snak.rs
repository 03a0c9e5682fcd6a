//! Snak encoding/decoding.

use serde_json::{Map, Value};

use crate::codec::json::Fields;
use crate::codec::value::decode_data_value;
use crate::error::{Error, Result};
use crate::model::{PropertyId, Snak, SnakType};

/// Encodes a snak. `datavalue` is only emitted for value snaks.
pub fn encode_snak(snak: &Snak) -> Result<Value> {
    let mut out = Map::new();
    out.insert("snaktype".into(), Value::from(snak.snak_type().as_str()));
    out.insert("property".into(), Value::from(snak.property().serialization()));
    if let Some(value) = snak.data_value() {
        out.insert("datavalue".into(), value.full_encode()?);
    }
    Ok(Value::Object(out))
}

/// Decodes a snak object.
///
/// A missing `snaktype` or `property` is reported as an invalid snak
/// serialization. Extra fields (`hash`, `datatype`) are ignored.
pub fn decode_snak(json: &Value) -> Result<Snak> {
    let fields = Fields::new(json, "snak")?;
    let snak_type = fields.opt_str("snaktype")?.ok_or(Error::InvalidSnak { field: "snaktype" })?;
    let property = fields.opt_str("property")?.ok_or(Error::InvalidSnak { field: "property" })?;

    let snak_type = SnakType::from_name(snak_type).ok_or_else(|| Error::UnknownSnakType {
        found: snak_type.to_string(),
    })?;
    let property = PropertyId::from_argument(property)?;
    let value = match snak_type {
        SnakType::Value => Some(decode_data_value(fields.get("datavalue").ok_or(
            Error::MissingDataValue {
                snak_type: SnakType::Value.as_str(),
            },
        )?)?),
        // Servers never send a datavalue on valueless snaks; ignore it if present.
        SnakType::NoValue | SnakType::SomeValue => None,
    };
    Snak::new(snak_type, property, value)
}

/// Decodes a `{property: [snak, ..]}` map, preserving group order.
///
/// `order` lists the property keys in wire order when the server sent one
/// (`qualifiers-order`, `snaks-order`); properties not listed follow in map
/// order.
pub fn decode_snak_groups(
    groups: &Map<String, Value>,
    order: Option<&Vec<Value>>,
    context: &'static str,
) -> Result<Vec<Value>> {
    let mut keys: Vec<&str> = Vec::with_capacity(groups.len());
    if let Some(order) = order {
        for key in order.iter().filter_map(Value::as_str) {
            if groups.contains_key(key) && !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    for key in groups.keys() {
        if !keys.contains(&key.as_str()) {
            keys.push(key);
        }
    }

    let mut snaks = Vec::new();
    for key in keys {
        let Some(group) = groups.get(key) else { continue };
        let list = group.as_array().ok_or(Error::WrongFieldType {
            context,
            field: "snak group",
            expected: "an array",
        })?;
        snaks.extend(list.iter().cloned());
    }
    Ok(snaks)
}

/// Encodes snaks as a `{property: [snak, ..]}` map, grouped by property in
/// first-seen order, plus the matching order array.
pub fn encode_snak_groups<'a>(
    snaks: impl IntoIterator<Item = (&'a Snak, Option<&'a str>)>,
) -> Result<(Map<String, Value>, Vec<Value>)> {
    let mut groups = Map::new();
    let mut order = Vec::new();
    for (snak, hash) in snaks {
        let key = snak.property().serialization();
        let mut encoded = encode_snak(snak)?;
        if let (Some(hash), Value::Object(obj)) = (hash, &mut encoded) {
            obj.insert("hash".into(), Value::from(hash));
        }
        match groups.get_mut(key) {
            Some(Value::Array(list)) => list.push(encoded),
            _ => {
                order.push(Value::from(key));
                groups.insert(key.to_string(), Value::Array(vec![encoded]));
            }
        }
    }
    Ok((groups, order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::DataValue;
    use serde_json::json;

    #[test]
    fn test_value_snak_roundtrip() {
        let snak = Snak::value("P31", DataValue::string("human")).unwrap();
        let encoded = snak.encode().unwrap();
        assert_eq!(
            encoded,
            json!({
                "snaktype": "value",
                "property": "P31",
                "datavalue": {"type": "string", "value": "human"},
            })
        );
        let decoded = Snak::from_json(&encoded).unwrap();
        assert_eq!(decoded, snak);
        assert_eq!(decoded.property().serialization(), "P31");
    }

    #[test]
    fn test_valueless_snak_has_no_datavalue() {
        let encoded = Snak::some_value("P42").unwrap().encode().unwrap();
        assert_eq!(encoded, json!({"snaktype": "somevalue", "property": "P42"}));
    }

    #[test]
    fn test_missing_fields() {
        let err = Snak::from_json(&json!({"property": "P1"})).unwrap_err();
        assert_eq!(err, Error::InvalidSnak { field: "snaktype" });
        assert_eq!(err.kind(), ErrorKind::Argument);

        let err = Snak::from_json(&json!({"snaktype": "novalue"})).unwrap_err();
        assert_eq!(err, Error::InvalidSnak { field: "property" });

        let err = Snak::from_json(&json!({"snaktype": "value", "property": "P1"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_unknown_snak_type() {
        let err = Snak::from_json(&json!({"snaktype": "maybe", "property": "P1"})).unwrap_err();
        assert!(matches!(err, Error::UnknownSnakType { .. }));
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_item_property_rejected() {
        let err = Snak::from_json(&json!({"snaktype": "novalue", "property": "Q1"})).unwrap_err();
        assert!(matches!(err, Error::NotAPropertyId { .. }));
    }

    #[test]
    fn test_snak_groups_order() {
        let groups = json!({
            "P2": [{"snaktype": "novalue", "property": "P2"}],
            "P1": [{"snaktype": "somevalue", "property": "P1"},
                   {"snaktype": "novalue", "property": "P1"}],
        });
        let order = vec![json!("P2"), json!("P1")];
        let snaks = decode_snak_groups(groups.as_object().unwrap(), Some(&order), "test").unwrap();
        let props: Vec<_> = snaks.iter().map(|s| s["property"].as_str().unwrap()).collect();
        assert_eq!(props, ["P2", "P1", "P1"]);
    }

    #[test]
    fn test_encode_snak_groups() {
        let a = Snak::no_value("P5").unwrap();
        let b = Snak::some_value("P3").unwrap();
        let c = Snak::value("P5", DataValue::string("x")).unwrap();
        let (groups, order) =
            encode_snak_groups([(&a, Some("h1")), (&b, None), (&c, None)]).unwrap();
        assert_eq!(order, vec![json!("P5"), json!("P3")]);
        assert_eq!(groups["P5"].as_array().unwrap().len(), 2);
        assert_eq!(groups["P5"][0]["hash"], json!("h1"));
        assert!(groups["P3"][0].get("hash").is_none());
    }
}
