//! Data value encoding/decoding for the Wikibase JSON format.
//!
//! A full-encoded data value is `{"type": <discriminator>, "value": <payload>}`;
//! the payload shape depends on the variant.

use serde_json::{json, Value};

use crate::codec::json::Fields;
use crate::error::{Error, Result};
use crate::model::{
    CalendarModel, DataValue, DataValueType, EntityIdValue, EntityType, Globe,
    GlobeCoordinateValue, MonolingualTextValue, QuantityValue, StringValue, TimePrecision,
    TimeValue,
};

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes the variant-specific `"value"` payload.
pub fn encode_value_payload(value: &DataValue) -> Result<Value> {
    match value {
        DataValue::String(v) => Ok(Value::String(v.value.clone())),
        DataValue::EntityId(v) => Ok(json!({
            "entity-type": v.entity_type.as_str(),
            "numeric-id": v.numeric_id,
        })),
        DataValue::Time(v) => encode_time(v),
        DataValue::GlobeCoordinate(v) => encode_globe_coordinate(v),
        DataValue::Quantity(v) => Ok(encode_quantity(v)),
        DataValue::MonolingualText(v) => Ok(json!({
            "text": v.text,
            "language": v.language,
        })),
    }
}

/// Encodes `{"type": .., "value": ..}`.
pub fn full_encode(value: &DataValue) -> Result<Value> {
    Ok(json!({
        "type": value.value_type().as_str(),
        "value": encode_value_payload(value)?,
    }))
}

fn encode_time(v: &TimeValue) -> Result<Value> {
    let calendar = v.calendar_model.uri().ok_or(Error::ValueNotSet {
        field: "calendar model",
    })?;
    Ok(json!({
        "time": v.time,
        "timezone": v.timezone,
        "before": v.before,
        "after": v.after,
        "precision": v.precision as u8,
        "calendarmodel": calendar,
    }))
}

fn encode_globe_coordinate(v: &GlobeCoordinateValue) -> Result<Value> {
    let globe = v.globe.uri().ok_or(Error::ValueNotSet { field: "globe" })?;
    Ok(json!({
        "latitude": v.latitude,
        "longitude": v.longitude,
        "precision": v.precision,
        "globe": globe,
    }))
}

fn encode_quantity(v: &QuantityValue) -> Value {
    let mut payload = json!({
        "amount": v.amount,
        "unit": v.unit,
    });
    if let Some(upper) = &v.upper_bound {
        payload["upperBound"] = Value::String(upper.clone());
    }
    if let Some(lower) = &v.lower_bound {
        payload["lowerBound"] = Value::String(lower.clone());
    }
    payload
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a full-encoded `{"type", "value"}` object.
pub fn decode_data_value(json: &Value) -> Result<DataValue> {
    let fields = Fields::new(json, "datavalue")?;
    let type_name = fields.str("type")?;
    let payload = fields.get("value").ok_or(Error::MissingField {
        context: "datavalue",
        field: "value",
    })?;
    decode_value_payload(type_name, payload)
}

/// Decodes a `"value"` payload, dispatching on the discriminator.
pub fn decode_value_payload(type_name: &str, value: &Value) -> Result<DataValue> {
    let value_type = DataValueType::from_name(type_name).ok_or_else(|| {
        Error::UnsupportedDataValueType {
            found: type_name.to_string(),
        }
    })?;
    match value_type {
        DataValueType::String => decode_string(value),
        DataValueType::EntityId => decode_entity_id(value),
        DataValueType::Time => decode_time(value),
        DataValueType::GlobeCoordinate => decode_globe_coordinate(value),
        DataValueType::Quantity => decode_quantity(value),
        DataValueType::MonolingualText => decode_monolingual_text(value),
    }
}

fn decode_string(value: &Value) -> Result<DataValue> {
    let s = value.as_str().ok_or(Error::WrongFieldType {
        context: "string value",
        field: "value",
        expected: "a string",
    })?;
    Ok(DataValue::String(StringValue::new(s)))
}

fn decode_entity_id(value: &Value) -> Result<DataValue> {
    let fields = Fields::new(value, "wikibase-entityid value")?;
    let type_name = fields.str("entity-type")?;
    let entity_type = EntityType::from_name(type_name).ok_or_else(|| Error::InvalidField {
        context: "wikibase-entityid value",
        field: "entity-type",
        reason: format!("unknown entity type {type_name:?}"),
    })?;
    let numeric_id = fields.u64("numeric-id")?;
    Ok(DataValue::EntityId(EntityIdValue {
        entity_type,
        numeric_id,
    }))
}

fn decode_u32(fields: &Fields<'_>, field: &'static str) -> Result<u32> {
    let raw = fields.u64(field)?;
    u32::try_from(raw).map_err(|_| Error::InvalidField {
        context: "time value",
        field,
        reason: format!("{raw} does not fit in 32 bits"),
    })
}

fn decode_time(value: &Value) -> Result<DataValue> {
    let fields = Fields::new(value, "time value")?;
    let timezone = fields.i64("timezone")?;
    let timezone = i32::try_from(timezone).map_err(|_| Error::InvalidField {
        context: "time value",
        field: "timezone",
        reason: format!("{timezone} is out of range"),
    })?;
    let raw_precision = fields.u64("precision")?;
    let precision = u8::try_from(raw_precision)
        .ok()
        .and_then(TimePrecision::from_u8)
        .ok_or_else(|| Error::InvalidField {
            context: "time value",
            field: "precision",
            reason: format!("{raw_precision} is out of range [0, 14]"),
        })?;
    Ok(DataValue::Time(TimeValue {
        time: fields.str("time")?.to_string(),
        timezone,
        before: decode_u32(&fields, "before")?,
        after: decode_u32(&fields, "after")?,
        precision,
        calendar_model: CalendarModel::from_uri(fields.str("calendarmodel")?),
    }))
}

fn decode_globe_coordinate(value: &Value) -> Result<DataValue> {
    let fields = Fields::new(value, "globecoordinate value")?;
    // "altitude" is deprecated and ignored.
    Ok(DataValue::GlobeCoordinate(GlobeCoordinateValue {
        latitude: fields.f64("latitude")?,
        longitude: fields.f64("longitude")?,
        precision: fields.opt_f64("precision")?,
        globe: Globe::from_uri(fields.str("globe")?),
    }))
}

fn decode_quantity(value: &Value) -> Result<DataValue> {
    let fields = Fields::new(value, "quantity value")?;
    Ok(DataValue::Quantity(QuantityValue {
        amount: fields.str("amount")?.to_string(),
        unit: fields.str("unit")?.to_string(),
        upper_bound: fields.opt_str("upperBound")?.map(str::to_string),
        lower_bound: fields.opt_str("lowerBound")?.map(str::to_string),
    }))
}

fn decode_monolingual_text(value: &Value) -> Result<DataValue> {
    let fields = Fields::new(value, "monolingualtext value")?;
    Ok(DataValue::MonolingualText(MonolingualTextValue::new(
        fields.str("text")?,
        fields.str("language")?,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::EntityId;
    use proptest::prelude::*;

    fn samples() -> Vec<DataValue> {
        vec![
            DataValue::string("human"),
            DataValue::entity(&EntityId::parse("Q5").unwrap()),
            TimeValue::from_date(1952, 3, 11, TimePrecision::Day, CalendarModel::Gregorian)
                .unwrap()
                .into(),
            GlobeCoordinateValue::new(52.516, 13.383, 0.001, Globe::Earth).into(),
            QuantityValue::from_integer(42).into(),
            QuantityValue::new("+1.5", "http://www.wikidata.org/entity/Q11573")
                .with_bounds("+1.4", "+1.6")
                .into(),
            MonolingualTextValue::new("Berlin", "de").into(),
        ]
    }

    #[test]
    fn test_roundtrip_all_variants() {
        for value in samples() {
            let encoded = value.full_encode().unwrap();
            let decoded = DataValue::from_json(&encoded).unwrap();
            assert_eq!(decoded, value);
            // No hidden state: encoding is stable.
            assert_eq!(value.full_encode().unwrap(), encoded);
        }
    }

    #[test]
    fn test_wire_shapes() {
        let v = DataValue::entity(&EntityId::parse("P31").unwrap());
        assert_eq!(
            v.full_encode().unwrap(),
            json!({"type": "wikibase-entityid", "value": {"entity-type": "property", "numeric-id": 31}})
        );

        let t = TimeValue::from_date(2013, 1, 1, TimePrecision::Day, CalendarModel::Gregorian).unwrap();
        assert_eq!(
            DataValue::from(t).encode().unwrap(),
            json!({
                "time": "+00000002013-01-01T00:00:00Z",
                "timezone": 0,
                "before": 0,
                "after": 0,
                "precision": 11,
                "calendarmodel": "http://www.wikidata.org/entity/Q1985727",
            })
        );

        let q = DataValue::from(QuantityValue::from_integer(7));
        assert_eq!(
            q.encode().unwrap(),
            json!({"amount": "+7", "unit": "1", "upperBound": "+7", "lowerBound": "+7"})
        );
    }

    #[test]
    fn test_unknown_calendar_rejected() {
        let t = TimeValue::new(
            "+00000002013-01-01T00:00:00Z",
            0,
            0,
            0,
            TimePrecision::Day,
            CalendarModel::Unknown,
        );
        let err = DataValue::from(t).encode().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(err, Error::ValueNotSet { field: "calendar model" });
    }

    #[test]
    fn test_unknown_globe_rejected() {
        let g = GlobeCoordinateValue::new(1.0, 2.0, 0.1, Globe::Unknown);
        let err = DataValue::from(g).hash().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_unrecognized_uris_decode_as_unknown() {
        let json = json!({
            "type": "globecoordinate",
            "value": {"latitude": 1.0, "longitude": 2.0, "altitude": null, "precision": null,
                      "globe": "http://www.wikidata.org/entity/Q405"}
        });
        let DataValue::GlobeCoordinate(g) = DataValue::from_json(&json).unwrap() else {
            panic!("expected a globe coordinate");
        };
        assert_eq!(g.globe, Globe::Unknown);
        assert_eq!(g.precision, None);
    }

    #[test]
    fn test_unsupported_type() {
        let err = DataValue::create_from_type_and_value("geo-shape", &json!("Data:x.map")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(DataValue::create_from_type_and_value("string", &json!(5)).is_err());
        assert!(DataValue::create_from_type_and_value(
            "wikibase-entityid",
            &json!({"entity-type": "lexeme", "numeric-id": 1})
        )
        .is_err());
        let bad_precision = json!({
            "time": "+2013-01-01T00:00:00Z", "timezone": 0, "before": 0, "after": 0,
            "precision": 15, "calendarmodel": CalendarModel::GREGORIAN_URI,
        });
        assert!(DataValue::create_from_type_and_value("time", &bad_precision).is_err());
    }

    #[test]
    fn test_hash_tracks_encoding() {
        let a = DataValue::string("human");
        let b = DataValue::string("human");
        let c = DataValue::string("humans");
        assert_eq!(a.hash().unwrap(), b.hash().unwrap());
        assert_ne!(a.hash().unwrap(), c.hash().unwrap());
        assert_eq!(a.hash().unwrap().len(), 32);
    }

    proptest! {
        #[test]
        fn prop_string_roundtrip_and_hash(s in "\\PC*") {
            let v = DataValue::string(s);
            let decoded = DataValue::create_from_type_and_value("string", &v.encode().unwrap()).unwrap();
            prop_assert_eq!(decoded.hash().unwrap(), v.hash().unwrap());
            prop_assert_eq!(decoded, v);
        }

        #[test]
        fn prop_quantity_hash_changes_with_amount(a in any::<i64>(), b in any::<i64>()) {
            prop_assume!(a != b);
            let qa = DataValue::from(QuantityValue::from_integer(a));
            let qb = DataValue::from(QuantityValue::from_integer(b));
            prop_assert_ne!(qa.hash().unwrap(), qb.hash().unwrap());
        }

        #[test]
        fn prop_coordinate_roundtrip(lat in -90.0f64..90.0, lon in -180.0f64..180.0) {
            let v = DataValue::from(GlobeCoordinateValue::new(lat, lon, 0.0001, Globe::Earth));
            prop_assert_eq!(DataValue::from_json(&v.full_encode().unwrap()).unwrap(), v);
        }
    }
}
