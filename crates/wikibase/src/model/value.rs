//! Data values carried by value snaks.
//!
//! Each variant has a wire discriminator (the `"type"` of a full-encoded
//! data value) and a variant-specific `"value"` payload. Encoding and
//! decoding live in [`crate::codec::value`].

use serde_json::Value;

use crate::codec::value::{decode_data_value, decode_value_payload, encode_value_payload, full_encode};
use crate::error::{Error, Result};
use crate::model::{EntityId, EntityType};
use crate::util::md5_hex;

/// Wire discriminators of the supported data value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataValueType {
    String,
    EntityId,
    Time,
    GlobeCoordinate,
    Quantity,
    MonolingualText,
}

impl DataValueType {
    /// Returns the wire name used as the `"type"` discriminator.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataValueType::String => "string",
            DataValueType::EntityId => "wikibase-entityid",
            DataValueType::Time => "time",
            DataValueType::GlobeCoordinate => "globecoordinate",
            DataValueType::Quantity => "quantity",
            DataValueType::MonolingualText => "monolingualtext",
        }
    }

    /// Parses a wire name.
    pub fn from_name(name: &str) -> Option<DataValueType> {
        match name {
            "string" => Some(DataValueType::String),
            "wikibase-entityid" => Some(DataValueType::EntityId),
            "time" => Some(DataValueType::Time),
            "globecoordinate" => Some(DataValueType::GlobeCoordinate),
            "quantity" => Some(DataValueType::Quantity),
            "monolingualtext" => Some(DataValueType::MonolingualText),
            _ => None,
        }
    }
}

/// Plain string value (also used for commons media and external ids).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringValue {
    pub value: String,
}

impl StringValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

/// Reference to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityIdValue {
    pub entity_type: EntityType,
    pub numeric_id: u64,
}

impl EntityIdValue {
    pub fn new(entity_id: &EntityId) -> Self {
        Self {
            entity_type: entity_id.entity_type(),
            numeric_id: entity_id.numeric_id(),
        }
    }

    /// Returns the referenced entity id.
    pub fn entity_id(&self) -> Result<EntityId> {
        EntityId::from_parts(self.entity_type, self.numeric_id)
    }
}

/// Precision of a [`TimeValue`], from gigayears (0) to seconds (14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TimePrecision {
    Gigayear = 0,
    HundredMegayears = 1,
    TenMegayears = 2,
    Megayear = 3,
    HundredKiloyears = 4,
    TenKiloyears = 5,
    Kiloyear = 6,
    Century = 7,
    Decade = 8,
    Year = 9,
    Month = 10,
    Day = 11,
    Hour = 12,
    Minute = 13,
    Second = 14,
}

impl TimePrecision {
    /// Creates a precision from its wire representation.
    pub fn from_u8(v: u8) -> Option<TimePrecision> {
        match v {
            0 => Some(TimePrecision::Gigayear),
            1 => Some(TimePrecision::HundredMegayears),
            2 => Some(TimePrecision::TenMegayears),
            3 => Some(TimePrecision::Megayear),
            4 => Some(TimePrecision::HundredKiloyears),
            5 => Some(TimePrecision::TenKiloyears),
            6 => Some(TimePrecision::Kiloyear),
            7 => Some(TimePrecision::Century),
            8 => Some(TimePrecision::Decade),
            9 => Some(TimePrecision::Year),
            10 => Some(TimePrecision::Month),
            11 => Some(TimePrecision::Day),
            12 => Some(TimePrecision::Hour),
            13 => Some(TimePrecision::Minute),
            14 => Some(TimePrecision::Second),
            _ => None,
        }
    }
}

/// Calendar model a [`TimeValue`] should be displayed in.
///
/// The time itself is always stored in the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarModel {
    Unknown,
    Gregorian,
    Julian,
}

impl CalendarModel {
    pub const GREGORIAN_URI: &'static str = "http://www.wikidata.org/entity/Q1985727";
    pub const JULIAN_URI: &'static str = "http://www.wikidata.org/entity/Q1985786";

    /// Returns the concept URI, or None for [`CalendarModel::Unknown`].
    pub fn uri(&self) -> Option<&'static str> {
        match self {
            CalendarModel::Gregorian => Some(Self::GREGORIAN_URI),
            CalendarModel::Julian => Some(Self::JULIAN_URI),
            CalendarModel::Unknown => None,
        }
    }

    /// Maps a concept URI; unrecognized URIs become [`CalendarModel::Unknown`].
    pub fn from_uri(uri: &str) -> CalendarModel {
        match uri {
            Self::GREGORIAN_URI => CalendarModel::Gregorian,
            Self::JULIAN_URI => CalendarModel::Julian,
            _ => CalendarModel::Unknown,
        }
    }
}

/// Point in time with precision and uncertainty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeValue {
    /// ISO 8601 style timestamp with a signed year, e.g. `+00000002013-01-01T00:00:00Z`.
    pub time: String,
    /// Offset from UTC in minutes.
    pub timezone: i32,
    /// Uncertainty before `time`, in units of `precision`.
    pub before: u32,
    /// Uncertainty after `time`, in units of `precision`.
    pub after: u32,
    pub precision: TimePrecision,
    pub calendar_model: CalendarModel,
}

impl TimeValue {
    pub fn new(
        time: impl Into<String>,
        timezone: i32,
        before: u32,
        after: u32,
        precision: TimePrecision,
        calendar_model: CalendarModel,
    ) -> Self {
        Self {
            time: time.into(),
            timezone,
            before,
            after,
            precision,
            calendar_model,
        }
    }

    /// Creates a UTC date value with an 11-digit signed year.
    ///
    /// Month and day may be zero when the precision is coarser than them.
    pub fn from_date(
        year: i64,
        month: u8,
        day: u8,
        precision: TimePrecision,
        calendar_model: CalendarModel,
    ) -> Result<Self> {
        if month > 12 {
            return Err(Error::InvalidField {
                context: "time",
                field: "month",
                reason: format!("{month} is out of range [0, 12]"),
            });
        }
        if day > 31 {
            return Err(Error::InvalidField {
                context: "time",
                field: "day",
                reason: format!("{day} is out of range [0, 31]"),
            });
        }
        let sign = if year < 0 { '-' } else { '+' };
        let time = format!("{}{:011}-{:02}-{:02}T00:00:00Z", sign, year.unsigned_abs(), month, day);
        Ok(Self::new(time, 0, 0, 0, precision, calendar_model))
    }

    /// Returns the signed year encoded in `time`, if it parses.
    pub fn year(&self) -> Option<i64> {
        let (sign, rest) = match self.time.as_bytes().first()? {
            b'+' => (1, &self.time[1..]),
            b'-' => (-1, &self.time[1..]),
            _ => (1, self.time.as_str()),
        };
        let digits = rest.split('-').next()?;
        digits.parse::<i64>().ok().map(|y| sign * y)
    }
}

/// Globe a [`GlobeCoordinateValue`] lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Globe {
    Unknown,
    Earth,
}

impl Globe {
    pub const EARTH_URI: &'static str = "http://www.wikidata.org/entity/Q2";

    /// Returns the concept URI, or None for [`Globe::Unknown`].
    pub fn uri(&self) -> Option<&'static str> {
        match self {
            Globe::Earth => Some(Self::EARTH_URI),
            Globe::Unknown => None,
        }
    }

    /// Maps a concept URI; unrecognized URIs become [`Globe::Unknown`].
    pub fn from_uri(uri: &str) -> Globe {
        match uri {
            Self::EARTH_URI => Globe::Earth,
            _ => Globe::Unknown,
        }
    }
}

/// Geographic coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeCoordinateValue {
    pub latitude: f64,
    pub longitude: f64,
    /// Precision in degrees; the server sends `null` when it is unknown.
    pub precision: Option<f64>,
    pub globe: Globe,
}

impl GlobeCoordinateValue {
    pub fn new(latitude: f64, longitude: f64, precision: f64, globe: Globe) -> Self {
        Self {
            latitude,
            longitude,
            precision: Some(precision),
            globe,
        }
    }
}

/// Decimal quantity with optional bounds and a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantityValue {
    /// Signed decimal string, e.g. `+12.5`.
    pub amount: String,
    /// Unit concept URI, or `"1"` for dimensionless quantities.
    pub unit: String,
    pub upper_bound: Option<String>,
    pub lower_bound: Option<String>,
}

impl QuantityValue {
    /// Unit of a dimensionless quantity.
    pub const DIMENSIONLESS: &'static str = "1";

    pub fn new(amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            unit: unit.into(),
            upper_bound: None,
            lower_bound: None,
        }
    }

    /// Creates an exact dimensionless quantity from an integer.
    pub fn from_integer(value: i64) -> Self {
        let amount = if value > 0 { format!("+{value}") } else { value.to_string() };
        Self {
            upper_bound: Some(amount.clone()),
            lower_bound: Some(amount.clone()),
            amount,
            unit: Self::DIMENSIONLESS.to_string(),
        }
    }

    /// Sets both bounds.
    pub fn with_bounds(mut self, lower: impl Into<String>, upper: impl Into<String>) -> Self {
        self.lower_bound = Some(lower.into());
        self.upper_bound = Some(upper.into());
        self
    }
}

/// Text in a single language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonolingualTextValue {
    pub text: String,
    pub language: String,
}

impl MonolingualTextValue {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }
}

/// A typed value carried by a value snak.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    String(StringValue),
    EntityId(EntityIdValue),
    Time(TimeValue),
    GlobeCoordinate(GlobeCoordinateValue),
    Quantity(QuantityValue),
    MonolingualText(MonolingualTextValue),
}

impl DataValue {
    /// Shorthand for a [`StringValue`].
    pub fn string(value: impl Into<String>) -> Self {
        DataValue::String(StringValue::new(value))
    }

    /// Shorthand for an [`EntityIdValue`].
    pub fn entity(entity_id: &EntityId) -> Self {
        DataValue::EntityId(EntityIdValue::new(entity_id))
    }

    /// Returns the wire discriminator of this value.
    pub fn value_type(&self) -> DataValueType {
        match self {
            DataValue::String(_) => DataValueType::String,
            DataValue::EntityId(_) => DataValueType::EntityId,
            DataValue::Time(_) => DataValueType::Time,
            DataValue::GlobeCoordinate(_) => DataValueType::GlobeCoordinate,
            DataValue::Quantity(_) => DataValueType::Quantity,
            DataValue::MonolingualText(_) => DataValueType::MonolingualText,
        }
    }

    /// Encodes the `"value"` payload.
    pub fn encode(&self) -> Result<Value> {
        encode_value_payload(self)
    }

    /// Encodes `{"type": .., "value": ..}`.
    pub fn full_encode(&self) -> Result<Value> {
        full_encode(self)
    }

    /// Returns the content hash: MD5 of the encoded payload.
    pub fn hash(&self) -> Result<String> {
        Ok(md5_hex(&self.encode()?.to_string()))
    }

    /// Builds a value from its discriminator and `"value"` payload.
    pub fn create_from_type_and_value(type_name: &str, value: &Value) -> Result<Self> {
        decode_value_payload(type_name, value)
    }

    /// Builds a value from a full-encoded `{"type", "value"}` object.
    pub fn from_json(json: &Value) -> Result<Self> {
        decode_data_value(json)
    }
}

impl From<StringValue> for DataValue {
    fn from(value: StringValue) -> Self {
        DataValue::String(value)
    }
}

impl From<EntityIdValue> for DataValue {
    fn from(value: EntityIdValue) -> Self {
        DataValue::EntityId(value)
    }
}

impl From<TimeValue> for DataValue {
    fn from(value: TimeValue) -> Self {
        DataValue::Time(value)
    }
}

impl From<GlobeCoordinateValue> for DataValue {
    fn from(value: GlobeCoordinateValue) -> Self {
        DataValue::GlobeCoordinate(value)
    }
}

impl From<QuantityValue> for DataValue {
    fn from(value: QuantityValue) -> Self {
        DataValue::Quantity(value)
    }
}

impl From<MonolingualTextValue> for DataValue {
    fn from(value: MonolingualTextValue) -> Self {
        DataValue::MonolingualText(value)
    }
}
