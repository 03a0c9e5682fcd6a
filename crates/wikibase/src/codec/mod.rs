//! JSON encoding/decoding for the Wikibase wire format.
//!
//! Decoders take `serde_json::Value` trees as returned by the action API and
//! report malformed input through [`crate::error::Error`]; encoders produce
//! the objects the edit actions accept.

pub mod claim;
pub mod entity;
pub mod json;
pub mod snak;
pub mod value;

pub use claim::{decode_claim, decode_reference, encode_claim, encode_reference};
pub use entity::{
    decode_entity, decode_item, decode_property, encode_changes, encode_item, encode_property,
    refill_item, refill_property,
};
pub use snak::{decode_snak, encode_snak};
pub use value::{decode_data_value, full_encode};
