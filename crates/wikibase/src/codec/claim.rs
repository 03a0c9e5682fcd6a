//! Claim, statement and reference encoding/decoding.
//!
//! Wire shapes:
//! - claim: `{"id"?, "mainsnak", "type", "qualifiers"?, "qualifiers-order"?,
//!   "rank"?, "references"?}`
//! - reference: `{"hash"?, "snaks": {P: [snak]}, "snaks-order"?}`

use serde_json::{Map, Value};

use crate::codec::json::Fields;
use crate::codec::snak::{decode_snak, decode_snak_groups, encode_snak, encode_snak_groups};
use crate::error::{Error, Result};
use crate::model::{
    Claim, ClaimChanges, ClaimKind, Qualifier, Rank, Reference, StatementParts,
};
use crate::util::temporary_id;

// =============================================================================
// REFERENCES
// =============================================================================

/// Encodes the `snaks` map and `snaks-order` of a reference.
pub fn encode_reference_snaks(reference: &Reference) -> Result<(Map<String, Value>, Vec<Value>)> {
    encode_snak_groups(reference.snaks().map(|s| (s, None)))
}

pub fn encode_reference(reference: &Reference) -> Result<Value> {
    let (snaks, order) = encode_reference_snaks(reference)?;
    let mut out = Map::new();
    if let Some(hash) = reference.hash() {
        out.insert("hash".into(), Value::from(hash));
    }
    out.insert("snaks".into(), Value::Object(snaks));
    out.insert("snaks-order".into(), Value::Array(order));
    Ok(Value::Object(out))
}

pub fn decode_reference(json: &Value) -> Result<Reference> {
    let fields = Fields::new(json, "reference")?;
    let mut reference = Reference::new();
    if let Some(hash) = fields.opt_str("hash")? {
        reference.hash = Some(hash.to_string());
        reference.internal_id = hash.to_string();
    }
    if let Some(groups) = fields.opt_object("snaks")? {
        for snak in decode_snak_groups(groups, fields.opt_array("snaks-order")?, "reference")? {
            reference.add_snak(decode_snak(&snak)?)?;
        }
    }
    Ok(reference)
}

// =============================================================================
// CLAIMS
// =============================================================================

pub fn encode_claim(claim: &Claim) -> Result<Value> {
    let mut out = Map::new();
    if let Some(id) = claim.id() {
        out.insert("id".into(), Value::from(id));
    }
    out.insert("mainsnak".into(), encode_snak(claim.main_snak())?);
    let type_name = if claim.is_statement() { "statement" } else { "claim" };
    out.insert("type".into(), Value::from(type_name));

    if !claim.qualifiers().is_empty() {
        let (groups, order) = encode_snak_groups(
            claim
                .qualifiers()
                .iter()
                .map(|q| (&q.snak, q.hash.as_deref())),
        )?;
        out.insert("qualifiers".into(), Value::Object(groups));
        out.insert("qualifiers-order".into(), Value::Array(order));
    }

    if let ClaimKind::Statement(parts) = claim.kind() {
        if let Some(rank) = parts.rank.as_str() {
            out.insert("rank".into(), Value::from(rank));
        }
        if !parts.references.is_empty() {
            let references = parts
                .references
                .iter()
                .map(encode_reference)
                .collect::<Result<Vec<_>>>()?;
            out.insert("references".into(), Value::Array(references));
        }
    }
    Ok(Value::Object(out))
}

fn decode_kind(fields: &Fields<'_>) -> Result<ClaimKind> {
    let is_statement = match fields.opt_str("type")? {
        Some("statement") => true,
        Some("claim") => false,
        Some(other) => {
            return Err(Error::InvalidField {
                context: "claim",
                field: "type",
                reason: format!("unknown claim type {other:?}"),
            });
        }
        None => fields.has("rank"),
    };
    if !is_statement {
        return Ok(ClaimKind::Claim);
    }

    let rank = fields.opt_str("rank")?.map(Rank::from_name).unwrap_or_default();
    let mut parts = StatementParts::new(rank);
    if let Some(references) = fields.opt_array("references")? {
        for reference in references {
            parts.references.add(decode_reference(reference)?)?;
        }
    }
    Ok(ClaimKind::Statement(parts))
}

pub fn decode_claim(json: &Value) -> Result<Claim> {
    let fields = Fields::new(json, "claim")?;
    let main_snak = decode_snak(fields.get("mainsnak").ok_or(Error::MissingField {
        context: "claim",
        field: "mainsnak",
    })?)?;
    let id = fields.opt_str("id")?.map(str::to_string);

    let mut qualifiers = Vec::new();
    if let Some(groups) = fields.opt_object("qualifiers")? {
        let order = fields.opt_array("qualifiers-order")?;
        for value in decode_snak_groups(groups, order, "claim qualifiers")? {
            let hash = Fields::new(&value, "qualifier")?.opt_str("hash")?.map(str::to_string);
            qualifiers.push(Qualifier {
                snak: decode_snak(&value)?,
                hash,
            });
        }
    }

    Ok(Claim {
        internal_id: id.clone().unwrap_or_else(temporary_id),
        id,
        main_snak,
        qualifiers,
        kind: decode_kind(&fields)?,
        changes: ClaimChanges::default(),
    })
}

/// Decodes every claim of a `{P: [claim]}` map in wire order.
pub fn decode_claim_groups(groups: &Map<String, Value>) -> Result<Vec<Claim>> {
    let mut claims = Vec::new();
    for (property, list) in groups {
        let list = list.as_array().ok_or_else(|| Error::InvalidField {
            context: "claims",
            field: "claim group",
            reason: format!("{property} is not an array"),
        })?;
        for value in list {
            claims.push(decode_claim(value)?);
        }
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataValue, Snak, SnakType};
    use serde_json::json;

    fn statement_json() -> Value {
        json!({
            "id": "Q42$F078E5B3-F9A8-480E-B7AC-D97778CBBEF9",
            "mainsnak": {
                "snaktype": "value",
                "property": "P31",
                "datavalue": {"type": "wikibase-entityid",
                              "value": {"entity-type": "item", "numeric-id": 5}},
            },
            "type": "statement",
            "qualifiers": {
                "P580": [{"snaktype": "somevalue", "property": "P580", "hash": "abc"}],
            },
            "qualifiers-order": ["P580"],
            "rank": "preferred",
            "references": [{
                "hash": "d4bd87b862b12d99d26e86472d44f26858dee639",
                "snaks": {"P248": [{"snaktype": "value", "property": "P248",
                                    "datavalue": {"type": "string", "value": "x"}}]},
                "snaks-order": ["P248"],
            }],
        })
    }

    #[test]
    fn test_decode_statement() {
        let claim = Claim::from_json(&statement_json()).unwrap();
        assert_eq!(claim.id(), Some("Q42$F078E5B3-F9A8-480E-B7AC-D97778CBBEF9"));
        assert_eq!(claim.internal_id(), claim.id().unwrap());
        assert_eq!(claim.rank(), Some(Rank::Preferred));
        assert_eq!(claim.qualifiers().len(), 1);
        assert_eq!(claim.qualifiers()[0].hash.as_deref(), Some("abc"));
        assert_eq!(claim.qualifiers()[0].snak.snak_type(), SnakType::SomeValue);

        let references = claim.references().unwrap();
        assert_eq!(references.len(), 1);
        let reference = &references.values()[0];
        assert_eq!(reference.internal_id(), "d4bd87b862b12d99d26e86472d44f26858dee639");
        assert_eq!(reference.snaks().count(), 1);
        assert!(claim.changes().is_empty());
    }

    #[test]
    fn test_statement_roundtrip() {
        let claim = Claim::from_json(&statement_json()).unwrap();
        let encoded = claim.encode().unwrap();
        assert_eq!(encoded, statement_json());
        assert_eq!(Claim::from_json(&encoded).unwrap(), claim);
    }

    #[test]
    fn test_unknown_rank_is_kept_unknown() {
        let mut json = statement_json();
        json["rank"] = json!("superseded");
        let claim = Claim::from_json(&json).unwrap();
        assert_eq!(claim.rank(), Some(Rank::Unknown));
        assert!(claim.encode().unwrap().get("rank").is_none());
    }

    #[test]
    fn test_plain_claim() {
        let json = json!({
            "mainsnak": {"snaktype": "novalue", "property": "P1"},
            "type": "claim",
        });
        let claim = Claim::from_json(&json).unwrap();
        assert!(!claim.is_statement());
        assert!(claim.id().is_none());
        assert!(claim.internal_id().starts_with("tmp-"));
        assert_eq!(claim.encode().unwrap(), json);
    }

    #[test]
    fn test_missing_mainsnak() {
        let err = Claim::from_json(&json!({"type": "statement"})).unwrap_err();
        assert_eq!(err, Error::MissingField { context: "claim", field: "mainsnak" });
    }

    #[test]
    fn test_reference_encode() {
        let reference = Reference::from_snaks([
            Snak::value("P854", DataValue::string("http://example.org")).unwrap(),
            Snak::no_value("P813").unwrap(),
        ])
        .unwrap();
        let encoded = reference.encode().unwrap();
        assert!(encoded.get("hash").is_none());
        assert_eq!(encoded["snaks-order"], json!(["P854", "P813"]));
        let decoded = Reference::from_json(&encoded).unwrap();
        assert!(decoded.snaks().eq(reference.snaks()));
    }

    #[test]
    fn test_decode_claim_groups() {
        let groups = json!({
            "P31": [statement_json()],
            "P1": [{"mainsnak": {"snaktype": "novalue", "property": "P1"}, "type": "statement"}],
        });
        let claims = decode_claim_groups(groups.as_object().unwrap()).unwrap();
        assert_eq!(claims.len(), 2);
        assert!(decode_claim_groups(json!({"P1": {}}).as_object().unwrap()).is_err());
    }
}
