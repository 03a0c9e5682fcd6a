//! Simple decoder to inspect Wikibase entity JSON.
//!
//! Accepts either a single entity object or a `wbgetentities` response.

use std::fs;

use serde_json::Value;
use wikibase::{DataValue, Entity, EntityDocument, Snak};

fn format_value(value: &DataValue) -> String {
    match value {
        DataValue::String(v) => {
            let preview: String = v.value.chars().take(80).collect();
            if v.value.chars().count() > 80 {
                format!("\"{}...\"", preview)
            } else {
                format!("\"{}\"", preview)
            }
        }
        DataValue::EntityId(v) => v
            .entity_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|_| format!("{}#{}", v.entity_type, v.numeric_id)),
        DataValue::Time(v) => format!("TIME({}, precision={:?})", v.time, v.precision),
        DataValue::GlobeCoordinate(v) => format!("POINT({}, {})", v.latitude, v.longitude),
        DataValue::Quantity(v) => format!("QUANTITY({} {})", v.amount, v.unit),
        DataValue::MonolingualText(v) => format!("\"{}\"@{}", v.text, v.language),
    }
}

fn format_snak(snak: &Snak) -> String {
    match snak {
        Snak::Value { property, value } => format!("{} = {}", property, format_value(value)),
        Snak::NoValue { property } => format!("{} = (no value)", property),
        Snak::SomeValue { property } => format!("{} = (some value)", property),
    }
}

fn print_entity(entity: &Entity) {
    let core = entity.core();
    println!("\n=== {} ===", core.id().map(|id| id.to_string()).unwrap_or_default());
    println!("Type: {}", entity.entity_type());
    println!("Revision: {}", core.last_revision_id());
    if let Some(property) = entity.as_property() {
        println!("Datatype: {}", property.datatype());
    }

    let fingerprint = core.fingerprint();
    println!("Labels: {}", fingerprint.labels().len());
    if let Some(label) = fingerprint.label("en") {
        println!("  en: {}", label);
    }
    println!("Descriptions: {}", fingerprint.descriptions().len());
    println!("Alias groups: {}", fingerprint.alias_groups().len());
    if let Some(item) = entity.as_item() {
        println!("Sitelinks: {}", item.sitelinks().len());
    }

    let mut statements = 0;
    let mut references = 0;
    for claim in core.claims() {
        if let Ok(list) = claim.references() {
            statements += 1;
            references += list.len();
        }
    }
    println!(
        "Claims: {} ({} statements, {} references)",
        core.claims().count(),
        statements,
        references
    );
    for claim in core.claims().take(20) {
        let rank = claim.rank().and_then(|r| r.as_str()).unwrap_or("-");
        println!("  [{}] {}", rank, format_snak(claim.main_snak()));
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Q42.json".to_string());

    println!("Reading: {}", path);

    let data = fs::read_to_string(&path).expect("Failed to read file");
    let json: Value = serde_json::from_str(&data).expect("Failed to parse JSON");

    let entities: Vec<Entity> = match json.get("entities").and_then(Value::as_object) {
        Some(map) => map
            .values()
            .filter(|e| e.get("missing").is_none())
            .map(|e| Entity::from_json(e).expect("Failed to decode entity"))
            .collect(),
        None => vec![Entity::from_json(&json).expect("Failed to decode entity")],
    };

    println!("Entities: {}", entities.len());
    for entity in &entities {
        print_entity(entity);
    }
}
