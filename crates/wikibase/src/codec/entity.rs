//! Entity encoding/decoding, including the edit payload built from pending
//! changes.

use serde_json::{json, Map, Value};

use crate::codec::claim::{decode_claim_groups, encode_claim};
use crate::codec::json::Fields;
use crate::error::{Error, Result};
use crate::model::{
    AliasAction, AliasGroup, Entity, EntityChanges, EntityCore, EntityId, EntityType, IndexedList,
    Item, ItemId, Property, SiteLink, Term,
};

// =============================================================================
// DECODING
// =============================================================================

fn decode_terms(
    terms: &Map<String, Value>,
    into: &mut IndexedList<String, Term>,
    context: &'static str,
) -> Result<()> {
    for (key, value) in terms {
        let fields = Fields::new(value, context)?;
        let language = fields.opt_str("language")?.unwrap_or(key);
        if language.is_empty() {
            return Err(Error::BlankField { field: "language" });
        }
        into.set(Term {
            language: language.to_string(),
            text: fields.str("value")?.to_string(),
        });
    }
    Ok(())
}

fn decode_aliases(aliases: &Map<String, Value>, core: &mut EntityCore) -> Result<()> {
    for (language, list) in aliases {
        let list = list.as_array().ok_or(Error::WrongFieldType {
            context: "aliases",
            field: "alias list",
            expected: "an array",
        })?;
        let mut group = AliasGroup {
            language: language.clone(),
            aliases: Vec::with_capacity(list.len()),
        };
        for alias in list {
            let value = Fields::new(alias, "alias")?.str("value")?;
            if !group.aliases.iter().any(|a| a == value) {
                group.aliases.push(value.to_string());
            }
        }
        if !group.aliases.is_empty() {
            core.fingerprint.aliases.set(group);
        }
    }
    Ok(())
}

fn decode_core(fields: &Fields<'_>, entity_type: EntityType) -> Result<EntityCore> {
    let mut core = EntityCore::default();

    if let Some(id) = fields.opt_str("id")? {
        let id = EntityId::parse(id)?;
        if id.entity_type() != entity_type {
            return Err(Error::InvalidField {
                context: "entity",
                field: "id",
                reason: format!("{id} does not identify an entity of type {entity_type}"),
            });
        }
        core.id = Some(id);
    }
    core.last_revision_id = fields.opt_u64("lastrevid")?.unwrap_or(0);

    if let Some(labels) = fields.opt_object("labels")? {
        decode_terms(labels, &mut core.fingerprint.labels, "label")?;
    }
    if let Some(descriptions) = fields.opt_object("descriptions")? {
        decode_terms(descriptions, &mut core.fingerprint.descriptions, "description")?;
    }
    // Edit responses send an empty array instead of an object when there are no aliases.
    if let Some(Value::Object(aliases)) = fields.get("aliases") {
        decode_aliases(aliases, &mut core)?;
    }
    if let Some(Value::Object(claims)) = fields.get("claims") {
        for claim in decode_claim_groups(claims)? {
            core.add_claim(claim)?;
        }
    }
    Ok(core)
}

fn decode_sitelinks(sitelinks: &Map<String, Value>) -> Result<IndexedList<String, SiteLink>> {
    let mut links = IndexedList::new(SiteLink::site_key);
    for (key, value) in sitelinks {
        let fields = Fields::new(value, "sitelink")?;
        let mut badges = Vec::new();
        if let Some(list) = fields.opt_array("badges")? {
            for badge in list {
                let badge = badge.as_str().ok_or(Error::WrongFieldType {
                    context: "sitelink",
                    field: "badges",
                    expected: "an array of item ids",
                })?;
                badges.push(ItemId::new(badge)?);
            }
        }
        links.set(SiteLink {
            site: fields.opt_str("site")?.unwrap_or(key).to_string(),
            title: fields.str("title")?.to_string(),
            badges,
        });
    }
    Ok(links)
}

pub fn decode_item(json: &Value) -> Result<Item> {
    let fields = Fields::new(json, "item")?;
    let mut item = Item::new();
    item.core = decode_core(&fields, EntityType::Item)?;
    if let Some(Value::Object(sitelinks)) = fields.get("sitelinks") {
        item.sitelinks = decode_sitelinks(sitelinks)?;
    }
    Ok(item)
}

pub fn decode_property(json: &Value) -> Result<Property> {
    let fields = Fields::new(json, "property")?;
    Ok(Property {
        core: decode_core(&fields, EntityType::Property)?,
        datatype: fields.str("datatype")?.to_string(),
    })
}

/// Merges a server entity object into `core` one section at a time.
///
/// A section absent from the response is left alone, as is an `aliases` or
/// `claims` array (the empty form edit responses use). Pending changes are
/// not touched. The response is fully decoded before anything is replaced.
fn refill_core(core: &mut EntityCore, fields: &Fields<'_>, entity_type: EntityType) -> Result<()> {
    let fresh = decode_core(fields, entity_type)?;
    if fresh.id.is_some() {
        core.id = fresh.id;
    }
    if fields.has("lastrevid") {
        core.last_revision_id = fresh.last_revision_id;
    }
    if fields.has("labels") {
        core.fingerprint.labels = fresh.fingerprint.labels;
    }
    if fields.has("descriptions") {
        core.fingerprint.descriptions = fresh.fingerprint.descriptions;
    }
    if let Some(Value::Object(_)) = fields.get("aliases") {
        core.fingerprint.aliases = fresh.fingerprint.aliases;
    }
    if let Some(Value::Object(_)) = fields.get("claims") {
        core.replace_claims(fresh.claims)?;
    }
    Ok(())
}

/// Merges a server item object into `item`. See `refill_core`.
pub fn refill_item(item: &mut Item, json: &Value) -> Result<()> {
    let fields = Fields::new(json, "item")?;
    let sitelinks = match fields.get("sitelinks") {
        Some(Value::Object(sitelinks)) => Some(decode_sitelinks(sitelinks)?),
        _ => None,
    };
    refill_core(&mut item.core, &fields, EntityType::Item)?;
    if let Some(sitelinks) = sitelinks {
        item.sitelinks = sitelinks;
    }
    Ok(())
}

/// Merges a server property object into `property`. See `refill_core`.
pub fn refill_property(property: &mut Property, json: &Value) -> Result<()> {
    let fields = Fields::new(json, "property")?;
    let datatype = fields.opt_str("datatype")?;
    refill_core(&mut property.core, &fields, EntityType::Property)?;
    if let Some(datatype) = datatype {
        property.datatype = datatype.to_string();
    }
    Ok(())
}

/// Decodes an entity object, dispatching on `"type"`.
pub fn decode_entity(json: &Value) -> Result<Entity> {
    let fields = Fields::new(json, "entity")?;
    let type_name = fields.str("type")?;
    match EntityType::from_name(type_name) {
        Some(EntityType::Item) => decode_item(json).map(Entity::Item),
        Some(EntityType::Property) => decode_property(json).map(Entity::Property),
        None => Err(Error::UnsupportedEntityType {
            found: type_name.to_string(),
        }),
    }
}

// =============================================================================
// ENCODING
// =============================================================================

fn encode_term(term: &Term) -> Value {
    json!({"language": term.language, "value": term.text})
}

fn encode_terms(terms: &IndexedList<String, Term>) -> Value {
    Value::Object(
        terms
            .iter()
            .map(|t| (t.language.clone(), encode_term(t)))
            .collect(),
    )
}

fn encode_sitelink(link: &SiteLink) -> Value {
    let mut out = json!({"site": link.site, "title": link.title});
    if !link.badges.is_empty() {
        out["badges"] = link
            .badges
            .iter()
            .map(|b| Value::from(b.serialization()))
            .collect();
    }
    out
}

fn encode_sitelinks(links: &IndexedList<String, SiteLink>) -> Value {
    Value::Object(
        links
            .iter()
            .map(|l| (l.site.clone(), encode_sitelink(l)))
            .collect(),
    )
}

fn encode_core(core: &EntityCore, entity_type: EntityType) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    if let Some(id) = core.id() {
        out.insert("id".into(), Value::from(id.serialization()));
    }
    out.insert("type".into(), Value::from(entity_type.as_str()));
    if core.last_revision_id > 0 {
        out.insert("lastrevid".into(), Value::from(core.last_revision_id));
    }
    out.insert("labels".into(), encode_terms(&core.fingerprint.labels));
    out.insert("descriptions".into(), encode_terms(&core.fingerprint.descriptions));

    let mut aliases = Map::new();
    for group in core.fingerprint.aliases.iter() {
        let list = group
            .aliases
            .iter()
            .map(|a| json!({"language": group.language, "value": a}))
            .collect();
        aliases.insert(group.language.clone(), Value::Array(list));
    }
    out.insert("aliases".into(), Value::Object(aliases));

    let mut claims = Map::new();
    for group in core.claims.iter() {
        let list = group
            .claims
            .iter()
            .map(encode_claim)
            .collect::<Result<Vec<_>>>()?;
        claims.insert(group.property.serialization().to_string(), Value::Array(list));
    }
    out.insert("claims".into(), Value::Object(claims));
    Ok(out)
}

pub fn encode_item(item: &Item) -> Result<Value> {
    let mut out = encode_core(&item.core, EntityType::Item)?;
    out.insert("sitelinks".into(), encode_sitelinks(&item.sitelinks));
    Ok(Value::Object(out))
}

pub fn encode_property(property: &Property) -> Result<Value> {
    let mut out = encode_core(&property.core, EntityType::Property)?;
    out.insert("datatype".into(), Value::from(property.datatype.as_str()));
    Ok(Value::Object(out))
}

/// Builds the `data` payload of an entity edit from pending changes.
///
/// Removed labels, descriptions and sitelinks carry an empty value; alias
/// deltas are `{"language", "value", "add": true}` or `"remove": true`.
pub fn encode_changes(changes: &EntityChanges) -> Value {
    let mut out = Map::new();
    if !changes.labels.is_empty() {
        out.insert("labels".into(), encode_terms(&changes.labels));
    }
    if !changes.descriptions.is_empty() {
        out.insert("descriptions".into(), encode_terms(&changes.descriptions));
    }
    if !changes.aliases.is_empty() {
        let deltas = changes
            .aliases
            .iter()
            .map(|c| {
                let flag = match c.action {
                    AliasAction::Add => "add",
                    AliasAction::Remove => "remove",
                };
                let mut delta = json!({"language": c.language, "value": c.value});
                delta[flag] = Value::Bool(true);
                delta
            })
            .collect();
        out.insert("aliases".into(), Value::Array(deltas));
    }
    if !changes.sitelinks.is_empty() {
        out.insert("sitelinks".into(), encode_sitelinks(&changes.sitelinks));
    }
    if let Some(datatype) = &changes.datatype {
        out.insert("datatype".into(), Value::from(datatype.as_str()));
    }
    Value::Object(out)
}
