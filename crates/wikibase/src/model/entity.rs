//! Entities: items and properties.
//!
//! Both share an [`EntityCore`] holding the id, revision, terms, claims and
//! pending changes. Setters update the live state and the pending changes
//! together; [`EntityDocument::save`] flushes the changes.

use serde_json::Value;

use crate::api::Api;
use crate::codec::entity::{
    decode_entity, decode_item, decode_property, encode_changes, encode_item, encode_property,
    refill_item, refill_property,
};
use crate::edit::save_entity;
use crate::error::{Error, Result};
use crate::model::{
    AliasAction, Claim, EntityChanges, EntityId, EntityType, Fingerprint, IndexedList, ItemId,
    PropertyId, SiteLink, Snak, Term,
};

/// Claims of one property, keyed by claim internal id.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimGroup {
    pub(crate) property: PropertyId,
    pub(crate) claims: IndexedList<String, Claim>,
}

impl ClaimGroup {
    fn new(property: PropertyId) -> Self {
        Self {
            property,
            claims: IndexedList::new(Claim::key_of),
        }
    }

    fn key_of(group: &ClaimGroup) -> String {
        group.property.serialization().to_string()
    }

    pub fn property(&self) -> &PropertyId {
        &self.property
    }

    pub fn claims(&self) -> &IndexedList<String, Claim> {
        &self.claims
    }
}

fn require_language(language: &str) -> Result<()> {
    if language.trim().is_empty() {
        return Err(Error::BlankArgument { argument: "language" });
    }
    Ok(())
}

/// State shared by every entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCore {
    pub(crate) id: Option<EntityId>,
    pub(crate) last_revision_id: u64,
    pub(crate) fingerprint: Fingerprint,
    pub(crate) claims: IndexedList<String, ClaimGroup>,
    pub(crate) changes: EntityChanges,
}

impl Default for EntityCore {
    fn default() -> Self {
        Self {
            id: None,
            last_revision_id: 0,
            fingerprint: Fingerprint::default(),
            claims: IndexedList::new(ClaimGroup::key_of),
            changes: EntityChanges::default(),
        }
    }
}

impl EntityCore {
    pub fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    pub fn last_revision_id(&self) -> u64 {
        self.last_revision_id
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn changes(&self) -> &EntityChanges {
        &self.changes
    }

    // === Terms ===

    pub fn label(&self, language: &str) -> Result<Option<&str>> {
        require_language(language)?;
        Ok(self.fingerprint.label(language))
    }

    /// Sets a label. Setting the current value records nothing.
    pub fn set_label(&mut self, language: &str, value: &str) -> Result<()> {
        let term = Term::new(language, value)?;
        if self.fingerprint.label(language) == Some(value) {
            return Ok(());
        }
        self.fingerprint.labels.set(term.clone());
        self.changes.labels.set(term);
        Ok(())
    }

    /// Removes a label; returns whether one was present.
    pub fn remove_label(&mut self, language: &str) -> Result<bool> {
        require_language(language)?;
        if self.fingerprint.labels.remove(&language.to_string()).is_none() {
            return Ok(false);
        }
        self.changes.labels.set(Term::removal(language));
        Ok(true)
    }

    pub fn description(&self, language: &str) -> Result<Option<&str>> {
        require_language(language)?;
        Ok(self.fingerprint.description(language))
    }

    /// Sets a description. Setting the current value records nothing.
    pub fn set_description(&mut self, language: &str, value: &str) -> Result<()> {
        let term = Term::new(language, value)?;
        if self.fingerprint.description(language) == Some(value) {
            return Ok(());
        }
        self.fingerprint.descriptions.set(term.clone());
        self.changes.descriptions.set(term);
        Ok(())
    }

    pub fn remove_description(&mut self, language: &str) -> Result<bool> {
        require_language(language)?;
        if self.fingerprint.descriptions.remove(&language.to_string()).is_none() {
            return Ok(false);
        }
        self.changes.descriptions.set(Term::removal(language));
        Ok(true)
    }

    pub fn aliases(&self, language: &str) -> &[String] {
        self.fingerprint.aliases(language)
    }

    /// Adds an alias; returns false if it was already present.
    pub fn add_alias(&mut self, language: &str, alias: &str) -> Result<bool> {
        // Validates both arguments.
        Term::new(language, alias)?;
        if !self.fingerprint.add_alias(language, alias) {
            return Ok(false);
        }
        self.changes.record_alias(language, alias, AliasAction::Add);
        Ok(true)
    }

    /// Removes an alias; returns whether it was present.
    pub fn remove_alias(&mut self, language: &str, alias: &str) -> Result<bool> {
        require_language(language)?;
        if !self.fingerprint.remove_alias(language, alias) {
            return Ok(false);
        }
        self.changes.record_alias(language, alias, AliasAction::Remove);
        Ok(true)
    }

    // === Claims ===

    /// Claim groups in insertion order.
    pub fn claim_groups(&self) -> &IndexedList<String, ClaimGroup> {
        &self.claims
    }

    /// All claims, grouped by property.
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter().flat_map(|g| g.claims.iter())
    }

    /// Claims whose main snak uses `property`.
    pub fn claims_for_property(&self, property: &PropertyId) -> impl Iterator<Item = &Claim> {
        self.claims
            .get(&property.serialization().to_string())
            .into_iter()
            .flat_map(|g| g.claims.iter())
    }

    pub(crate) fn group_key_of_claim(&self, internal_id: &str) -> Option<String> {
        let key = internal_id.to_string();
        self.claims
            .iter()
            .find(|g| g.claims.contains_key(&key))
            .map(ClaimGroup::key_of)
    }

    pub fn claim(&self, internal_id: &str) -> Option<&Claim> {
        let key = internal_id.to_string();
        self.claims.iter().find_map(|g| g.claims.get(&key))
    }

    pub fn claim_mut(&mut self, internal_id: &str) -> Option<&mut Claim> {
        let group = self.group_key_of_claim(internal_id)?;
        self.claims.get_mut(&group)?.claims.get_mut(&internal_id.to_string())
    }

    /// Attaches a claim. Returns its internal id.
    pub fn add_claim(&mut self, claim: Claim) -> Result<String> {
        let property = claim.property().serialization().to_string();
        let internal_id = claim.internal_id().to_string();
        if !self.claims.contains_key(&property) {
            self.claims.set(ClaimGroup::new(claim.property().clone()));
        }
        self.claims.fetch_mut(&property)?.claims.add(claim)?;
        Ok(internal_id)
    }

    /// Detaches a claim locally. An emptied property group is dropped.
    pub fn remove_claim(&mut self, internal_id: &str) -> Option<Claim> {
        let group_key = self.group_key_of_claim(internal_id)?;
        let group = self.claims.get_mut(&group_key)?;
        let claim = group.claims.remove(&internal_id.to_string());
        if group.claims.is_empty() {
            self.claims.remove(&group_key);
        }
        claim
    }

    /// Creates an unsaved statement for `snak` and attaches it.
    pub fn create_statement_for_snak(&mut self, snak: Snak) -> Result<String> {
        self.add_claim(Claim::new_statement(snak))
    }

    /// Creates an unsaved plain claim for `snak` and attaches it.
    pub fn create_claim_for_snak(&mut self, snak: Snak) -> Result<String> {
        self.add_claim(Claim::new_claim(snak))
    }

    /// Installs a server claim set, keeping claims that were never saved.
    pub(crate) fn replace_claims(&mut self, claims: IndexedList<String, ClaimGroup>) -> Result<()> {
        let previous = std::mem::replace(&mut self.claims, claims);
        for group in previous.iter() {
            for claim in group.claims.iter().filter(|c| c.id().is_none()) {
                if self.claim(claim.internal_id()).is_none() {
                    self.add_claim(claim.clone())?;
                }
            }
        }
        Ok(())
    }
}

/// Behavior shared by items, properties and [`Entity`].
pub trait EntityDocument {
    fn core(&self) -> &EntityCore;

    fn core_mut(&mut self) -> &mut EntityCore;

    fn entity_type(&self) -> EntityType;

    /// Encodes the full current state.
    fn encode(&self) -> Result<Value>;

    /// Merges a server-returned entity object into the live state.
    fn refill(&mut self, json: &Value) -> Result<()>;

    /// Clears pending changes after a successful save.
    fn clear_changes(&mut self) {
        self.core_mut().changes.clear();
    }

    fn has_changes(&self) -> bool {
        !self.core().changes.is_empty()
    }

    /// Encodes the pending changes as an edit payload.
    fn encode_changes(&self) -> Value {
        encode_changes(&self.core().changes)
    }

    fn entity_id(&self) -> Option<&EntityId> {
        self.core().id()
    }

    fn last_revision_id(&self) -> u64 {
        self.core().last_revision_id
    }

    /// Creates the entity, or applies the pending changes to it.
    ///
    /// Does nothing when there are no pending changes.
    fn save<A: Api + ?Sized>(&mut self, api: &A, summary: Option<&str>) -> Result<()>
    where
        Self: Sized,
    {
        save_entity(self, api, summary)
    }
}

/// An item: an entity with sitelinks.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub(crate) core: EntityCore,
    pub(crate) sitelinks: IndexedList<String, SiteLink>,
}

impl Default for Item {
    fn default() -> Self {
        Self::new()
    }
}

impl Item {
    /// Creates a fresh item, created on the server by its first save.
    pub fn new() -> Self {
        Self {
            core: EntityCore::default(),
            sitelinks: IndexedList::new(SiteLink::site_key),
        }
    }

    pub fn id(&self) -> Option<ItemId> {
        match self.core.id() {
            Some(EntityId::Item(id)) => Some(id.clone()),
            _ => None,
        }
    }

    pub fn sitelinks(&self) -> &IndexedList<String, SiteLink> {
        &self.sitelinks
    }

    pub fn sitelink(&self, site: &str) -> Option<&SiteLink> {
        self.sitelinks.get(&site.to_string())
    }

    /// Sets the sitelink for its site, replacing any previous one.
    pub fn set_sitelink(&mut self, link: SiteLink) {
        if self.sitelink(&link.site) == Some(&link) {
            return;
        }
        self.sitelinks.set(link.clone());
        self.core.changes.sitelinks.set(link);
    }

    /// Removes the sitelink for `site`; returns whether one was present.
    pub fn remove_sitelink(&mut self, site: &str) -> Result<bool> {
        if site.trim().is_empty() {
            return Err(Error::BlankArgument { argument: "site" });
        }
        if self.sitelinks.remove(&site.to_string()).is_none() {
            return Ok(false);
        }
        self.core.changes.sitelinks.set(SiteLink::removal(site));
        Ok(true)
    }

    pub fn from_json(json: &Value) -> Result<Self> {
        decode_item(json)
    }
}

impl EntityDocument for Item {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Item
    }

    fn encode(&self) -> Result<Value> {
        encode_item(self)
    }

    fn refill(&mut self, json: &Value) -> Result<()> {
        refill_item(self, json)
    }
}

/// A property: an entity with a fixed datatype.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub(crate) core: EntityCore,
    pub(crate) datatype: String,
}

impl Property {
    /// Creates a fresh property of `datatype` (e.g. `wikibase-item`).
    pub fn new(datatype: &str) -> Result<Self> {
        if datatype.trim().is_empty() {
            return Err(Error::BlankArgument { argument: "datatype" });
        }
        let mut core = EntityCore::default();
        core.changes.datatype = Some(datatype.to_string());
        Ok(Self {
            core,
            datatype: datatype.to_string(),
        })
    }

    pub fn id(&self) -> Option<PropertyId> {
        self.core.id().and_then(EntityId::as_property).cloned()
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn from_json(json: &Value) -> Result<Self> {
        decode_property(json)
    }
}

impl EntityDocument for Property {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Property
    }

    fn encode(&self) -> Result<Value> {
        encode_property(self)
    }

    fn refill(&mut self, json: &Value) -> Result<()> {
        refill_property(self, json)
    }
}

/// Any entity, as returned by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Item(Item),
    Property(Property),
}

impl Entity {
    /// Decodes an entity object, dispatching on its `"type"`.
    pub fn from_json(json: &Value) -> Result<Self> {
        decode_entity(json)
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Entity::Item(item) => Some(item),
            Entity::Property(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Entity::Property(property) => Some(property),
            Entity::Item(_) => None,
        }
    }
}

impl From<Item> for Entity {
    fn from(item: Item) -> Self {
        Entity::Item(item)
    }
}

impl From<Property> for Entity {
    fn from(property: Property) -> Self {
        Entity::Property(property)
    }
}

impl EntityDocument for Entity {
    fn core(&self) -> &EntityCore {
        match self {
            Entity::Item(item) => item.core(),
            Entity::Property(property) => property.core(),
        }
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        match self {
            Entity::Item(item) => item.core_mut(),
            Entity::Property(property) => property.core_mut(),
        }
    }

    fn entity_type(&self) -> EntityType {
        match self {
            Entity::Item(_) => EntityType::Item,
            Entity::Property(_) => EntityType::Property,
        }
    }

    fn encode(&self) -> Result<Value> {
        match self {
            Entity::Item(item) => item.encode(),
            Entity::Property(property) => property.encode(),
        }
    }

    fn refill(&mut self, json: &Value) -> Result<()> {
        match self {
            Entity::Item(item) => item.refill(json),
            Entity::Property(property) => property.refill(json),
        }
    }
}
