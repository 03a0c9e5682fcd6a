//! Save and delete protocol.
//!
//! Claims and references are saved through handles borrowed from the owning
//! entity, so reconciling server-assigned ids and revisions can update the
//! entity without back-pointers:
//!
//! ```text
//! entity.core_mut().claim_handle(id)?        -> ClaimHandle
//!     .save(api, summary)                    wbcreateclaim / wbsetclaimvalue
//!     .delete_and_save(api, summary)         wbremoveclaims
//!     .reference(key)?                       -> ReferenceHandle
//!         .save(api, summary)                wbsetreference
//!         .delete_and_save(api, summary)     wbremovereferences
//! ```
//!
//! A failed call leaves pending changes in place, so a save can be retried.

use serde_json::Value;
use tracing::{debug, trace};

use crate::api::{response_revision, Api, EditMeta};
use crate::codec::claim::{decode_claim, decode_reference, encode_reference_snaks};
use crate::error::{Error, Result};
use crate::model::{Claim, DataValue, EntityCore, EntityDocument, Reference, Snak};

/// Saves the pending changes of an entity, creating it if it has no id.
pub fn save_entity<E, A>(entity: &mut E, api: &A, summary: Option<&str>) -> Result<()>
where
    E: EntityDocument,
    A: Api + ?Sized,
{
    if !entity.has_changes() {
        trace!("no pending entity changes");
        return Ok(());
    }
    let data = entity.encode_changes();
    let response = match entity.entity_id() {
        Some(id) => {
            debug!(entity = %id, "editing entity");
            api.edit_entity(id, &data, EditMeta::new(entity.last_revision_id(), summary))?
        }
        None => {
            debug!(entity_type = %entity.entity_type(), "creating entity");
            api.create_entity(entity.entity_type(), &data, EditMeta::new(0, summary))?
        }
    };

    if let Some(json) = response.get("entity") {
        entity.refill(json)?;
    }
    if let Some(revision) = response_revision(&response) {
        entity.core_mut().last_revision_id = revision;
    }
    entity.clear_changes();
    Ok(())
}

impl EntityCore {
    /// Borrows a claim for saving or deleting it.
    pub fn claim_handle(&mut self, internal_id: &str) -> Result<ClaimHandle<'_>> {
        let property = self
            .group_key_of_claim(internal_id)
            .ok_or_else(|| Error::KeyNotFound {
                key: internal_id.to_string(),
            })?;
        Ok(ClaimHandle {
            entity: self,
            property,
            key: internal_id.to_string(),
        })
    }

    fn claim_at(&self, property: &str, key: &str) -> Result<&Claim> {
        self.claims
            .fetch(&property.to_string())?
            .claims
            .fetch(&key.to_string())
    }

    fn claim_at_mut(&mut self, property: &str, key: &str) -> Result<&mut Claim> {
        self.claims
            .fetch_mut(&property.to_string())?
            .claims
            .fetch_mut(&key.to_string())
    }
}

fn encoded_value(snak: &Snak) -> Result<Option<Value>> {
    snak.data_value().map(DataValue::encode).transpose()
}

/// A claim borrowed from its entity.
#[derive(Debug)]
pub struct ClaimHandle<'a> {
    entity: &'a mut EntityCore,
    property: String,
    key: String,
}

impl ClaimHandle<'_> {
    /// Current internal id; changes to the server id on first save.
    pub fn internal_id(&self) -> &str {
        &self.key
    }

    pub fn claim(&self) -> Result<&Claim> {
        self.entity.claim_at(&self.property, &self.key)
    }

    pub fn claim_mut(&mut self) -> Result<&mut Claim> {
        self.entity.claim_at_mut(&self.property, &self.key)
    }

    pub fn set_main_snak(&mut self, snak: Snak) -> Result<()> {
        self.claim_mut()?.set_main_snak(snak)
    }

    /// Creates the claim, or sets its new main snak value.
    ///
    /// Does nothing when the main snak has not changed. The entity must
    /// have been saved first.
    pub fn save<A: Api + ?Sized>(&mut self, api: &A, summary: Option<&str>) -> Result<()> {
        let entity_id = self
            .entity
            .id
            .clone()
            .ok_or(Error::NotSaved { object: "entity" })?;
        let meta = EditMeta::new(self.entity.last_revision_id, summary);
        let claim = self.claim()?;
        let Some(snak) = claim.changes.main_snak.as_ref() else {
            trace!(claim = %self.key, "no pending claim changes");
            return Ok(());
        };
        let value = encoded_value(snak)?;
        let response = match claim.id() {
            None => {
                debug!(entity = %entity_id, property = %snak.property(), "creating claim");
                api.create_claim(&entity_id, snak.snak_type(), snak.property(), value.as_ref(), meta)?
            }
            Some(id) => {
                debug!(claim = id, "setting claim value");
                api.set_claim_value(id, snak.snak_type(), value.as_ref(), meta)?
            }
        };

        match response.get("claim") {
            Some(json) => {
                let saved = decode_claim(json)?;
                let group = self.entity.claims.fetch_mut(&self.property)?;
                let mut claim = group.claims.fetch(&self.key)?.clone();
                claim.apply_saved(saved);
                let new_key = claim.internal_id.clone();
                group.claims.replace_keyed(&self.key, claim)?;
                self.key = new_key;
            }
            None => self.claim_mut()?.changes.main_snak = None,
        }
        if let Some(revision) = response_revision(&response) {
            self.entity.last_revision_id = revision;
        }
        Ok(())
    }

    /// Removes the claim on the server (if it was ever saved) and detaches
    /// it from the entity.
    pub fn delete_and_save<A: Api + ?Sized>(self, api: &A, summary: Option<&str>) -> Result<Claim> {
        let claim = self.entity.claim_at(&self.property, &self.key)?;
        if let Some(id) = claim.id() {
            debug!(claim = id, "removing claim");
            let meta = EditMeta::new(self.entity.last_revision_id, summary);
            let response = api.remove_claims(&[id], meta)?;
            if let Some(revision) = response_revision(&response) {
                self.entity.last_revision_id = revision;
            }
        }
        self.entity
            .remove_claim(&self.key)
            .ok_or(Error::KeyNotFound { key: self.key })
    }

    /// Borrows one of the statement's references.
    pub fn reference(&mut self, internal_id: &str) -> Result<ReferenceHandle<'_>> {
        self.claim()?.references()?.fetch(&internal_id.to_string())?;
        Ok(ReferenceHandle {
            entity: &mut *self.entity,
            property: self.property.clone(),
            claim_key: self.key.clone(),
            key: internal_id.to_string(),
        })
    }

    /// Attaches a reference to the statement and borrows it.
    pub fn add_reference(&mut self, reference: Reference) -> Result<ReferenceHandle<'_>> {
        let key = self.claim_mut()?.add_reference(reference)?;
        self.reference(&key)
    }
}

/// A reference borrowed from its statement.
#[derive(Debug)]
pub struct ReferenceHandle<'a> {
    entity: &'a mut EntityCore,
    property: String,
    claim_key: String,
    key: String,
}

impl ReferenceHandle<'_> {
    /// Current internal id; changes to the server hash on save.
    pub fn internal_id(&self) -> &str {
        &self.key
    }

    fn statement(&self) -> Result<&Claim> {
        self.entity.claim_at(&self.property, &self.claim_key)
    }

    fn statement_mut(&mut self) -> Result<&mut Claim> {
        self.entity.claim_at_mut(&self.property, &self.claim_key)
    }

    pub fn reference(&self) -> Result<&Reference> {
        self.statement()?.references()?.fetch(&self.key)
    }

    pub fn reference_mut(&mut self) -> Result<&mut Reference> {
        let key = self.key.clone();
        self.statement_mut()?
            .statement_mut("reference")?
            .references
            .fetch_mut(&key)
    }

    pub fn add_snak(&mut self, snak: Snak) -> Result<()> {
        self.reference_mut()?.add_snak(snak)
    }

    pub fn remove_snak(&mut self, snak: &Snak) -> Result<bool> {
        self.reference_mut()?.remove_snak(snak)
    }

    /// Sends the full snak set of the reference. The statement must have
    /// been saved first.
    pub fn save<A: Api + ?Sized>(&mut self, api: &A, summary: Option<&str>) -> Result<()> {
        let statement = self.statement()?;
        let statement_id = statement.id().ok_or(Error::NotSaved { object: "statement" })?;
        let reference = statement.references()?.fetch(&self.key)?;
        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }
        let (snaks, order) = encode_reference_snaks(reference)?;
        let meta = EditMeta::new(self.entity.last_revision_id, summary);
        debug!(statement = statement_id, reference = ?reference.hash(), "setting reference");
        let response = api.set_reference(
            statement_id,
            &Value::Object(snaks),
            &Value::Array(order),
            reference.hash(),
            meta,
        )?;

        if let Some(json) = response.get("reference") {
            let saved = decode_reference(json)?;
            let old_key = self.key.clone();
            let references = &mut self.statement_mut()?.statement_mut("save reference")?.references;
            let mut reference = references.fetch(&old_key)?.clone();
            reference.apply_saved(saved);
            let new_key = reference.internal_id.clone();
            references.replace_keyed(&old_key, reference)?;
            self.key = new_key;
        }
        if let Some(revision) = response_revision(&response) {
            self.entity.last_revision_id = revision;
        }
        Ok(())
    }

    /// Removes the reference on the server (if it has a hash) and detaches
    /// it from the statement.
    pub fn delete_and_save<A: Api + ?Sized>(
        mut self,
        api: &A,
        summary: Option<&str>,
    ) -> Result<Reference> {
        let statement = self.statement()?;
        let statement_id = statement.id().ok_or(Error::NotSaved { object: "statement" })?;
        let reference = statement.references()?.fetch(&self.key)?;
        if let Some(hash) = reference.hash() {
            debug!(statement = statement_id, reference = hash, "removing reference");
            let meta = EditMeta::new(self.entity.last_revision_id, summary);
            let response = api.remove_references(statement_id, &[hash], meta)?;
            if let Some(revision) = response_revision(&response) {
                self.entity.last_revision_id = revision;
            }
        }
        let key = self.key.clone();
        self.statement_mut()?
            .remove_reference(&key)?
            .ok_or(Error::KeyNotFound { key })
    }
}
