//! Claims, statements, qualifiers and references.
//!
//! A statement is a claim with a rank and references; both share one type
//! ([`Claim`]) and differ in [`ClaimKind`]. Reference operations on a plain
//! claim fail with [`Error::NotAStatement`].

use serde_json::Value;

use crate::codec::claim::{decode_claim, decode_reference, encode_claim, encode_reference};
use crate::error::{Error, Result};
use crate::model::{ClaimChanges, IndexedList, PropertyId, Snak};
use crate::util::temporary_id;

/// Statement rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rank {
    Preferred,
    #[default]
    Normal,
    Deprecated,
    /// A rank name this client does not recognize.
    Unknown,
}

impl Rank {
    /// Returns the wire name, or None for [`Rank::Unknown`].
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Rank::Preferred => Some("preferred"),
            Rank::Normal => Some("normal"),
            Rank::Deprecated => Some("deprecated"),
            Rank::Unknown => None,
        }
    }

    /// Parses a wire name; unrecognized names become [`Rank::Unknown`].
    pub fn from_name(name: &str) -> Rank {
        match name {
            "preferred" => Rank::Preferred,
            "normal" => Rank::Normal,
            "deprecated" => Rank::Deprecated,
            _ => Rank::Unknown,
        }
    }
}

/// A snak qualifying a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Qualifier {
    pub snak: Snak,
    /// Server-assigned hash; None until saved.
    pub hash: Option<String>,
}

impl Qualifier {
    pub fn new(snak: Snak) -> Self {
        Self { snak, hash: None }
    }
}

// =============================================================================
// REFERENCES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeyedSnak {
    pub(crate) key: String,
    pub(crate) snak: Snak,
}

impl KeyedSnak {
    fn key_of(entry: &KeyedSnak) -> String {
        entry.key.clone()
    }
}

/// Snaks of one property within a reference, keyed by value hash.
#[derive(Debug, Clone, PartialEq)]
pub struct SnakGroup {
    pub(crate) property: PropertyId,
    pub(crate) snaks: IndexedList<String, KeyedSnak>,
}

impl SnakGroup {
    fn new(property: PropertyId) -> Self {
        Self {
            property,
            snaks: IndexedList::new(KeyedSnak::key_of),
        }
    }

    fn key_of(group: &SnakGroup) -> String {
        group.property.serialization().to_string()
    }

    pub fn property(&self) -> &PropertyId {
        &self.property
    }

    pub fn snaks(&self) -> impl Iterator<Item = &Snak> {
        self.snaks.iter().map(|e| &e.snak)
    }
}

/// A source backing a statement: snaks grouped by property.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub(crate) hash: Option<String>,
    pub(crate) internal_id: String,
    pub(crate) groups: IndexedList<String, SnakGroup>,
}

impl Default for Reference {
    fn default() -> Self {
        Self::new()
    }
}

impl Reference {
    /// Creates an empty, unsaved reference.
    pub fn new() -> Self {
        Self {
            hash: None,
            internal_id: temporary_id(),
            groups: IndexedList::new(SnakGroup::key_of),
        }
    }

    /// Creates an unsaved reference holding `snaks`; at least one is required.
    pub fn from_snaks(snaks: impl IntoIterator<Item = Snak>) -> Result<Self> {
        let mut reference = Self::new();
        for snak in snaks {
            reference.add_snak(snak)?;
        }
        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }
        Ok(reference)
    }

    /// Server hash; None until saved.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Key within the owning statement: the hash once saved, a temporary id before.
    pub fn internal_id(&self) -> &str {
        &self.internal_id
    }

    /// Adds a snak, overwriting an equal-valued snak of the same property.
    pub fn add_snak(&mut self, snak: Snak) -> Result<()> {
        let key = snak.value_hash()?;
        let property = snak.property().serialization().to_string();
        if !self.groups.contains_key(&property) {
            self.groups.set(SnakGroup::new(snak.property().clone()));
        }
        let group = self.groups.fetch_mut(&property)?;
        group.snaks.set(KeyedSnak { key, snak });
        Ok(())
    }

    /// Removes a snak; returns whether it was present.
    ///
    /// A property whose last snak is removed disappears from the reference.
    pub fn remove_snak(&mut self, snak: &Snak) -> Result<bool> {
        let key = snak.value_hash()?;
        let property = snak.property().serialization().to_string();
        let Some(group) = self.groups.get_mut(&property) else {
            return Ok(false);
        };
        let removed = group.snaks.remove(&key).is_some();
        if group.snaks.is_empty() {
            self.groups.remove(&property);
        }
        Ok(removed)
    }

    /// All snaks, grouped by property in insertion order.
    pub fn snaks(&self) -> impl Iterator<Item = &Snak> {
        self.groups.iter().flat_map(|g| g.snaks())
    }

    pub fn groups(&self) -> &IndexedList<String, SnakGroup> {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Takes over the server-assigned identity after a save.
    pub(crate) fn apply_saved(&mut self, saved: Reference) {
        self.hash = saved.hash;
        self.internal_id = saved.internal_id;
        self.groups = saved.groups;
    }

    pub(crate) fn key_of(reference: &Reference) -> String {
        reference.internal_id.clone()
    }

    /// Encodes `{"hash"?, "snaks", "snaks-order"}`.
    pub fn encode(&self) -> Result<Value> {
        encode_reference(self)
    }

    pub fn from_json(json: &Value) -> Result<Self> {
        decode_reference(json)
    }
}

// =============================================================================
// CLAIMS
// =============================================================================

/// Statement-only state.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementParts {
    pub(crate) rank: Rank,
    pub(crate) references: IndexedList<String, Reference>,
}

impl StatementParts {
    pub(crate) fn new(rank: Rank) -> Self {
        Self {
            rank,
            references: IndexedList::new(Reference::key_of),
        }
    }
}

/// Plain claim or statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimKind {
    Claim,
    Statement(StatementParts),
}

/// A main snak with qualifiers, owned by one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub(crate) id: Option<String>,
    pub(crate) internal_id: String,
    pub(crate) main_snak: Snak,
    pub(crate) qualifiers: Vec<Qualifier>,
    pub(crate) kind: ClaimKind,
    pub(crate) changes: ClaimChanges,
}

impl Claim {
    fn unsaved(main_snak: Snak, kind: ClaimKind) -> Self {
        Self {
            id: None,
            internal_id: temporary_id(),
            changes: ClaimChanges {
                main_snak: Some(main_snak.clone()),
                rank: None,
            },
            main_snak,
            qualifiers: Vec::new(),
            kind,
        }
    }

    /// Creates an unsaved plain claim.
    pub fn new_claim(main_snak: Snak) -> Self {
        Self::unsaved(main_snak, ClaimKind::Claim)
    }

    /// Creates an unsaved statement with normal rank.
    pub fn new_statement(main_snak: Snak) -> Self {
        Self::unsaved(main_snak, ClaimKind::Statement(StatementParts::new(Rank::Normal)))
    }

    /// Server id (`Q42$...`); None until saved.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Key within the owning entity: the server id once saved.
    pub fn internal_id(&self) -> &str {
        &self.internal_id
    }

    pub fn main_snak(&self) -> &Snak {
        &self.main_snak
    }

    pub fn property(&self) -> &PropertyId {
        self.main_snak.property()
    }

    pub fn kind(&self) -> &ClaimKind {
        &self.kind
    }

    pub fn is_statement(&self) -> bool {
        matches!(self.kind, ClaimKind::Statement(_))
    }

    pub fn changes(&self) -> &ClaimChanges {
        &self.changes
    }

    /// Replaces the main snak. The property cannot change.
    pub fn set_main_snak(&mut self, snak: Snak) -> Result<()> {
        if snak.property() != self.main_snak.property() {
            return Err(Error::PropertyMismatch {
                expected: self.main_snak.property().clone(),
                found: snak.property().clone(),
            });
        }
        self.main_snak = snak.clone();
        self.changes.main_snak = Some(snak);
        Ok(())
    }

    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    pub fn add_qualifier(&mut self, snak: Snak) {
        self.qualifiers.push(Qualifier::new(snak));
    }

    /// Removes every qualifier whose snak equals `snak`.
    pub fn remove_qualifier(&mut self, snak: &Snak) -> bool {
        let before = self.qualifiers.len();
        self.qualifiers.retain(|q| &q.snak != snak);
        self.qualifiers.len() != before
    }

    fn statement(&self, operation: &'static str) -> Result<&StatementParts> {
        match &self.kind {
            ClaimKind::Statement(parts) => Ok(parts),
            ClaimKind::Claim => Err(Error::NotAStatement { operation }),
        }
    }

    pub(crate) fn statement_mut(&mut self, operation: &'static str) -> Result<&mut StatementParts> {
        match &mut self.kind {
            ClaimKind::Statement(parts) => Ok(parts),
            ClaimKind::Claim => Err(Error::NotAStatement { operation }),
        }
    }

    /// Rank of a statement; None for plain claims.
    pub fn rank(&self) -> Option<Rank> {
        self.statement("rank").ok().map(|s| s.rank)
    }

    /// Sets the rank of a statement. The rank is recorded as a local change.
    pub fn set_rank(&mut self, rank: Rank) -> Result<()> {
        let parts = self.statement_mut("set rank")?;
        if parts.rank == rank {
            return Ok(());
        }
        parts.rank = rank;
        self.changes.rank = Some(rank);
        Ok(())
    }

    /// References of a statement, keyed by internal id.
    pub fn references(&self) -> Result<&IndexedList<String, Reference>> {
        Ok(&self.statement("references")?.references)
    }

    pub fn reference(&self, internal_id: &str) -> Option<&Reference> {
        self.statement("reference")
            .ok()?
            .references
            .get(&internal_id.to_string())
    }

    /// Attaches a reference. Returns its internal id.
    pub fn add_reference(&mut self, reference: Reference) -> Result<String> {
        let key = reference.internal_id.clone();
        self.statement_mut("add reference")?.references.add(reference)?;
        Ok(key)
    }

    /// Detaches a reference locally.
    pub fn remove_reference(&mut self, internal_id: &str) -> Result<Option<Reference>> {
        Ok(self
            .statement_mut("remove reference")?
            .references
            .remove(&internal_id.to_string()))
    }

    /// Takes over the server state after a save and drops the pending
    /// main snak change.
    ///
    /// Local state the claim actions never send stays: qualifiers and
    /// references without a hash, and a rank set locally.
    pub(crate) fn apply_saved(&mut self, saved: Claim) {
        let pending_qualifiers: Vec<Qualifier> = self
            .qualifiers
            .iter()
            .filter(|q| q.hash.is_none())
            .cloned()
            .collect();
        let pending_references: Vec<Reference> = match &self.kind {
            ClaimKind::Statement(parts) => parts
                .references
                .iter()
                .filter(|r| r.hash.is_none())
                .cloned()
                .collect(),
            ClaimKind::Claim => Vec::new(),
        };
        self.id = saved.id;
        self.internal_id = saved.internal_id;
        self.main_snak = saved.main_snak;
        self.qualifiers = saved.qualifiers;
        for qualifier in pending_qualifiers {
            if !self.qualifiers.iter().any(|q| q.snak == qualifier.snak) {
                self.qualifiers.push(qualifier);
            }
        }
        self.kind = saved.kind;
        if let ClaimKind::Statement(parts) = &mut self.kind {
            if let Some(rank) = self.changes.rank {
                parts.rank = rank;
            }
            for reference in pending_references {
                parts.references.set(reference);
            }
        }
        self.changes.main_snak = None;
    }

    pub(crate) fn key_of(claim: &Claim) -> String {
        claim.internal_id.clone()
    }

    /// Encodes the full claim object.
    pub fn encode(&self) -> Result<Value> {
        encode_claim(self)
    }

    /// Decodes a claim or statement object.
    pub fn from_json(json: &Value) -> Result<Self> {
        decode_claim(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{DataValue, SnakType};

    #[test]
    fn test_statement_with_qualifier() {
        let mut statement = Claim::new_statement(Snak::some_value("P42").unwrap());
        statement.add_qualifier(Snak::no_value("P42").unwrap());
        assert_eq!(statement.qualifiers().len(), 1);
        assert_eq!(statement.qualifiers()[0].snak.snak_type(), SnakType::NoValue);
        assert_eq!(statement.qualifiers()[0].hash, None);
    }

    #[test]
    fn test_new_claim_is_pending() {
        let claim = Claim::new_claim(Snak::no_value("P1").unwrap());
        assert_eq!(claim.id(), None);
        assert!(claim.internal_id().starts_with("tmp-"));
        assert!(!claim.changes().is_empty());
        assert!(!claim.is_statement());
        assert_eq!(claim.rank(), None);
    }

    #[test]
    fn test_main_snak_property_is_fixed() {
        let mut claim = Claim::new_statement(Snak::no_value("P1").unwrap());
        let err = claim.set_main_snak(Snak::no_value("P2").unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert!(matches!(err, Error::PropertyMismatch { .. }));

        let replacement = Snak::value("P1", DataValue::string("x")).unwrap();
        claim.set_main_snak(replacement.clone()).unwrap();
        assert_eq!(claim.main_snak(), &replacement);
        assert_eq!(claim.changes().main_snak(), Some(&replacement));
    }

    #[test]
    fn test_reference_operations_need_statement() {
        let mut claim = Claim::new_claim(Snak::no_value("P1").unwrap());
        let reference = Reference::from_snaks([Snak::no_value("P2").unwrap()]).unwrap();
        let err = claim.add_reference(reference).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!(claim.set_rank(Rank::Preferred).is_err());
        assert!(claim.references().is_err());
    }

    #[test]
    fn test_statement_references() {
        let mut statement = Claim::new_statement(Snak::no_value("P1").unwrap());
        let reference = Reference::from_snaks([Snak::no_value("P2").unwrap()]).unwrap();
        let key = statement.add_reference(reference.clone()).unwrap();
        let err = statement.add_reference(reference).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert!(statement.reference(&key).is_some());
        assert!(statement.remove_reference(&key).unwrap().is_some());
        assert!(statement.references().unwrap().is_empty());
    }

    #[test]
    fn test_reference_snaks_dedupe_by_value() {
        let mut reference = Reference::new();
        reference.add_snak(Snak::value("P854", DataValue::string("http://a")).unwrap()).unwrap();
        reference.add_snak(Snak::value("P854", DataValue::string("http://a")).unwrap()).unwrap();
        reference.add_snak(Snak::value("P854", DataValue::string("http://b")).unwrap()).unwrap();
        reference.add_snak(Snak::no_value("P813").unwrap()).unwrap();
        assert_eq!(reference.snaks().count(), 3);
        assert_eq!(reference.groups().len(), 2);

        let gone = Snak::value("P854", DataValue::string("http://a")).unwrap();
        assert!(reference.remove_snak(&gone).unwrap());
        assert!(!reference.remove_snak(&gone).unwrap());
        assert!(reference.remove_snak(&Snak::no_value("P813").unwrap()).unwrap());
        assert_eq!(reference.groups().len(), 1);
    }

    #[test]
    fn test_apply_saved_keeps_local_state() {
        let mut statement = Claim::new_statement(Snak::some_value("P42").unwrap());
        statement.add_qualifier(Snak::some_value("P580").unwrap());
        statement.set_rank(Rank::Preferred).unwrap();
        assert_eq!(statement.changes().rank(), Some(Rank::Preferred));
        let reference = Reference::from_snaks([Snak::no_value("P2").unwrap()]).unwrap();
        let reference_key = statement.add_reference(reference).unwrap();

        let saved = Claim::from_json(&serde_json::json!({
            "id": "Q42$abc",
            "mainsnak": {"snaktype": "somevalue", "property": "P42"},
            "type": "statement",
            "rank": "normal",
        }))
        .unwrap();
        statement.apply_saved(saved);

        assert_eq!(statement.id(), Some("Q42$abc"));
        assert_eq!(statement.qualifiers().len(), 1);
        assert_eq!(statement.qualifiers()[0].snak, Snak::some_value("P580").unwrap());
        assert_eq!(statement.rank(), Some(Rank::Preferred));
        assert!(statement.reference(&reference_key).is_some());
        assert!(statement.changes().main_snak().is_none());
    }

    #[test]
    fn test_apply_saved_takes_server_qualifiers() {
        let mut statement = Claim::new_statement(Snak::no_value("P1").unwrap());
        statement.add_qualifier(Snak::no_value("P580").unwrap());
        let saved = Claim::from_json(&serde_json::json!({
            "id": "Q1$x",
            "mainsnak": {"snaktype": "novalue", "property": "P1"},
            "type": "statement",
            "qualifiers": {"P580": [{"snaktype": "novalue", "property": "P580", "hash": "h1"}]},
            "rank": "deprecated",
        }))
        .unwrap();
        statement.apply_saved(saved);
        assert_eq!(statement.qualifiers().len(), 1);
        assert_eq!(statement.qualifiers()[0].hash.as_deref(), Some("h1"));
        // No local rank change, so the server's rank wins.
        assert_eq!(statement.rank(), Some(Rank::Deprecated));
    }

    #[test]
    fn test_set_rank_records_change() {
        let mut statement = Claim::new_statement(Snak::no_value("P1").unwrap());
        statement.set_rank(Rank::Normal).unwrap();
        assert_eq!(statement.changes().rank(), None);
        statement.set_rank(Rank::Deprecated).unwrap();
        assert_eq!(statement.changes().rank(), Some(Rank::Deprecated));
    }

    #[test]
    fn test_empty_reference_rejected() {
        let err = Reference::from_snaks(Vec::new()).unwrap_err();
        assert_eq!(err, Error::EmptyReference);
    }

    #[test]
    fn test_rank_names() {
        assert_eq!(Rank::from_name("preferred"), Rank::Preferred);
        assert_eq!(Rank::from_name("bogus"), Rank::Unknown);
        assert_eq!(Rank::Unknown.as_str(), None);
        assert_eq!(Rank::default(), Rank::Normal);
    }
}
