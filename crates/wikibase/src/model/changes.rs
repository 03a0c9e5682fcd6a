//! Pending deltas that `save` flushes to the server.

use crate::model::{IndexedList, Rank, SiteLink, Snak, Term};

/// Whether an alias is being added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasAction {
    Add,
    Remove,
}

/// One pending alias delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasChange {
    pub language: String,
    pub value: String,
    pub action: AliasAction,
}

/// Pending changes to an entity's terms and sitelinks.
///
/// Removals of labels, descriptions and sitelinks are stored as entries
/// with empty text, which is how the server expects them.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityChanges {
    pub(crate) labels: IndexedList<String, Term>,
    pub(crate) descriptions: IndexedList<String, Term>,
    pub(crate) aliases: Vec<AliasChange>,
    pub(crate) sitelinks: IndexedList<String, SiteLink>,
    /// Property datatype, only sent on creation.
    pub(crate) datatype: Option<String>,
}

impl Default for EntityChanges {
    fn default() -> Self {
        Self {
            labels: IndexedList::new(Term::language_key),
            descriptions: IndexedList::new(Term::language_key),
            aliases: Vec::new(),
            sitelinks: IndexedList::new(SiteLink::site_key),
            datatype: None,
        }
    }
}

impl EntityChanges {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.descriptions.is_empty()
            && self.aliases.is_empty()
            && self.sitelinks.is_empty()
            && self.datatype.is_none()
    }

    pub fn labels(&self) -> &IndexedList<String, Term> {
        &self.labels
    }

    pub fn descriptions(&self) -> &IndexedList<String, Term> {
        &self.descriptions
    }

    pub fn aliases(&self) -> &[AliasChange] {
        &self.aliases
    }

    pub fn sitelinks(&self) -> &IndexedList<String, SiteLink> {
        &self.sitelinks
    }

    /// Records an alias delta, replacing any pending delta for the same
    /// (language, value) pair so the last action wins.
    pub(crate) fn record_alias(&mut self, language: &str, value: &str, action: AliasAction) {
        self.aliases
            .retain(|c| !(c.language == language && c.value == value));
        self.aliases.push(AliasChange {
            language: language.to_string(),
            value: value.to_string(),
            action,
        });
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Pending changes to a claim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimChanges {
    pub(crate) main_snak: Option<Snak>,
    /// Rank set locally. Claim saves do not send it, so it survives them.
    pub(crate) rank: Option<Rank>,
}

impl ClaimChanges {
    pub fn is_empty(&self) -> bool {
        self.main_snak.is_none() && self.rank.is_none()
    }

    pub fn main_snak(&self) -> Option<&Snak> {
        self.main_snak.as_ref()
    }

    pub fn rank(&self) -> Option<Rank> {
        self.rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_coalescing() {
        let mut changes = EntityChanges::default();
        changes.record_alias("en", "DNA", AliasAction::Add);
        changes.record_alias("en", "Adams", AliasAction::Add);
        changes.record_alias("en", "DNA", AliasAction::Remove);
        assert_eq!(changes.aliases().len(), 2);
        let last = &changes.aliases()[1];
        assert_eq!((last.value.as_str(), last.action), ("DNA", AliasAction::Remove));

        // Same value in another language is a separate entry.
        changes.record_alias("de", "DNA", AliasAction::Add);
        assert_eq!(changes.aliases().len(), 3);
    }

    #[test]
    fn test_empty_and_clear() {
        let mut changes = EntityChanges::default();
        assert!(changes.is_empty());
        changes.labels.set(Term::removal("en"));
        assert!(!changes.is_empty());
        changes.clear();
        assert!(changes.is_empty());
        assert!(ClaimChanges::default().is_empty());
    }
}
