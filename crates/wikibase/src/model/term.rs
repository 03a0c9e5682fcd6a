//! Language-tagged terms (labels, descriptions, aliases) and sitelinks.

use crate::error::{Error, Result};
use crate::model::{IndexedList, ItemId};

fn non_blank(value: &str, argument: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::BlankArgument { argument });
    }
    Ok(())
}

/// A text in one language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    pub language: String,
    pub text: String,
}

impl Term {
    /// Creates a term; both language and text must be non-blank.
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let language = language.into();
        let text = text.into();
        non_blank(&language, "language")?;
        non_blank(&text, "value")?;
        Ok(Self { language, text })
    }

    /// The pending-change form of a removal: the empty-text sentinel.
    pub(crate) fn removal(language: &str) -> Self {
        Self {
            language: language.to_string(),
            text: String::new(),
        }
    }

    pub(crate) fn language_key(term: &Term) -> String {
        term.language.clone()
    }
}

/// All aliases of an entity in one language, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasGroup {
    pub language: String,
    pub aliases: Vec<String>,
}

impl AliasGroup {
    pub(crate) fn language_key(group: &AliasGroup) -> String {
        group.language.clone()
    }
}

/// Link from an item to a page on a client site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLink {
    /// Global site id, e.g. `enwiki`.
    pub site: String,
    pub title: String,
    /// Badge items such as "featured article".
    pub badges: Vec<ItemId>,
}

impl SiteLink {
    /// Creates a sitelink without badges.
    pub fn new(site: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        let site = site.into();
        let title = title.into();
        non_blank(&site, "site")?;
        non_blank(&title, "title")?;
        Ok(Self {
            site,
            title,
            badges: Vec::new(),
        })
    }

    pub fn with_badges(mut self, badges: Vec<ItemId>) -> Self {
        self.badges = badges;
        self
    }

    pub(crate) fn removal(site: &str) -> Self {
        Self {
            site: site.to_string(),
            title: String::new(),
            badges: Vec::new(),
        }
    }

    pub(crate) fn site_key(link: &SiteLink) -> String {
        link.site.clone()
    }
}

/// Labels, descriptions and aliases of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    pub(crate) labels: IndexedList<String, Term>,
    pub(crate) descriptions: IndexedList<String, Term>,
    pub(crate) aliases: IndexedList<String, AliasGroup>,
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self {
            labels: IndexedList::new(Term::language_key),
            descriptions: IndexedList::new(Term::language_key),
            aliases: IndexedList::new(AliasGroup::language_key),
        }
    }
}

impl Fingerprint {
    pub fn label(&self, language: &str) -> Option<&str> {
        self.labels.get(&language.to_string()).map(|t| t.text.as_str())
    }

    pub fn description(&self, language: &str) -> Option<&str> {
        self.descriptions.get(&language.to_string()).map(|t| t.text.as_str())
    }

    /// Aliases in `language`, empty if there are none.
    pub fn aliases(&self, language: &str) -> &[String] {
        self.aliases
            .get(&language.to_string())
            .map(|g| g.aliases.as_slice())
            .unwrap_or(&[])
    }

    pub fn labels(&self) -> &IndexedList<String, Term> {
        &self.labels
    }

    pub fn descriptions(&self) -> &IndexedList<String, Term> {
        &self.descriptions
    }

    pub fn alias_groups(&self) -> &IndexedList<String, AliasGroup> {
        &self.aliases
    }

    /// Adds an alias; returns false if it was already present.
    pub(crate) fn add_alias(&mut self, language: &str, alias: &str) -> bool {
        let key = language.to_string();
        match self.aliases.get_mut(&key) {
            Some(group) if group.aliases.iter().any(|a| a == alias) => false,
            Some(group) => {
                group.aliases.push(alias.to_string());
                true
            }
            None => {
                self.aliases.set(AliasGroup {
                    language: key,
                    aliases: vec![alias.to_string()],
                });
                true
            }
        }
    }

    /// Removes an alias; returns false if it was absent.
    pub(crate) fn remove_alias(&mut self, language: &str, alias: &str) -> bool {
        let key = language.to_string();
        let Some(group) = self.aliases.get_mut(&key) else {
            return false;
        };
        let before = group.aliases.len();
        group.aliases.retain(|a| a != alias);
        let removed = group.aliases.len() != before;
        if group.aliases.is_empty() {
            self.aliases.remove(&key);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_term_rejects_blank() {
        assert_eq!(Term::new("", "x").unwrap_err().kind(), ErrorKind::Argument);
        assert_eq!(
            Term::new("en", "  ").unwrap_err(),
            Error::BlankArgument { argument: "value" }
        );
        assert_eq!(Term::new("en", "x").unwrap().text, "x");
    }

    #[test]
    fn test_sitelink_new() {
        let link = SiteLink::new("enwiki", "Berlin")
            .unwrap()
            .with_badges(vec![ItemId::new("Q17437796").unwrap()]);
        assert_eq!(link.badges.len(), 1);
        assert!(SiteLink::new("enwiki", "").is_err());
    }

    #[test]
    fn test_aliases_without_duplicates() {
        let mut fp = Fingerprint::default();
        assert!(fp.add_alias("en", "DNA"));
        assert!(!fp.add_alias("en", "DNA"));
        assert!(fp.add_alias("en", "Douglas Noel Adams"));
        assert_eq!(fp.aliases("en"), ["DNA", "Douglas Noel Adams"]);
        assert!(fp.aliases("de").is_empty());

        assert!(fp.remove_alias("en", "DNA"));
        assert!(!fp.remove_alias("en", "DNA"));
        assert!(fp.remove_alias("en", "Douglas Noel Adams"));
        assert!(fp.alias_groups().is_empty());
    }
}
