//! Boundary to the remote MediaWiki action API.
//!
//! [`Api`] is the edit-action collaborator the save protocol talks to; it
//! takes already-encoded JSON and returns the decoded response object.
//! [`WikibaseApi`] implements it over a raw [`Transport`].

mod client;
mod provider;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{ApiConfig, WikibaseApi, ANONYMOUS_TOKEN, WIKIDATA_ENDPOINT};
pub use provider::EntityProvider;

use serde_json::Value;

use crate::error::Result;
use crate::model::{EntityId, EntityType, PropertyId, SnakType};

/// Raw HTTP transport. Implementations own headers, cookies and TLS.
pub trait Transport {
    /// Performs a GET request and returns the response body.
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<String>;

    /// Performs a form-encoded POST request and returns the response body.
    fn post(&self, url: &str, query: &[(String, String)], form: &[(String, String)])
        -> Result<String>;
}

/// Revision and summary attached to every edit action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditMeta<'a> {
    /// Revision the edit is based on; 0 sends none.
    pub base_revision: u64,
    pub summary: Option<&'a str>,
}

impl<'a> EditMeta<'a> {
    pub fn new(base_revision: u64, summary: Option<&'a str>) -> Self {
        Self {
            base_revision,
            summary,
        }
    }
}

/// Which entities to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitySelector {
    Ids(Vec<EntityId>),
    /// Pages on client sites; every site is combined with every title.
    SiteLinks { sites: Vec<String>, titles: Vec<String> },
}

/// Edit and read actions of the Wikibase API.
pub trait Api {
    /// `wbgetentities`; an empty `languages` slice fetches all languages.
    fn get_entities(&self, selector: &EntitySelector, languages: &[String]) -> Result<Value>;

    /// `wbeditentity` with `new`.
    fn create_entity(&self, entity_type: EntityType, data: &Value, meta: EditMeta<'_>)
        -> Result<Value>;

    /// `wbeditentity` with `id`.
    fn edit_entity(&self, id: &EntityId, data: &Value, meta: EditMeta<'_>) -> Result<Value>;

    /// `wbcreateclaim`; `value` is the encoded data value payload.
    fn create_claim(
        &self,
        entity: &EntityId,
        snak_type: SnakType,
        property: &PropertyId,
        value: Option<&Value>,
        meta: EditMeta<'_>,
    ) -> Result<Value>;

    /// `wbsetclaimvalue`.
    fn set_claim_value(
        &self,
        claim_id: &str,
        snak_type: SnakType,
        value: Option<&Value>,
        meta: EditMeta<'_>,
    ) -> Result<Value>;

    /// `wbremoveclaims`.
    fn remove_claims(&self, claim_ids: &[&str], meta: EditMeta<'_>) -> Result<Value>;

    /// `wbsetreference`; a None hash creates a new reference.
    fn set_reference(
        &self,
        statement_id: &str,
        snaks: &Value,
        snaks_order: &Value,
        reference_hash: Option<&str>,
        meta: EditMeta<'_>,
    ) -> Result<Value>;

    /// `wbremovereferences`.
    fn remove_references(&self, statement_id: &str, hashes: &[&str], meta: EditMeta<'_>)
        -> Result<Value>;
}

/// Reads `pageinfo.lastrevid` from an edit response.
pub fn response_revision(response: &Value) -> Option<u64> {
    response.pointer("/pageinfo/lastrevid").and_then(Value::as_u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_revision() {
        assert_eq!(response_revision(&json!({"pageinfo": {"lastrevid": 42}})), Some(42));
        assert_eq!(response_revision(&json!({"success": 1})), None);
    }
}
