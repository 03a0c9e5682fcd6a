//! Recording test doubles for [`Api`] and [`Transport`].

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::api::{Api, EditMeta, EntitySelector, Transport};
use crate::error::Result;
use crate::model::{EntityId, EntityType, PropertyId, SnakType};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub form: Option<Vec<(String, String)>>,
}

/// Transport answering every request with a fixed body.
#[derive(Debug, Default)]
pub struct MockTransport {
    body: String,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn with_body(body: &str) -> Self {
        Self {
            body: body.to_string(),
            requests: RefCell::default(),
        }
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<String> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            query: query.to_vec(),
            form: None,
        });
        Ok(self.body.clone())
    }

    fn post(
        &self,
        url: &str,
        query: &[(String, String)],
        form: &[(String, String)],
    ) -> Result<String> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            query: query.to_vec(),
            form: Some(form.to_vec()),
        });
        Ok(self.body.clone())
    }
}

/// One recorded [`Api`] call: the action name and its arguments as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub action: &'static str,
    pub args: Value,
}

/// Api double replaying queued responses and recording calls.
///
/// When the queue is empty every call answers `{"success": 1}`.
#[derive(Debug, Default)]
pub struct MockApi {
    responses: RefCell<VecDeque<Result<Value>>>,
    calls: RefCell<Vec<Call>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: Value) -> &Self {
        self.responses.borrow_mut().push_back(Ok(response));
        self
    }

    pub fn fail(&self, error: crate::error::Error) -> &Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, action: &'static str, args: Value) -> Result<Value> {
        self.calls.borrow_mut().push(Call { action, args });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({"success": 1})))
    }
}

fn meta_json(meta: EditMeta<'_>) -> Value {
    json!({"baserevid": meta.base_revision, "summary": meta.summary})
}

impl Api for MockApi {
    fn get_entities(&self, selector: &EntitySelector, languages: &[String]) -> Result<Value> {
        let selector = match selector {
            EntitySelector::Ids(ids) => {
                json!({"ids": ids.iter().map(|id| id.serialization()).collect::<Vec<_>>()})
            }
            EntitySelector::SiteLinks { sites, titles } => json!({"sites": sites, "titles": titles}),
        };
        self.record("wbgetentities", json!({"selector": selector, "languages": languages}))
    }

    fn create_entity(
        &self,
        entity_type: EntityType,
        data: &Value,
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        self.record(
            "wbeditentity",
            json!({"new": entity_type.as_str(), "data": data, "meta": meta_json(meta)}),
        )
    }

    fn edit_entity(&self, id: &EntityId, data: &Value, meta: EditMeta<'_>) -> Result<Value> {
        self.record(
            "wbeditentity",
            json!({"id": id.serialization(), "data": data, "meta": meta_json(meta)}),
        )
    }

    fn create_claim(
        &self,
        entity: &EntityId,
        snak_type: SnakType,
        property: &PropertyId,
        value: Option<&Value>,
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        self.record(
            "wbcreateclaim",
            json!({
                "entity": entity.serialization(),
                "snaktype": snak_type.as_str(),
                "property": property.serialization(),
                "value": value,
                "meta": meta_json(meta),
            }),
        )
    }

    fn set_claim_value(
        &self,
        claim_id: &str,
        snak_type: SnakType,
        value: Option<&Value>,
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        self.record(
            "wbsetclaimvalue",
            json!({
                "claim": claim_id,
                "snaktype": snak_type.as_str(),
                "value": value,
                "meta": meta_json(meta),
            }),
        )
    }

    fn remove_claims(&self, claim_ids: &[&str], meta: EditMeta<'_>) -> Result<Value> {
        self.record("wbremoveclaims", json!({"claims": claim_ids, "meta": meta_json(meta)}))
    }

    fn set_reference(
        &self,
        statement_id: &str,
        snaks: &Value,
        snaks_order: &Value,
        reference_hash: Option<&str>,
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        self.record(
            "wbsetreference",
            json!({
                "statement": statement_id,
                "snaks": snaks,
                "snaks-order": snaks_order,
                "reference": reference_hash,
                "meta": meta_json(meta),
            }),
        )
    }

    fn remove_references(
        &self,
        statement_id: &str,
        hashes: &[&str],
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        self.record(
            "wbremovereferences",
            json!({"statement": statement_id, "references": hashes, "meta": meta_json(meta)}),
        )
    }
}
