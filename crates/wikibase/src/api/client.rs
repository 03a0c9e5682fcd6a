//! [`Api`] over the MediaWiki action API.

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{Api, EditMeta, EntitySelector, Transport};
use crate::error::{Error, Result};
use crate::model::{EntityId, EntityType, PropertyId, SnakType};

/// Action API endpoint of Wikidata.
pub const WIKIDATA_ENDPOINT: &str = "https://www.wikidata.org/w/api.php";

/// Edit token accepted for anonymous edits.
pub const ANONYMOUS_TOKEN: &str = "+\\";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// URL of `api.php`.
    pub endpoint: String,
    /// CSRF token for edits; the anonymous token is used when unset.
    pub edit_token: Option<String>,
    /// Flag edits as bot edits.
    pub bot_edits: bool,
    /// `maxlag` sent with every request, in seconds.
    pub max_lag: Option<u32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: WIKIDATA_ENDPOINT.to_string(),
            edit_token: None,
            bot_edits: false,
            max_lag: None,
        }
    }
}

type Params = Vec<(String, String)>;

fn param(name: &str, value: impl Into<String>) -> (String, String) {
    (name.to_string(), value.into())
}

/// Wikibase API client over a [`Transport`].
#[derive(Debug)]
pub struct WikibaseApi<T> {
    transport: T,
    config: ApiConfig,
}

impl<T: Transport> WikibaseApi<T> {
    pub fn new(transport: T, config: ApiConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Sets the token used for subsequent edits.
    pub fn set_edit_token(&mut self, token: impl Into<String>) {
        self.config.edit_token = Some(token.into());
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn query(&self, action: &str) -> Params {
        let mut query = vec![param("action", action), param("format", "json")];
        if let Some(lag) = self.config.max_lag {
            query.push(param("maxlag", lag.to_string()));
        }
        query
    }

    /// Performs a read action.
    fn read(&self, action: &str, params: Params) -> Result<Value> {
        let mut query = self.query(action);
        query.extend(params);
        debug!(action, endpoint = %self.config.endpoint, "api read");
        let body = self.transport.get(&self.config.endpoint, &query)?;
        parse_response(&body)
    }

    /// Performs an edit action, adding token, base revision, summary and
    /// bot flag to the form.
    fn edit(&self, action: &str, mut form: Params, meta: EditMeta<'_>) -> Result<Value> {
        let token = self.config.edit_token.as_deref().unwrap_or(ANONYMOUS_TOKEN);
        form.push(param("token", token));
        if meta.base_revision > 0 {
            form.push(param("baserevid", meta.base_revision.to_string()));
        }
        if let Some(summary) = meta.summary {
            form.push(param("summary", summary));
        }
        if self.config.bot_edits {
            form.push(param("bot", "1"));
        }
        debug!(
            action,
            base_revision = meta.base_revision,
            bot = self.config.bot_edits,
            "api edit"
        );
        let body = self
            .transport
            .post(&self.config.endpoint, &self.query(action), &form)?;
        parse_response(&body)
    }
}

/// Parses a response body, surfacing an `error` object as [`Error::Api`].
pub(crate) fn parse_response(body: &str) -> Result<Value> {
    let response: Value = serde_json::from_str(body)?;
    if let Some(error) = response.get("error") {
        let field = |name: &str| {
            error
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        return Err(Error::Api {
            code: field("code"),
            info: field("info"),
        });
    }
    if let Some(warnings) = response.get("warnings") {
        warn!(%warnings, "api returned warnings");
    }
    Ok(response)
}

fn encode_value(value: Option<&Value>) -> Option<(String, String)> {
    value.map(|v| param("value", v.to_string()))
}

impl<T: Transport> Api for WikibaseApi<T> {
    fn get_entities(&self, selector: &EntitySelector, languages: &[String]) -> Result<Value> {
        let mut params = Vec::new();
        match selector {
            EntitySelector::Ids(ids) => {
                let ids: Vec<&str> = ids.iter().map(EntityId::serialization).collect();
                params.push(param("ids", ids.join("|")));
            }
            EntitySelector::SiteLinks { sites, titles } => {
                params.push(param("sites", sites.join("|")));
                params.push(param("titles", titles.join("|")));
            }
        }
        if !languages.is_empty() {
            params.push(param("languages", languages.join("|")));
        }
        self.read("wbgetentities", params)
    }

    fn create_entity(
        &self,
        entity_type: EntityType,
        data: &Value,
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        let form = vec![param("new", entity_type.as_str()), param("data", data.to_string())];
        self.edit("wbeditentity", form, meta)
    }

    fn edit_entity(&self, id: &EntityId, data: &Value, meta: EditMeta<'_>) -> Result<Value> {
        let form = vec![param("id", id.serialization()), param("data", data.to_string())];
        self.edit("wbeditentity", form, meta)
    }

    fn create_claim(
        &self,
        entity: &EntityId,
        snak_type: SnakType,
        property: &PropertyId,
        value: Option<&Value>,
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        let mut form = vec![
            param("entity", entity.serialization()),
            param("snaktype", snak_type.as_str()),
            param("property", property.serialization()),
        ];
        form.extend(encode_value(value));
        self.edit("wbcreateclaim", form, meta)
    }

    fn set_claim_value(
        &self,
        claim_id: &str,
        snak_type: SnakType,
        value: Option<&Value>,
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        let mut form = vec![param("claim", claim_id), param("snaktype", snak_type.as_str())];
        form.extend(encode_value(value));
        self.edit("wbsetclaimvalue", form, meta)
    }

    fn remove_claims(&self, claim_ids: &[&str], meta: EditMeta<'_>) -> Result<Value> {
        self.edit("wbremoveclaims", vec![param("claim", claim_ids.join("|"))], meta)
    }

    fn set_reference(
        &self,
        statement_id: &str,
        snaks: &Value,
        snaks_order: &Value,
        reference_hash: Option<&str>,
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        let mut form = vec![
            param("statement", statement_id),
            param("snaks", snaks.to_string()),
            param("snaks-order", snaks_order.to_string()),
        ];
        if let Some(hash) = reference_hash {
            form.push(param("reference", hash));
        }
        self.edit("wbsetreference", form, meta)
    }

    fn remove_references(
        &self,
        statement_id: &str,
        hashes: &[&str],
        meta: EditMeta<'_>,
    ) -> Result<Value> {
        let form = vec![param("statement", statement_id), param("references", hashes.join("|"))];
        self.edit("wbremovereferences", form, meta)
    }
}
