//! Fetching entities through an [`Api`].

use serde_json::Value;
use tracing::debug;

use crate::api::{Api, EntitySelector};
use crate::codec::json::Fields;
use crate::error::Result;
use crate::model::{Entity, EntityId};

/// Loads entities by id or by sitelink.
pub struct EntityProvider<'a, A: Api + ?Sized> {
    api: &'a A,
}

impl<'a, A: Api + ?Sized> EntityProvider<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Fetches entities by id. Entities the server reports as missing are
    /// left out of the result.
    pub fn get_entities(&self, ids: &[EntityId], languages: &[String]) -> Result<Vec<Entity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .api
            .get_entities(&EntitySelector::Ids(ids.to_vec()), languages)?;
        parse_entities(&response)
    }

    /// Fetches one entity; None if it does not exist.
    pub fn get_entity(&self, id: &EntityId) -> Result<Option<Entity>> {
        Ok(self
            .get_entities(std::slice::from_ref(id), &[])?
            .into_iter()
            .next())
    }

    /// Fetches the items linked to the given pages.
    pub fn get_entities_from_sitelinks(
        &self,
        sites: &[String],
        titles: &[String],
        languages: &[String],
    ) -> Result<Vec<Entity>> {
        if sites.is_empty() || titles.is_empty() {
            return Ok(Vec::new());
        }
        let selector = EntitySelector::SiteLinks {
            sites: sites.to_vec(),
            titles: titles.to_vec(),
        };
        let response = self.api.get_entities(&selector, languages)?;
        parse_entities(&response)
    }

    /// Fetches the item linked to one page; None if there is none.
    pub fn get_entity_from_sitelink(&self, site: &str, title: &str) -> Result<Option<Entity>> {
        Ok(self
            .get_entities_from_sitelinks(&[site.to_string()], &[title.to_string()], &[])?
            .into_iter()
            .next())
    }
}

fn parse_entities(response: &Value) -> Result<Vec<Entity>> {
    let fields = Fields::new(response, "wbgetentities response")?;
    let Some(entities) = fields.opt_object("entities")? else {
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(entities.len());
    for (key, value) in entities {
        if value.get("missing").is_some() {
            debug!(entity = %key, "skipping missing entity");
            continue;
        }
        out.push(Entity::from_json(value)?);
    }
    Ok(out)
}
