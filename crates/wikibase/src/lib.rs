//! Wikibase: structured-data client for Wikidata-style knowledge bases.
//!
//! This crate models Wikibase entities in memory, tracks local edits as
//! pending changes and saves them through the MediaWiki action API.
//!
//! # Overview
//!
//! - **Entities** ([`Item`], [`Property`]) hold labels, descriptions,
//!   aliases, claims and (for items) sitelinks
//! - **Claims and statements** pair a main [`Snak`] with qualifiers; a
//!   statement also carries a [`Rank`] and [`Reference`]s
//! - **Change tracking**: setters record pending changes that
//!   [`EntityDocument::save`] turns into one `wbeditentity` call
//!
//! # Quick Start
//!
//! ```rust
//! use wikibase::{DataValue, EntityDocument, EntityId, Item, Snak};
//!
//! let mut item = Item::new();
//! item.core_mut().set_label("en", "Berlin")?;
//! item.core_mut().add_alias("en", "Berlin, Germany")?;
//!
//! let capital = EntityId::parse("Q5119")?;
//! let key = item
//!     .core_mut()
//!     .create_statement_for_snak(Snak::value("P31", DataValue::entity(&capital))?)?;
//! assert!(item.core().claim(&key).is_some());
//!
//! // Pending changes, as sent to `wbeditentity`.
//! let data = item.encode_changes();
//! assert_eq!(data["labels"]["en"]["value"], "Berlin");
//! # Ok::<(), wikibase::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`model`]: Identifiers, data values, snaks, claims and entities
//! - [`codec`]: JSON encoding/decoding of the wire format
//! - [`api`]: The action API seam, an HTTP-agnostic client and entity loading
//! - [`edit`]: Saving and deleting entities, claims and references
//! - [`error`]: Error types
//! - [`util`]: Hashing and temporary ids

pub mod api;
pub mod codec;
pub mod edit;
pub mod error;
pub mod model;
pub mod util;

// Re-export commonly used types at crate root
pub use api::{Api, ApiConfig, EditMeta, EntityProvider, EntitySelector, Transport, WikibaseApi};
pub use edit::{save_entity, ClaimHandle, ReferenceHandle};
pub use error::{Error, ErrorKind, Result};
pub use model::{
    CalendarModel, Claim, ClaimKind, DataValue, DataValueType, Entity, EntityCore, EntityDocument,
    EntityId, EntityIdValue, EntityType, Globe, GlobeCoordinateValue, Item, ItemId,
    MonolingualTextValue, Property, PropertyId, QuantityValue, Qualifier, Rank, Reference,
    SiteLink, Snak, SnakType, StringValue, Term, TimePrecision, TimeValue,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
