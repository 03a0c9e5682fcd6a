//! Data model types for Wikibase.
//!
//! This module contains the in-memory representation of Wikibase data:
//! - Identifiers (items, properties)
//! - Data values and snaks
//! - Claims, statements and references
//! - Entities with their terms, sitelinks and pending changes

pub mod changes;
pub mod claim;
pub mod entity;
pub mod id;
pub mod indexed;
pub mod snak;
pub mod term;
pub mod value;

pub use changes::{AliasAction, AliasChange, ClaimChanges, EntityChanges};
pub use claim::{Claim, ClaimKind, Qualifier, Rank, Reference, SnakGroup, StatementParts};
pub use entity::{ClaimGroup, Entity, EntityCore, EntityDocument, Item, Property};
pub use id::{EntityId, EntityType, ItemId, PropertyId};
pub use indexed::IndexedList;
pub use snak::{Snak, SnakType};
pub use term::{AliasGroup, Fingerprint, SiteLink, Term};
pub use value::{
    CalendarModel, DataValue, DataValueType, EntityIdValue, Globe, GlobeCoordinateValue,
    MonolingualTextValue, QuantityValue, StringValue, TimePrecision, TimeValue,
};
