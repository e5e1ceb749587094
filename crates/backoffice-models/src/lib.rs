//! Core data models for the staffing back-office.
//!
//! This crate provides the fundamental data types shared by the grid and
//! workflow crates: business entity types, the related-entity field catalog,
//! subscription events and the locally stored grid records.

pub mod builders;
pub mod catalog;
pub mod entity;
pub mod event;
pub mod field;
pub mod ids;
pub mod records;

// Re-export main types
pub use builders::EventBuilder;
pub use catalog::{CatalogError, FieldCatalog, RelatedFields};
pub use entity::{EntityType, UnknownEntityType};
pub use event::{EventType, SubscriptionEvent};
pub use field::{FieldExpr, FieldExprError};
pub use ids::{EventId, TraversalId};
pub use records::{Candidate, JobOrder};
