//! Relationships domain - formation on invite acceptance, plus edit and query

pub mod actions;
pub mod models;

pub use actions::{edit_relationship, form_relationship, list_relationships, Formed, RelationshipPatch};
pub use models::{Relationship, RelationshipStatus, RelationshipWithUsers};
