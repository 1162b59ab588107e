//! Relationship actions
//!
//! `form_relationship` is only ever called from inside an invite transition's
//! transaction. Edit and list are driven by the HTTP layer.

mod edit;
mod form;
mod queries;

pub use edit::{edit_relationship, RelationshipPatch, NOT_FOUND_MESSAGE};
pub use form::{form_relationship, Formed};
pub use queries::list_relationships;
