//! Search domain - look up anyone's relationship status by phone number

pub mod actions;

pub use actions::{relationship_label, search_user, SearchResult};
