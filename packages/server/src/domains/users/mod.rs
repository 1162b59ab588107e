//! Users domain - the identity store keyed by normalized phone number

pub mod models;

pub use models::{User, UserSummary};
