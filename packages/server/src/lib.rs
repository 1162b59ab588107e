// Official - API Core
//
// Backend for phone-number-based relationship tracking: SMS code signup,
// relationship invites and the relationships they form.
//
// Business logic lives in domains/*/actions, SQL in domains/*/models.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
