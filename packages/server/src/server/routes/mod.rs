// HTTP routes
pub mod auth;
pub mod health;
pub mod invites;
pub mod relationships;
pub mod search;
