// Business domains
pub mod auth;
pub mod invites;
pub mod relationships;
pub mod search;
pub mod users;
