//! Auth domain - phone + SMS code authentication
//!
//! Responsibilities:
//! - Issuing and checking one-time SMS codes
//! - Session/JWT token management

pub mod actions;
pub mod jwt;
pub mod verification;

pub use jwt::{Claims, JwtService};
