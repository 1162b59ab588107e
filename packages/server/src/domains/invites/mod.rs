//! Invites domain - proposals to record a relationship, and their lifecycle
//!
//! PENDING is the only open state; ACCEPTED, DECLINED and CANCELLED are final.
//! Acceptance forms the relationship in the same transaction.

pub mod actions;
pub mod models;

pub use models::{Invite, InviteDecision, InviteStatus, RelationshipType};
