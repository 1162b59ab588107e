//! Typed ID aliases for the stored entities.

pub use super::id::Id;

/// Marker for rows in `users`.
pub struct User;

/// Marker for rows in `invites`.
pub struct Invite;

/// Marker for rows in `relationships`.
pub struct Relationship;

pub type UserId = Id<User>;
pub type InviteId = Id<Invite>;
pub type RelationshipId = Id<Relationship>;
