pub mod relationship;

pub use relationship::{
    pair_key, Relationship, RelationshipStatus, RelationshipWithUsers, UpdateRelationship,
};
