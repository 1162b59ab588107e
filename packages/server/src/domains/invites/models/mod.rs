pub mod invite;

pub use invite::{
    Invite, InviteDecision, InviteStatus, InviteWithSender, RelationshipType, UnknownVariant,
};
