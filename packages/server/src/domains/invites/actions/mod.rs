//! Invite actions
//!
//! Every state change locks the invite row (`SELECT ... FOR UPDATE`) inside a
//! transaction and goes through `lifecycle::transition`.

mod cancel;
mod lifecycle;
mod notification;
mod public;
mod queries;
mod respond;
mod send_invite;

pub use cancel::cancel_invite;
pub use lifecycle::{decision_message, parse_decision, parse_invite_id, DecisionOutcome};
pub use public::{
    get_public_invite, respond_public, send_invite_verification, verify_and_accept,
    PublicDecisionOutcome, VerifiedAcceptance,
};
pub use queries::{get_active_invite, list_invites, InviteDetails, InviteLists};
pub use respond::respond_to_invite;
pub use send_invite::{send_invite, SendInvite};
