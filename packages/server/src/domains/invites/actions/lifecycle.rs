//! Shared pieces of the invite state machine

use serde::Serialize;
use sqlx::PgConnection;
use tracing::info;

use crate::common::{ApiError, ApiResult, InviteId};
use crate::domains::invites::models::{Invite, InviteDecision, InviteStatus};
use crate::domains::relationships::{form_relationship, RelationshipWithUsers};

pub const INVITE_NOT_FOUND: &str = "Invite not found";

/// Invite after a decision, plus the relationship when it was accepted
#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutcome {
    pub invite: Invite,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipWithUsers>,
}

/// Parse an invite id from a request. A well-formed id that is not a UUID
/// cannot exist, so it reads as not found.
pub fn parse_invite_id(raw: Option<&str>) -> ApiResult<InviteId> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Invite ID is required"))?;

    InviteId::parse(raw).map_err(|_| ApiError::not_found(INVITE_NOT_FOUND))
}

pub fn parse_decision(raw: Option<&str>) -> ApiResult<InviteDecision> {
    let raw = raw.ok_or_else(|| ApiError::validation("Response is required"))?;
    raw.parse()
        .map_err(|_| ApiError::validation("Invalid response. Must be ACCEPTED or DECLINED"))
}

pub fn decision_message(decision: InviteDecision) -> &'static str {
    match decision {
        InviteDecision::Accepted => {
            "Relationship confirmed successfully! You are now officially connected."
        }
        InviteDecision::Declined => "Invite declined successfully.",
    }
}

/// Lock the invite row for the rest of the transaction
pub(super) async fn lock_invite(id: InviteId, conn: &mut PgConnection) -> ApiResult<Invite> {
    Invite::find_by_id_for_update(id, &mut *conn)
        .await?
        .ok_or_else(|| ApiError::not_found(INVITE_NOT_FOUND))
}

pub(super) fn ensure_pending(invite: &Invite) -> ApiResult<()> {
    if invite.status.is_terminal() {
        return Err(ApiError::InviteNotActive(invite.status));
    }
    Ok(())
}

/// The only place invite status is written after creation
pub(super) async fn transition(
    invite: &Invite,
    next: InviteStatus,
    conn: &mut PgConnection,
) -> ApiResult<Invite> {
    if !invite.status.can_transition_to(next) {
        return Err(ApiError::InviteNotActive(invite.status));
    }

    let updated = Invite::set_status(invite.id, next, &mut *conn).await?;

    info!(
        invite_id = %invite.id,
        from = %invite.status,
        to = %next,
        "Invite status changed"
    );

    Ok(updated)
}

/// Record the recipient's decision and, on acceptance, form the relationship
/// on the same connection
pub(super) async fn apply_decision(
    invite: &Invite,
    decision: InviteDecision,
    conn: &mut PgConnection,
) -> ApiResult<DecisionOutcome> {
    let updated = transition(invite, decision.into(), &mut *conn).await?;

    let relationship = match decision {
        InviteDecision::Accepted => Some(
            form_relationship(&mut *conn, &invite.sender_phone, &invite.recipient_phone)
                .await?
                .relationship,
        ),
        InviteDecision::Declined => None,
    };

    Ok(DecisionOutcome {
        invite: updated,
        relationship,
    })
}
