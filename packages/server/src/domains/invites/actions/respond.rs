use crate::common::{normalize_phone, ApiError, ApiResult, InviteId};
use crate::domains::invites::models::InviteDecision;
use crate::kernel::ServerDeps;

use super::lifecycle::{apply_decision, lock_invite, DecisionOutcome};

/// Accept or decline an invite as its authenticated recipient.
///
/// Runs in one transaction with the invite row locked, so of two concurrent
/// responses only the first sees a PENDING invite.
pub async fn respond_to_invite(
    invite_id: InviteId,
    responder_phone: &str,
    decision: InviteDecision,
    deps: &ServerDeps,
) -> ApiResult<DecisionOutcome> {
    let responder_phone = normalize_phone(responder_phone);
    let mut tx = deps.db_pool.begin().await?;

    let invite = lock_invite(invite_id, &mut tx).await?;

    if invite.recipient_phone != responder_phone {
        return Err(ApiError::forbidden("Not authorized to respond to this invite"));
    }

    let outcome = apply_decision(&invite, decision, &mut tx).await?;
    tx.commit().await?;

    Ok(outcome)
}
