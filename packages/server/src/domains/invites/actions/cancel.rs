use crate::common::{normalize_phone, ApiError, ApiResult, InviteId};
use crate::domains::invites::models::{Invite, InviteStatus};
use crate::kernel::ServerDeps;

use super::lifecycle::{lock_invite, transition};

/// Withdraw a PENDING invite. Only its sender may do this.
pub async fn cancel_invite(
    invite_id: InviteId,
    caller_phone: &str,
    deps: &ServerDeps,
) -> ApiResult<Invite> {
    let caller_phone = normalize_phone(caller_phone);
    let mut tx = deps.db_pool.begin().await?;

    let invite = lock_invite(invite_id, &mut tx).await?;

    if invite.sender_phone != caller_phone {
        return Err(ApiError::forbidden("Not authorized to cancel this invite"));
    }

    let cancelled = transition(&invite, InviteStatus::Cancelled, &mut tx).await?;
    tx.commit().await?;

    Ok(cancelled)
}
