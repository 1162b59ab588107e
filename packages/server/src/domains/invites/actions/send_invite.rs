use serde::Deserialize;
use tracing::info;

use crate::common::phone::MIN_PHONE_LEN;
use crate::common::{is_unique_violation, normalize_phone, ApiError, ApiResult};
use crate::domains::invites::models::{Invite, RelationshipType};
use crate::kernel::ServerDeps;

use super::notification::notify_recipient;

/// Invite request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInvite {
    pub recipient_phone: Option<String>,
    pub relationship_type: Option<String>,
    pub message: Option<String>,
}

/// Send (or re-send) an invite from an authenticated sender.
///
/// A terminal invite to the same recipient is reopened rather than
/// duplicated. At most one PENDING invite may exist per pair of phones,
/// whichever side sent it.
pub async fn send_invite(
    sender_phone: &str,
    input: SendInvite,
    deps: &ServerDeps,
) -> ApiResult<Invite> {
    let (recipient_raw, type_raw) = match (input.recipient_phone, input.relationship_type) {
        (Some(r), Some(t)) if !r.trim().is_empty() && !t.trim().is_empty() => (r, t),
        _ => {
            return Err(ApiError::validation(
                "Recipient phone number and relationship type are required",
            ))
        }
    };

    let relationship_type: RelationshipType = type_raw
        .parse()
        .map_err(|_| ApiError::validation("Invalid relationship type"))?;

    let sender_phone = normalize_phone(sender_phone);
    let recipient_phone = normalize_phone(&recipient_raw);

    if recipient_phone.len() < MIN_PHONE_LEN {
        return Err(ApiError::validation("Invalid phone number format"));
    }
    if recipient_phone == sender_phone {
        return Err(ApiError::validation("Cannot send invite to yourself"));
    }

    let message = input
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    let pool = &deps.db_pool;

    if Invite::find_pending_between(&sender_phone, &recipient_phone, pool)
        .await?
        .is_some()
    {
        return Err(ApiError::AlreadyPending);
    }

    let invite = match Invite::upsert_pending(
        &sender_phone,
        &recipient_phone,
        relationship_type,
        message.as_deref(),
        pool,
    )
    .await
    {
        Ok(Some(invite)) => invite,
        // Lost a race with a concurrent send for the same pair
        Ok(None) => return Err(ApiError::AlreadyPending),
        Err(e) if is_unique_violation(&e) => return Err(ApiError::AlreadyPending),
        Err(e) => return Err(e.into()),
    };

    info!(
        invite_id = %invite.id,
        relationship_type = ?invite.relationship_type,
        "Invite sent"
    );

    notify_recipient(&invite, deps).await;

    Ok(invite)
}
