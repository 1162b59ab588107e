//! Invite query actions

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::{mask_phone, normalize_phone, ApiError, ApiResult, InviteId};
use crate::domains::invites::models::{
    Invite, InviteStatus, InviteWithSender, RelationshipType,
};
use crate::kernel::ServerDeps;

use super::lifecycle::{ensure_pending, INVITE_NOT_FOUND};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteLists {
    pub sent_invites: Vec<Invite>,
    pub received_invites: Vec<Invite>,
}

/// An open invite as shown to whoever holds its link
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteDetails {
    pub id: InviteId,
    pub sender_phone: String,
    pub sender_name: Option<String>,
    pub recipient_phone: String,
    pub relationship_type: RelationshipType,
    pub status: InviteStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<InviteWithSender> for InviteDetails {
    fn from(row: InviteWithSender) -> Self {
        let invite = row.invite;
        Self {
            id: invite.id,
            sender_phone: invite.sender_phone,
            sender_name: row.sender_name,
            recipient_phone: invite.recipient_phone,
            relationship_type: invite.relationship_type,
            status: invite.status,
            message: invite.message,
            created_at: invite.created_at,
        }
    }
}

impl InviteDetails {
    /// Hide all but the last four digits of both phones
    pub fn masked(self) -> Self {
        Self {
            sender_phone: mask_phone(&self.sender_phone),
            recipient_phone: mask_phone(&self.recipient_phone),
            ..self
        }
    }
}

/// Invites sent and received by `phone`, newest first
pub async fn list_invites(phone: &str, deps: &ServerDeps) -> ApiResult<InviteLists> {
    let phone = normalize_phone(phone);
    let pool = &deps.db_pool;

    Ok(InviteLists {
        sent_invites: Invite::find_sent_by(&phone, pool).await?,
        received_invites: Invite::find_received_by(&phone, pool).await?,
    })
}

/// A PENDING invite with its sender's name. Non-pending invites are reported
/// with their current status.
pub async fn get_active_invite(invite_id: InviteId, deps: &ServerDeps) -> ApiResult<InviteDetails> {
    let row = Invite::find_with_sender(invite_id, &deps.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found(INVITE_NOT_FOUND))?;

    ensure_pending(&row.invite)?;

    Ok(row.into())
}
