//! Invite actions for recipients who only have the link, not an app session
//!
//! Two ways to answer from the public page: `respond_public` trusts the link
//! alone, while `send_invite_verification` + `verify_and_accept` prove the
//! responder owns the recipient phone with an SMS code first.

use serde::Serialize;
use tracing::info;

use crate::common::{is_allowed_country, normalize_phone, ApiError, ApiResult, InviteId, UserId};
use crate::domains::auth::verification::{code_matches, issue_code};
use crate::domains::invites::models::{Invite, InviteDecision, InviteStatus};
use crate::domains::relationships::RelationshipWithUsers;
use crate::domains::users::User;
use crate::kernel::ServerDeps;

use super::lifecycle::{apply_decision, ensure_pending, lock_invite, INVITE_NOT_FOUND};
use super::queries::{get_active_invite, InviteDetails};

pub const PHONE_MISMATCH: &str = "Phone number does not match the invite recipient";

/// The recipient as seen by the public page
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub phone: String,
    pub verified: bool,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            phone: user.phone.clone(),
            verified: user.verified,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteStatusView {
    pub id: InviteId,
    pub status: InviteStatus,
}

impl From<&Invite> for InviteStatusView {
    fn from(invite: &Invite) -> Self {
        Self {
            id: invite.id,
            status: invite.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicDecisionOutcome {
    pub invite: InviteStatusView,
    pub user: PublicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipWithUsers>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifiedAcceptance {
    pub user: User,
    pub invite: Invite,
    pub relationship: RelationshipWithUsers,
}

/// Open invite for the public page, phones masked
pub async fn get_public_invite(invite_id: InviteId, deps: &ServerDeps) -> ApiResult<InviteDetails> {
    get_active_invite(invite_id, deps).await.map(InviteDetails::masked)
}

/// Accept or decline from the link alone. The recipient's user row is
/// created (unverified) if this is their first contact.
pub async fn respond_public(
    invite_id: InviteId,
    decision: InviteDecision,
    deps: &ServerDeps,
) -> ApiResult<PublicDecisionOutcome> {
    let mut tx = deps.db_pool.begin().await?;

    let invite = lock_invite(invite_id, &mut tx).await?;
    ensure_pending(&invite)?;

    let recipient = User::get_or_create(&invite.recipient_phone, &mut *tx).await?;
    let outcome = apply_decision(&invite, decision, &mut tx).await?;

    tx.commit().await?;

    info!(invite_id = %invite_id, decision = ?decision, "Public invite response recorded");

    Ok(PublicDecisionOutcome {
        invite: InviteStatusView::from(&outcome.invite),
        user: PublicUser::from(&recipient),
        relationship: outcome.relationship,
    })
}

/// Text a verification code to the invite's recipient. Returns the
/// normalized phone the code went to.
pub async fn send_invite_verification(
    invite_id: InviteId,
    phone_raw: Option<&str>,
    deps: &ServerDeps,
) -> ApiResult<String> {
    let phone = required_phone(phone_raw)?;

    let invite = Invite::find_by_id(invite_id, &deps.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found(INVITE_NOT_FOUND))?;
    ensure_pending(&invite)?;

    if phone == invite.sender_phone {
        return Err(ApiError::validation("You cannot accept your own invite"));
    }
    if phone != invite.recipient_phone {
        return Err(ApiError::validation(PHONE_MISMATCH));
    }
    if !is_allowed_country(&phone) {
        return Err(ApiError::UnsupportedRegion);
    }

    let issued = issue_code(&phone, deps).await?;
    Ok(issued.phone)
}

/// Check the SMS code, verify the recipient and accept, all in one
/// transaction
pub async fn verify_and_accept(
    invite_id: InviteId,
    phone_raw: Option<&str>,
    code: Option<&str>,
    deps: &ServerDeps,
) -> ApiResult<VerifiedAcceptance> {
    let phone = required_phone(phone_raw)?;
    let code = code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::validation("Verification code is required"))?;

    let mut tx = deps.db_pool.begin().await?;

    let invite = lock_invite(invite_id, &mut tx).await?;
    ensure_pending(&invite)?;

    if phone != invite.recipient_phone {
        return Err(ApiError::validation(PHONE_MISMATCH));
    }

    let user = User::find_by_phone_for_update(&phone, &mut *tx)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !code_matches(&user, code) {
        return Err(ApiError::InvalidCode);
    }

    let user = User::mark_verified(user.id, &mut *tx).await?;
    let outcome = apply_decision(&invite, InviteDecision::Accepted, &mut tx).await?;
    let relationship = outcome
        .relationship
        .ok_or_else(|| anyhow::anyhow!("accepted invite {} has no relationship", invite_id))?;

    tx.commit().await?;

    info!(invite_id = %invite_id, user_id = %user.id, "Invite verified and accepted");

    Ok(VerifiedAcceptance {
        user,
        invite: outcome.invite,
        relationship,
    })
}

fn required_phone(raw: Option<&str>) -> ApiResult<String> {
    raw.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(normalize_phone)
        .ok_or_else(|| ApiError::validation("Phone number is required"))
}
