//! Account views

use serde::Serialize;

use crate::common::{normalize_phone, ApiError, ApiResult, UserId};
use crate::domains::invites::Invite;
use crate::domains::relationships::{Relationship, RelationshipWithUsers};
use crate::domains::users::User;
use crate::kernel::ServerDeps;

/// The signed-in user with everything the home screen needs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(flatten)]
    pub user: User,
    pub relationships: Vec<RelationshipWithUsers>,
    pub sent_invites: Vec<Invite>,
}

/// What anyone may learn about a phone number's account
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: UserId,
    pub phone: String,
    pub name: Option<String>,
    pub verified: bool,
}

pub async fn get_current_user(user_id: UserId, deps: &ServerDeps) -> ApiResult<CurrentUser> {
    let pool = &deps.db_pool;

    let user = User::find_by_id(user_id, pool)
        .await?
        .filter(|u| u.verified)
        .ok_or_else(|| ApiError::not_found("User not found or is not verified"))?;

    let relationships = Relationship::find_for_user(user.id, pool).await?;
    let relationships = Relationship::with_users(relationships, pool).await?;
    let sent_invites = Invite::find_sent_by(&user.phone, pool).await?;

    Ok(CurrentUser {
        user,
        relationships,
        sent_invites,
    })
}

pub async fn get_public_profile(phone_raw: &str, deps: &ServerDeps) -> ApiResult<PublicProfile> {
    let phone = normalize_phone(phone_raw);

    let user = User::find_by_phone(&phone, &deps.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(PublicProfile {
        id: user.id,
        phone: user.phone,
        name: user.name,
        verified: user.verified,
    })
}
