use serde::Serialize;
use tracing::debug;

use crate::common::phone::MIN_PHONE_LEN;
use crate::common::{normalize_phone, ApiError, ApiResult};
use crate::domains::relationships::{Relationship, RelationshipStatus};
use crate::domains::users::User;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub phone: String,
    /// Only verified users count as existing
    pub exists: bool,
    pub relationship_status: String,
    pub name: Option<String>,
}

/// Display label for a phone's status
pub fn relationship_label(user: Option<&User>, active: Option<RelationshipStatus>) -> &'static str {
    match (user, active) {
        (None, _) => "Unknown",
        (Some(u), _) if !u.verified => "Unknown",
        (Some(_), None) => "Single",
        (Some(_), Some(status)) => status.display_label(),
    }
}

/// Look up a phone number. Always returns a result, even for numbers nobody
/// has signed up with.
pub async fn search_user(phone_raw: Option<&str>, deps: &ServerDeps) -> ApiResult<SearchResult> {
    let raw = phone_raw
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("Phone number is required"))?;

    let phone = normalize_phone(raw);
    if phone.len() < MIN_PHONE_LEN {
        return Err(ApiError::validation("Invalid phone number format"));
    }

    let pool = &deps.db_pool;
    let user = User::find_by_phone(&phone, pool).await?;

    let active = match &user {
        Some(u) if u.verified => Relationship::latest_active_for_phone(&phone, pool)
            .await?
            .map(|r| r.status),
        _ => None,
    };

    debug!(found = user.is_some(), "User search");

    Ok(SearchResult {
        exists: user.as_ref().is_some_and(|u| u.verified),
        relationship_status: relationship_label(user.as_ref(), active).to_string(),
        name: user.and_then(|u| u.name),
        phone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::UserId;
    use chrono::Utc;

    fn user(verified: bool) -> User {
        User {
            id: UserId::new(),
            phone: "+15551234567".to_string(),
            name: None,
            verified,
            verification_code: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(relationship_label(None, None), "Unknown");
        assert_eq!(
            relationship_label(Some(&user(false)), Some(RelationshipStatus::Married)),
            "Unknown"
        );
        assert_eq!(relationship_label(Some(&user(true)), None), "Single");
        assert_eq!(
            relationship_label(Some(&user(true)), Some(RelationshipStatus::OnABreak)),
            "On a Break"
        );
    }
}
