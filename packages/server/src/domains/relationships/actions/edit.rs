use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::common::{is_unique_violation, ApiError, ApiResult, RelationshipId, UserId};
use crate::domains::relationships::models::{
    Relationship, RelationshipStatus, RelationshipWithUsers, UpdateRelationship,
};
use crate::kernel::ServerDeps;

pub const NOT_FOUND_MESSAGE: &str =
    "Relationship not found or you don't have permission to edit it";

/// Editable fields. An explicit `"endDate": null` reopens an ended
/// relationship; an absent `endDate` leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipPatch {
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub end_date: Option<Option<DateTime<Utc>>>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DateTime<Utc>>::deserialize(deserializer).map(Some)
}

impl RelationshipPatch {
    fn into_update(self) -> ApiResult<UpdateRelationship> {
        let status = self
            .status
            .map(|raw| {
                raw.parse::<RelationshipStatus>()
                    .map_err(|_| ApiError::validation(format!("Invalid relationship status: {}", raw)))
            })
            .transpose()?;

        Ok(UpdateRelationship {
            status,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Update a relationship the caller takes part in
pub async fn edit_relationship(
    user_id: UserId,
    relationship_id: RelationshipId,
    patch: RelationshipPatch,
    deps: &ServerDeps,
) -> ApiResult<RelationshipWithUsers> {
    let changes = patch.into_update()?;
    let pool = &deps.db_pool;

    let existing = Relationship::find_for_participant(relationship_id, user_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))?;

    let updated = if changes.is_empty() {
        existing
    } else {
        Relationship::update(existing.id, &changes, pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict(
                        "An active relationship already exists between these users".to_string(),
                    )
                } else {
                    ApiError::Internal(e)
                }
            })?
    };

    info!(relationship_id = %updated.id, user_id = %user_id, "Relationship updated");

    Relationship::with_users(vec![updated], pool)
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))
}
