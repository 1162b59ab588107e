//! Relationship query actions

use crate::common::{ApiResult, UserId};
use crate::domains::relationships::models::{Relationship, RelationshipWithUsers};
use crate::kernel::ServerDeps;

/// Relationships the user takes part in, newest first, with participants
pub async fn list_relationships(
    user_id: UserId,
    deps: &ServerDeps,
) -> ApiResult<Vec<RelationshipWithUsers>> {
    let pool = &deps.db_pool;
    let relationships = Relationship::find_for_user(user_id, pool).await?;
    Ok(Relationship::with_users(relationships, pool).await?)
}
