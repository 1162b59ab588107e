//! Relationship formation
//!
//! Runs on the caller's transaction so an invite is never ACCEPTED without
//! its relationship (and vice versa).

use sqlx::PgConnection;
use tracing::{debug, info};

use crate::common::ApiResult;
use crate::domains::relationships::models::{pair_key, Relationship, RelationshipWithUsers};
use crate::domains::users::User;

/// Result of [`form_relationship`]
#[derive(Debug, Clone)]
pub struct Formed {
    pub relationship: RelationshipWithUsers,
    /// False when an active relationship for the pair already existed
    pub created: bool,
}

/// Ensure an active relationship exists between two normalized phones.
///
/// Both users are created (unverified) if missing. Idempotent: calling it
/// again for the same pair, in either order, returns the existing active
/// relationship.
pub async fn form_relationship(
    conn: &mut PgConnection,
    phone_a: &str,
    phone_b: &str,
) -> ApiResult<Formed> {
    // Sorted so concurrent formations lock user rows in the same order
    let (phone_a, phone_b) = if phone_a <= phone_b {
        (phone_a, phone_b)
    } else {
        (phone_b, phone_a)
    };
    let user_a = User::get_or_create(phone_a, &mut *conn).await?;
    let user_b = User::get_or_create(phone_b, &mut *conn).await?;
    let key = pair_key(&user_a.phone, &user_b.phone);

    let (relationship, created) = match Relationship::find_active_by_pair(&key, &mut *conn).await? {
        Some(existing) => {
            debug!(relationship_id = %existing.id, "Active relationship already exists");
            (existing, false)
        }
        None => match Relationship::insert_active(&key, &mut *conn).await? {
            Some(inserted) => {
                Relationship::link_users(inserted.id, &[user_a.id, user_b.id], &mut *conn)
                    .await?;
                info!(relationship_id = %inserted.id, "Relationship formed");
                (inserted, true)
            }
            None => {
                // Another transaction committed the pair between our read and insert
                let winner = Relationship::find_active_by_pair(&key, &mut *conn)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("active relationship vanished for {}", key))?;
                (winner, false)
            }
        },
    };

    let relationship = Relationship::with_users(vec![relationship], &mut *conn)
        .await?
        .pop()
        .ok_or_else(|| anyhow::anyhow!("relationship lost while loading participants"))?;

    Ok(Formed {
        relationship,
        created,
    })
}
