//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use official_core::domains::users::User;
use rand::Rng;
use sqlx::PgPool;

use super::TestHarness;

/// A US number no other test will pick
pub fn unique_phone() -> String {
    format!("+1555{:07}", rand::thread_rng().gen_range(0..10_000_000))
}

/// Create a user that has completed verification
pub async fn create_verified_user(pool: &PgPool, phone: &str, name: Option<&str>) -> Result<User> {
    User::set_verification_code(phone, "0000", pool).await?;
    let user = User::mark_verified(
        User::find_by_phone(phone, pool)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user missing after insert"))?
            .id,
        pool,
    )
    .await?;

    match name {
        Some(name) => Ok(
            sqlx::query_as::<_, User>("UPDATE users SET name = $2 WHERE id = $1 RETURNING *")
                .bind(user.id)
                .bind(name)
                .fetch_one(pool)
                .await?,
        ),
        None => Ok(user),
    }
}

/// A verified user and a bearer token for them
pub async fn signed_in_user(ctx: &TestHarness, name: Option<&str>) -> Result<(User, String)> {
    let user = create_verified_user(&ctx.db_pool, &unique_phone(), name).await?;
    let token = ctx
        .deps
        .jwt_service
        .create_token(user.id, user.phone.clone())?;
    Ok((user, token))
}
