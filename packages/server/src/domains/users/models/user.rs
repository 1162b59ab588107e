use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgExecutor;

use crate::common::UserId;

/// User model - one row per normalized phone number
///
/// Rows are created on the first signup attempt, or unverified when someone
/// accepts an invite from the public page before ever opening the app.
/// `verification_code` is only set while a code challenge is outstanding and
/// is never serialized.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub phone: String,
    pub name: Option<String>,
    pub verified: bool,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The participant view embedded in relationship payloads.
#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub phone: String,
    pub name: Option<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    pub async fn find_by_id<'e>(id: UserId, executor: impl PgExecutor<'e>) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Find user by normalized phone
    pub async fn find_by_phone<'e>(
        phone: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Same as `find_by_phone` but row-locks the user until the transaction ends
    pub async fn find_by_phone_for_update<'e>(
        phone: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE phone = $1 FOR UPDATE")
            .bind(phone)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Store a fresh verification code, creating an unverified user if the
    /// phone is new. Any previous outstanding code is overwritten.
    pub async fn set_verification_code<'e>(
        phone: &str,
        code: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (id, phone, verified, verification_code)
            VALUES ($1, $2, FALSE, $3)
            ON CONFLICT (phone) DO UPDATE
                SET verification_code = EXCLUDED.verification_code,
                    updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(UserId::new())
        .bind(phone)
        .bind(code)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Return the user for `phone`, inserting an unverified row if needed
    pub async fn get_or_create<'e>(phone: &str, executor: impl PgExecutor<'e>) -> Result<Self> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        // It leaves key columns alone so the row lock stays compatible with
        // foreign keys from relationship_users.
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (id, phone, verified)
            VALUES ($1, $2, FALSE)
            ON CONFLICT (phone) DO UPDATE SET updated_at = users.updated_at
            RETURNING *
            "#,
        )
        .bind(UserId::new())
        .bind(phone)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Flip `verified` and clear the outstanding code
    pub async fn mark_verified<'e>(id: UserId, executor: impl PgExecutor<'e>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE users
            SET verified = TRUE, verification_code = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }
}
