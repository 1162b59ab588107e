use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::collections::HashMap;
use std::str::FromStr;

use crate::common::{RelationshipId, UserId};
use crate::domains::invites::models::UnknownVariant;
use crate::domains::users::UserSummary;

/// Relationship status as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "relationship_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipStatus {
    Dating,
    Engaged,
    Married,
    Separated,
    Widowed,
    Situationship,
    FriendsWithBenefits,
    OnABreak,
    OpenRelationship,
    Polyamorous,
}

impl RelationshipStatus {
    /// Human label shown in search results
    pub fn display_label(self) -> &'static str {
        match self {
            RelationshipStatus::Dating => "Dating",
            RelationshipStatus::Engaged => "Engaged",
            RelationshipStatus::Married => "Married",
            RelationshipStatus::Separated => "Separated",
            RelationshipStatus::Widowed => "Widowed",
            RelationshipStatus::Situationship => "Situationship",
            RelationshipStatus::FriendsWithBenefits => "Friends with Benefits",
            RelationshipStatus::OnABreak => "On a Break",
            RelationshipStatus::OpenRelationship => "Open Relationship",
            RelationshipStatus::Polyamorous => "Polyamorous",
        }
    }
}

impl FromStr for RelationshipStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DATING" => Ok(RelationshipStatus::Dating),
            "ENGAGED" => Ok(RelationshipStatus::Engaged),
            "MARRIED" => Ok(RelationshipStatus::Married),
            "SEPARATED" => Ok(RelationshipStatus::Separated),
            "WIDOWED" => Ok(RelationshipStatus::Widowed),
            "SITUATIONSHIP" => Ok(RelationshipStatus::Situationship),
            "FRIENDS_WITH_BENEFITS" => Ok(RelationshipStatus::FriendsWithBenefits),
            "ON_A_BREAK" => Ok(RelationshipStatus::OnABreak),
            "OPEN_RELATIONSHIP" => Ok(RelationshipStatus::OpenRelationship),
            "POLYAMOROUS" => Ok(RelationshipStatus::Polyamorous),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Relationship between exactly two users
///
/// Active while `end_date` is NULL. `pair_key` identifies the pair regardless
/// of order and backs the one-active-per-pair index.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: RelationshipId,
    pub status: RelationshipStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub pair_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Relationship plus its participants, as returned over the API
#[derive(Serialize, Debug, Clone)]
pub struct RelationshipWithUsers {
    #[serde(flatten)]
    pub relationship: Relationship,
    pub users: Vec<UserSummary>,
}

#[derive(sqlx::FromRow)]
struct ParticipantRow {
    relationship_id: RelationshipId,
    #[sqlx(flatten)]
    user: UserSummary,
}

/// Order-independent key for a pair of normalized phones
pub fn pair_key(phone_a: &str, phone_b: &str) -> String {
    if phone_a <= phone_b {
        format!("{}:{}", phone_a, phone_b)
    } else {
        format!("{}:{}", phone_b, phone_a)
    }
}

/// Field changes for [`Relationship::update`]. `None` leaves a column alone;
/// `end_date: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateRelationship {
    pub status: Option<RelationshipStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateRelationship {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Relationship {
    pub async fn find_active_by_pair<'e>(
        pair_key: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM relationships WHERE pair_key = $1 AND end_date IS NULL",
        )
        .bind(pair_key)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Insert a new active DATING relationship. Returns `None` if an active
    /// one for the pair already exists.
    pub async fn insert_active<'e>(
        pair_key: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO relationships (id, status, start_date, end_date, pair_key)
            VALUES ($1, 'DATING', NOW(), NULL, $2)
            ON CONFLICT (pair_key) WHERE end_date IS NULL DO NOTHING
            RETURNING *
            "#,
        )
        .bind(RelationshipId::new())
        .bind(pair_key)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn link_users<'e>(
        id: RelationshipId,
        user_ids: &[UserId],
        executor: impl PgExecutor<'e>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO relationship_users (relationship_id, user_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(user_ids)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// All relationships `user_id` takes part in, newest first
    pub async fn find_for_user<'e>(
        user_id: UserId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT r.*
            FROM relationships r
            JOIN relationship_users ru ON ru.relationship_id = r.id
            WHERE ru.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// The relationship, only if `user_id` is one of its participants
    pub async fn find_for_participant<'e>(
        id: RelationshipId,
        user_id: UserId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT r.*
            FROM relationships r
            JOIN relationship_users ru ON ru.relationship_id = r.id
            WHERE r.id = $1 AND ru.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Most recently created active relationship involving `phone`
    pub async fn latest_active_for_phone<'e>(
        phone: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT r.*
            FROM relationships r
            JOIN relationship_users ru ON ru.relationship_id = r.id
            JOIN users u ON u.id = ru.user_id
            WHERE u.phone = $1 AND r.end_date IS NULL
            ORDER BY r.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(phone)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Apply `changes`. Clearing `end_date` while the pair already has another
    /// active relationship fails with a unique violation.
    pub async fn update<'e>(
        id: RelationshipId,
        changes: &UpdateRelationship,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE relationships
            SET status = COALESCE($2, status),
                start_date = COALESCE($3, start_date),
                end_date = CASE WHEN $4 THEN $5 ELSE end_date END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.status)
        .bind(changes.start_date)
        .bind(changes.end_date.is_some())
        .bind(changes.end_date.flatten())
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Load participants for each relationship, preserving input order
    pub async fn with_users<'e>(
        relationships: Vec<Self>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<RelationshipWithUsers>> {
        if relationships.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<RelationshipId> = relationships.iter().map(|r| r.id).collect();

        let rows = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT ru.relationship_id, u.id, u.phone, u.name
            FROM relationship_users ru
            JOIN users u ON u.id = ru.user_id
            WHERE ru.relationship_id = ANY($1)
            ORDER BY u.phone
            "#,
        )
        .bind(&ids)
        .fetch_all(executor)
        .await?;

        let mut by_relationship: HashMap<RelationshipId, Vec<UserSummary>> = HashMap::new();
        for row in rows {
            by_relationship
                .entry(row.relationship_id)
                .or_default()
                .push(row.user);
        }

        Ok(relationships
            .into_iter()
            .map(|relationship| {
                let users = by_relationship.remove(&relationship.id).unwrap_or_default();
                RelationshipWithUsers {
                    relationship,
                    users,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_ignores_order() {
        assert_eq!(
            pair_key("+15551234567", "+447700900123"),
            pair_key("+447700900123", "+15551234567")
        );
        assert_eq!(
            pair_key("+447700900123", "+15551234567"),
            "+15551234567:+447700900123"
        );
    }

    #[test]
    fn test_status_parse_and_labels() {
        assert_eq!(
            "friends_with_benefits".parse(),
            Ok(RelationshipStatus::FriendsWithBenefits)
        );
        assert_eq!("On_A_Break".parse(), Ok(RelationshipStatus::OnABreak));
        assert!("SINGLE".parse::<RelationshipStatus>().is_err());

        assert_eq!(RelationshipStatus::OnABreak.display_label(), "On a Break");
        assert_eq!(
            RelationshipStatus::FriendsWithBenefits.display_label(),
            "Friends with Benefits"
        );
    }

    #[test]
    fn test_status_serializes_as_stored() {
        assert_eq!(
            serde_json::to_value(RelationshipStatus::OpenRelationship).unwrap(),
            "OPEN_RELATIONSHIP"
        );
    }

    #[test]
    fn test_update_emptiness() {
        assert!(UpdateRelationship::default().is_empty());
        let clear_end = UpdateRelationship {
            end_date: Some(None),
            ..Default::default()
        };
        assert!(!clear_end.is_empty());
    }

    #[test]
    fn test_pair_key_is_not_serialized() {
        let relationship = Relationship {
            id: RelationshipId::new(),
            status: RelationshipStatus::Dating,
            start_date: Utc::now(),
            end_date: None,
            pair_key: "+1:+2".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let with_users = RelationshipWithUsers {
            relationship,
            users: vec![],
        };

        let json = serde_json::to_value(&with_users).unwrap();
        assert!(json.get("pairKey").is_none());
        assert_eq!(json["status"], "DATING");
        assert!(json["endDate"].is_null());
        assert!(json["users"].as_array().unwrap().is_empty());
    }
}
