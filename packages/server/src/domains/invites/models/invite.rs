use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::common::InviteId;

// =============================================================================
// Enums
// =============================================================================

/// Invite status
///
/// `Pending` is the only non-terminal state. See [`InviteStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

impl InviteStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, InviteStatus::Pending)
    }

    /// The whole state machine: PENDING may move to any terminal state,
    /// nothing leaves a terminal state.
    pub fn can_transition_to(self, next: InviteStatus) -> bool {
        match (self, next) {
            (
                InviteStatus::Pending,
                InviteStatus::Accepted | InviteStatus::Declined | InviteStatus::Cancelled,
            ) => true,
            (InviteStatus::Pending, InviteStatus::Pending) => false,
            (InviteStatus::Accepted | InviteStatus::Declined | InviteStatus::Cancelled, _) => {
                false
            }
        }
    }
}

/// Kind of relationship an invite proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "relationship_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Dating,
    Married,
    Situationship,
}

impl RelationshipType {
    /// Lowercase word used in SMS copy
    pub fn as_phrase(self) -> &'static str {
        match self {
            RelationshipType::Dating => "dating partner",
            RelationshipType::Married => "spouse",
            RelationshipType::Situationship => "situationship",
        }
    }
}

/// The recipient's answer to an invite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InviteDecision {
    Accepted,
    Declined,
}

impl From<InviteDecision> for InviteStatus {
    fn from(decision: InviteDecision) -> Self {
        match decision {
            InviteDecision::Accepted => InviteStatus::Accepted,
            InviteDecision::Declined => InviteStatus::Declined,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized value: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for RelationshipType {
    type Err = UnknownVariant;

    /// Case-insensitive; surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DATING" => Ok(RelationshipType::Dating),
            "MARRIED" => Ok(RelationshipType::Married),
            "SITUATIONSHIP" => Ok(RelationshipType::Situationship),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl FromStr for InviteDecision {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACCEPTED" => Ok(InviteDecision::Accepted),
            "DECLINED" => Ok(InviteDecision::Declined),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InviteStatus::Pending => "PENDING",
            InviteStatus::Accepted => "ACCEPTED",
            InviteStatus::Declined => "DECLINED",
            InviteStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Model
// =============================================================================

/// Invite - a proposal from one phone to another to record a relationship
///
/// One row per ordered (sender, recipient) pair. Re-inviting after a terminal
/// outcome reopens the same row rather than inserting a new one.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: InviteId,
    pub sender_phone: String,
    pub recipient_phone: String,
    pub relationship_type: RelationshipType,
    pub status: InviteStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Invite joined with the sender's display name
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct InviteWithSender {
    #[sqlx(flatten)]
    pub invite: Invite,
    pub sender_name: Option<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Invite {
    pub async fn find_by_id<'e>(id: InviteId, executor: impl PgExecutor<'e>) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM invites WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Row-lock the invite for the rest of the transaction so concurrent
    /// responders serialize on it
    pub async fn find_by_id_for_update<'e>(
        id: InviteId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM invites WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    pub async fn find_with_sender<'e>(
        id: InviteId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<InviteWithSender>> {
        sqlx::query_as::<_, InviteWithSender>(
            r#"
            SELECT i.*, u.name AS sender_name
            FROM invites i
            LEFT JOIN users u ON u.phone = i.sender_phone
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Any PENDING invite between the two phones, in either direction
    pub async fn find_pending_between<'e>(
        phone_a: &str,
        phone_b: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM invites
            WHERE status = 'PENDING'
              AND ((sender_phone = $1 AND recipient_phone = $2)
                OR (sender_phone = $2 AND recipient_phone = $1))
            LIMIT 1
            "#,
        )
        .bind(phone_a)
        .bind(phone_b)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Insert a PENDING invite, or reopen the existing (sender, recipient) row
    /// if it is terminal.
    ///
    /// Returns `None` when the existing row is already PENDING. A PENDING row
    /// in the opposite direction surfaces as a unique violation.
    pub async fn upsert_pending<'e>(
        sender_phone: &str,
        recipient_phone: &str,
        relationship_type: RelationshipType,
        message: Option<&str>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO invites (id, sender_phone, recipient_phone, relationship_type, status, message)
            VALUES ($1, $2, $3, $4, 'PENDING', $5)
            ON CONFLICT ON CONSTRAINT invites_sender_recipient_key DO UPDATE
                SET status = 'PENDING',
                    relationship_type = EXCLUDED.relationship_type,
                    message = EXCLUDED.message,
                    updated_at = NOW()
                WHERE invites.status <> 'PENDING'
            RETURNING *
            "#,
        )
        .bind(InviteId::new())
        .bind(sender_phone)
        .bind(recipient_phone)
        .bind(relationship_type)
        .bind(message)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Write a new status. Callers check the transition first.
    pub async fn set_status<'e>(
        id: InviteId,
        status: InviteStatus,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE invites
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Invites sent by `phone`, newest first
    pub async fn find_sent_by<'e>(phone: &str, executor: impl PgExecutor<'e>) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM invites WHERE sender_phone = $1 ORDER BY created_at DESC",
        )
        .bind(phone)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Invites addressed to `phone`, newest first
    pub async fn find_received_by<'e>(
        phone: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM invites WHERE recipient_phone = $1 ORDER BY created_at DESC",
        )
        .bind(phone)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [InviteStatus; 4] = [
        InviteStatus::Pending,
        InviteStatus::Accepted,
        InviteStatus::Declined,
        InviteStatus::Cancelled,
    ];

    #[test]
    fn test_pending_moves_to_every_terminal_state() {
        for next in [
            InviteStatus::Accepted,
            InviteStatus::Declined,
            InviteStatus::Cancelled,
        ] {
            assert!(InviteStatus::Pending.can_transition_to(next));
        }
        assert!(!InviteStatus::Pending.can_transition_to(InviteStatus::Pending));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in ALL.into_iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_relationship_type_parse_is_case_insensitive() {
        assert_eq!("dating".parse(), Ok(RelationshipType::Dating));
        assert_eq!("Married".parse(), Ok(RelationshipType::Married));
        assert_eq!(" SITUATIONSHIP ".parse(), Ok(RelationshipType::Situationship));
        assert!("ENGAGED".parse::<RelationshipType>().is_err());
        assert!("".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!("accepted".parse(), Ok(InviteDecision::Accepted));
        assert_eq!("DECLINED".parse(), Ok(InviteDecision::Declined));
        assert!("CANCELLED".parse::<InviteDecision>().is_err());
        assert_eq!(
            InviteStatus::from(InviteDecision::Accepted),
            InviteStatus::Accepted
        );
    }

    #[test]
    fn test_enums_serialize_uppercase() {
        assert_eq!(
            serde_json::to_value(InviteStatus::Cancelled).unwrap(),
            "CANCELLED"
        );
        assert_eq!(
            serde_json::to_value(RelationshipType::Situationship).unwrap(),
            "SITUATIONSHIP"
        );
    }
}
