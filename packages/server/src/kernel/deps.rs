//! Server dependencies (using traits for testability)
//!
//! `ServerDeps` is the single container handed to every action. It is built
//! once in `build_app` and shared behind an `Arc`; tests build their own with
//! mock services.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use twilio::TwilioService;

use crate::domains::auth::JwtService;
use crate::kernel::{BaseSmsService, SmsError};

// =============================================================================
// TwilioService Adapter (implements BaseSmsService trait)
// =============================================================================

/// Wrapper around TwilioService that implements BaseSmsService.
///
/// Holds `None` when Twilio credentials are absent so the server still boots;
/// every send then fails with `SmsError::NotConfigured`.
pub struct TwilioAdapter(pub Option<Arc<TwilioService>>);

impl TwilioAdapter {
    pub fn new(service: Option<Arc<TwilioService>>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsService for TwilioAdapter {
    async fn send_sms(&self, phone_number: &str, body: &str) -> Result<(), SmsError> {
        let service = self.0.as_ref().ok_or(SmsError::NotConfigured)?;

        let message = service
            .send_sms(phone_number, body)
            .await
            .map_err(|e| SmsError::Provider(e.to_string()))?;

        tracing::debug!(sid = %message.sid, status = %message.status, "SMS queued");
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub sms: Arc<dyn BaseSmsService>,
    /// JWT service for token creation
    pub jwt_service: Arc<JwtService>,
    /// Base URL of the public invite page; invite ids are appended
    pub public_invite_url: Option<String>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        sms: Arc<dyn BaseSmsService>,
        jwt_service: Arc<JwtService>,
        public_invite_url: Option<String>,
    ) -> Self {
        Self {
            db_pool,
            sms,
            jwt_service,
            public_invite_url,
        }
    }
}
