// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseSmsService)

use async_trait::async_trait;
use thiserror::Error;

// =============================================================================
// SMS Service Trait (Infrastructure - outbound text messages)
// =============================================================================

#[derive(Debug, Error)]
pub enum SmsError {
    /// Credentials or sender number missing from the environment
    #[error("SMS provider is not configured")]
    NotConfigured,

    #[error("SMS provider rejected the message: {0}")]
    Provider(String),
}

#[async_trait]
pub trait BaseSmsService: Send + Sync {
    /// Send a text message to a normalized phone number
    async fn send_sms(&self, phone_number: &str, body: &str) -> Result<(), SmsError>;
}
