// Mock implementations of kernel traits for tests.

use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use super::{BaseSmsService, SmsError};

// =============================================================================
// Mock SMS Service
// =============================================================================

/// Records every message instead of sending it.
#[derive(Clone, Default)]
pub struct MockSmsService {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail: Arc<AtomicBool>,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail with a provider error.
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All (phone, body) pairs sent so far
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Messages sent to one phone number, oldest first
    pub fn messages_to(&self, phone_number: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == phone_number)
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// The 4-digit code from the latest verification SMS to `phone_number`
    pub fn last_code_for(&self, phone_number: &str) -> Option<String> {
        self.messages_to(phone_number)
            .iter()
            .rev()
            .find_map(|body| {
                body.strip_prefix(crate::domains::auth::verification::CODE_MESSAGE_PREFIX)
                    .map(|code| code.trim().to_string())
            })
    }
}

#[async_trait]
impl BaseSmsService for MockSmsService {
    async fn send_sms(&self, phone_number: &str, body: &str) -> Result<(), SmsError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SmsError::Provider("mock failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((phone_number.to_string(), body.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_extracts_code() {
        let sms = MockSmsService::new();
        sms.send_sms("+15551234567", "Your Official verification code is: 4821")
            .await
            .unwrap();
        sms.send_sms("+15551234567", "someone invited you").await.unwrap();

        assert_eq!(sms.sent_messages().len(), 2);
        assert_eq!(sms.last_code_for("+15551234567").as_deref(), Some("4821"));
        assert_eq!(sms.last_code_for("+15550000000"), None);
    }

    #[tokio::test]
    async fn test_failure_toggle() {
        let sms = MockSmsService::new();
        sms.fail_sends(true);
        assert!(sms.send_sms("+15551234567", "x").await.is_err());
        assert!(sms.sent_messages().is_empty());
    }
}
