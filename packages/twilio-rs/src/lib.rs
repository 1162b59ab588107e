// Minimal client for the Twilio Programmable Messaging API.
// https://www.twilio.com/docs/messaging/api/message-resource#create-a-message-resource

use std::collections::HashMap;

pub mod models;
use reqwest::{header, Client};

use crate::models::{ErrorResponse, MessageResponse};

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 format, e.g. `+15005550006`
    pub from_number: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Twilio returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
    base_url: String,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host (local stubs, regional edges).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{base}/Accounts/{sid}/Messages.json",
            base = self.base_url,
            sid = self.options.account_sid
        )
    }

    /// Send a plain SMS to `recipient`.
    pub async fn send_sms(
        &self,
        recipient: &str,
        body: &str,
    ) -> Result<MessageResponse, TwilioError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("From", &self.options.from_number);
        form_body.insert("Body", body);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .headers(headers)
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&raw)
                .map(|e| e.message)
                .unwrap_or(raw);
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<MessageResponse>().await?)
    }
}
