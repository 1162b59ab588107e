//! Signup / login code request

use serde::Serialize;
use tracing::info;

use crate::common::{is_allowed_country, normalize_phone, ApiError, ApiResult};
use crate::domains::auth::verification::issue_code;
use crate::kernel::ServerDeps;

/// Response for a code request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResult {
    pub message: &'static str,
    pub phone: String,
    pub is_existing_user: bool,
}

/// Start signup or login for a phone number by texting it a code.
///
/// The same flow serves both; only the message differs for users who have
/// verified before.
pub async fn send_otp(phone_raw: Option<&str>, deps: &ServerDeps) -> ApiResult<SendOtpResult> {
    let phone = phone_raw
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(normalize_phone)
        .ok_or_else(|| ApiError::validation("Phone number is required"))?;

    if !is_allowed_country(&phone) {
        return Err(ApiError::UnsupportedRegion);
    }

    let issued = issue_code(&phone, deps).await?;

    let message = if issued.was_verified {
        "Login verification code sent successfully"
    } else {
        "Verification code sent successfully"
    };

    info!(existing = issued.existed, "Signup code requested");

    Ok(SendOtpResult {
        message,
        phone: issued.phone,
        is_existing_user: issued.existed,
    })
}
