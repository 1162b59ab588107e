//! One-time SMS codes for login/signup and for accepting invites from the
//! public web page.
//!
//! The code is written to the user row *before* the SMS goes out. If the send
//! fails the caller gets a delivery error, but the stored code stays valid
//! until the next `issue_code` overwrites it.

use rand::Rng;
use tracing::info;

use crate::common::{is_allowed_country, ApiError, ApiResult};
use crate::domains::users::User;
use crate::kernel::ServerDeps;

/// Every verification SMS starts with this, followed by the code
pub const CODE_MESSAGE_PREFIX: &str = "Your Official verification code is:";

/// Outcome of issuing a code
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub phone: String,
    /// A user row existed before this call
    pub existed: bool,
    /// The existing user had already completed verification once
    pub was_verified: bool,
}

/// Uniform 4-digit code. Codes are per-phone and single-use, so collisions
/// between users do not matter.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

/// Generate a code, persist it on the user (creating the user if needed) and
/// text it to `phone`. `phone` must already be normalized.
pub async fn issue_code(phone: &str, deps: &ServerDeps) -> ApiResult<IssuedCode> {
    if !is_allowed_country(phone) {
        return Err(ApiError::UnsupportedRegion);
    }

    let existing = User::find_by_phone(phone, &deps.db_pool).await?;
    let code = generate_code();

    User::set_verification_code(phone, &code, &deps.db_pool).await?;

    deps.sms
        .send_sms(phone, &format!("{} {}", CODE_MESSAGE_PREFIX, code))
        .await?;

    info!(phone = %phone, "Verification code sent");

    Ok(IssuedCode {
        phone: phone.to_string(),
        existed: existing.is_some(),
        was_verified: existing.map(|u| u.verified).unwrap_or(false),
    })
}

/// Exact match against the outstanding code. A user without one never matches.
pub fn code_matches(user: &User, presented: &str) -> bool {
    user.verification_code.as_deref() == Some(presented)
}
