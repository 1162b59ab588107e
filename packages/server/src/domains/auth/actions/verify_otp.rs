//! Verify a signup / login code and issue a session token

use serde::Serialize;
use tracing::info;

use crate::common::{normalize_phone, ApiError, ApiResult};
use crate::domains::auth::verification::code_matches;
use crate::domains::users::User;
use crate::kernel::ServerDeps;

/// Result of verifying a code
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpResult {
    pub token: String,
    pub user: User,
}

/// Check the code against the user's outstanding one.
///
/// On success the user is marked verified, the code is cleared and a 30-day
/// session token is returned. The user row is locked while checking so two
/// concurrent attempts cannot both consume the same code.
pub async fn verify_otp(
    phone_raw: Option<&str>,
    code: Option<&str>,
    deps: &ServerDeps,
) -> ApiResult<VerifyOtpResult> {
    let (phone, code) = match (
        phone_raw.map(str::trim).filter(|p| !p.is_empty()),
        code.map(str::trim).filter(|c| !c.is_empty()),
    ) {
        (Some(phone), Some(code)) => (normalize_phone(phone), code),
        _ => {
            return Err(ApiError::validation(
                "Phone number and verification code are required",
            ))
        }
    };

    let mut tx = deps.db_pool.begin().await?;

    let user = User::find_by_phone_for_update(&phone, &mut *tx)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !code_matches(&user, code) {
        return Err(ApiError::InvalidCode);
    }

    let user = User::mark_verified(user.id, &mut *tx).await?;
    tx.commit().await?;

    let token = deps.jwt_service.create_token(user.id, user.phone.clone())?;

    info!(user_id = %user.id, "User verified");

    Ok(VerifyOtpResult { token, user })
}
