use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::ApiResult;
use crate::domains::auth::actions::{
    get_current_user, get_public_profile, send_otp, verify_otp, SendOtpResult,
};
use crate::server::app::AppState;
use crate::server::extract::AppJson;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub phone: Option<String>,
    pub code: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/verify", post(verify_handler))
        .route("/me", get(me_handler))
        .route("/users/:phone", get(public_user_handler))
}

async fn signup_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<SignupRequest>,
) -> ApiResult<Json<SendOtpResult>> {
    send_otp(body.phone.as_deref(), &state).await.map(Json)
}

async fn verify_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<VerifyRequest>,
) -> ApiResult<Json<Value>> {
    let verified = verify_otp(body.phone.as_deref(), body.code.as_deref(), &state).await?;

    Ok(Json(json!({
        "message": "Verification successful",
        "token": verified.token,
        "user": verified.user,
    })))
}

async fn me_handler(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Value>> {
    let current = get_current_user(user.user_id, &state).await?;
    Ok(Json(json!({ "user": current })))
}

async fn public_user_handler(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> ApiResult<Json<Value>> {
    let profile = get_public_profile(&phone, &state).await?;
    Ok(Json(json!({ "user": profile })))
}
