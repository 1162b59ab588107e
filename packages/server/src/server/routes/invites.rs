use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::ApiResult;
use crate::domains::invites::actions::{
    cancel_invite, decision_message, get_active_invite, get_public_invite, list_invites,
    parse_decision, parse_invite_id, respond_public, respond_to_invite, send_invite,
    send_invite_verification, verify_and_accept, InviteLists, SendInvite,
};
use crate::server::app::AppState;
use crate::server::extract::AppJson;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub invite_id: Option<String>,
    pub response: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PublicRespondRequest {
    pub response: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendVerificationRequest {
    pub invite_id: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAndAcceptRequest {
    pub invite_id: Option<String>,
    pub phone: Option<String>,
    pub code: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler))
        .route("/send", post(send_handler))
        .route("/respond", post(respond_handler))
        .route("/:id", get(get_handler).delete(cancel_handler))
        // Public endpoints for the invite web page
        .route("/public/send-verification", post(send_verification_handler))
        .route("/public/verify-and-accept", post(verify_and_accept_handler))
        .route("/public/:id", get(public_get_handler))
        .route("/public/:id/respond", post(public_respond_handler))
}

async fn send_handler(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<SendInvite>,
) -> ApiResult<Json<Value>> {
    let invite = send_invite(&user.phone, body, &state).await?;

    Ok(Json(json!({
        "message": "Invite sent successfully",
        "invite": invite,
    })))
}

async fn list_handler(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<InviteLists>> {
    list_invites(&user.phone, &state).await.map(Json)
}

async fn get_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let invite_id = parse_invite_id(Some(&id))?;
    let invite = get_active_invite(invite_id, &state).await?;
    Ok(Json(json!({ "invite": invite })))
}

async fn respond_handler(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<RespondRequest>,
) -> ApiResult<Json<Value>> {
    let invite_id = parse_invite_id(body.invite_id.as_deref())?;
    let decision = parse_decision(body.response.as_deref())?;

    let outcome = respond_to_invite(invite_id, &user.phone, decision, &state).await?;

    let mut response = json!({
        "message": decision_message(decision),
        "invite": outcome.invite,
    });
    if let Some(relationship) = outcome.relationship {
        response["relationship"] = json!(relationship);
    }

    Ok(Json(response))
}

async fn cancel_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let invite_id = parse_invite_id(Some(&id))?;
    let invite = cancel_invite(invite_id, &user.phone, &state).await?;

    Ok(Json(json!({
        "message": "Invite cancelled successfully",
        "invite": invite,
    })))
}

async fn public_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let invite_id = parse_invite_id(Some(&id))?;
    let invite = get_public_invite(invite_id, &state).await?;
    Ok(Json(json!({ "invite": invite })))
}

async fn public_respond_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<PublicRespondRequest>,
) -> ApiResult<Json<Value>> {
    let invite_id = parse_invite_id(Some(&id))?;
    let decision = parse_decision(body.response.as_deref())?;

    let outcome = respond_public(invite_id, decision, &state).await?;

    let mut response = json!(outcome);
    response["message"] = json!(decision_message(decision));

    Ok(Json(response))
}

async fn send_verification_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<SendVerificationRequest>,
) -> ApiResult<Json<Value>> {
    let invite_id = parse_invite_id(body.invite_id.as_deref())?;
    let phone = send_invite_verification(invite_id, body.phone.as_deref(), &state).await?;

    Ok(Json(json!({
        "message": "Verification code sent successfully",
        "phone": phone,
    })))
}

async fn verify_and_accept_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<VerifyAndAcceptRequest>,
) -> ApiResult<Json<Value>> {
    let invite_id = parse_invite_id(body.invite_id.as_deref())?;

    let accepted = verify_and_accept(
        invite_id,
        body.phone.as_deref(),
        body.code.as_deref(),
        &state,
    )
    .await?;

    Ok(Json(json!({
        "message": "Phone verified and invite accepted. You are now officially connected.",
        "user": accepted.user,
        "invite": accepted.invite,
        "relationship": accepted.relationship,
    })))
}
