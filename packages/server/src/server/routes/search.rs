use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::ApiResult;
use crate::domains::search::search_user;
use crate::server::app::AppState;
use crate::server::extract::AppJson;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub phone: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/user", post(search_handler))
}

async fn search_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(body): AppJson<SearchRequest>,
) -> ApiResult<Json<Value>> {
    let result = search_user(body.phone.as_deref(), &state).await?;
    Ok(Json(json!({ "success": true, "result": result })))
}
