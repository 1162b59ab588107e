use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::{ApiError, ApiResult, RelationshipId};
use crate::domains::relationships::actions::NOT_FOUND_MESSAGE;
use crate::domains::relationships::{edit_relationship, list_relationships, RelationshipPatch};
use crate::server::app::AppState;
use crate::server::extract::AppJson;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRelationshipRequest {
    pub relationship_id: Option<String>,
    #[serde(flatten)]
    pub patch: RelationshipPatch,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler))
        .route("/edit", put(edit_handler))
}

async fn list_handler(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Value>> {
    let relationships = list_relationships(user.user_id, &state).await?;
    Ok(Json(json!({ "relationships": relationships })))
}

async fn edit_handler(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<EditRelationshipRequest>,
) -> ApiResult<Json<Value>> {
    let relationship_id = body
        .relationship_id
        .as_deref()
        .ok_or_else(|| ApiError::validation("Relationship ID is required"))
        .and_then(|raw| {
            RelationshipId::parse(raw).map_err(|_| ApiError::not_found(NOT_FOUND_MESSAGE))
        })?;

    let relationship = edit_relationship(user.user_id, relationship_id, body.patch, &state).await?;

    Ok(Json(json!({
        "message": "Relationship updated successfully",
        "relationship": relationship,
    })))
}
