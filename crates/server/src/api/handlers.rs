use super::{ApiError, ApiResult, ErrorResponse};
use crate::config::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use weather_mcp::protocol::IntrospectionResponse;
use weather_mcp::Reply;

/// Handle one MCP message (batch or handshake)
pub async fn handle_mcp(State(state): State<Arc<AppState>>, body: String) -> ApiResult<Json<Reply>> {
    let reply = state.server.handle_raw(&state.handshake, &body).await;

    match reply {
        Reply::Malformed(reason) => Err(ApiError::bad_request(ErrorResponse::with_details(
            "Invalid request body",
            reason,
        ))),
        reply => Ok(Json(reply)),
    }
}

/// List the tool catalog
pub async fn introspection(State(state): State<Arc<AppState>>) -> Json<IntrospectionResponse> {
    Json(state.server.introspection())
}
