use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::AppError,
    merch::{
        dto::{InfoResponse, SendCoinRequest},
        services,
    },
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/api/info", get(get_info))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sendCoin", post(send_coin))
        .route("/api/buy/:item", post(buy_item))
        .route("/api/buy/", post(buy_unnamed_item))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn get_info(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<InfoResponse>, AppError> {
    let info = services::fetch_info(state.ledger.as_ref(), user_id).await?;
    Ok(Json(info))
}

#[instrument(skip(state, payload))]
pub async fn send_coin(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<SendCoinRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(req) = payload?;
    services::send_coins(state.ledger.as_ref(), user_id, &req).await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn buy_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(item): Path<String>,
) -> Result<StatusCode, AppError> {
    services::buy_item(state.ledger.as_ref(), &state.catalog, user_id, &item).await?;
    Ok(StatusCode::OK)
}

/// `/api/buy/` with an empty item segment is an unknown item, not a missing route.
#[instrument(skip(state))]
pub async fn buy_unnamed_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, AppError> {
    services::buy_item(state.ledger.as_ref(), &state.catalog, user_id, "").await?;
    Ok(StatusCode::OK)
}
