use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthRequest, AuthResponse},
        jwt::JwtKeys,
        services::authenticate,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/api/auth", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(mut payload) = payload?;
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() || payload.password.is_empty() {
        warn!("blank username or password");
        return Err(AppError::Validation(
            "username and password are required".into(),
        ));
    }

    let user = authenticate(state.ledger.as_ref(), &payload.username, &payload.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse { token }))
}
