//! Login, logout, registration and profile endpoints

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;

use crate::application::dto::{AccountView, RegisterCitizenCommand};
use crate::error::CoreResult;
use crate::middleware::{bearer_token, Authenticated};
use crate::models::{ApiResponse, LoginRequest, LoginResponse};
use crate::session::Credentials;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/register", post(register))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> CoreResult<Json<ApiResponse<LoginResponse>>> {
    let credentials = Credentials {
        portal: request.portal,
        email: request.email,
        password: request.password,
    };
    let session = state.sessions.authenticate(&credentials).await?;
    let account = state.accounts.profile(&session.actor).await?;

    Ok(Json(ApiResponse::success(LoginResponse {
        expires_in: session.lifetime_secs(),
        access_token: session.token,
        token_type: "Bearer".into(),
        actor: AccountView::from(&account),
    })))
}

/// Always succeeds, with or without a usable token
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.invalidate(token);
    }
    StatusCode::NO_CONTENT
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(command): Json<RegisterCitizenCommand>,
) -> CoreResult<(StatusCode, Json<ApiResponse<AccountView>>)> {
    let account = state.accounts.register_citizen(command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(AccountView::from(&account)))))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: Authenticated,
) -> CoreResult<Json<ApiResponse<AccountView>>> {
    let account = state.accounts.profile(&auth.actor).await?;
    Ok(Json(ApiResponse::success(AccountView::from(&account))))
}
