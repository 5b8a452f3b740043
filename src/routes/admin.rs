//! Super admin endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;

use crate::application::dto::{AccountView, RegisterAdminCommand};
use crate::error::CoreResult;
use crate::middleware::Authenticated;
use crate::models::ApiResponse;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/department-admins", post(register_department_admin))
}

pub async fn register_department_admin(
    State(state): State<Arc<AppState>>,
    auth: Authenticated,
    Json(command): Json<RegisterAdminCommand>,
) -> CoreResult<(StatusCode, Json<ApiResponse<AccountView>>)> {
    let account = state
        .accounts
        .register_department_admin(&auth.actor, command)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(AccountView::from(&account)))))
}
