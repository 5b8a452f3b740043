//! Complaint endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use std::sync::Arc;

use crate::application::dto::ComplaintView;
use crate::domain::TicketId;
use crate::error::CoreResult;
use crate::middleware::Authenticated;
use crate::models::{ApiResponse, ComplaintCreate, ComplaintList, ComplaintListParams, StatusUpdate};
use crate::policy::ListFilter;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_complaints).post(create_complaint))
        .route("/:ticket_id", get(get_complaint))
        .route("/:ticket_id/status", put(transition_complaint))
}

pub async fn create_complaint(
    State(state): State<Arc<AppState>>,
    auth: Authenticated,
    Json(body): Json<ComplaintCreate>,
) -> CoreResult<(StatusCode, Json<ApiResponse<ComplaintView>>)> {
    let complaint = state
        .complaints
        .create(&auth.actor, &body.description, &body.location)
        .await?;

    tracing::info!(
        ticket_id = %complaint.ticket_id(),
        department = complaint.department().as_str(),
        "complaint created"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::success(ComplaintView::from(&complaint)))))
}

pub async fn list_complaints(
    State(state): State<Arc<AppState>>,
    auth: Authenticated,
    Query(params): Query<ComplaintListParams>,
) -> CoreResult<Json<ApiResponse<ComplaintList>>> {
    let filter = ListFilter {
        status: params.status,
        department: params.department,
        order: params.order.unwrap_or_default(),
    };
    let listing = state.complaints.list_for(&auth.actor, &filter).await?;
    let items: Vec<ComplaintView> = listing.iter().map(ComplaintView::from).collect();

    Ok(Json(ApiResponse::success(ComplaintList {
        total: items.len(),
        items,
    })))
}

pub async fn get_complaint(
    State(state): State<Arc<AppState>>,
    auth: Authenticated,
    Path(ticket_id): Path<String>,
) -> CoreResult<Json<ApiResponse<ComplaintView>>> {
    let complaint = state
        .complaints
        .get(&auth.actor, &TicketId::from_string(ticket_id))
        .await?;
    Ok(Json(ApiResponse::success(ComplaintView::from(&complaint))))
}

pub async fn transition_complaint(
    State(state): State<Arc<AppState>>,
    auth: Authenticated,
    Path(ticket_id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> CoreResult<Json<ApiResponse<ComplaintView>>> {
    let ticket_id = TicketId::from_string(ticket_id);
    let complaint = state
        .complaints
        .transition(&auth.actor, &ticket_id, body.status, body.notes)
        .await?;

    tracing::info!(
        %ticket_id,
        status = %complaint.status(),
        actor_id = %auth.actor.id(),
        "complaint status updated"
    );
    Ok(Json(ApiResponse::success(ComplaintView::from(&complaint))))
}
