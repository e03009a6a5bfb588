use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;

use super::board::{QueueBoardView, QueueStatus};
use super::domain::{OrderId, OrderRequest, PriorityClass};
use super::service::{DispatchService, DispatchServiceError};
use super::store::{QueueStore, StoreError};
use super::summary::QueueSummary;
use crate::error::AppError;

/// Router builder exposing order admission and queue endpoints.
pub fn dispatch_router<S>(service: Arc<DispatchService<S>>) -> Router
where
    S: QueueStore + 'static,
{
    Router::new()
        .route("/api/v1/orders", post(submit_handler::<S>))
        .route("/api/v1/orders/:order_id", delete(cancel_handler::<S>))
        .route("/api/v1/queues", get(board_handler::<S>))
        .route("/api/v1/queues/status", get(status_handler::<S>))
        .route("/api/v1/queues/summary", get(summary_handler::<S>))
        .route("/api/v1/dispatch/:priority", post(dispatch_handler::<S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<DispatchService<S>>>,
    axum::Json(request): axum::Json<OrderRequest>,
) -> Response
where
    S: QueueStore + 'static,
{
    match service.submit(request) {
        Ok(placement) => (StatusCode::CREATED, axum::Json(placement)).into_response(),
        Err(
            error @ (DispatchServiceError::Classification(_)
            | DispatchServiceError::InvalidRevenueScore(_)),
        ) => error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
        Err(DispatchServiceError::Store(StoreError::Conflict)) => {
            error_response(StatusCode::CONFLICT, "order already queued".to_string())
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn board_handler<S>(
    State(service): State<Arc<DispatchService<S>>>,
) -> Result<axum::Json<QueueBoardView>, AppError>
where
    S: QueueStore + 'static,
{
    Ok(axum::Json(service.board()?.view()))
}

pub(crate) async fn status_handler<S>(
    State(service): State<Arc<DispatchService<S>>>,
) -> Result<axum::Json<QueueStatus>, AppError>
where
    S: QueueStore + 'static,
{
    Ok(axum::Json(service.status()?))
}

pub(crate) async fn summary_handler<S>(
    State(service): State<Arc<DispatchService<S>>>,
) -> Result<axum::Json<QueueSummary>, AppError>
where
    S: QueueStore + 'static,
{
    Ok(axum::Json(service.summary()?))
}

pub(crate) async fn dispatch_handler<S>(
    State(service): State<Arc<DispatchService<S>>>,
    Path(priority): Path<String>,
) -> Response
where
    S: QueueStore + 'static,
{
    let priority = match priority.parse::<PriorityClass>() {
        Ok(priority) => priority,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
    };

    match service.dispatch_next(priority) {
        Ok(Some(order)) => (StatusCode::OK, axum::Json(order)).into_response(),
        Ok(None) => {
            let payload = json!({
                "priority": priority,
                "error": format!("queue {priority} is empty"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn cancel_handler<S>(
    State(service): State<Arc<DispatchService<S>>>,
    Path(order_id): Path<String>,
) -> Response
where
    S: QueueStore + 'static,
{
    let id = OrderId(order_id);
    match service.cancel(&id) {
        Ok((priority, order)) => {
            let payload = json!({
                "priority": priority,
                "order": order,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(DispatchServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({
                "order_id": id,
                "error": "order not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
