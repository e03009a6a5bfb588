use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::dispatch::board::{QueueBoard, QueueStatus};
use crate::dispatch::domain::{Order, OrderId, OrderRequest, Placement, PriorityClass};
use crate::dispatch::store::{QueueStore, StoreError};
use crate::dispatch::{dispatch_router, DispatchService};

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

pub(super) fn request(id: &str, pricing_model: &str, score: f64, minutes: i64) -> OrderRequest {
    let mut payload = BTreeMap::new();
    payload.insert("customer".to_string(), json!("Bay Shuttle Co"));
    payload.insert("vehicle_type".to_string(), json!("sedan"));

    OrderRequest {
        order_id: Some(OrderId::from(id)),
        pricing_model: Some(pricing_model.to_string()),
        revenue_score: score,
        created_at: Some(base_time() + Duration::minutes(minutes)),
        payload,
    }
}

pub(super) fn anonymous_request(pricing_model: &str, score: f64) -> OrderRequest {
    OrderRequest {
        order_id: None,
        pricing_model: Some(pricing_model.to_string()),
        revenue_score: score,
        created_at: None,
        payload: BTreeMap::new(),
    }
}

pub(super) fn build_service() -> (DispatchService<MemoryQueueStore>, Arc<MemoryQueueStore>) {
    let store = Arc::new(MemoryQueueStore::default());
    let service = DispatchService::new(store.clone());
    (service, store)
}

pub(super) fn router_with_service(service: DispatchService<MemoryQueueStore>) -> axum::Router {
    dispatch_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryQueueStore {
    pub(super) board: Arc<Mutex<QueueBoard>>,
}

impl QueueStore for MemoryQueueStore {
    fn enqueue(&self, order: Order) -> Result<Placement, StoreError> {
        let mut guard = self.board.lock().expect("board mutex poisoned");
        if guard.contains(&order.order_id) {
            return Err(StoreError::Conflict);
        }
        Ok(guard.enqueue(order))
    }

    fn board(&self) -> Result<QueueBoard, StoreError> {
        Ok(self.board.lock().expect("board mutex poisoned").clone())
    }

    fn status(&self) -> Result<QueueStatus, StoreError> {
        Ok(self.board.lock().expect("board mutex poisoned").status())
    }

    fn dispatch_next(&self, priority: PriorityClass) -> Result<Option<Order>, StoreError> {
        Ok(self
            .board
            .lock()
            .expect("board mutex poisoned")
            .dispatch_next(priority))
    }

    fn remove(&self, order_id: &OrderId) -> Result<(PriorityClass, Order), StoreError> {
        self.board
            .lock()
            .expect("board mutex poisoned")
            .remove(order_id)
            .ok_or(StoreError::NotFound)
    }
}

pub(super) struct UnavailableStore;

impl QueueStore for UnavailableStore {
    fn enqueue(&self, _order: Order) -> Result<Placement, StoreError> {
        Err(StoreError::Unavailable("dispatch backend offline".to_string()))
    }

    fn board(&self) -> Result<QueueBoard, StoreError> {
        Err(StoreError::Unavailable("dispatch backend offline".to_string()))
    }

    fn status(&self) -> Result<QueueStatus, StoreError> {
        Err(StoreError::Unavailable("dispatch backend offline".to_string()))
    }

    fn dispatch_next(&self, _priority: PriorityClass) -> Result<Option<Order>, StoreError> {
        Err(StoreError::Unavailable("dispatch backend offline".to_string()))
    }

    fn remove(&self, _order_id: &OrderId) -> Result<(PriorityClass, Order), StoreError> {
        Err(StoreError::Unavailable("dispatch backend offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    body: &Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serializable body"),
        ))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}
