use metrics_exporter_prometheus::PrometheusHandle;
use ride_dispatch::dispatch::{
    Order, OrderId, Placement, PriorityClass, QueueBoard, QueueStatus, QueueStore, StoreError,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Single-writer queue store: every mutation runs under one lock, so counters and
/// queues never diverge.
#[derive(Default, Clone)]
pub(crate) struct InMemoryQueueStore {
    board: Arc<Mutex<QueueBoard>>,
}

impl InMemoryQueueStore {
    fn lock(&self) -> Result<MutexGuard<'_, QueueBoard>, StoreError> {
        self.board
            .lock()
            .map_err(|_| StoreError::Unavailable("queue board lock poisoned".to_string()))
    }
}

impl QueueStore for InMemoryQueueStore {
    fn enqueue(&self, order: Order) -> Result<Placement, StoreError> {
        let mut guard = self.lock()?;
        if guard.contains(&order.order_id) {
            return Err(StoreError::Conflict);
        }
        Ok(guard.enqueue(order))
    }

    fn board(&self) -> Result<QueueBoard, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn status(&self) -> Result<QueueStatus, StoreError> {
        Ok(self.lock()?.status())
    }

    fn dispatch_next(&self, priority: PriorityClass) -> Result<Option<Order>, StoreError> {
        Ok(self.lock()?.dispatch_next(priority))
    }

    fn remove(&self, order_id: &OrderId) -> Result<(PriorityClass, Order), StoreError> {
        self.lock()?.remove(order_id).ok_or(StoreError::NotFound)
    }
}
