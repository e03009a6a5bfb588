use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::board::{QueueBoard, QueueStatus};
use super::classifier::{self, ClassificationError};
use super::domain::{Order, OrderDraft, OrderId, OrderRequest, Placement, PriorityClass};
use super::store::{QueueStore, StoreError};
use super::summary::QueueSummary;

/// Order admission path: classify, then hand the order to the queue store.
pub struct DispatchService<S> {
    store: Arc<S>,
    sequence: AtomicU64,
}

impl<S> DispatchService<S>
where
    S: QueueStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_order_id(&self) -> OrderId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        OrderId(format!("ord-{id:06}"))
    }

    /// Admit a new order, assigning an id and creation time when the source left them out.
    pub fn submit(&self, request: OrderRequest) -> Result<Placement, DispatchServiceError> {
        let OrderRequest {
            order_id,
            pricing_model,
            revenue_score,
            created_at,
            payload,
        } = request;

        if !revenue_score.is_finite() {
            warn!(revenue_score, "order rejected: non-finite revenue score");
            return Err(DispatchServiceError::InvalidRevenueScore(revenue_score));
        }

        let supplied_id = order_id.filter(|id| !id.0.trim().is_empty());
        let generated = supplied_id.is_none();
        let draft = OrderDraft {
            order_id: supplied_id.unwrap_or_else(|| self.next_order_id()),
            pricing_model,
            revenue_score,
            created_at: created_at.unwrap_or_else(Utc::now),
            payload,
        };

        let order_id = draft.order_id.clone();
        let (priority, order) = classifier::admit(draft).map_err(|err| {
            warn!(%order_id, error = %err, "order rejected");
            err
        })?;

        let placement = if generated {
            self.enqueue_generated(order)?
        } else {
            self.store.enqueue(order)?
        };
        info!(
            order_id = %placement.order_id,
            %priority,
            position = placement.position,
            queue_len = placement.queue_len,
            "order admitted"
        );
        Ok(placement)
    }

    /// Generated ids share a namespace with client ids; on a clash draw the next one.
    fn enqueue_generated(&self, mut order: Order) -> Result<Placement, StoreError> {
        loop {
            match self.store.enqueue(order.clone()) {
                Err(StoreError::Conflict) => {
                    debug!(order_id = %order.order_id, "generated order id taken, drawing another");
                    order.order_id = self.next_order_id();
                }
                result => return result,
            }
        }
    }

    pub fn board(&self) -> Result<QueueBoard, DispatchServiceError> {
        Ok(self.store.board()?)
    }

    pub fn status(&self) -> Result<QueueStatus, DispatchServiceError> {
        Ok(self.store.status()?)
    }

    pub fn summary(&self) -> Result<QueueSummary, DispatchServiceError> {
        Ok(self.store.board()?.summary())
    }

    /// Pop the head of a class queue for processing.
    pub fn dispatch_next(
        &self,
        priority: PriorityClass,
    ) -> Result<Option<Order>, DispatchServiceError> {
        let dispatched = self.store.dispatch_next(priority)?;
        if let Some(order) = &dispatched {
            info!(order_id = %order.order_id, %priority, "order dispatched");
        }
        Ok(dispatched)
    }

    /// Withdraw a queued order, wherever it sits.
    pub fn cancel(
        &self,
        order_id: &OrderId,
    ) -> Result<(PriorityClass, Order), DispatchServiceError> {
        let (priority, order) = self.store.remove(order_id)?;
        info!(%order_id, %priority, "order cancelled");
        Ok((priority, order))
    }
}

/// Error raised by the dispatch service.
#[derive(Debug, thiserror::Error)]
pub enum DispatchServiceError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),
    #[error("revenue score must be a finite number, got {0}")]
    InvalidRevenueScore(f64),
    #[error(transparent)]
    Store(#[from] StoreError),
}
