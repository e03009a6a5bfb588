use super::board::{QueueBoard, QueueStatus};
use super::domain::{Order, OrderId, Placement, PriorityClass};

/// Owner of the authoritative queue state.
///
/// Implementations serialize mutations so that each enqueue or dispatch sees the
/// result of the previous one.
pub trait QueueStore: Send + Sync {
    fn enqueue(&self, order: Order) -> Result<Placement, StoreError>;
    fn board(&self) -> Result<QueueBoard, StoreError>;
    fn status(&self) -> Result<QueueStatus, StoreError>;
    fn dispatch_next(&self, priority: PriorityClass) -> Result<Option<Order>, StoreError>;
    fn remove(&self, order_id: &OrderId) -> Result<(PriorityClass, Order), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("order already queued")]
    Conflict,
    #[error("order not found")]
    NotFound,
    #[error("queue store unavailable: {0}")]
    Unavailable(String),
}
