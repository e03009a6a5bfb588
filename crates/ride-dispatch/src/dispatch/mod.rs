//! Priority classification, ordered queues, and the order admission path.

pub mod board;
pub mod classifier;
pub mod domain;
pub mod import;
pub mod queue;
pub mod router;
pub mod service;
pub mod store;
pub mod summary;

#[cfg(test)]
mod tests;

pub use board::{QueueBoard, QueueBoardView, QueueStatus};
pub use classifier::{classify, insert, ClassificationError};
pub use domain::{
    Order, OrderDraft, OrderId, OrderRequest, Placement, PriorityClass, PricingModel,
    QueueOrdering, UnknownPriorityClass,
};
pub use import::{OrderCsvImporter, OrderImportError};
pub use queue::ClassQueue;
pub use router::dispatch_router;
pub use service::{DispatchService, DispatchServiceError};
pub use store::{QueueStore, StoreError};
pub use summary::{ClassSummaryEntry, QueueSummary};
