use chrono::{DateTime, Utc};
use serde::Serialize;

use super::board::QueueBoard;
use super::domain::{OrderId, PriorityClass};
use super::queue::ClassQueue;

/// Queue analytics backing the dashboard's segment tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSummary {
    pub classes: Vec<ClassSummaryEntry>,
    pub total_orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummaryEntry {
    pub priority: PriorityClass,
    pub label: &'static str,
    pub ordering: &'static str,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_revenue_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_revenue_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_created_at: Option<DateTime<Utc>>,
}

impl ClassSummaryEntry {
    fn from_queue(queue: &ClassQueue) -> Self {
        let priority = queue.priority();
        let count = queue.len();
        let scores = queue.iter().map(|order| order.revenue_score);

        // Scale before summing so large finite scores cannot overflow to infinity.
        let mean_revenue_score = if count == 0 {
            None
        } else {
            let divisor = count as f64;
            Some(scores.clone().map(|score| score / divisor).sum::<f64>())
        };
        let top_revenue_score = scores.reduce(f64::max);

        Self {
            priority,
            label: priority.label(),
            ordering: priority.ordering().label(),
            count,
            mean_revenue_score,
            top_revenue_score,
            head_order_id: queue.head().map(|order| order.order_id.clone()),
            oldest_created_at: queue.iter().map(|order| order.created_at).min(),
        }
    }
}

impl QueueBoard {
    pub fn summary(&self) -> QueueSummary {
        let classes = PriorityClass::ordered()
            .into_iter()
            .map(|priority| ClassSummaryEntry::from_queue(self.queue(priority)))
            .collect();

        QueueSummary {
            classes,
            total_orders: self.status().total(),
        }
    }
}
