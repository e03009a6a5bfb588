use serde::{Deserialize, Serialize};

use super::classifier::{self, ClassificationError};
use super::domain::{Order, OrderDraft, OrderId, Placement, PriorityClass};
use super::queue::ClassQueue;

/// Per-class order counts shown on the dashboard status strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    #[serde(rename = "P0")]
    pub p0: usize,
    #[serde(rename = "P1")]
    pub p1: usize,
    #[serde(rename = "P2")]
    pub p2: usize,
}

impl QueueStatus {
    pub fn count(&self, priority: PriorityClass) -> usize {
        match priority {
            PriorityClass::P0 => self.p0,
            PriorityClass::P1 => self.p1,
            PriorityClass::P2 => self.p2,
        }
    }

    pub fn total(&self) -> usize {
        self.p0 + self.p1 + self.p2
    }

    fn slot(&mut self, priority: PriorityClass) -> &mut usize {
        match priority {
            PriorityClass::P0 => &mut self.p0,
            PriorityClass::P1 => &mut self.p1,
            PriorityClass::P2 => &mut self.p2,
        }
    }
}

/// The three priority queues plus their status counters.
///
/// Counters only move together with a queue mutation, so `status()` always agrees with
/// the queue lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueBoard {
    p0: ClassQueue,
    p1: ClassQueue,
    p2: ClassQueue,
    status: QueueStatus,
}

impl Default for QueueBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueBoard {
    pub fn new() -> Self {
        Self {
            p0: ClassQueue::new(PriorityClass::P0),
            p1: ClassQueue::new(PriorityClass::P1),
            p2: ClassQueue::new(PriorityClass::P2),
            status: QueueStatus::default(),
        }
    }

    pub fn queue(&self, priority: PriorityClass) -> &ClassQueue {
        match priority {
            PriorityClass::P0 => &self.p0,
            PriorityClass::P1 => &self.p1,
            PriorityClass::P2 => &self.p2,
        }
    }

    fn queue_mut(&mut self, priority: PriorityClass) -> &mut ClassQueue {
        match priority {
            PriorityClass::P0 => &mut self.p0,
            PriorityClass::P1 => &mut self.p1,
            PriorityClass::P2 => &mut self.p2,
        }
    }

    pub fn status(&self) -> QueueStatus {
        self.status
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        PriorityClass::ordered()
            .into_iter()
            .any(|priority| self.queue(priority).contains(order_id))
    }

    /// Classify a draft and queue it.
    pub fn admit(&mut self, draft: OrderDraft) -> Result<Placement, ClassificationError> {
        let (_, order) = classifier::admit(draft)?;
        Ok(self.enqueue(order))
    }

    /// Queue an already classified order.
    pub fn enqueue(&mut self, order: Order) -> Placement {
        let priority = order.priority();
        let order_id = order.order_id.clone();
        let queue = self.queue_mut(priority);
        let position = queue.insert(order);
        let queue_len = queue.len();
        *self.status.slot(priority) += 1;

        Placement {
            order_id,
            priority,
            position,
            queue_len,
        }
    }

    /// Hand the head of a class queue to the order-processing backend.
    pub fn dispatch_next(&mut self, priority: PriorityClass) -> Option<Order> {
        let order = self.queue_mut(priority).pop_head()?;
        *self.status.slot(priority) -= 1;
        Some(order)
    }

    pub fn remove(&mut self, order_id: &OrderId) -> Option<(PriorityClass, Order)> {
        let priority = PriorityClass::ordered()
            .into_iter()
            .find(|priority| self.queue(*priority).contains(order_id))?;
        let order = self.queue_mut(priority).remove(order_id)?;
        *self.status.slot(priority) -= 1;
        Some((priority, order))
    }

    pub fn view(&self) -> QueueBoardView {
        QueueBoardView {
            p0: self.p0.orders().to_vec(),
            p1: self.p1.orders().to_vec(),
            p2: self.p2.orders().to_vec(),
            status: self.status,
        }
    }
}

/// Serializable snapshot of the whole board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueBoardView {
    #[serde(rename = "P0")]
    pub p0: Vec<Order>,
    #[serde(rename = "P1")]
    pub p1: Vec<Order>,
    #[serde(rename = "P2")]
    pub p2: Vec<Order>,
    pub status: QueueStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::BTreeMap;

    fn draft(id: &str, model: &str, score: f64, minutes: i64) -> OrderDraft {
        OrderDraft {
            order_id: OrderId::from(id),
            pricing_model: Some(model.to_string()),
            revenue_score: score,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
                + Duration::minutes(minutes),
            payload: BTreeMap::new(),
        }
    }

    fn assert_counters_match(board: &QueueBoard) {
        for priority in PriorityClass::ordered() {
            assert_eq!(
                board.status().count(priority),
                board.queue(priority).len(),
                "counter drift for {priority}"
            );
        }
    }

    #[test]
    fn admit_routes_and_counts() {
        let mut board = QueueBoard::new();
        let placement = board
            .admit(draft("c1", "CONTRACTED", 3.0, 0))
            .expect("contracted admitted");
        assert_eq!(placement.priority, PriorityClass::P0);
        assert_eq!(placement.position, 0);
        assert_eq!(placement.queue_len, 1);

        board.admit(draft("s1", "STANDARD", 7.0, 1)).expect("admitted");
        board.admit(draft("s2", "STANDARD", 9.0, 2)).expect("admitted");
        let placement = board.admit(draft("x1", "CUSTOM", 1.0, 3)).expect("admitted");
        assert_eq!(placement.priority, PriorityClass::P2);

        assert_eq!(
            board.status(),
            QueueStatus {
                p0: 1,
                p1: 2,
                p2: 1
            }
        );
        assert_eq!(board.status().total(), 4);
        assert_counters_match(&board);
    }

    #[test]
    fn rejected_admission_leaves_board_untouched() {
        let mut board = QueueBoard::new();
        board.admit(draft("s1", "STANDARD", 7.0, 0)).expect("admitted");
        let before = board.clone();

        let error = board
            .admit(draft("surge", "SURGE", 100.0, 1))
            .expect_err("surge rejected");
        assert!(matches!(
            error,
            ClassificationError::UnknownPricingModel { .. }
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn dispatch_and_remove_keep_counters_in_step() {
        let mut board = QueueBoard::new();
        board.admit(draft("c1", "CONTRACTED", 0.0, 0)).expect("admitted");
        board.admit(draft("c2", "CONTRACTED", 0.0, 1)).expect("admitted");
        board.admit(draft("s1", "STANDARD", 5.0, 2)).expect("admitted");

        let head = board.dispatch_next(PriorityClass::P0).expect("p0 head");
        assert_eq!(head.order_id.as_str(), "c1");
        assert_counters_match(&board);

        let (priority, removed) = board.remove(&OrderId::from("s1")).expect("s1 queued");
        assert_eq!(priority, PriorityClass::P1);
        assert_eq!(removed.revenue_score, 5.0);
        assert_counters_match(&board);

        assert!(board.dispatch_next(PriorityClass::P2).is_none());
        assert!(board.remove(&OrderId::from("s1")).is_none());
        assert_eq!(board.status().total(), 1);
        assert!(board.contains(&OrderId::from("c2")));
    }

    #[test]
    fn view_serializes_named_queues() {
        let mut board = QueueBoard::new();
        board.admit(draft("x1", "CUSTOM", 15.0, 0)).expect("admitted");

        let json = serde_json::to_value(board.view()).expect("serializes");
        assert_eq!(json["P2"][0]["order_id"], "x1");
        assert_eq!(json["P2"][0]["pricing_model"], "CUSTOM");
        assert_eq!(json["status"]["P2"], 1);
        assert_eq!(json["P0"].as_array().map(Vec::len), Some(0));
    }
}
