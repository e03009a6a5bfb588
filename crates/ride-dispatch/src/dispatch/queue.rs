use serde::Serialize;

use super::domain::{Order, OrderId, PriorityClass, QueueOrdering};

/// Ordered orders of a single priority class.
///
/// P0 keeps `created_at` ascending; P1 and P2 keep `revenue_score` descending. In both
/// cases equal keys keep arrival order, so an insert never reorders existing entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassQueue {
    priority: PriorityClass,
    orders: Vec<Order>,
}

impl ClassQueue {
    pub fn new(priority: PriorityClass) -> Self {
        Self {
            priority,
            orders: Vec::new(),
        }
    }

    pub fn priority(&self) -> PriorityClass {
        self.priority
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn head(&self) -> Option<&Order> {
        self.orders.first()
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.orders.iter().any(|order| &order.order_id == order_id)
    }

    /// Insert `order` and return the index it landed at.
    ///
    /// The order must belong to this queue's class.
    pub fn insert(&mut self, order: Order) -> usize {
        debug_assert_eq!(
            order.priority(),
            self.priority,
            "order {} routed to the wrong priority queue",
            order.order_id
        );

        let position = insertion_point(self.priority.ordering(), &self.orders, &order);
        self.orders.insert(position, order);
        position
    }

    pub fn pop_head(&mut self) -> Option<Order> {
        if self.orders.is_empty() {
            None
        } else {
            Some(self.orders.remove(0))
        }
    }

    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let index = self
            .orders
            .iter()
            .position(|order| &order.order_id == order_id)?;
        Some(self.orders.remove(index))
    }

    /// Whether the queue currently satisfies its class ordering.
    pub fn is_ordered(&self) -> bool {
        let ordering = self.priority.ordering();
        self.orders
            .windows(2)
            .all(|pair| in_order(ordering, &pair[0], &pair[1]))
    }
}

impl<'a> IntoIterator for &'a ClassQueue {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}

fn in_order(ordering: QueueOrdering, earlier: &Order, later: &Order) -> bool {
    match ordering {
        QueueOrdering::CreatedAtAscending => earlier.created_at <= later.created_at,
        QueueOrdering::RevenueScoreDescending => earlier.revenue_score >= later.revenue_score,
    }
}

// First index whose entry must come after `order`; everything before it, including
// entries with an equal key, stays ahead.
fn insertion_point(ordering: QueueOrdering, orders: &[Order], order: &Order) -> usize {
    orders.partition_point(|existing| in_order(ordering, existing, order))
}
