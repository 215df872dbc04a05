use crate::types::{Order, OrderId};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Durable order store with a monotonic id counter
///
/// Ids start at 1 and are never reused; orders are never deleted. The
/// counter lives here rather than in any global so the whole store can be
/// snapshotted and restored as one value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStore {
    orders: HashMap<OrderId, Order>,
    next_order_id: OrderId,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            next_order_id: 1,
        }
    }

    /// Rebuild a store from persisted orders
    ///
    /// Orders are never deleted, so the counter resumes at the highest
    /// persisted id plus one.
    pub fn restore(orders: Vec<Order>) -> Self {
        let next_order_id = orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        Self {
            orders: orders.into_iter().map(|o| (o.id, o)).collect(),
            next_order_id,
        }
    }

    /// Allocate the next order id
    pub fn allocate_id(&mut self) -> OrderId {
        let id = self.next_order_id;
        self.next_order_id += 1;
        id
    }

    /// Id the next insert will receive
    pub fn next_order_id(&self) -> OrderId {
        self.next_order_id
    }

    pub fn insert(&mut self, order: Order) {
        self.orders.insert(order.id, order);
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.get_mut(&id)
    }

    /// All orders placed by a user, unordered
    pub fn orders_for(&self, owner: &Address) -> Vec<&Order> {
        self.orders.values().filter(|o| o.owner == *owner).collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
