//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A FIFO queue of resting orders at one exact price. Orders are not owned by a pointer graph;
// the level only stores the head/tail order ids, and each `Order` carries `prev`/`next` ids of
// its neighbors. The backing arena (the `SideBook`'s order map) is the sole place an `Order`
// actually lives - this module only manipulates the links.
//
// | Component   | Description                                          | Key Methods          |
// |-------------|-------------------------------------------------------|----------------------|
// | PriceLevel  | Head/tail + running volume/length at one price         | append_order         |
// |             |                                                         | remove_order         |
// |             |                                                         | move_to_tail         |
//--------------------------------------------------------------------------------------------------

use crate::domain::models::{Decimal, Order};

/// All resting orders at one price, oldest first.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    pub price: Decimal,
    head: Option<u64>,
    tail: Option<u64>,
    length: usize,
    volume: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal) -> Self {
        PriceLevel {
            price,
            head: None,
            tail: None,
            length: 0,
            volume: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn head(&self) -> Option<u64> {
        self.head
    }

    pub fn tail(&self) -> Option<u64> {
        self.tail
    }

    /// Shrinks the level's running volume by `qty` without touching links - used when the head
    /// order is partially filled and stays resting.
    pub fn reduce_volume(&mut self, qty: Decimal) {
        self.volume -= qty;
    }

    /// Links `order` at the tail of this level. `arena` is the order_id -> Order map the level's
    /// orders actually live in; this call only needs it to patch the previous tail's `next` link.
    pub fn append_order(&mut self, order: &mut Order, arena: &mut std::collections::HashMap<u64, Order>) {
        order.prev = self.tail;
        order.next = None;
        if let Some(tail_id) = self.tail {
            if let Some(tail_order) = arena.get_mut(&tail_id) {
                tail_order.next = Some(order.order_id);
            }
        } else {
            self.head = Some(order.order_id);
        }
        self.tail = Some(order.order_id);
        self.length += 1;
        self.volume += order.quantity;
    }

    /// Unlinks `order` from this level. Volume is decremented by the quantity passed in, which
    /// the caller must supply *before* mutating `order.quantity` (e.g. on a partial fill the
    /// order stays linked and only its quantity shrinks - that path does not call this).
    pub fn remove_order(&mut self, order: &Order, arena: &mut std::collections::HashMap<u64, Order>) {
        match order.prev {
            Some(prev_id) => {
                if let Some(prev_order) = arena.get_mut(&prev_id) {
                    prev_order.next = order.next;
                }
            }
            None => self.head = order.next,
        }
        match order.next {
            Some(next_id) => {
                if let Some(next_order) = arena.get_mut(&next_id) {
                    next_order.prev = order.prev;
                }
            }
            None => self.tail = order.prev,
        }
        self.length -= 1;
        self.volume -= order.quantity;
    }

    /// Detaches `order` and re-appends it at the tail without touching volume/length. Used when
    /// an existing resting order's quantity is increased (no current operation triggers this;
    /// see SPEC_FULL.md 4.2).
    pub fn move_to_tail(&mut self, order_id: u64, arena: &mut std::collections::HashMap<u64, Order>) {
        let (prev, next) = {
            let order = match arena.get(&order_id) {
                Some(o) => o,
                None => return,
            };
            (order.prev, order.next)
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_order) = arena.get_mut(&prev_id) {
                    prev_order.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_id) => {
                if let Some(next_order) = arena.get_mut(&next_id) {
                    next_order.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(old_tail_id) = self.tail {
            if let Some(old_tail) = arena.get_mut(&old_tail_id) {
                old_tail.next = Some(order_id);
            }
        } else {
            self.head = Some(order_id);
        }

        if let Some(order) = arena.get_mut(&order_id) {
            order.prev = self.tail;
            order.next = None;
        }
        self.tail = Some(order_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Side;
    use std::collections::HashMap;

    fn order(id: u64, qty: &str) -> Order {
        Order {
            order_id: id,
            account: "0xabc".into(),
            trade_id: "t".into(),
            side: Side::Ask,
            price: "100".parse().unwrap(),
            quantity: qty.parse().unwrap(),
            base_asset: "ETH".into(),
            quote_asset: "USD".into(),
            timestamp: 0,
            private_key: None,
            prev: None,
            next: None,
        }
    }

    #[test]
    fn append_tracks_volume_and_length() {
        let mut arena = HashMap::new();
        let mut level = PriceLevel::new("100".parse().unwrap());
        let mut o1 = order(1, "2");
        level.append_order(&mut o1, &mut arena);
        arena.insert(1, o1);
        let mut o2 = order(2, "3");
        level.append_order(&mut o2, &mut arena);
        arena.insert(2, o2);

        assert_eq!(level.length(), 2);
        assert_eq!(level.volume().to_string(), "5.00000000");
        assert_eq!(level.head(), Some(1));
        assert_eq!(level.tail(), Some(2));
    }

    #[test]
    fn remove_head_advances_head_pointer() {
        let mut arena = HashMap::new();
        let mut level = PriceLevel::new("100".parse().unwrap());
        let mut o1 = order(1, "2");
        level.append_order(&mut o1, &mut arena);
        arena.insert(1, o1);
        let mut o2 = order(2, "3");
        level.append_order(&mut o2, &mut arena);
        arena.insert(2, o2);

        let removed = arena.get(&1).unwrap().clone();
        level.remove_order(&removed, &mut arena);

        assert_eq!(level.head(), Some(2));
        assert_eq!(level.length(), 1);
        assert_eq!(level.volume().to_string(), "3.00000000");
    }

    #[test]
    fn remove_last_order_empties_level() {
        let mut arena = HashMap::new();
        let mut level = PriceLevel::new("100".parse().unwrap());
        let mut o1 = order(1, "2");
        level.append_order(&mut o1, &mut arena);
        arena.insert(1, o1);

        let removed = arena.get(&1).unwrap().clone();
        level.remove_order(&removed, &mut arena);

        assert!(level.is_empty());
        assert_eq!(level.head(), None);
        assert_eq!(level.tail(), None);
    }
}
