//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// One side (bids or asks) of an `OrderBook`: an ordered price -> `PriceLevel` map plus the arena
// that owns every resting `Order` on this side, keyed by order id. The tree gives O(log n)
// best-price lookup; the arena gives O(1) id lookup. `PriceLevel` only stores links into the
// arena, so the two structures stay in lock-step through `insert_order`/`remove_order_by_id`.
//
// | Component | Description                                            | Key Methods          |
// |-----------|----------------------------------------------------------|----------------------|
// | SideBook  | price_tree + order arena for one side of one symbol        | insert_order         |
// |           |                                                            | remove_order_by_id   |
// |           |                                                            | best_price           |
//--------------------------------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap};

use crate::domain::models::{Decimal, Order, Side};

use super::price_level::PriceLevel;

#[derive(Debug, Clone)]
pub struct SideBook {
    side: Side,
    price_tree: BTreeMap<Decimal, PriceLevel>,
    order_map: HashMap<u64, Order>,
    volume: Decimal,
}

impl SideBook {
    pub fn new(side: Side) -> Self {
        SideBook {
            side,
            price_tree: BTreeMap::new(),
            order_map: HashMap::new(),
            volume: Decimal::ZERO,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_empty(&self) -> bool {
        self.order_map.is_empty()
    }

    pub fn num_orders(&self) -> usize {
        self.order_map.len()
    }

    pub fn depth(&self) -> usize {
        self.price_tree.len()
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        self.order_map.get(&order_id)
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.order_map.values()
    }

    /// Best price for this side: the highest bid, or the lowest ask.
    pub fn best_price(&self) -> Option<Decimal> {
        match self.side {
            Side::Bid => self.max_price(),
            Side::Ask => self.min_price(),
        }
    }

    pub fn min_price(&self) -> Option<Decimal> {
        self.price_tree.keys().next().copied()
    }

    pub fn max_price(&self) -> Option<Decimal> {
        self.price_tree.keys().next_back().copied()
    }

    pub fn price_list(&self, price: Decimal) -> Option<&PriceLevel> {
        self.price_tree.get(&price)
    }

    /// Iterates price levels in ascending price order (the tree's natural order).
    pub fn price_levels(&self) -> impl Iterator<Item = (&Decimal, &PriceLevel)> {
        self.price_tree.iter()
    }

    pub fn volume_at_price(&self, price: Decimal) -> Decimal {
        self.price_tree
            .get(&price)
            .map(PriceLevel::volume)
            .unwrap_or(Decimal::ZERO)
    }

    /// The head order of the current best level, i.e. the order a counterparty would trade
    /// against next.
    pub fn best_order(&self) -> Option<&Order> {
        let price = self.best_price()?;
        let level = self.price_tree.get(&price)?;
        let head_id = level.head()?;
        self.order_map.get(&head_id)
    }

    /// Inserts a freshly-validated order at its price, creating the level if needed.
    pub fn insert_order(&mut self, mut order: Order) {
        debug_assert_eq!(order.side, self.side, "order routed to the wrong SideBook");
        let price = order.price;
        let quantity = order.quantity;
        let level = self
            .price_tree
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price));
        level.append_order(&mut order, &mut self.order_map);
        self.order_map.insert(order.order_id, order);
        self.volume += quantity;
    }

    /// Removes an order by id, pruning its `PriceLevel` if it is now empty. Returns the removed
    /// order (its state *before* removal), or `None` if the id is not resting on this side.
    pub fn remove_order_by_id(&mut self, order_id: u64) -> Option<Order> {
        let order = self.order_map.remove(&order_id)?;
        if let Some(level) = self.price_tree.get_mut(&order.price) {
            level.remove_order(&order, &mut self.order_map);
            if level.is_empty() {
                self.price_tree.remove(&order.price);
            }
        }
        self.volume -= order.quantity;
        Some(order)
    }

    /// Shrinks a resting order's quantity in place (partial fill against its head position);
    /// the order keeps its place in the FIFO queue.
    pub fn reduce_quantity(&mut self, order_id: u64, traded_qty: Decimal) {
        let Some(order) = self.order_map.get_mut(&order_id) else {
            return;
        };
        order.quantity = order.quantity - traded_qty;
        let price = order.price;
        if let Some(level) = self.price_tree.get_mut(&price) {
            level.reduce_volume(traded_qty);
        }
        self.volume -= traded_qty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: u64, side: Side, price: &str, qty: &str, account: &str) -> Order {
        Order {
            order_id: id,
            account: account.to_string(),
            trade_id: "t".into(),
            side,
            price: price.parse().unwrap(),
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
    fn best_price_is_max_for_bids_min_for_asks() {
        let mut bids = SideBook::new(Side::Bid);
        bids.insert_order(order(1, Side::Bid, "99", "1", "a"));
        bids.insert_order(order(2, Side::Bid, "101", "1", "a"));
        assert_eq!(bids.best_price().unwrap().to_string(), "101.00000000");

        let mut asks = SideBook::new(Side::Ask);
        asks.insert_order(order(3, Side::Ask, "105", "1", "a"));
        asks.insert_order(order(4, Side::Ask, "103", "1", "a"));
        assert_eq!(asks.best_price().unwrap().to_string(), "103.00000000");
    }

    #[test]
    fn removing_last_order_at_a_price_prunes_the_level() {
        let mut bids = SideBook::new(Side::Bid);
        bids.insert_order(order(1, Side::Bid, "100", "5", "a"));
        assert_eq!(bids.depth(), 1);
        bids.remove_order_by_id(1);
        assert_eq!(bids.depth(), 0);
        assert!(bids.is_empty());
    }

    #[test]
    fn volume_tracks_insert_remove_and_partial_fill() {
        let mut bids = SideBook::new(Side::Bid);
        bids.insert_order(order(1, Side::Bid, "100", "5", "a"));
        bids.insert_order(order(2, Side::Bid, "100", "3", "a"));
        assert_eq!(bids.volume().to_string(), "8.00000000");

        bids.reduce_quantity(1, "2".parse().unwrap());
        assert_eq!(bids.volume().to_string(), "6.00000000");
        assert_eq!(bids.get_order(1).unwrap().quantity.to_string(), "3.00000000");

        bids.remove_order_by_id(2);
        assert_eq!(bids.volume().to_string(), "3.00000000");
    }

    #[test]
    fn fifo_order_within_a_level_is_preserved() {
        let mut asks = SideBook::new(Side::Ask);
        asks.insert_order(order(1, Side::Ask, "100", "2", "a"));
        asks.insert_order(order(2, Side::Ask, "100", "2", "a"));
        let level = asks.price_list("100".parse().unwrap()).unwrap();
        assert_eq!(level.head(), Some(1));
        assert_eq!(level.tail(), Some(2));
    }
}
