//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The read-only view `get_orderbook` hands back: bids descending, asks ascending, each price
// collapsed to its aggregate resting quantity (spec 4.4.5).
//--------------------------------------------------------------------------------------------------

use crate::domain::models::Decimal;

use super::side_book::SideBook;

/// One (price, aggregate quantity) pair in a depth snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

/// A full two-sided depth snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthSnapshot {
    pub symbol: String,
    /// Highest price first.
    pub bids: Vec<PriceLevel>,
    /// Lowest price first.
    pub asks: Vec<PriceLevel>,
}

pub(super) fn bids_snapshot(book: &SideBook) -> Vec<PriceLevel> {
    let mut levels: Vec<PriceLevel> = book
        .price_levels()
        .map(|(price, level)| PriceLevel {
            price: *price,
            quantity: level.volume(),
        })
        .collect();
    levels.reverse();
    levels
}

pub(super) fn asks_snapshot(book: &SideBook) -> Vec<PriceLevel> {
    book.price_levels()
        .map(|(price, level)| PriceLevel {
            price: *price,
            quantity: level.volume(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Order, Side};

    fn order(id: u64, side: Side, price: &str, qty: &str) -> Order {
        Order {
            order_id: id,
            account: "0xabc".into(),
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
    fn bids_snapshot_is_descending_asks_ascending() {
        let mut bids = SideBook::new(Side::Bid);
        bids.insert_order(order(1, Side::Bid, "99", "1"));
        bids.insert_order(order(2, Side::Bid, "101", "2"));
        bids.insert_order(order(3, Side::Bid, "100", "3"));
        let snapshot = bids_snapshot(&bids);
        let prices: Vec<String> = snapshot.iter().map(|l| l.price.to_string()).collect();
        assert_eq!(prices, vec!["101.00000000", "100.00000000", "99.00000000"]);

        let mut asks = SideBook::new(Side::Ask);
        asks.insert_order(order(4, Side::Ask, "105", "1"));
        asks.insert_order(order(5, Side::Ask, "103", "2"));
        let snapshot = asks_snapshot(&asks);
        let prices: Vec<String> = snapshot.iter().map(|l| l.price.to_string()).collect();
        assert_eq!(prices, vec!["103.00000000", "105.00000000"]);
    }

    #[test]
    fn aggregates_quantity_within_a_price() {
        let mut bids = SideBook::new(Side::Bid);
        bids.insert_order(order(1, Side::Bid, "100", "2"));
        bids.insert_order(order(2, Side::Bid, "100", "3"));
        let snapshot = bids_snapshot(&bids);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity.to_string(), "5.00000000");
    }
}
