//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A PriceLevel pairs a side and a price with the OrderQueue resting there.
// PriceRank is the lightweight, Copy key the book's heap actually stores:
// the heap only ever needs to compare prices, so it never carries the
// queue's contents — the map (keyed by price) is the source of truth for
// the level's live data, which keeps cloning the heap for a snapshot cheap.
//--------------------------------------------------------------------------------------------------
use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::super::models::types::Side;
use super::order_queue::OrderQueue;

/// All resting orders at a single `(side, price)` within one symbol's book.
pub struct PriceLevel {
    pub side: Side,
    pub price: Decimal,
    pub orders: OrderQueue,
}

impl PriceLevel {
    pub fn new(side: Side, price: Decimal) -> Self {
        PriceLevel {
            side,
            price,
            orders: OrderQueue::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Sum of the residual quantity of every order currently in this level's queue.
    pub fn volume(&self) -> u64 {
        self.orders.iter().map(|o| o.quantity).sum()
    }
}

/// The heap key for one side of one symbol's book: cheap to clone, ordered
/// so the binary heap's top is always the best price for that side (bids:
/// highest price first; asks: lowest price first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRank {
    pub side: Side,
    pub price: Decimal,
}

impl PartialOrd for PriceRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceRank {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.side {
            Side::Bid => self.price.cmp(&other.price),
            Side::Ask => other.price.cmp(&self.price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn bid_ranks_put_highest_price_on_top() {
        let mut heap = BinaryHeap::new();
        heap.push(PriceRank { side: Side::Bid, price: Decimal::from(100) });
        heap.push(PriceRank { side: Side::Bid, price: Decimal::from(102) });
        heap.push(PriceRank { side: Side::Bid, price: Decimal::from(99) });
        assert_eq!(heap.pop().unwrap().price, Decimal::from(102));
    }

    #[test]
    fn ask_ranks_put_lowest_price_on_top() {
        let mut heap = BinaryHeap::new();
        heap.push(PriceRank { side: Side::Ask, price: Decimal::from(100) });
        heap.push(PriceRank { side: Side::Ask, price: Decimal::from(98) });
        heap.push(PriceRank { side: Side::Ask, price: Decimal::from(101) });
        assert_eq!(heap.pop().unwrap().price, Decimal::from(98));
    }

    #[test]
    fn empty_level_reports_zero_volume() {
        let level = PriceLevel::new(Side::Bid, Decimal::from(100));
        assert!(level.is_empty());
        assert_eq!(level.volume(), 0);
    }
}
