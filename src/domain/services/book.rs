//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Book is the engine's single stateful object: a per-symbol, per-side heap
// of price levels, a price -> level map per side, and a process-wide
// order-id -> location index for O(1) cancel. Book::match_order is the
// matching engine itself — there is no separate MatchingEngine type, since
// the spec models matching as one method on Book.
//
// | Section       | Description                                                       |
// |---------------|--------------------------------------------------------------------|
// | BookError     | Cancel/invariant failure modes.                                   |
// | SideBook      | Heap + price map for one side of one symbol.                      |
// | Book          | Public surface: match, cancel, enqueue, get_order, get_level, snapshot. |
// | TESTS         | Sweep, partial fill, FIFO, cancel, multi-symbol isolation, snapshot. |
//--------------------------------------------------------------------------------------------------
use std::collections::{BinaryHeap, HashMap};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, trace};
use uuid::Uuid;

use super::super::models::types::{Blotter, Order, Side, Trade};
use super::order_queue::OrderQueue;
use super::price_level::{PriceLevel, PriceRank};
use super::snapshot::{vwap, Snapshot, SnapshotLevel};

pub const DEFAULT_SNAPSHOT_DEPTH: i64 = 5;

/// Failure modes surfaced by [`Book`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookError {
    /// `cancel` of an id not present in the book.
    #[error("order {0} not found")]
    NotFound(Uuid),
    /// `enqueue_order` of an id already present (programmer error).
    #[error("order {0} already present in the book")]
    Duplicate(Uuid),
    /// An internal inconsistency: the location index claims an order lives
    /// at a level the price map no longer has. Fatal; abort the call.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Default)]
struct SideBook {
    heap: BinaryHeap<PriceRank>,
    levels: HashMap<Decimal, PriceLevel>,
}

impl SideBook {
    fn new() -> Self {
        SideBook {
            heap: BinaryHeap::new(),
            levels: HashMap::new(),
        }
    }

    /// A level at `price` is reused as long as the map still has one for it,
    /// empty or not, so a cancel-to-empty followed by a fresh order at the
    /// same price never pushes a second heap entry for that price.
    fn level_for(&mut self, side: Side, price: Decimal) -> &mut PriceLevel {
        if !self.levels.contains_key(&price) {
            self.heap.push(PriceRank { side, price });
            self.levels.insert(price, PriceLevel::new(side, price));
        }
        self.levels.get_mut(&price).unwrap()
    }

    /// Top non-stale level, without mutating the book: lazily pops any
    /// heap entries whose level is missing from the map *or* present but
    /// drained empty (by a cancel that emptied it while off the heap top),
    /// finalizing the eviction for the latter case.
    fn clean_top(&mut self) -> Option<Decimal> {
        loop {
            let top = *self.heap.peek()?;
            match self.levels.get(&top.price) {
                Some(level) if !level.is_empty() => return Some(top.price),
                _ => {
                    self.heap.pop();
                    self.levels.remove(&top.price);
                }
            }
        }
    }

    fn evict(&mut self, price: Decimal) {
        self.levels.remove(&price);
        if self.heap.peek().map(|r| r.price) == Some(price) {
            self.heap.pop();
        }
    }
}

#[derive(Default)]
struct SymbolBook {
    bid: SideBook,
    ask: SideBook,
}

impl SymbolBook {
    fn new() -> Self {
        SymbolBook {
            bid: SideBook::new(),
            ask: SideBook::new(),
        }
    }

    fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Bid => &self.bid,
            Side::Ask => &self.ask,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Bid => &mut self.bid,
            Side::Ask => &mut self.ask,
        }
    }
}

#[derive(Clone, Copy)]
struct OrderLocation {
    side: Side,
    price: Decimal,
}

/// A single process-lifetime, single-threaded order book spanning any
/// number of symbols.
#[derive(Default)]
pub struct Book {
    symbols: HashMap<String, SymbolBook>,
    locations: HashMap<Uuid, (String, OrderLocation)>,
}

impl Book {
    pub fn new() -> Self {
        Book {
            symbols: HashMap::new(),
            locations: HashMap::new(),
        }
    }

    /// Matches `order` against the opposing side of its symbol's book,
    /// inserting any residual quantity as a new standing order.
    pub fn match_order(&mut self, mut order: Order) -> Blotter {
        let symbol = order.symbol.clone();
        let incoming_side = order.side;
        let resting_side = incoming_side.other();
        let mut trades = Vec::new();

        let symbol_book = self.symbols.entry(symbol.clone()).or_insert_with(SymbolBook::new);
        let side_book = symbol_book.side_mut(resting_side);

        while order.quantity > 0 {
            let Some(top_price) = side_book.clean_top() else {
                break;
            };
            if !incoming_side.crosses(order.price, top_price) {
                break;
            }

            let level = side_book.levels.get_mut(&top_price).unwrap();
            while order.quantity > 0 && !level.is_empty() {
                let standing_id = level.orders.peek().unwrap().id;
                let standing_price = level.orders.peek().unwrap().price;
                let standing = level.orders.peek_mut().unwrap();
                let fill_quantity = order.quantity.min(standing.quantity);
                let fill_price = incoming_side.fill_price(order.price, standing_price);

                trades.push(Trade {
                    incoming_order_id: order.id,
                    standing_order_id: standing_id,
                    fill_quantity,
                    fill_price,
                });
                order.quantity -= fill_quantity;
                standing.quantity -= fill_quantity;

                if standing.quantity == 0 {
                    level.orders.pop_front().expect("front order just matched");
                    self.locations.remove(&standing_id);
                }
            }

            if level.is_empty() {
                side_book.evict(top_price);
            }
        }

        if order.quantity > 0 {
            let id = order.id;
            let location = OrderLocation {
                side: incoming_side,
                price: order.price,
            };
            let level = symbol_book.side_mut(incoming_side).level_for(incoming_side, order.price);
            level.orders.append(order.clone()).expect("fresh order id cannot collide");
            self.locations.insert(id, (symbol.clone(), location));
            debug!(order_id = %id, %symbol, ?incoming_side, "order rests in book");
        } else {
            trace!(order_id = %order.id, %symbol, "order fully filled");
        }

        Blotter::new(order, trades)
    }

    /// Sequentially matches each order in `orders`, in order. No atomicity
    /// beyond per-order atomicity.
    pub fn match_orders(&mut self, orders: Vec<Order>) -> Vec<Blotter> {
        orders.into_iter().map(|o| self.match_order(o)).collect()
    }

    /// Inserts `order` directly without matching — used to replay
    /// pre-matched standing orders.
    pub fn enqueue_order(&mut self, order: Order) -> Result<(), BookError> {
        if self.locations.contains_key(&order.id) {
            return Err(BookError::Duplicate(order.id));
        }
        let id = order.id;
        let symbol = order.symbol.clone();
        let location = OrderLocation {
            side: order.side,
            price: order.price,
        };
        let symbol_book = self.symbols.entry(symbol.clone()).or_insert_with(SymbolBook::new);
        let level = symbol_book.side_mut(order.side).level_for(order.side, order.price);
        level.orders.append(order).map_err(|_| BookError::Duplicate(id))?;
        self.locations.insert(id, (symbol, location));
        Ok(())
    }

    /// Removes a standing order from the book.
    pub fn cancel(&mut self, order_id: Uuid) -> Result<Order, BookError> {
        let (symbol, location) = self
            .locations
            .remove(&order_id)
            .ok_or(BookError::NotFound(order_id))?;
        let symbol_book = self.symbols.get_mut(&symbol).ok_or_else(|| {
            BookError::InvariantViolation(format!(
                "order {order_id} indexed under unknown symbol {symbol}"
            ))
        })?;
        let side_book = symbol_book.side_mut(location.side);
        let level = side_book.levels.get_mut(&location.price).ok_or_else(|| {
            BookError::InvariantViolation(format!(
                "order {order_id} indexed at a price level missing from the book"
            ))
        })?;
        let removed = level.orders.pop(order_id).map_err(|_| {
            BookError::InvariantViolation(format!(
                "order {order_id} indexed at a level that does not contain it"
            ))
        })?;
        // The (now possibly empty) level is left in the map for reuse by a
        // future order at the same price, and the heap is not touched here;
        // both become stale only once this price resurfaces at the heap top
        // (see `clean_top`), which is what evicts it for real.
        Ok(removed)
    }

    /// Looks up a live order by id.
    pub fn get_order(&self, order_id: Uuid) -> Option<&Order> {
        let (symbol, location) = self.locations.get(&order_id)?;
        let symbol_book = self.symbols.get(symbol)?;
        let level = symbol_book.side(location.side).levels.get(&location.price)?;
        level.orders.get(order_id)
    }

    /// Looks up the price level at `(symbol, side, price)`, if it currently has resting orders.
    pub fn get_level(&self, symbol: &str, side: Side, price: Decimal) -> Option<&PriceLevel> {
        let level = self.symbols.get(symbol)?.side(side).levels.get(&price)?;
        if level.is_empty() {
            None
        } else {
            Some(level)
        }
    }

    /// A top-N, non-destructive Level-2 view of `symbol`, or `None` if the
    /// symbol has never been seen.
    pub fn snapshot(&self, symbol: &str, depth: i64) -> Option<Snapshot> {
        let depth = depth.max(0) as usize;
        let symbol_book = self.symbols.get(symbol)?;
        let bids = Self::extract_levels(&symbol_book.bid, depth);
        let asks = Self::extract_levels(&symbol_book.ask, depth);

        let spread = match (bids.first(), asks.first()) {
            (Some(b), Some(a)) => Some(a.price - b.price),
            _ => None,
        };
        let midpoint = match (bids.first(), asks.first()) {
            (Some(b), Some(a)) => Some((a.price + b.price) / Decimal::from(2)),
            _ => None,
        };
        let bid_vwap = vwap(&bids);
        let ask_vwap = vwap(&asks);

        Some(Snapshot {
            bids,
            asks,
            spread,
            midpoint,
            bid_vwap,
            ask_vwap,
        })
    }

    /// Extracts up to `depth` non-stale levels, best-first, without
    /// mutating the live heap: operates on a clone, which is cheap since
    /// the heap only holds `PriceRank` keys, never order data. A price
    /// appears in the heap at most once (see `level_for`), so each rank
    /// that survives the stale check below contributes exactly one row.
    fn extract_levels(side_book: &SideBook, depth: usize) -> Vec<SnapshotLevel> {
        let mut heap_copy = side_book.heap.clone();
        let mut out = Vec::with_capacity(depth.min(heap_copy.len()));
        while out.len() < depth {
            let Some(rank) = heap_copy.pop() else {
                break;
            };
            let Some(level) = side_book.levels.get(&rank.price) else {
                continue; // stale entry in the copy; skip
            };
            if level.is_empty() {
                continue; // emptied by a cancel, not yet evicted from the heap
            }
            out.push(SnapshotLevel {
                price: rank.price,
                quantity: level.volume(),
            });
        }
        out
    }
}
