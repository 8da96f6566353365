//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Core value types shared across the engine: the Side tag and its pure
// algebra, Order and its derived status, Trade, and the per-order Blotter.
//
// | Section            | Description                                                      |
// |--------------------|------------------------------------------------------------------|
// | Side               | Two-valued tag plus other/crosses/fill_price.                    |
// | OrderStatus        | Derived from (quantity, original_quantity).                      |
// | Order               | Identity + residual quantity; bid/ask constructors.              |
// | Trade / Blotter     | Per-fill record and per-aggressor trade report.                  |
// | Potential Errors    | TypeError for construction failures.                             |
// | TESTS               | Unit tests for Side algebra, Order status, Blotter derivation.   |
//--------------------------------------------------------------------------------------------------
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// A buy order, resting at or below the book's best bid.
    Bid,
    /// A sell order, resting at or above the book's best ask.
    Ask,
}

impl Side {
    /// The opposing side: the book an incoming order of this side matches against.
    pub fn other(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Whether an incoming order of this side at `incoming_price` can trade
    /// against a resting order at `resting_price`.
    pub fn crosses(self, incoming_price: Decimal, resting_price: Decimal) -> bool {
        match self {
            Side::Bid => incoming_price >= resting_price,
            Side::Ask => incoming_price <= resting_price,
        }
    }

    /// The trade price when this side is the aggressor: the resting price
    /// always wins (price improvement to the aggressor).
    pub fn fill_price(self, incoming_price: Decimal, resting_price: Decimal) -> Decimal {
        match self {
            Side::Bid => incoming_price.min(resting_price),
            Side::Ask => incoming_price.max(resting_price),
        }
    }
}

/// Lifecycle status of an order, derived from `(quantity, original_quantity)`
/// rather than stored — see [`Order::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// `quantity == original_quantity`: untouched by any match.
    Queued,
    /// `0 < quantity < original_quantity`.
    PartialFill,
    /// `quantity == 0`.
    Filled,
}

/// Errors raised at order construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// `quantity` was zero at construction.
    #[error("invalid order: quantity must be > 0, got {0}")]
    InvalidOrder(i64),
    /// `symbol` was empty.
    #[error("invalid order: symbol must be non-empty")]
    EmptySymbol,
    /// `price` was not a finite, positive number.
    #[error("invalid order: price must be a positive finite number, got {0}")]
    InvalidPrice(String),
}

/// An immutable identity with a mutable residual quantity.
///
/// `price` and `original_quantity` never change after construction; `quantity`
/// only ever decreases, down to (and including) zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub side: Side,
    pub symbol: String,
    pub price: Decimal,
    pub quantity: u64,
    pub original_quantity: u64,
}

impl Order {
    fn new(side: Side, symbol: &str, price: f64, quantity: u64) -> Result<Self, TypeError> {
        if quantity == 0 {
            return Err(TypeError::InvalidOrder(0));
        }
        if symbol.is_empty() {
            return Err(TypeError::EmptySymbol);
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(TypeError::InvalidPrice(price.to_string()));
        }
        // Textual round-trip avoids binary float drift: 10.1 becomes the
        // decimal "10.1", not the nearest base-2 approximation.
        let price = Decimal::from_str(&price.to_string())
            .map_err(|_| TypeError::InvalidPrice(price.to_string()))?;
        Ok(Order {
            id: Uuid::new_v4(),
            side,
            symbol: symbol.to_string(),
            price,
            quantity,
            original_quantity: quantity,
        })
    }

    /// Status derived from the current residual quantity.
    pub fn status(&self) -> OrderStatus {
        if self.quantity == 0 {
            OrderStatus::Filled
        } else if self.quantity < self.original_quantity {
            OrderStatus::PartialFill
        } else {
            OrderStatus::Queued
        }
    }
}

/// Construct a buy-side limit order. Fails with [`TypeError::InvalidOrder`]
/// if `quantity == 0`.
pub fn bid(symbol: &str, price: f64, quantity: u64) -> Result<Order, TypeError> {
    Order::new(Side::Bid, symbol, price, quantity)
}

/// Construct a sell-side limit order. Fails with [`TypeError::InvalidOrder`]
/// if `quantity == 0`.
pub fn ask(symbol: &str, price: f64, quantity: u64) -> Result<Order, TypeError> {
    Order::new(Side::Ask, symbol, price, quantity)
}

/// A single execution between an incoming order and a resting order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trade {
    pub incoming_order_id: Uuid,
    pub standing_order_id: Uuid,
    pub fill_quantity: u64,
    pub fill_price: Decimal,
}

/// The per-aggressor trade report returned by `Book::match_order`.
#[derive(Debug, Clone, PartialEq)]
pub struct Blotter {
    pub order: Order,
    pub trades: Vec<Trade>,
    /// `Σ fill_quantity · fill_price`, rounded to 2 decimal places. `0` when `trades` is empty.
    pub total_cost: Decimal,
    /// Simple arithmetic mean of the per-trade fill prices — **not** a
    /// quantity-weighted VWAP. `0` when `trades` is empty.
    pub average_price: Decimal,
}

impl Blotter {
    pub fn new(order: Order, trades: Vec<Trade>) -> Self {
        if trades.is_empty() {
            return Blotter {
                order,
                trades,
                total_cost: Decimal::ZERO,
                average_price: Decimal::ZERO,
            };
        }
        let total_cost: Decimal = trades
            .iter()
            .map(|t| t.fill_price * Decimal::from(t.fill_quantity))
            .sum::<Decimal>()
            .round_dp(2);
        let price_sum: Decimal = trades.iter().map(|t| t.fill_price).sum();
        let average_price = price_sum / Decimal::from(trades.len() as u64);
        Blotter {
            order,
            trades,
            total_cost,
            average_price,
        }
    }
}
