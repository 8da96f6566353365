//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Read-only Level-2 value types. The aggregation itself lives on Book,
// which is the only thing that can walk the heap/map pair; this module
// just carries the result.
//--------------------------------------------------------------------------------------------------
use rust_decimal::Decimal;

/// One aggregated price level in a snapshot: the price and the summed
/// residual quantity of every order resting there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotLevel {
    pub price: Decimal,
    pub quantity: u64,
}

/// A top-N, non-destructive view over both sides of one symbol's book.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Best-first (highest price first).
    pub bids: Vec<SnapshotLevel>,
    /// Best-first (lowest price first).
    pub asks: Vec<SnapshotLevel>,
    pub spread: Option<Decimal>,
    pub midpoint: Option<Decimal>,
    pub bid_vwap: Option<Decimal>,
    pub ask_vwap: Option<Decimal>,
}

/// `Σ(price·qty) / Σ(qty)` over the given levels, or `None` if empty.
pub fn vwap(levels: &[SnapshotLevel]) -> Option<Decimal> {
    if levels.is_empty() {
        return None;
    }
    let total_qty: u64 = levels.iter().map(|l| l.quantity).sum();
    if total_qty == 0 {
        return None;
    }
    let weighted: Decimal = levels
        .iter()
        .map(|l| l.price * Decimal::from(l.quantity))
        .sum();
    Some(weighted / Decimal::from(total_qty))
}
