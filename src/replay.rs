//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The replay adapter is an external collaborator, not part of the core: it
// decodes rows of a CSV table into Orders and drives a Book through either
// of two modes.
//
// | Section     | Description                                                          |
// |-------------|-----------------------------------------------------------------------|
// | ReplayError | Row-indexed decode/IO failures.                                      |
// | Row         | The on-disk shape: side, symbol, price, quantity.                    |
// | replay      | Each row is an incoming order passed through `Book::match_order`.    |
// | ingest      | Each row is enqueued directly as a standing order.                   |
//--------------------------------------------------------------------------------------------------
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::models::types::{ask, bid, Blotter, Order};
use crate::domain::services::book::Book;

/// Failure modes for the replay/ingest adapter.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to open or read replay file: {0}")]
    Io(#[from] std::io::Error),
    #[error("row {row}: {reason}")]
    InvalidInput { row: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct Row {
    side: String,
    symbol: String,
    price: f64,
    quantity: u64,
}

fn row_to_order(row: Row, index: usize) -> Result<Order, ReplayError> {
    let constructor = match row.side.as_str() {
        "bid" => bid,
        "ask" => ask,
        other => {
            return Err(ReplayError::InvalidInput {
                row: index,
                reason: format!("side must be \"bid\" or \"ask\", got {other:?}"),
            })
        }
    };
    constructor(&row.symbol, row.price, row.quantity).map_err(|e| ReplayError::InvalidInput {
        row: index,
        reason: e.to_string(),
    })
}

fn read_rows(path: &Path) -> Result<Vec<Result<Order, ReplayError>>, ReplayError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut out = Vec::new();
    for (index, record) in reader.deserialize::<Row>().enumerate() {
        let row = record.map_err(|e| ReplayError::InvalidInput {
            row: index,
            reason: e.to_string(),
        });
        out.push(row.and_then(|r| row_to_order(r, index)));
    }
    Ok(out)
}

/// Replays a CSV file against `book`: each row becomes an incoming order
/// passed through `Book::match_order`. Returns one Blotter per row, in row
/// order. Fails fast on the first malformed row.
pub fn replay(book: &mut Book, path: &Path) -> Result<Vec<Blotter>, ReplayError> {
    let orders = read_rows(path)?;
    let mut blotters = Vec::with_capacity(orders.len());
    for order in orders {
        let order = order?;
        blotters.push(book.match_order(order));
    }
    debug!(rows = blotters.len(), "replay complete");
    Ok(blotters)
}

/// Ingests a CSV file directly into `book`: each row is enqueued as a
/// standing order without matching. Returns the number of rows ingested.
pub fn ingest(book: &mut Book, path: &Path) -> Result<usize, ReplayError> {
    let orders = read_rows(path)?;
    let count = orders.len();
    for (index, order) in orders.into_iter().enumerate() {
        let order = order?;
        book.enqueue_order(order).map_err(|e| ReplayError::InvalidInput {
            row: index,
            reason: e.to_string(),
        })?;
    }
    debug!(rows = count, "ingest complete");
    Ok(count)
}

/// Builds a fresh Book directly from an ingest file.
pub fn book_from_ingest(path: &Path) -> Result<Book, ReplayError> {
    let mut book = Book::new();
    ingest(&mut book, path)?;
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn replay_matches_each_row_in_order() {
        let file = write_csv(
            "side,symbol,price,quantity\n\
             ask,AAPL,150.0,100\n\
             bid,AAPL,155.0,50\n",
        );
        let mut book = Book::new();
        let blotters = replay(&mut book, file.path()).unwrap();
        assert_eq!(blotters.len(), 2);
        assert!(blotters[0].trades.is_empty());
        assert_eq!(blotters[1].trades.len(), 1);
    }

    #[test]
    fn ingest_enqueues_without_matching() {
        let file = write_csv(
            "side,symbol,price,quantity\n\
             bid,AAPL,150.0,100\n\
             ask,AAPL,151.0,50\n",
        );
        let mut book = Book::new();
        let count = ingest(&mut book, file.path()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(book.snapshot("AAPL", 5).unwrap().bids.len(), 1);
        assert_eq!(book.snapshot("AAPL", 5).unwrap().asks.len(), 1);
    }

    #[test]
    fn unknown_side_is_invalid_input_with_row_index() {
        let file = write_csv(
            "side,symbol,price,quantity\n\
             bid,AAPL,150.0,100\n\
             sell,AAPL,151.0,50\n",
        );
        let mut book = Book::new();
        let err = replay(&mut book, file.path()).unwrap_err();
        match err {
            ReplayError::InvalidInput { row, .. } => assert_eq!(row, 1),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn zero_quantity_row_is_invalid_input() {
        let file = write_csv(
            "side,symbol,price,quantity\n\
             bid,AAPL,150.0,0\n",
        );
        let mut book = Book::new();
        let err = replay(&mut book, file.path()).unwrap_err();
        assert!(matches!(err, ReplayError::InvalidInput { row: 0, .. }));
    }

    #[test]
    fn book_from_ingest_builds_a_populated_book() {
        let file = write_csv(
            "side,symbol,price,quantity\n\
             bid,AAPL,150.0,100\n",
        );
        let book = book_from_ingest(file.path()).unwrap();
        assert_eq!(book.snapshot("AAPL", 5).unwrap().bids.len(), 1);
    }
}
