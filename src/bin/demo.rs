//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Demo entry point for the matching engine. `scenarios` walks through the
// end-to-end examples the core is tested against; `replay`/`ingest` drive a
// fresh book from a CSV file and print a Level-2 snapshot.
//
// To run the walkthrough:  cargo run --bin demo -- scenarios
// To replay a file:        cargo run --bin demo -- replay orders.csv --symbol AAPL
// To ingest a file:        cargo run --bin demo -- ingest orders.csv --symbol AAPL
//--------------------------------------------------------------------------------------------------
use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};

use ultimate_matching::config::{Command, Config};
use ultimate_matching::{ask, bid, Book, Snapshot};

fn print_snapshot(symbol: &str, snapshot: Option<Snapshot>) {
    match snapshot {
        None => info!("{symbol}: no orders seen yet"),
        Some(snap) => {
            info!("{symbol} L2 snapshot:");
            for level in &snap.bids {
                info!("  bid {} @ {}", level.quantity, level.price);
            }
            for level in &snap.asks {
                info!("  ask {} @ {}", level.quantity, level.price);
            }
            if let Some(spread) = snap.spread {
                info!("  spread: {spread}");
            }
            if let Some(mid) = snap.midpoint {
                info!("  midpoint: {mid}");
            }
        }
    }
}

fn run_scenarios() {
    let mut book = Book::new();

    // 1. Sweep: a multi-level ask book crossed by one large bid.
    book.enqueue_order(ask("AAPL", 150.0, 100).unwrap()).unwrap();
    book.enqueue_order(ask("AAPL", 151.0, 50).unwrap()).unwrap();
    book.enqueue_order(ask("AAPL", 152.0, 200).unwrap()).unwrap();
    let sweep = book.match_order(bid("AAPL", 155.0, 120).unwrap());
    info!(
        "sweep: {} trades, total_cost={}",
        sweep.trades.len(),
        sweep.total_cost
    );

    // 2. Partial aggressor against the level left behind by the sweep.
    let partial = book.match_order(bid("AAPL", 151.5, 25).unwrap());
    info!("partial aggressor: {} trades", partial.trades.len());

    // 3. FIFO at a level.
    book.enqueue_order(bid("TSLA", 200.0, 50).unwrap()).unwrap();
    book.enqueue_order(bid("TSLA", 200.0, 50).unwrap()).unwrap();
    let fifo = book.match_order(ask("TSLA", 200.0, 60).unwrap());
    info!("fifo: {} trades", fifo.trades.len());

    // 4. Cancel.
    let resting = bid("AAPL", 140.0, 500).unwrap();
    let id = resting.id;
    book.enqueue_order(resting).unwrap();
    book.cancel(id).unwrap();
    let after_cancel = book.match_order(ask("AAPL", 140.0, 10).unwrap());
    info!("cancel: {} trades after cancelling the only bid", after_cancel.trades.len());

    // 5. Multi-symbol isolation.
    book.enqueue_order(ask("GOOG", 100.0, 50).unwrap()).unwrap();
    let isolated = book.match_order(bid("MSFT", 200.0, 50).unwrap());
    info!("isolation: {} trades across symbols", isolated.trades.len());

    // 6. Snapshot.
    print_snapshot("AAPL", book.snapshot("AAPL", 5));
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    match config.command {
        Command::Scenarios => {
            info!("running matching engine walkthrough scenarios");
            run_scenarios();
        }
        Command::Replay { file, symbol, depth } => {
            let mut book = Book::new();
            let blotters = ultimate_matching::replay_orders(&mut book, &file)
                .with_context(|| format!("replaying {}", file.display()))?;
            let trades: usize = blotters.iter().map(|b| b.trades.len()).sum();
            info!("replayed {} rows, {} trades", blotters.len(), trades);
            print_snapshot(&symbol, book.snapshot(&symbol, depth));
        }
        Command::Ingest { file, symbol, depth } => {
            let book = ultimate_matching::book_from_ingest(&file)
                .with_context(|| format!("ingesting {}", file.display()))?;
            print_snapshot(&symbol, book.snapshot(&symbol, depth));
        }
    }
    Ok(())
}
