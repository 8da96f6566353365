use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ultimate_matching::{ask, bid, Book};

fn enqueue_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("book_enqueue");

    group.bench_function("enqueue_order", |b| {
        let mut book = Book::new();
        let mut price_offset = 0i64;
        b.iter(|| {
            price_offset += 1;
            let order = bid("AAPL", 100.0 + (price_offset % 500) as f64, 1).unwrap();
            book.enqueue_order(black_box(order)).unwrap();
        });
    });

    group.bench_function("snapshot_depth_5", |b| {
        let mut book = Book::new();
        for i in 0..200 {
            book.enqueue_order(bid("AAPL", 100.0 - i as f64, 1).unwrap()).unwrap();
            book.enqueue_order(ask("AAPL", 200.0 + i as f64, 1).unwrap()).unwrap();
        }
        b.iter(|| {
            black_box(book.snapshot(black_box("AAPL"), 5));
        });
    });

    group.finish();
}

fn matching_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("book_match");

    group.bench_function("match_against_single_level", |b| {
        let mut book = Book::new();
        b.iter(|| {
            book.enqueue_order(bid("AAPL", 100.0, 1).unwrap()).unwrap();
            let incoming = ask("AAPL", 100.0, 1).unwrap();
            black_box(book.match_order(black_box(incoming)));
        });
    });

    group.bench_function("sweep_five_levels", |b| {
        b.iter_batched(
            || {
                let mut book = Book::new();
                for i in 0..5 {
                    book.enqueue_order(ask("AAPL", 100.0 + i as f64, 20).unwrap()).unwrap();
                }
                book
            },
            |mut book| {
                black_box(book.match_order(bid("AAPL", 110.0, 100).unwrap()));
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, enqueue_benchmark, matching_benchmark);
criterion_main!(benches);
