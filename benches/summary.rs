use criterion::{black_box, criterion_group, criterion_main, Criterion};

use seat_reservation::catalog::SeatCatalog;
use seat_reservation::config::HallConfig;
use seat_reservation::models::SeatId;
use seat_reservation::services::SeatSelectionEngine;
use seat_reservation::storage::MemoryStore;

fn large_hall() -> SeatCatalog {
    SeatCatalog::from_hall(&HallConfig {
        rows: 40,
        seats_per_row: 50,
        base_price: 150,
        row_price_step: 5,
    })
    .expect("hall prices fit into u32")
}

fn bench_summary(c: &mut Criterion) {
    let mut engine = SeatSelectionEngine::new(large_hall(), MemoryStore::new());
    for row in 1..=40 {
        for seat in (1..=50).step_by(5) {
            engine.toggle(SeatId::new(row, seat));
        }
    }

    c.bench_function("compute_summary_400_selected", |b| {
        b.iter(|| black_box(engine.compute_summary()))
    });

    c.bench_function("toggle_recompute_persist", |b| {
        b.iter(|| engine.toggle(black_box(SeatId::new(20, 2))))
    });
}

criterion_group!(benches, bench_summary);
criterion_main!(benches);
