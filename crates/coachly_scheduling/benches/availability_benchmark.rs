use coachly_scheduling::availability::available_slots;
use coachly_scheduling::models::{BusyInterval, BusySource, MINUTES_PER_DAY};
use coachly_scheduling::slots::slot_catalog;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// Helper function to create an evenly spread busy set
fn create_busy_intervals(count: usize, length_minutes: i32) -> Vec<BusyInterval> {
    let mut intervals = Vec::with_capacity(count);
    if count == 0 {
        return intervals;
    }
    let stride = MINUTES_PER_DAY / count as i32;
    for i in 0..count {
        let start = i as i32 * stride;
        intervals.push(BusyInterval::new(
            start,
            (start + length_minutes).min(MINUTES_PER_DAY),
            BusySource::InternalBooking,
        ));
    }
    intervals
}

fn benchmark_available_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("available_slots");
    let catalog = slot_catalog();

    group.bench_function("no_busy_intervals", |b| {
        let busy = Vec::new();
        b.iter(|| available_slots(black_box(&catalog), black_box(&busy), black_box(60)))
    });

    group.bench_function("few_busy_intervals", |b| {
        let busy = create_busy_intervals(5, 90);
        b.iter(|| available_slots(black_box(&catalog), black_box(&busy), black_box(60)))
    });

    group.bench_function("many_busy_intervals", |b| {
        let busy = create_busy_intervals(40, 30);
        b.iter(|| available_slots(black_box(&catalog), black_box(&busy), black_box(60)))
    });

    group.bench_function("long_duration", |b| {
        let busy = create_busy_intervals(5, 90);
        b.iter(|| available_slots(black_box(&catalog), black_box(&busy), black_box(240)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_available_slots);
criterion_main!(benches);
