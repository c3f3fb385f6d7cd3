//! Benchmarks for dashboard statistics and the feedback store
//!
//! Run with: cargo bench

use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use habesha_feedback::habesha_core::{
    DashboardStats, FeedbackEntry, GuestSubmission, Language, RatingDistribution, Severity,
    StaffCategory, StaffLog,
};
use habesha_feedback::storage::{FeedbackStore, ListFilter};
use tempfile::tempdir;

fn create_test_entries(count: usize) -> Vec<FeedbackEntry> {
    (0..count)
        .map(|i| {
            let at = DateTime::from_timestamp_millis(1_700_000_000_000 + i as i64 * 1000)
                .unwrap_or_else(Utc::now);
            if i % 3 == 0 {
                let log = StaffLog {
                    category: Some(StaffCategory::ALL[i % StaffCategory::ALL.len()]),
                    severity: Some(Severity::ALL[i % Severity::ALL.len()]),
                    location: Some(format!("Room {}", i % 40)),
                    details: "Guest mentioned the wifi".to_string(),
                };
                FeedbackEntry::staff(format!("s{}", i), at, &log)
            } else {
                let sub = GuestSubmission {
                    rating: (i % 5) as u8 + 1,
                    comment: "Lovely coffee ceremony".to_string(),
                    room_number: Some(format!("{}", 100 + i % 40)),
                    language: Language::Eng,
                };
                FeedbackEntry::guest(format!("g{}", i), at, &sub)
            }
        })
        .collect()
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for size in [100, 1000, 10000] {
        let entries = create_test_entries(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("compute_{}", size), |b| {
            b.iter(|| DashboardStats::compute(black_box(&entries)))
        });

        group.bench_function(format!("distribution_{}", size), |b| {
            b.iter(|| RatingDistribution::from_entries(black_box(&entries)))
        });
    }

    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    group.bench_function("insert_single", |b| {
        let dir = tempdir().unwrap();
        let store = FeedbackStore::open(&dir.path().join("bench.db")).unwrap();
        let entries = create_test_entries(1);
        let mut n = 0u64;

        b.iter(|| {
            let mut entry = entries[0].clone();
            entry.id = format!("bench-{}", n);
            n += 1;
            store.insert(black_box(&entry)).unwrap()
        });
    });

    group.bench_function("list_1000", |b| {
        let store = FeedbackStore::in_memory().unwrap();
        for entry in create_test_entries(1000) {
            store.insert(&entry).unwrap();
        }

        b.iter(|| store.list(black_box(ListFilter::default())).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_stats, bench_store);
criterion_main!(benches);
