#![allow(missing_docs)]

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use taskmaster_core::{Task, TaskFilter, TaskId, derive_view};
use time::{Duration, OffsetDateTime};

fn build_tasks(count: usize) -> Vec<Task> {
    let base = OffsetDateTime::UNIX_EPOCH;
    (0..count)
        .map(|idx| {
            // Scatter due dates so the sort has work to do.
            let offset = i64::try_from((idx * 7919) % 365).unwrap_or_default();
            Task {
                id: TaskId::new(idx.to_string()),
                title: format!("task-{idx}"),
                description: String::new(),
                due_date: base + Duration::days(offset),
                completed: idx % 3 == 0,
                created_at: base,
                updated_at: base,
            }
        })
        .collect()
}

fn derive_view_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_view");
    for &count in &[16usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || build_tasks(count),
                |tasks| {
                    for filter in TaskFilter::ALL {
                        black_box(derive_view(&tasks, filter));
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, derive_view_benchmark);
criterion_main!(benches);
