#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use taskdeck_core::id::TaskId;
use taskdeck_core::task::{Priority, TaskRecord, TaskStatus};
use taskdeck_core::{SortOption, project};
use time::{Duration, OffsetDateTime};

fn build_tasks(count: usize) -> Vec<TaskRecord> {
    let base = OffsetDateTime::UNIX_EPOCH;
    (0..count)
        .map(|idx| {
            let priority = match idx % 3 {
                0 => Priority::Low,
                1 => Priority::Medium,
                _ => Priority::High,
            };
            let status = if idx % 4 == 0 {
                TaskStatus::Completed
            } else {
                TaskStatus::Pending
            };
            TaskRecord {
                id: TaskId::new(),
                title: format!("task-{idx}"),
                description: None,
                priority,
                due_date: base + Duration::days(i64::try_from(idx % 90).unwrap_or(0)),
                status,
                sort_index: u32::try_from(idx).unwrap_or(u32::MAX),
            }
        })
        .collect()
}

fn projection_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for count in [100_usize, 1_000, 10_000] {
        let tasks = build_tasks(count);

        group.bench_with_input(
            BenchmarkId::new("by_priority", count),
            &tasks,
            |b, tasks| b.iter(|| project(black_box(tasks), None, SortOption::ByPriority)),
        );
        group.bench_with_input(
            BenchmarkId::new("by_alphabetical_pending_only", count),
            &tasks,
            |b, tasks| {
                b.iter(|| {
                    project(
                        black_box(tasks),
                        Some(TaskStatus::Pending),
                        SortOption::ByAlphabetical,
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, projection_benchmark);
criterion_main!(benches);
