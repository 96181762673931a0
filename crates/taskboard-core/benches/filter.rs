#![allow(missing_docs)]

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use taskboard_core::{DueDateFilter, Priority, PriorityFilter, Task, TaskFields, TaskFilter};
use time::Date;
use time::macros::date;

const TODAY: Date = date!(2025 - 06 - 10);

fn build_tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|idx| {
            let priority = Priority::ALL[idx % Priority::ALL.len()];
            let due = TODAY.next_day().filter(|_| idx % 4 == 0);
            Task::new(
                TaskFields::new(format!("task {idx}"), format!("description for item {idx}"))
                    .with_priority(priority)
                    .with_due_date(due),
            )
        })
        .collect()
}

fn filter_benchmark(c: &mut Criterion) {
    let filter = TaskFilter::new()
        .with_priority(PriorityFilter::Only(Priority::High))
        .with_due(DueDateFilter::Tomorrow)
        .with_text("item 1");

    let mut group = c.benchmark_group("task_filter_apply");
    for &size in &[16usize, 128, 1024, 8192] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || build_tasks(size),
                |tasks| {
                    black_box(filter.apply(&tasks, TODAY).len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, filter_benchmark);
criterion_main!(benches);
