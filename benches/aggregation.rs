use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::tempdir;
use wisewallet_core::{ExceedanceNotifier, ExpenseService, SpendingAggregator};
use wisewallet_domain::{
    BudgetMonth, BudgetPlan, Expense, ExpenseDraft, NotificationState, Username,
};
use wisewallet_storage_json::JsonFileStore;

const CATEGORIES: [&str; 5] = ["Food", "Transport", "Bills", "Entertainment", "Rent"];

fn build_expenses(count: usize) -> Vec<Expense> {
    let user = Username::new("bench");
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("start date");
    (0..count)
        .map(|idx| {
            ExpenseDraft::new(
                format!("expense {idx}"),
                CATEGORIES[idx % CATEGORIES.len()],
                5.0 + (idx % 120) as f64,
                start + Duration::days((idx % 365) as i64),
            )
            .into_expense(idx as u64 + 1, user.clone())
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let expenses = build_expenses(black_box(10_000));
    let month = BudgetMonth { year: 2025, month: 6 };
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).expect("today");

    c.bench_function("snapshot_10k", |b| {
        b.iter(|| SpendingAggregator::snapshot_for(black_box(&expenses), month))
    });

    c.bench_function("monthly_change_10k", |b| {
        b.iter(|| SpendingAggregator::monthly_change(black_box(&expenses), today))
    });

    let plan = BudgetPlan::new(
        500.0,
        CATEGORIES
            .iter()
            .map(|name| (name.to_string(), 100.0))
            .collect::<BTreeMap<_, _>>(),
    );
    let snapshot = SpendingAggregator::snapshot_for(&expenses, month);
    let notifier = ExceedanceNotifier::default();
    c.bench_function("evaluate_exceedances", |b| {
        b.iter_batched(
            NotificationState::default,
            |mut state| notifier.evaluate(&plan, &snapshot, &mut state),
            BatchSize::SmallInput,
        )
    });
}

fn bench_json_store(c: &mut Criterion) {
    let expenses = build_expenses(black_box(2_000));
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path()).expect("open store");
    let user = Username::new("bench");

    c.bench_function("save_expenses_2k", |b| {
        b.iter(|| ExpenseService::save_all(&store, &user, &expenses).expect("save expenses"))
    });

    ExpenseService::save_all(&store, &user, &expenses).expect("seed expenses");
    c.bench_function("load_expenses_2k", |b| {
        b.iter(|| ExpenseService::list(&store, &user).expect("load expenses"))
    });
}

criterion_group!(benches, bench_aggregation, bench_json_store);
criterion_main!(benches);
