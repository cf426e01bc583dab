//! Performance benchmarks for the rental ledger.
//!
//! Covers accrual over growing portfolios, the month calendar, recent
//! payments, and one end-to-end portfolio request through the router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use rental_ledger::api::{AppState, create_router};
use rental_ledger::calculation::{month_calendar, recent_payments, summarize_portfolio};
use rental_ledger::clock::FixedClock;
use rental_ledger::config::ConfigLoader;
use rental_ledger::models::{Payment, RentalStatus, Technique, Worker};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

/// Builds a technique started up to 180 days before today, with every
/// seventh day off. Every fourth one has ended.
fn create_technique(index: usize) -> Technique {
    let start = today() - Duration::days((index % 180) as i64);
    let day_offs: BTreeSet<NaiveDate> = (0..180)
        .step_by(7)
        .map(|d| start + Duration::days(d))
        .collect();
    let status = if index % 4 == 0 {
        RentalStatus::Ended {
            end_date: start + Duration::days(30),
        }
    } else {
        RentalStatus::Active
    };

    Technique {
        id: format!("tech_{:05}", index),
        name: format!("Excavator {}", index),
        description: None,
        monthly_rent: Decimal::from(10_000 + (index as i64 % 50) * 100),
        planned_working_days: 22 + (index % 5) as u32,
        start_date: start,
        status,
        day_offs,
        created_at: Utc::now(),
        version: 1,
    }
}

fn create_portfolio(size: usize) -> Vec<Technique> {
    (0..size).map(create_technique).collect()
}

fn create_workers(count: usize) -> Vec<Worker> {
    (0..count)
        .map(|i| Worker {
            id: format!("wrk_{:04}", i),
            full_name: format!("Worker {}", i),
            position: "Operator".to_string(),
            monthly_salary: Some(Decimal::from(5000)),
            description: None,
            photo: None,
            created_at: Utc::now(),
            notes: Vec::new(),
            version: 1,
        })
        .collect()
}

fn create_payments(count: usize, workers: usize) -> Vec<Payment> {
    (0..count)
        .map(|i| Payment {
            id: format!("pay_{:06}", i),
            worker_id: format!("wrk_{:04}", i % workers),
            amount: Decimal::from(100 + (i % 900) as i64),
            date: today() - Duration::days((i % 365) as i64),
            note: None,
        })
        .collect()
}

/// Benchmark: Portfolio accrual at increasing sizes.
fn bench_portfolio_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("portfolio");

    for size in [10usize, 100, 1000, 10_000].iter() {
        let portfolio = create_portfolio(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("techniques", size), size, |b, _| {
            b.iter(|| black_box(summarize_portfolio(black_box(&portfolio), today())))
        });
    }

    group.finish();
}

/// Benchmark: One month calendar for a rental with many day-offs.
fn bench_month_calendar(c: &mut Criterion) {
    let technique = create_technique(3);
    let month = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    c.bench_function("month_calendar", |b| {
        b.iter(|| black_box(month_calendar(black_box(&technique), month, today())))
    });
}

/// Benchmark: Latest payments out of a year of history.
fn bench_recent_payments(c: &mut Criterion) {
    let workers = create_workers(50);
    let payments = create_payments(10_000, 50);

    c.bench_function("recent_payments_10000", |b| {
        b.iter(|| black_box(recent_payments(black_box(&payments), &workers, 5)))
    });
}

/// Benchmark: Portfolio of 100 rentals through the HTTP router.
fn bench_portfolio_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/ledger.yaml").expect("Failed to load config");
    let state = AppState::with_clock(config, Arc::new(FixedClock::new(today())));
    let router = create_router(state);

    let techniques: Vec<serde_json::Value> = create_portfolio(100)
        .iter()
        .map(|t| {
            serde_json::json!({
                "id": t.id,
                "name": t.name,
                "monthly_rent": t.monthly_rent,
                "planned_working_days": t.planned_working_days,
                "start_date": t.start_date,
                "end_date": t.end_date(),
                "day_offs": t.day_offs,
            })
        })
        .collect();
    let body = serde_json::json!({ "techniques": techniques }).to_string();

    c.bench_function("portfolio_request_100", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/rentals/portfolio")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_portfolio_scaling,
    bench_month_calendar,
    bench_recent_payments,
    bench_portfolio_request,
);
criterion_main!(benches);
