//! Report Benchmark Tool
//!
//! Run with: cargo run --bin bench_report --release -- --weeks 520 --iterations 1000

use std::collections::BTreeMap;
use std::time::Instant;

use finance_projections::domain::{
    ActualMetric, CostBreakdown, RevenueBreakdown, WeekNumber, WeeklyProjection,
};
use finance_projections::Aggregator;
use rust_decimal::Decimal;

fn arg_or(args: &[String], flag: &str, default: u32) -> u32 {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Ramp-up forecast: early weeks lose money, later weeks profit
fn synthetic_forecast(weeks: u32) -> anyhow::Result<Vec<WeeklyProjection>> {
    (1..=weeks)
        .map(|n| {
            let week = WeekNumber::new(i64::from(n))?;
            let ticket = Decimal::from(200 + 15 * n);
            let merchandise = Decimal::from(40 + n);
            let staffing = Decimal::from(450);
            let marketing = Decimal::from(120);

            let revenue = RevenueBreakdown {
                ticket: Some(ticket),
                merchandise: Some(merchandise),
                ..Default::default()
            };
            let costs = CostBreakdown {
                staffing: Some(staffing),
                marketing: Some(marketing),
                ..Default::default()
            };

            let total_revenue = revenue
                .total()
                .ok_or_else(|| anyhow::anyhow!("revenue overflow in week {}", week))?;
            let total_costs = costs
                .total()
                .ok_or_else(|| anyhow::anyhow!("cost overflow in week {}", week))?;

            Ok(WeeklyProjection::new(week, total_revenue, total_costs)
                .with_revenue_breakdown(revenue)
                .with_cost_breakdown(costs))
        })
        .collect()
}

/// Actuals for the first quarter of the horizon, 5% under forecast
fn synthetic_actuals(
    forecast: &[WeeklyProjection],
) -> BTreeMap<WeekNumber, ActualMetric> {
    let recorded = forecast.len() / 4;
    let factor = Decimal::new(95, 2);

    forecast
        .iter()
        .take(recorded)
        .map(|p| {
            let actual = ActualMetric::new(p.week, p.total_revenue * factor, p.total_costs);
            (p.week, actual)
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let weeks = arg_or(&args, "--weeks", 520);
    let iterations = arg_or(&args, "--iterations", 1000).max(1);

    println!("Report Benchmark - {} weeks x {} iterations", weeks, iterations);

    let aggregator = Aggregator::new().with_max_horizon(weeks.max(1));
    let forecast = synthetic_forecast(weeks)?;
    let actuals = synthetic_actuals(&forecast);

    let start = Instant::now();
    let mut last = None;
    for _ in 0..iterations {
        last = Some(aggregator.aggregate(&forecast, &actuals)?);
    }
    let elapsed = start.elapsed();

    let rows_start = Instant::now();
    let rows = aggregator.weekly_rows(&forecast, &actuals)?;
    let quarters = aggregator.quarterly_rollup(&forecast, &actuals)?;
    let rows_elapsed = rows_start.elapsed();

    println!("\n=== Benchmark Results ===");
    if let Some(report) = last {
        println!("Total revenue: {}", report.total_revenue);
        println!("Total profit: {}", report.total_profit);
        println!("Break-even week: {}", report.break_even_week);
        println!("Actuals coverage: {}%", report.actuals_coverage_percent.round_dp(2));
    }
    println!("Weekly rows: {}, quarters: {}", rows.len(), quarters.len());
    println!("Aggregate time: {:.2}ms total", elapsed.as_secs_f64() * 1000.0);
    println!(
        "Per report: {:.1}us",
        elapsed.as_secs_f64() * 1_000_000.0 / f64::from(iterations)
    );
    println!("Rows + rollup: {:.1}us", rows_elapsed.as_secs_f64() * 1_000_000.0);

    Ok(())
}
