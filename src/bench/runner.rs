use super::generator::gen_products;
use super::insert::InsertStrategy;
use crate::core::Result;
use sqlx::MySqlPool;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

/// Shape of one benchmark
#[derive(Debug, Clone)]
pub struct BenchPlan {
    pub group_count: usize,
    pub skus_per_group: usize,
    pub iterations: usize,
    /// Prepended to the iteration number to build each iteration's sku prefix
    pub run_id: String,
}

impl BenchPlan {
    pub fn rows_per_iteration(&self) -> usize {
        self.group_count * self.skus_per_group
    }

    /// Sku prefix for one iteration, distinct across iterations of a run
    pub fn token(&self, iteration: usize) -> String {
        format!("{}{}", self.run_id, iteration)
    }

    /// Same shape under a run id of its own, so strategies sharing a table
    /// never insert each other's skus
    pub fn for_strategy(&self, name: &str) -> BenchPlan {
        BenchPlan {
            run_id: format!("{}-{}-", self.run_id, name),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchReport {
    pub name: String,
    pub iterations: usize,
    pub rows_per_iteration: usize,
    pub total: Duration,
}

impl BenchReport {
    pub fn ns_per_op(&self) -> u128 {
        if self.iterations == 0 {
            return 0;
        }
        self.total.as_nanos() / self.iterations as u128
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Benchmark{:<16} {:>8} {:>16} ns/op  ({} rows/op)",
            self.name,
            self.iterations,
            self.ns_per_op(),
            self.rows_per_iteration
        )
    }
}

/// Time `plan.iterations` inserts, generating fresh rows each iteration.
///
/// Generation is inside the timed region, as it is part of what a caller pays.
pub async fn run_strategy(
    pool: &MySqlPool,
    strategy: &dyn InsertStrategy,
    plan: &BenchPlan,
) -> Result<BenchReport> {
    let start = Instant::now();
    for iteration in 0..plan.iterations {
        let products = gen_products(plan.group_count, plan.skus_per_group, plan.token(iteration));
        strategy.insert(pool, products).await?;
    }

    let report = BenchReport {
        name: strategy.name().to_string(),
        iterations: plan.iterations,
        rows_per_iteration: plan.rows_per_iteration(),
        total: start.elapsed(),
    };
    info!(
        benchmark = %report.name,
        iterations = report.iterations,
        ns_per_op = report.ns_per_op() as u64,
        "benchmark finished"
    );
    Ok(report)
}

/// Time the row generator alone
pub fn time_generation(plan: &BenchPlan) -> BenchReport {
    let start = Instant::now();
    for iteration in 0..plan.iterations {
        let products = gen_products(plan.group_count, plan.skus_per_group, iteration);
        std::hint::black_box(products);
    }

    BenchReport {
        name: "GenProducts".to_string(),
        iterations: plan.iterations,
        rows_per_iteration: plan.rows_per_iteration(),
        total: start.elapsed(),
    }
}
