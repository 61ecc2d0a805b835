pub mod generator;
pub mod insert;
pub mod runner;

pub use generator::gen_products;
pub use insert::{Batched, InsertStrategy, RowByRow};
pub use runner::{BenchPlan, BenchReport, run_strategy, time_generation};
