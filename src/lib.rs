// ============================================================================
// insertbench Library
// ============================================================================

pub mod bench;
pub mod config;
pub mod connection;
pub mod core;
pub mod model;
pub mod schema;
pub mod services;
pub mod sql;

// Re-export main types for convenience
pub use bench::{Batched, BenchPlan, BenchReport, InsertStrategy, RowByRow, gen_products};
pub use config::AppConfig;
pub use connection::{ConnectionConfig, Connector, MySqlConnector, acquire, acquire_with};
pub use crate::core::{BenchError, Result, SqlValue};
pub use model::Product;
pub use services::Services;
pub use sql::{Statement, TimestampPolicy, batch_upsert, single_insert};
