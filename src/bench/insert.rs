use crate::core::{BenchError, Result, SqlValue};
use crate::model::Product;
use crate::sql::{self, INSERT_BATCH, INSERT_SINGLE, Statement, TimestampPolicy};
use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlQueryResult;
use tracing::debug;

/// A way of writing a record set to the `insertbench` table
#[async_trait]
pub trait InsertStrategy: Send + Sync {
    /// Short name used in reports
    fn name(&self) -> &'static str;

    /// Write `products`, returning the SQL text that was executed
    async fn insert(&self, pool: &MySqlPool, products: Vec<Product>) -> Result<String>;
}

/// One statement per record, each record stamped with its own time
#[derive(Debug, Clone, Copy, Default)]
pub struct RowByRow;

#[async_trait]
impl InsertStrategy for RowByRow {
    fn name(&self) -> &'static str {
        "SqlxSingle"
    }

    async fn insert(&self, pool: &MySqlPool, products: Vec<Product>) -> Result<String> {
        for mut product in products {
            product.set_dates();
            let statement = sql::single_insert(&product)?;
            execute(pool, &statement).await?;
        }
        Ok(INSERT_SINGLE.to_string())
    }
}

/// One multi-row upsert for the whole record set
#[derive(Debug, Clone, Copy, Default)]
pub struct Batched {
    pub timestamps: TimestampPolicy,
}

#[async_trait]
impl InsertStrategy for Batched {
    fn name(&self) -> &'static str {
        "SqlxValues"
    }

    async fn insert(&self, pool: &MySqlPool, products: Vec<Product>) -> Result<String> {
        if products.is_empty() {
            debug!("empty record set, nothing to insert");
            return Ok(INSERT_BATCH.to_string());
        }

        let statement = sql::batch_upsert(&products, self.timestamps)?;
        execute(pool, &statement).await?;
        Ok(statement.into_parts().0)
    }
}

/// Bind a statement's arguments in order and run it
pub async fn execute(pool: &MySqlPool, statement: &Statement) -> Result<MySqlQueryResult> {
    let mut query = sqlx::query(statement.sql());
    for arg in statement.args() {
        query = match arg {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Text(text) => query.bind(text.as_str()),
            SqlValue::Timestamp(ts) => query.bind(*ts),
        };
    }
    query.execute(pool).await.map_err(BenchError::Database)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names() {
        assert_eq!(RowByRow.name(), "SqlxSingle");
        assert_eq!(Batched::default().name(), "SqlxValues");
        assert_eq!(Batched::default().timestamps, TimestampPolicy::PerBatch);
    }

    #[tokio::test]
    async fn test_batched_empty_set_skips_database() {
        // A lazy pool never connects unless a query runs
        let pool = MySqlPool::connect_lazy("mysql://u:p@127.0.0.1:1/none").unwrap();
        let sql = Batched::default().insert(&pool, Vec::new()).await.unwrap();
        assert_eq!(sql, INSERT_BATCH);
    }
}
