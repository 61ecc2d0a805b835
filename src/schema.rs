use crate::core::{BenchError, Result};
use sqlx::MySqlPool;
use tracing::info;

pub const DROP_TABLE: &str = "drop table if exists insertbench";

pub const CREATE_TABLE: &str = r#"
create table insertbench (
    product varchar(191) collate utf8mb4_unicode_ci not null,
    sku varchar(191) collate utf8mb4_unicode_ci not null,
    attr varchar(191) collate utf8mb4_unicode_ci not null,
    value text collate utf8mb4_unicode_ci not null,
    created datetime not null,
    modified datetime not null,
    primary key (sku),
    unique key (sku, attr)
) engine=innodb default charset=utf8mb4 collate=utf8mb4_unicode_ci
"#;

/// Drop and recreate the benchmark table
pub async fn recreate_table(pool: &MySqlPool) -> Result<()> {
    sqlx::query(DROP_TABLE)
        .execute(pool)
        .await
        .map_err(BenchError::Database)?;
    sqlx::query(CREATE_TABLE)
        .execute(pool)
        .await
        .map_err(BenchError::Database)?;

    info!(table = crate::model::TABLE_NAME, "recreated table");
    Ok(())
}
