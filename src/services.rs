use crate::config::AppConfig;
use crate::connection::acquire;
use crate::core::Result;
use sqlx::MySqlPool;
use tokio::sync::OnceCell;

/// Shared handles for a benchmark run
pub struct Services {
    config: AppConfig,
    db: OnceCell<MySqlPool>,
}

impl Services {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the pool on first use, then hand back the same pool
    pub async fn db(&self) -> Result<&MySqlPool> {
        self.db
            .get_or_try_init(|| async {
                let config = self.config.connection_config();
                acquire(&config).await
            })
            .await
    }

    /// Close the pool if it was opened; call before the process exits
    pub async fn cleanup(&self) {
        if let Some(pool) = self.db.get() {
            pool.close().await;
        }
    }
}
