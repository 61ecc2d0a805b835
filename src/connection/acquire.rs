use super::config::ConnectionConfig;
use crate::core::{BenchError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Added to the driver's own acquire timeout so the outer race fires first
const DRIVER_TIMEOUT_SLACK: Duration = Duration::from_secs(1);

/// Opens a pooled handle for a configuration.
///
/// The configuration passed in already has defaults applied.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Send + 'static;

    async fn connect(&self, config: &ConnectionConfig) -> std::result::Result<Self::Handle, sqlx::Error>;
}

/// `sqlx` MySQL pool connector
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

#[async_trait]
impl Connector for MySqlConnector {
    type Handle = MySqlPool;

    async fn connect(&self, config: &ConnectionConfig) -> std::result::Result<MySqlPool, sqlx::Error> {
        let options = MySqlConnectOptions::from_str(&config.data_source_name())?;

        // Idle connections are the ones the pool keeps warm, never more than it may open.
        // The caller's race owns the connect deadline, so sqlx gets a looser one.
        MySqlPoolOptions::new()
            .max_connections(config.max_open_connections)
            .min_connections(config.max_idle_connections.min(config.max_open_connections))
            .acquire_timeout(config.connect_timeout + DRIVER_TIMEOUT_SLACK)
            .connect_with(options)
            .await
    }
}

/// Open a MySQL pool, failing with `ConnectTimeout` past the configured deadline
pub async fn acquire(config: &ConnectionConfig) -> Result<MySqlPool> {
    acquire_with(Arc::new(MySqlConnector), config).await
}

/// Race one connect attempt against the configured timeout.
///
/// The attempt runs as its own task. Whichever of {attempt, timer} finishes
/// first decides the outcome: a connector error is returned as soon as it
/// happens, and when the timer wins the attempt is told to stop through its
/// cancellation token and then abandoned. Stopping is best-effort: a driver
/// call that is blocked somewhere the token cannot reach finishes on its own
/// and its result is dropped.
pub async fn acquire_with<C: Connector>(
    connector: Arc<C>,
    config: &ConnectionConfig,
) -> Result<C::Handle> {
    let config = config.clone().with_defaults();
    let timeout = config.connect_timeout;

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let task_config = config.clone();
    let mut attempt = tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => None,
            res = connector.connect(&task_config) => Some(res),
        }
    });

    tokio::select! {
        biased;

        joined = &mut attempt => match joined {
            Ok(Some(Ok(handle))) => {
                info!(
                    url = %config.to_url(),
                    max_open = config.max_open_connections,
                    max_idle = config.max_idle_connections,
                    "connected to db"
                );
                Ok(handle)
            }
            Ok(Some(Err(sqlx::Error::PoolTimedOut))) => {
                warn!(url = %config.to_url(), ?timeout, "driver timed out connecting to db");
                Err(BenchError::ConnectTimeout(timeout))
            }
            Ok(Some(Err(err))) => Err(BenchError::Connection(err)),
            // The token is only cancelled once the timer has won
            Ok(None) => Err(BenchError::ConnectTimeout(timeout)),
            Err(join_err) => Err(BenchError::Connection(sqlx::Error::Io(
                std::io::Error::other(join_err),
            ))),
        },
        _ = tokio::time::sleep(timeout) => {
            cancel.cancel();
            warn!(url = %config.to_url(), ?timeout, "timeout connecting to db");
            Err(BenchError::ConnectTimeout(timeout))
        }
    }
}
