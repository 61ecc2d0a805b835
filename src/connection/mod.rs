pub mod acquire;
pub mod config;

pub use acquire::{Connector, MySqlConnector, acquire, acquire_with};
pub use config::ConnectionConfig;
