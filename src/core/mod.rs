pub mod error;
pub mod value;

pub use error::{BenchError, Result};
pub use value::{DATE_FORMAT, SqlValue, now_utc};
