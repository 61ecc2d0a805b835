//! Statement building, decoupled from the driver.
//!
//! Batched statements go through three stages: `(:values)` expansion
//! ([`template`]), named to positional compilation ([`named`]) and
//! arity-checked binding ([`statement`]).

pub mod named;
pub mod statement;
pub mod template;

pub use named::NamedQuery;
pub use statement::{
    Bind, INSERT_BATCH, INSERT_SINGLE, Statement, TimestampPolicy, batch_upsert, batch_upsert_at,
    bind_positional, single_insert,
};
pub use template::{VALUES_MARKER, expand_values};
