use super::named::NamedQuery;
use super::template::expand_values;
use crate::core::{BenchError, Result, SqlValue, now_utc};
use crate::model::{COLUMNS, Product};
use chrono::NaiveDateTime;
use std::fmt;
use tracing::debug;

/// Row-by-row insert, executed once per record
pub const INSERT_SINGLE: &str = "insert into insertbench (product, sku, attr, value, created, modified) \
values (:product, :sku, :attr, :value, :created, :modified)";

/// Batched upsert; `(:values)` is expanded once per record
pub const INSERT_BATCH: &str = "insert into insertbench (product, sku, attr, value, created, modified) \
values (:values) \
on duplicate key update product=values(product), value=values(value), modified=values(modified)";

/// How a batch dates its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// One clock reading shared by every row of the batch
    #[default]
    PerBatch,
    /// Each row reads the clock as it is flattened
    PerRow,
}

/// Argument for one `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
    Scalar(SqlValue),
    /// Expands its placeholder into `?, ?, ...`, one per element
    List(Vec<SqlValue>),
}

/// Final SQL text with positional placeholders and the matching arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    args: Vec<SqlValue>,
}

impl Statement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[SqlValue] {
        &self.args
    }

    /// Number of `(...)` value groups for insert statements
    pub fn value_groups(&self) -> usize {
        self.sql.matches("(?").count()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.args)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {} args", self.sql, self.args.len())
    }
}

/// Split `sql` around its `?` placeholders, ignoring quoted text.
fn split_placeholders(sql: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (pos, c) in sql.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && q != '`' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '?' => {
                parts.push(&sql[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    parts.push(&sql[start..]);
    parts
}

/// Bind arguments to positional placeholders, expanding list arguments.
///
/// Every `?` must receive exactly one `Bind`; lists must be non-empty.
pub fn bind_positional(sql: &str, binds: Vec<Bind>) -> Result<Statement> {
    let parts = split_placeholders(sql);
    let placeholders = parts.len() - 1;
    if placeholders != binds.len() {
        return Err(BenchError::Binding {
            expected: placeholders,
            actual: binds.len(),
        });
    }

    let mut out = String::with_capacity(sql.len() + binds.len() * 16);
    let mut args = Vec::with_capacity(binds.len());
    let mut parts = parts.into_iter();
    if let Some(head) = parts.next() {
        out.push_str(head);
    }

    for (bind, tail) in binds.into_iter().zip(parts) {
        match bind {
            Bind::Scalar(value) => {
                out.push('?');
                args.push(value);
            }
            Bind::List(values) => {
                if values.is_empty() {
                    return Err(BenchError::Binding {
                        expected: 1,
                        actual: 0,
                    });
                }
                out.push_str(&vec!["?"; values.len()].join(", "));
                args.extend(values);
            }
        }
        out.push_str(tail);
    }

    Ok(Statement { sql: out, args })
}

/// Build the row-by-row insert for one record, binding by column name.
///
/// The record's own `created`/`modified` are used; stamp it first.
pub fn single_insert(product: &Product) -> Result<Statement> {
    let (sql, names) = NamedQuery::compile(INSERT_SINGLE)?.into_parts();
    let binds = names
        .iter()
        .map(|name| {
            product
                .column(name)
                .map(Bind::Scalar)
                .ok_or_else(|| BenchError::UnknownParameter(name.clone()))
        })
        .collect::<Result<Vec<_>>>()?;
    bind_positional(&sql, binds)
}

/// Build one multi-row upsert for all `products`.
pub fn batch_upsert(products: &[Product], policy: TimestampPolicy) -> Result<Statement> {
    match policy {
        TimestampPolicy::PerBatch => batch_upsert_at(products, now_utc()),
        TimestampPolicy::PerRow => {
            let rows = products.iter().map(|p| p.row_at(now_utc())).collect();
            assemble_batch(rows)
        }
    }
}

/// Same as `batch_upsert` with `PerBatch`, dated with `now`.
pub fn batch_upsert_at(products: &[Product], now: NaiveDateTime) -> Result<Statement> {
    let rows = products.iter().map(|p| p.row_at(now)).collect();
    assemble_batch(rows)
}

fn assemble_batch(rows: Vec<Vec<SqlValue>>) -> Result<Statement> {
    let expanded = expand_values(INSERT_BATCH, rows.len())?;
    let (sql, names) = NamedQuery::compile(&expanded)?.into_parts();

    if let Some(other) = names.iter().find(|name| name.as_str() != "values") {
        return Err(BenchError::UnknownParameter(other.clone()));
    }
    if let Some(row) = rows.iter().find(|row| row.len() != COLUMNS.len()) {
        return Err(BenchError::Binding {
            expected: COLUMNS.len(),
            actual: row.len(),
        });
    }

    let binds = rows.into_iter().map(Bind::List).collect();
    let statement = bind_positional(&sql, binds)?;

    debug!(
        rows = statement.value_groups(),
        args = statement.args().len(),
        "built batched upsert"
    );
    Ok(statement)
}
