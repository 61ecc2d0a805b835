use crate::core::{BenchError, Result};

/// Multi-row value marker expected once in a batched template
pub const VALUES_MARKER: &str = "(:values)";

/// Replace the single `(:values)` marker with `row_count` copies of itself.
///
/// Copies are joined with `",\n"`, so the expanded list never carries a
/// leading or trailing comma. Zero rows cannot form a valid `insert`, so
/// `row_count == 0` is rejected rather than producing `values ` with nothing
/// after it.
pub fn expand_values(template: &str, row_count: usize) -> Result<String> {
    let markers = template.matches(VALUES_MARKER).count();
    if markers != 1 {
        return Err(BenchError::template(format!(
            "expected exactly one {} marker, found {}",
            VALUES_MARKER, markers
        )));
    }

    if row_count == 0 {
        return Err(BenchError::template(
            "cannot expand values for zero rows",
        ));
    }

    let groups = vec![VALUES_MARKER; row_count].join(",\n");
    Ok(template.replacen(VALUES_MARKER, &groups, 1))
}
