use insertbench::core::SqlValue;
use insertbench::model::COLUMNS;
use insertbench::sql::{VALUES_MARKER, expand_values};
use insertbench::{BenchError, TimestampPolicy, batch_upsert, gen_products};
use std::collections::HashSet;

const TEMPLATE: &str = "insert into t (a, b) values (:values) on duplicate key update a=values(a)";

#[test]
fn test_generate_then_build_batch() {
    let products = gen_products(10, 2, "t");
    assert_eq!(products.len(), 20);

    let statement = batch_upsert(&products, TimestampPolicy::PerBatch).unwrap();
    assert_eq!(statement.value_groups(), 20);
    assert_eq!(statement.args().len(), 120);
    assert_eq!(statement.sql().matches('?').count(), 120);

    // One timestamp pair for the whole batch
    let stamps: HashSet<_> = statement
        .args()
        .chunks(COLUMNS.len())
        .flat_map(|row| [row[4].clone(), row[5].clone()])
        .collect();
    assert_eq!(stamps.len(), 1);
    assert!(matches!(stamps.into_iter().next(), Some(SqlValue::Timestamp(_))));
}

#[test]
fn test_args_are_row_major_in_column_order() {
    let products = gen_products(3, 2, "rm");
    let statement = batch_upsert(&products, TimestampPolicy::PerBatch).unwrap();
    assert_eq!(statement.args().len(), 6 * products.len());

    for (i, product) in products.iter().enumerate() {
        let row = &statement.args()[i * 6..i * 6 + 6];
        assert_eq!(row[0].as_text(), Some(product.product.as_str()));
        assert_eq!(row[1].as_text(), Some(product.sku.as_str()));
        assert_eq!(row[2].as_text(), Some("x"));
        assert_eq!(row[3].as_text(), Some("y"));
    }
}

#[test]
fn test_expansion_counts() {
    for n in [1usize, 5] {
        let sql = expand_values(TEMPLATE, n).unwrap();
        assert_eq!(sql.matches(VALUES_MARKER).count(), n);

        let start = sql.find(VALUES_MARKER).unwrap();
        let end = sql.rfind(VALUES_MARKER).unwrap() + VALUES_MARKER.len();
        let list = &sql[start..end];
        assert!(!list.starts_with(','));
        assert!(!list.ends_with(','));
        assert_eq!(list.matches(',').count(), n - 1);
    }
}

#[test]
fn test_zero_rows_fails_at_template_stage() {
    assert!(matches!(expand_values(TEMPLATE, 0), Err(BenchError::Template(_))));

    let err = batch_upsert(&gen_products(0, 5, "z"), TimestampPolicy::PerBatch).unwrap_err();
    assert!(matches!(err, BenchError::Template(_)));
}
