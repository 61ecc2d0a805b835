use crate::model::Product;
use std::fmt::Display;

/// Group labels, assigned round-robin by group index
pub const PRODUCT_LABELS: [&str; 3] = ["RunningShoe", "T-Shirt", "Backpack"];

/// Short SKU tag for a group label
pub fn sku_tag(label: &str) -> &'static str {
    match label {
        "RunningShoe" => "shoe",
        "T-Shirt" => "shirt",
        "Backpack" => "pack",
        _ => "item",
    }
}

/// Generate `group_count * skus_per_group` products.
///
/// The running index used in every `sku` spans the whole call, so a distinct
/// `prefix` per call is enough to keep primary keys from colliding across
/// benchmark iterations. Every product of a group shares the label built from
/// the index of the group's first record.
pub fn gen_products(group_count: usize, skus_per_group: usize, prefix: impl Display) -> Vec<Product> {
    let mut products = Vec::with_capacity(group_count * skus_per_group);
    let mut i = 0usize;

    for g in 0..group_count {
        let label = PRODUCT_LABELS[g % PRODUCT_LABELS.len()];
        let group = format!("{}-{}-{}", prefix, label, i);
        let tag = sku_tag(label);

        for _ in 0..skus_per_group {
            let sku = format!("{}-{}-{}", prefix, tag, i);
            products.push(Product::new(group.clone(), sku, "x", "y"));
            i += 1;
        }
    }

    products
}
