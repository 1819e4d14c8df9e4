use crate::models::{Product, ProductStatus};
use std::collections::BTreeMap;

/// Number of products per stock status.
///
/// Always carries an entry for every status, zero when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCounts {
    counts: BTreeMap<ProductStatus, usize>,
}

impl Default for StatusCounts {
    fn default() -> Self {
        Self {
            counts: ProductStatus::all().iter().map(|s| (*s, 0)).collect(),
        }
    }
}

impl StatusCounts {
    pub fn get(&self, status: ProductStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Iterates in display order: NeedsRestock, Normal, SlowMoving
    pub fn iter(&self) -> impl Iterator<Item = (ProductStatus, usize)> + '_ {
        self.counts.iter().map(|(status, count)| (*status, *count))
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn as_map(&self) -> &BTreeMap<ProductStatus, usize> {
        &self.counts
    }
}

/// Counts products by their persisted status
pub fn compute_status_counts(records: &[Product]) -> StatusCounts {
    let mut stats = StatusCounts::default();
    for product in records {
        *stats.counts.entry(product.status()).or_insert(0) += 1;
    }
    stats
}

/// Sum of the persisted stock values, saturating instead of overflowing
pub fn total_stock_value(records: &[Product]) -> i64 {
    records
        .iter()
        .fold(0i64, |acc, p| acc.saturating_add(p.stock_value()))
}

pub fn format_status_counts(stats: &StatusCounts) -> String {
    let mut output = String::new();

    output.push_str("Products by status:\n");
    for (status, count) in stats.iter() {
        output.push_str(&format!("  {status}: {count} products\n"));
    }
    output.push_str(&format!("\nTotal: {} products\n", stats.total()));

    output
}
