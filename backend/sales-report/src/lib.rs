//! Random sales generation and per-category summary
//!
//! Generation takes the RNG and timestamp as arguments so a seeded run is
//! reproducible; `summarize` is a pure reduction over the records.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;

pub const CATEGORIES: [&str; 4] = ["Electronics", "Clothing", "Books", "Home Decor"];
pub const PRODUCTS: [&str; 4] = ["TV", "Shirt", "Book", "Vase"];

pub const DEFAULT_RECORD_COUNT: usize = 1000;
pub const MAX_QUANTITY: u32 = 10;
pub const MAX_PRICE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub date: DateTime<Utc>,
    pub category: String,
    pub product: String,
    pub quantity: u32,
    pub price: f64,
}

impl SaleRecord {
    pub fn total(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesSummary {
    pub record_count: usize,
    pub total_sales: f64,
    pub by_category: BTreeMap<String, f64>,
}

/// Generate `count` records stamped with `date`.
///
/// Category and product are drawn independently; quantity is 1..=10 and
/// unit price is in [0, 100).
pub fn generate_sales<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    date: DateTime<Utc>,
) -> Vec<SaleRecord> {
    (0..count)
        .map(|_| SaleRecord {
            date,
            category: CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string(),
            product: PRODUCTS[rng.gen_range(0..PRODUCTS.len())].to_string(),
            quantity: rng.gen_range(1..=MAX_QUANTITY),
            price: rng.gen_range(0.0..MAX_PRICE),
        })
        .collect()
}

pub fn summarize(records: &[SaleRecord]) -> SalesSummary {
    records
        .iter()
        .fold(SalesSummary::default(), |mut summary, record| {
            let total = record.total();
            summary.record_count += 1;
            summary.total_sales += total;
            *summary
                .by_category
                .entry(record.category.clone())
                .or_insert(0.0) += total;
            summary
        })
}

/// Renders the report as printed by the CLI
impl fmt::Display for SalesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Sales: ${:.2}", self.total_sales)?;
        writeln!(f, "Sales by Category:")?;
        for (category, total) in &self.by_category {
            writeln!(f, "{category}: ${total:.2}")?;
        }
        Ok(())
    }
}
