use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sales_report::{generate_sales, summarize, DEFAULT_RECORD_COUNT};

const TOLERANCE: f64 = 1e-6;

#[test]
fn test_total_equals_sum_of_record_totals() {
    for seed in [1, 2, 3, 1234] {
        let records = generate_sales(&mut StdRng::seed_from_u64(seed), DEFAULT_RECORD_COUNT, Utc::now());
        let summary = summarize(&records);

        let expected: f64 = records.iter().map(|r| r.total()).sum();
        assert_eq!(summary.record_count, records.len());
        assert!((summary.total_sales - expected).abs() < TOLERANCE);
    }
}

#[test]
fn test_categories_partition_the_total() {
    let records = generate_sales(&mut StdRng::seed_from_u64(99), DEFAULT_RECORD_COUNT, Utc::now());
    let summary = summarize(&records);

    let category_sum: f64 = summary.by_category.values().sum();
    assert!((category_sum - summary.total_sales).abs() < TOLERANCE);

    for (category, total) in &summary.by_category {
        let expected: f64 = records
            .iter()
            .filter(|r| &r.category == category)
            .map(|r| r.total())
            .sum();
        assert!((total - expected).abs() < TOLERANCE, "{category}");
    }
}
