//! Pure aggregation over raw records: category totals, monthly totals, and
//! the overall summary report.
//!
//! Nothing in this module touches the database. The functions take slices of
//! [RawRecord] so they work the same on freshly imported CSV rows and on
//! records projected from the store. Rows whose fields fail to parse are
//! dropped silently; only the drop counts are logged.

mod parse;
mod report;

pub use parse::{DropReason, RawRecord, parse_amount, parse_date};
pub use report::{SummaryReport, summary_report};

use std::{cmp::Ordering, collections::HashMap};

/// Options for [totals_by_category].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotalsOptions {
    /// When false, only negative amounts count and totals are absolute
    /// values. When true, amounts keep their signs and income rows are
    /// included.
    pub include_income: bool,
    /// Rows whose (possibly absolute-valued) amount is below this value are
    /// dropped before grouping. Filters out rounding noise by default.
    pub min_amount: f64,
}

impl Default for CategoryTotalsOptions {
    fn default() -> Self {
        Self {
            include_income: false,
            min_amount: 0.01,
        }
    }
}

/// Options for [monthly_totals].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTotalsOptions {
    /// When false, only negative amounts count and totals are absolute
    /// values. When true, amounts keep their signs.
    pub include_income: bool,
    /// An explicit date format to try before the built-in fallbacks, in the
    /// `time` crate's format description syntax.
    pub date_format: Option<String>,
}

/// Sum amounts per category, sorted by total descending.
///
/// Categories with equal totals keep the order in which they first appeared
/// in `records`. Rows with an unparseable amount are dropped.
pub fn totals_by_category(
    records: &[RawRecord],
    options: &CategoryTotalsOptions,
) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0;

    for record in records {
        let amount = match parse_amount(&record.amount) {
            Ok(amount) => amount,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        let amount = if options.include_income {
            amount
        } else if amount < 0.0 {
            -amount
        } else {
            continue;
        };

        // The threshold applies per row, before grouping.
        if amount < options.min_amount {
            continue;
        }

        match index_of.get(&record.category) {
            Some(&index) => totals[index].1 += amount,
            None => {
                index_of.insert(record.category.clone(), totals.len());
                totals.push((record.category.clone(), amount));
            }
        }
    }

    if dropped > 0 {
        tracing::debug!("dropped {dropped} records with unparseable amounts");
    }

    // Stable sort keeps first-seen order among equal totals.
    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    totals
}

/// Sum amounts per calendar month, sorted by month ascending.
///
/// Months are keyed as "YYYY-MM". Rows whose date or amount fails to parse
/// are dropped.
pub fn monthly_totals(records: &[RawRecord], options: &MonthlyTotalsOptions) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    let mut dropped = 0;

    for record in records {
        let date = match parse_date(&record.date, options.date_format.as_deref()) {
            Ok(date) => date,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        let amount = match parse_amount(&record.amount) {
            Ok(amount) => amount,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        let amount = if options.include_income {
            amount
        } else if amount < 0.0 {
            -amount
        } else {
            continue;
        };

        let month = format!("{:04}-{:02}", date.year(), u8::from(date.month()));
        *totals.entry(month).or_insert(0.0) += amount;
    }

    if dropped > 0 {
        tracing::debug!("dropped {dropped} records with unparseable fields");
    }

    let mut totals: Vec<(String, f64)> = totals.into_iter().collect();
    totals.sort_by(|a, b| a.0.cmp(&b.0));

    totals
}

#[cfg(test)]
mod tests {
    use super::{
        CategoryTotalsOptions, MonthlyTotalsOptions, RawRecord, monthly_totals, totals_by_category,
    };

    fn record(date: &str, amount: &str, category: &str) -> RawRecord {
        RawRecord {
            date: date.to_owned(),
            amount: amount.to_owned(),
            category: category.to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn category_totals_sum_expenses_as_absolute_values() {
        let records = vec![
            record("2024-01-01", "-10", "Food"),
            record("2024-01-02", "-20", "Food"),
            record("2024-01-03", "-5", "Gas"),
            record("2024-01-04", "100", "Income"),
        ];

        let totals = totals_by_category(&records, &CategoryTotalsOptions::default());

        assert_eq!(
            totals,
            vec![("Food".to_owned(), 30.0), ("Gas".to_owned(), 5.0)]
        );
    }

    #[test]
    fn category_totals_keep_signs_when_income_included() {
        let records = vec![
            record("2024-01-01", "-10", "Food"),
            record("2024-01-02", "100", "Income"),
        ];

        let options = CategoryTotalsOptions {
            include_income: true,
            min_amount: f64::MIN,
        };
        let totals = totals_by_category(&records, &options);

        assert_eq!(
            totals,
            vec![("Income".to_owned(), 100.0), ("Food".to_owned(), -10.0)]
        );
    }

    #[test]
    fn category_totals_drop_unparseable_amounts() {
        let records = vec![
            record("2024-01-01", "-10", "Food"),
            record("2024-01-02", "oops", "Food"),
        ];

        let totals = totals_by_category(&records, &CategoryTotalsOptions::default());

        assert_eq!(totals, vec![("Food".to_owned(), 10.0)]);
    }

    #[test]
    fn category_totals_apply_minimum_threshold() {
        let records = vec![
            record("2024-01-01", "-0.005", "Rounding"),
            record("2024-01-02", "-10", "Food"),
        ];

        let totals = totals_by_category(&records, &CategoryTotalsOptions::default());

        assert_eq!(totals, vec![("Food".to_owned(), 10.0)]);
    }

    #[test]
    fn equal_totals_keep_first_seen_order() {
        let records = vec![
            record("2024-01-01", "-10", "Zoo"),
            record("2024-01-02", "-10", "Apples"),
        ];

        let totals = totals_by_category(&records, &CategoryTotalsOptions::default());

        assert_eq!(
            totals,
            vec![("Zoo".to_owned(), 10.0), ("Apples".to_owned(), 10.0)]
        );
    }

    #[test]
    fn category_totals_of_empty_input_are_empty() {
        assert!(totals_by_category(&[], &CategoryTotalsOptions::default()).is_empty());
    }

    #[test]
    fn monthly_totals_group_by_calendar_month_ascending() {
        let records = vec![
            record("2024-02-15", "-20", "Food"),
            record("2024-01-01", "-10", "Food"),
            record("2024-01-20", "-5", "Gas"),
        ];

        let totals = monthly_totals(&records, &MonthlyTotalsOptions::default());

        assert_eq!(
            totals,
            vec![("2024-01".to_owned(), 15.0), ("2024-02".to_owned(), 20.0)]
        );
    }

    #[test]
    fn monthly_totals_drop_unparseable_dates() {
        let records = vec![
            record("2024-01-01", "-10", "Food"),
            record("01/02/2024", "-10", "Food"),
            record("not-a-date", "-10", "Food"),
        ];

        let totals = monthly_totals(&records, &MonthlyTotalsOptions::default());

        assert_eq!(totals, vec![("2024-01".to_owned(), 20.0)]);
    }

    #[test]
    fn monthly_totals_respect_explicit_date_format() {
        let records = vec![record("15.01.2024", "-10", "Food")];

        let options = MonthlyTotalsOptions {
            include_income: false,
            date_format: Some("[day].[month].[year]".to_owned()),
        };
        let totals = monthly_totals(&records, &options);

        assert_eq!(totals, vec![("2024-01".to_owned(), 10.0)]);
    }

    #[test]
    fn aggregation_is_idempotent_over_unmutated_input() {
        let records = vec![
            record("2024-01-01", "-10", "Food"),
            record("01/02/2024", "-20", "Gas"),
            record("not-a-date", "oops", "Junk"),
        ];

        let category_options = CategoryTotalsOptions::default();
        let monthly_options = MonthlyTotalsOptions::default();

        assert_eq!(
            totals_by_category(&records, &category_options),
            totals_by_category(&records, &category_options)
        );
        assert_eq!(
            monthly_totals(&records, &monthly_options),
            monthly_totals(&records, &monthly_options)
        );
    }

    #[test]
    fn monthly_totals_sum_matches_per_record_sum() {
        let records = vec![
            record("2024-01-01", "-10.5", "Food"),
            record("2024-02-01", "-20.25", "Food"),
            record("2024-03-01", "-0.25", "Gas"),
        ];

        let totals = monthly_totals(&records, &MonthlyTotalsOptions::default());

        let total: f64 = totals.iter().map(|(_, amount)| amount).sum();
        assert!((total - 31.0).abs() < 1e-9);
    }
}
