//! The overall summary report.

use serde::Serialize;

use super::{
    CategoryTotalsOptions, MonthlyTotalsOptions, RawRecord, monthly_totals, parse_amount,
    totals_by_category,
};

/// A single-screen overview of a set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// How many records went into the report, including dropped ones.
    pub total_records: usize,
    /// The sum of all expense totals, as a positive number.
    pub total_expenses: f64,
    /// The sum of all positive amounts.
    pub total_income: f64,
    /// `total_income - total_expenses`.
    pub net_savings: f64,
    /// The category with the highest expense total, or "N/A" when there are
    /// no expenses.
    pub top_category: String,
    /// The number of categories with a non-negligible expense total.
    pub category_count: usize,
    /// The number of calendar months with at least one expense.
    pub months_covered: usize,
    /// The arithmetic mean of the monthly expense totals, or zero when no
    /// months are covered.
    pub avg_monthly_expense: f64,
    /// Expense totals per category, highest first.
    pub expense_by_category: Vec<(String, f64)>,
    /// Expense totals per month, earliest first.
    pub monthly_expenses: Vec<(String, f64)>,
}

/// Build a [SummaryReport] from raw records.
///
/// Degenerate inputs (no records, all income, nothing parseable) produce a
/// report full of zeros and "N/A" rather than an error.
pub fn summary_report(records: &[RawRecord]) -> SummaryReport {
    let expense_by_category = totals_by_category(records, &CategoryTotalsOptions::default());
    let monthly_expenses = monthly_totals(records, &MonthlyTotalsOptions::default());

    let total_expenses: f64 = expense_by_category.iter().map(|(_, total)| total).sum();

    // Income is summed directly so that the expense threshold does not apply.
    let total_income: f64 = records
        .iter()
        .filter_map(|record| parse_amount(&record.amount).ok())
        .filter(|amount| *amount > 0.0)
        .sum();

    let top_category = expense_by_category
        .first()
        .map(|(category, _)| category.clone())
        .unwrap_or_else(|| "N/A".to_owned());

    // Averaged over the monthly series, not the category totals: the two can
    // differ because rows without a parseable date never reach a month bucket.
    let months_covered = monthly_expenses.len();
    let avg_monthly_expense = if months_covered > 0 {
        monthly_expenses.iter().map(|(_, total)| total).sum::<f64>() / months_covered as f64
    } else {
        0.0
    };

    SummaryReport {
        total_records: records.len(),
        total_expenses,
        total_income,
        net_savings: total_income - total_expenses,
        top_category,
        category_count: expense_by_category.len(),
        months_covered,
        avg_monthly_expense,
        expense_by_category,
        monthly_expenses,
    }
}

#[cfg(test)]
mod tests {
    use super::{RawRecord, summary_report};

    fn record(date: &str, amount: &str, category: &str) -> RawRecord {
        RawRecord {
            date: date.to_owned(),
            amount: amount.to_owned(),
            category: category.to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn report_summarises_expenses_and_income() {
        let records = vec![
            record("2024-01-05", "-30", "Food"),
            record("2024-01-10", "-20", "Food"),
            record("2024-02-01", "-10", "Gas"),
            record("2024-01-31", "2000", "Income"),
        ];

        let report = summary_report(&records);

        assert_eq!(report.total_records, 4);
        assert_eq!(report.total_expenses, 60.0);
        assert_eq!(report.total_income, 2000.0);
        assert_eq!(report.net_savings, 1940.0);
        assert_eq!(report.top_category, "Food");
        assert_eq!(report.category_count, 2);
        assert_eq!(report.months_covered, 2);
        assert_eq!(report.avg_monthly_expense, 30.0);
    }

    #[test]
    fn report_on_empty_input_uses_sentinels() {
        let report = summary_report(&[]);

        assert_eq!(report.total_records, 0);
        assert_eq!(report.total_expenses, 0.0);
        assert_eq!(report.total_income, 0.0);
        assert_eq!(report.net_savings, 0.0);
        assert_eq!(report.top_category, "N/A");
        assert_eq!(report.avg_monthly_expense, 0.0);
        assert!(report.expense_by_category.is_empty());
        assert!(report.monthly_expenses.is_empty());
    }

    #[test]
    fn report_with_only_income_has_no_top_category() {
        let records = vec![record("2024-01-31", "2000", "Income")];

        let report = summary_report(&records);

        assert_eq!(report.top_category, "N/A");
        assert_eq!(report.total_income, 2000.0);
        assert_eq!(report.net_savings, 2000.0);
    }

    #[test]
    fn avg_monthly_expense_is_the_mean_of_the_monthly_series() {
        // The date-less row counts towards the category totals but reaches no
        // month bucket, so the average must follow the monthly series.
        let records = vec![
            record("garbage", "-10", "Food"),
            record("2024-01-01", "-20", "Food"),
        ];

        let report = summary_report(&records);

        assert_eq!(report.monthly_expenses, vec![("2024-01".to_owned(), 20.0)]);
        assert_eq!(report.avg_monthly_expense, 20.0);
        assert_eq!(report.total_expenses, 30.0);
    }

    #[test]
    fn report_with_unparseable_dates_still_totals_by_category() {
        let records = vec![
            record("garbage", "-10", "Food"),
            record("garbage", "-20", "Food"),
        ];

        let report = summary_report(&records);

        assert_eq!(report.total_expenses, 30.0);
        assert_eq!(report.months_covered, 0);
        assert_eq!(report.avg_monthly_expense, 0.0);
    }
}
