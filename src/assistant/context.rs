//! Renders transaction data into a text block the model can reason over.

use std::fmt::Write;

use crate::aggregate::{RawRecord, summary_report};

/// Summarize records as plain text for inclusion in a model prompt.
///
/// Includes the headline figures, the top five expense categories, and the
/// month-over-month trend when at least two months are covered.
pub fn build_context(records: &[RawRecord]) -> String {
    if records.is_empty() {
        return "No transaction data available.".to_owned();
    }

    let report = summary_report(records);
    let mut context = String::new();

    // String formatting is infallible, so the writes cannot fail.
    let _ = writeln!(context, "Financial summary:");
    let _ = writeln!(context, "- Records: {}", report.total_records);
    let _ = writeln!(context, "- Total expenses: ${:.2}", report.total_expenses);
    let _ = writeln!(context, "- Total income: ${:.2}", report.total_income);
    let _ = writeln!(context, "- Net savings: ${:.2}", report.net_savings);
    let _ = writeln!(context, "- Months covered: {}", report.months_covered);
    let _ = writeln!(
        context,
        "- Average monthly expenses: ${:.2}",
        report.avg_monthly_expense
    );

    if !report.expense_by_category.is_empty() {
        let _ = writeln!(context, "\nTop expense categories:");
        for (category, total) in report.expense_by_category.iter().take(5) {
            let _ = writeln!(context, "- {category}: ${total:.2}");
        }
    }

    if report.monthly_expenses.len() > 1 {
        let (previous_month, previous) = &report.monthly_expenses[report.monthly_expenses.len() - 2];
        let (latest_month, latest) = &report.monthly_expenses[report.monthly_expenses.len() - 1];

        let _ = writeln!(
            context,
            "\nLatest month ({latest_month}): ${latest:.2}, previous ({previous_month}): ${previous:.2}"
        );

        if *previous > 0.0 {
            let change = (latest - previous) / previous * 100.0;
            let direction = if change >= 0.0 { "up" } else { "down" };
            let _ = writeln!(
                context,
                "Month-over-month spending is {direction} {:.1}%",
                change.abs()
            );
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use crate::aggregate::RawRecord;

    use super::build_context;

    fn record(date: &str, amount: &str, category: &str) -> RawRecord {
        RawRecord {
            date: date.to_owned(),
            amount: amount.to_owned(),
            category: category.to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn empty_records_produce_a_fixed_message() {
        assert_eq!(build_context(&[]), "No transaction data available.");
    }

    #[test]
    fn context_includes_headline_figures_and_categories() {
        let records = vec![
            record("2024-01-05", "-30", "Food"),
            record("2024-01-31", "2000", "Income"),
        ];

        let context = build_context(&records);

        assert!(context.contains("Total expenses: $30.00"));
        assert!(context.contains("Total income: $2000.00"));
        assert!(context.contains("- Food: $30.00"));
    }

    #[test]
    fn context_reports_month_over_month_trend() {
        let records = vec![
            record("2024-01-05", "-100", "Food"),
            record("2024-02-05", "-150", "Food"),
        ];

        let context = build_context(&records);

        assert!(context.contains("up 50.0%"));
    }

    #[test]
    fn single_month_has_no_trend_line() {
        let records = vec![record("2024-01-05", "-100", "Food")];

        let context = build_context(&records);

        assert!(!context.contains("Month-over-month"));
    }

    #[test]
    fn zero_previous_month_does_not_divide_by_zero() {
        let records = vec![
            record("2024-01-05", "100", "Income"),
            record("2024-01-06", "-0.001", "Food"),
            record("2024-02-05", "-150", "Food"),
        ];

        let context = build_context(&records);

        // Trend percentage is skipped rather than printing inf or NaN.
        assert!(!context.contains("inf"));
        assert!(!context.contains("NaN"));
    }
}
