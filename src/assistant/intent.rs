//! Keyword-based classification of what a financial question is about.
//!
//! The classification only steers the prompt, so it errs on the side of
//! matching broadly. Substring matching against lowercase keyword lists is
//! enough for that: stems like "spend" also match "spending", and short
//! keywords such as "may" can match inside unrelated words ("maybe").

/// A financial topic a question can touch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialDomain {
    /// Where the money goes.
    SpendingPatterns,
    /// Budgets and limits.
    Budgeting,
    /// Investments and returns.
    Investment,
    /// Loans and repayment.
    Debt,
    /// Saving up.
    Savings,
    /// Income versus outgoings.
    CashFlow,
    /// What comes next.
    Forecasting,
}

impl FinancialDomain {
    /// A human-readable name for use in prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::SpendingPatterns => "spending patterns",
            Self::Budgeting => "budgeting",
            Self::Investment => "investment",
            Self::Debt => "debt",
            Self::Savings => "savings",
            Self::CashFlow => "cash flow",
            Self::Forecasting => "forecasting",
        }
    }
}

/// The time window a question refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeReference {
    /// A specific or recent month.
    Month,
    /// A specific or recent year.
    Year,
    /// A specific or recent week.
    Week,
    /// Looking ahead.
    Future,
    /// Looking back.
    Past,
}

impl TimeReference {
    /// A human-readable name for use in prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Month => "monthly",
            Self::Year => "yearly",
            Self::Week => "weekly",
            Self::Future => "future",
            Self::Past => "past",
        }
    }
}

const DOMAIN_KEYWORDS: &[(FinancialDomain, &[&str])] = &[
    (
        FinancialDomain::SpendingPatterns,
        &["spend", "spent", "spending", "expense", "expenses", "cost", "bought", "purchase"],
    ),
    (
        FinancialDomain::Budgeting,
        &["budget", "limit", "allocate", "allocation", "plan", "overspend"],
    ),
    (
        FinancialDomain::Investment,
        &["invest", "investment", "stock", "portfolio", "return", "dividend"],
    ),
    (
        FinancialDomain::Debt,
        &["debt", "loan", "owe", "credit", "interest", "repay", "mortgage"],
    ),
    (
        FinancialDomain::Savings,
        &["save", "saving", "savings", "emergency fund", "nest egg"],
    ),
    (
        FinancialDomain::CashFlow,
        &["cash flow", "income", "salary", "earn", "net", "balance"],
    ),
    (
        FinancialDomain::Forecasting,
        &["forecast", "project", "projection", "estimate", "trend"],
    ),
];

const TIME_KEYWORDS: &[(TimeReference, &[&str])] = &[
    (TimeReference::Month, &["month", "monthly", "january", "february", "march", "april", "may", "june", "july", "august", "september", "october", "november", "december"]),
    (TimeReference::Year, &["year", "yearly", "annual", "annually"]),
    (TimeReference::Week, &["week", "weekly"]),
    (TimeReference::Future, &["next", "upcoming", "going to", "will i"]),
    (TimeReference::Past, &["last", "previous", "ago", "history", "so far"]),
];

const COMPARISON_KEYWORDS: &[&str] = &["compare", "vs", "versus", "difference"];
const PREDICTION_KEYWORDS: &[&str] = &["predict", "forecast", "future", "will"];
const RECOMMENDATION_KEYWORDS: &[&str] = &["recommend", "suggest", "advice", "should", "how to"];

/// What a question is asking about, derived from its wording.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryIntent {
    /// Every financial topic the question touches on.
    pub domains: Vec<FinancialDomain>,
    /// The first time window mentioned, if any.
    pub time_reference: Option<TimeReference>,
    /// The question compares two things.
    pub wants_comparison: bool,
    /// The question asks about the future.
    pub wants_prediction: bool,
    /// The question asks what to do.
    pub wants_recommendation: bool,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Classify a free-form question.
///
/// Matching is case-insensitive. Multiple domains can match at once; the
/// time reference is first-match-wins in a fixed order, month before year
/// before week.
pub fn analyze_intent(query: &str) -> QueryIntent {
    let query = query.to_lowercase();

    let domains = DOMAIN_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&query, keywords))
        .map(|(domain, _)| *domain)
        .collect();

    let time_reference = TIME_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&query, keywords))
        .map(|(reference, _)| *reference);

    QueryIntent {
        domains,
        time_reference,
        wants_comparison: contains_any(&query, COMPARISON_KEYWORDS),
        wants_prediction: contains_any(&query, PREDICTION_KEYWORDS),
        wants_recommendation: contains_any(&query, RECOMMENDATION_KEYWORDS),
    }
}

#[cfg(test)]
mod tests {
    use super::{FinancialDomain, TimeReference, analyze_intent};

    #[test]
    fn detects_spending_questions() {
        let intent = analyze_intent("How much did I spend on food?");

        assert!(intent.domains.contains(&FinancialDomain::SpendingPatterns));
        assert!(!intent.wants_prediction);
    }

    #[test]
    fn detects_multiple_domains() {
        let intent = analyze_intent("Can I budget more savings from my income?");

        assert!(intent.domains.contains(&FinancialDomain::Budgeting));
        assert!(intent.domains.contains(&FinancialDomain::Savings));
        assert!(intent.domains.contains(&FinancialDomain::CashFlow));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let intent = analyze_intent("WHAT DID I SPEND IN JANUARY?");

        assert!(intent.domains.contains(&FinancialDomain::SpendingPatterns));
        assert_eq!(intent.time_reference, Some(TimeReference::Month));
    }

    #[test]
    fn first_time_reference_wins() {
        // Mentions both a month and "last"; month is checked first.
        let intent = analyze_intent("What happened last month?");

        assert_eq!(intent.time_reference, Some(TimeReference::Month));
    }

    #[test]
    fn detects_request_types() {
        let comparison = analyze_intent("Compare my food and gas spending");
        assert!(comparison.wants_comparison);

        let prediction = analyze_intent("Will I run out of money?");
        assert!(prediction.wants_prediction);

        let recommendation = analyze_intent("What should I cut back on?");
        assert!(recommendation.wants_recommendation);
    }

    #[test]
    fn short_keywords_match_inside_longer_words() {
        // Substring matching is deliberately loose, see the module doc.
        let intent = analyze_intent("maybe later");

        assert_eq!(intent.time_reference, Some(TimeReference::Month));
    }

    #[test]
    fn unrelated_text_matches_nothing() {
        let intent = analyze_intent("hello there");

        assert!(intent.domains.is_empty());
        assert_eq!(intent.time_reference, None);
        assert!(!intent.wants_comparison);
        assert!(!intent.wants_prediction);
        assert!(!intent.wants_recommendation);
    }
}
