//! System prompt assembly.

use std::fmt::Write;

use super::intent::{FinancialDomain, QueryIntent};

/// The base instructions sent with every chat request.
pub const SYSTEM_PROMPT: &str = "You are a helpful personal finance assistant. \
You answer questions about the user's own transaction data, which is provided \
as a summary in the user's message. Ground every figure you mention in that \
summary. Be concise and practical, and say so plainly when the data does not \
cover what was asked.";

/// Build the system prompt for a classified question.
///
/// Starts from [SYSTEM_PROMPT] and appends focus lines matching the intent,
/// so the same question always produces the same prompt.
pub fn system_prompt(intent: &QueryIntent) -> String {
    let mut prompt = SYSTEM_PROMPT.to_owned();

    if intent.wants_comparison {
        let _ = write!(
            prompt,
            " When comparing, state both figures and the difference explicitly."
        );
    }

    if intent.wants_prediction {
        let _ = write!(
            prompt,
            " For projections, extrapolate only from the trends in the summary \
             and state the assumption."
        );
    }

    if intent.wants_recommendation {
        let _ = write!(
            prompt,
            " Give at most three concrete suggestions, ordered by likely impact."
        );
    }

    if intent.domains.contains(&FinancialDomain::Budgeting) {
        let _ = write!(
            prompt,
            " Frame amounts against the average monthly expenses where useful."
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::super::intent::analyze_intent;
    use super::{SYSTEM_PROMPT, system_prompt};

    #[test]
    fn plain_questions_use_the_base_prompt() {
        let intent = analyze_intent("hello");

        assert_eq!(system_prompt(&intent), SYSTEM_PROMPT);
    }

    #[test]
    fn focus_lines_are_appended_for_matching_intents() {
        let intent = analyze_intent("Should I change my budget?");
        let prompt = system_prompt(&intent);

        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("suggestions"));
        assert!(prompt.contains("average monthly expenses"));
    }

    #[test]
    fn same_question_always_builds_the_same_prompt() {
        let question = "Compare last month to this month";

        let first = system_prompt(&analyze_intent(question));
        let second = system_prompt(&analyze_intent(question));

        assert_eq!(first, second);
    }
}
