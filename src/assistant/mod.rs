//! The financial assistant: classifies a question, summarizes the user's
//! data into a prompt, and asks a local Ollama model with a fallback.
//!
//! Model calls are best-effort. When both the primary and fallback model
//! fail, the reply degrades to a fixed offline message that still carries
//! the data summary, so the caller always gets a usable answer.

mod client;
mod context;
mod intent;
mod prompt;

pub use client::{ChatModel, DEFAULT_OLLAMA_URL, OllamaClient};
pub use context::build_context;
pub use intent::{FinancialDomain, QueryIntent, TimeReference, analyze_intent};
pub use prompt::{SYSTEM_PROMPT, system_prompt};

use std::fmt::Write;

use crate::aggregate::RawRecord;

/// Which models to try, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// The model asked first.
    pub primary: String,
    /// The model asked when the primary fails.
    pub fallback: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            primary: "mistral".to_owned(),
            fallback: "llama3".to_owned(),
        }
    }
}

/// The assistant's answer to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    /// The answer text. Always present, even when no model responded.
    pub text: String,
    /// The model that produced the text, or `None` for the offline message.
    pub model: Option<String>,
}

/// Answer a question about `records`.
///
/// Tries `models.primary`, then `models.fallback`, then falls back to a
/// deterministic offline message built from the question and the data
/// summary. This function never returns an error; model failures are logged
/// and absorbed.
pub fn ask(
    client: &impl ChatModel,
    models: &ModelConfig,
    question: &str,
    records: &[RawRecord],
) -> AssistantReply {
    let intent = analyze_intent(question);
    let context = build_context(records);
    let system = system_prompt(&intent);
    let message = format_user_message(&intent, &context, question);

    match client.chat(&models.primary, &system, &message) {
        Ok(text) => {
            return AssistantReply {
                text,
                model: Some(models.primary.clone()),
            };
        }
        Err(error) => {
            tracing::warn!(
                "model \"{}\" failed, trying \"{}\": {error}",
                models.primary,
                models.fallback
            );
        }
    }

    match client.chat(&models.fallback, &system, &message) {
        Ok(text) => AssistantReply {
            text,
            model: Some(models.fallback.clone()),
        },
        Err(error) => {
            tracing::error!("fallback model \"{}\" also failed: {error}", models.fallback);

            AssistantReply {
                text: unavailable_message(question, &context, models),
                model: None,
            }
        }
    }
}

/// Build the user message: the data summary, the classification, then the
/// question itself.
fn format_user_message(intent: &QueryIntent, context: &str, question: &str) -> String {
    let mut message = String::new();

    let _ = writeln!(message, "{context}");

    if !intent.domains.is_empty() {
        let domains: Vec<&str> = intent.domains.iter().map(|domain| domain.label()).collect();
        let _ = writeln!(message, "Topics: {}", domains.join(", "));
    }

    if let Some(reference) = intent.time_reference {
        let _ = writeln!(message, "Time frame: {}", reference.label());
    }

    if intent.wants_comparison {
        let _ = writeln!(message, "The user wants a comparison.");
    }
    if intent.wants_prediction {
        let _ = writeln!(message, "The user wants a projection.");
    }
    if intent.wants_recommendation {
        let _ = writeln!(message, "The user wants recommendations.");
    }

    let _ = write!(message, "\nQuestion: {question}");

    message
}

/// The reply used when no model could be reached. Embeds the question and
/// the data summary so the user still gets their numbers, plus the steps to
/// bring the models back.
fn unavailable_message(question: &str, context: &str, models: &ModelConfig) -> String {
    format!(
        "The language models are not available right now, so I could not \
         answer:\n\n  {question}\n\nHere is the summary of your data \
         instead:\n\n{context}\n\
         To enable full answers, start the model server and install a \
         model:\n\n  ollama serve\n  ollama pull {}\n  ollama pull {}\n",
        models.primary, models.fallback
    )
}

#[cfg(test)]
mod tests {
    use crate::{Error, aggregate::RawRecord};

    use super::{AssistantReply, ChatModel, ModelConfig, ask};

    struct AlwaysAnswers;

    impl ChatModel for AlwaysAnswers {
        fn chat(&self, model: &str, _system: &str, _user: &str) -> Result<String, Error> {
            Ok(format!("answer from {model}"))
        }
    }

    struct OnlyFallbackAnswers;

    impl ChatModel for OnlyFallbackAnswers {
        fn chat(&self, model: &str, _system: &str, _user: &str) -> Result<String, Error> {
            if model == "mistral" {
                Err(Error::ModelRequest(model.to_owned(), "refused".to_owned()))
            } else {
                Ok("fallback answer".to_owned())
            }
        }
    }

    struct NeverAnswers;

    impl ChatModel for NeverAnswers {
        fn chat(&self, model: &str, _system: &str, _user: &str) -> Result<String, Error> {
            Err(Error::ModelRequest(model.to_owned(), "refused".to_owned()))
        }
    }

    fn sample_records() -> Vec<RawRecord> {
        vec![RawRecord {
            date: "2024-01-05".to_owned(),
            amount: "-30".to_owned(),
            category: "Food".to_owned(),
            description: String::new(),
        }]
    }

    #[test]
    fn primary_model_answers_when_available() {
        let reply = ask(
            &AlwaysAnswers,
            &ModelConfig::default(),
            "How much did I spend?",
            &sample_records(),
        );

        assert_eq!(
            reply,
            AssistantReply {
                text: "answer from mistral".to_owned(),
                model: Some("mistral".to_owned()),
            }
        );
    }

    #[test]
    fn fallback_model_is_used_when_primary_fails() {
        let reply = ask(
            &OnlyFallbackAnswers,
            &ModelConfig::default(),
            "How much did I spend?",
            &sample_records(),
        );

        assert_eq!(reply.text, "fallback answer");
        assert_eq!(reply.model, Some("llama3".to_owned()));
    }

    #[test]
    fn offline_message_carries_question_and_summary() {
        let reply = ask(
            &NeverAnswers,
            &ModelConfig::default(),
            "How much did I spend on food?",
            &sample_records(),
        );

        assert_eq!(reply.model, None);
        assert!(reply.text.contains("How much did I spend on food?"));
        assert!(reply.text.contains("Total expenses: $30.00"));
        assert!(reply.text.contains("ollama pull mistral"));
    }

    #[test]
    fn offline_message_is_deterministic() {
        let first = ask(&NeverAnswers, &ModelConfig::default(), "q", &[]);
        let second = ask(&NeverAnswers, &ModelConfig::default(), "q", &[]);

        assert_eq!(first, second);
        assert!(first.text.contains("No transaction data available."));
    }
}
