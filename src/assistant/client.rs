//! The HTTP client for a local Ollama server.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Where Ollama listens by default.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// A blocking chat completion backend.
///
/// The production implementation is [OllamaClient]; tests substitute stubs.
pub trait ChatModel {
    /// Send one system + user message pair to `model` and return the reply
    /// text.
    ///
    /// # Errors
    /// Returns [Error::ModelRequest] when the request fails for any reason,
    /// including timeouts and models that are not installed.
    fn chat(&self, model: &str, system_prompt: &str, user_message: &str) -> Result<String, Error>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// A [ChatModel] backed by Ollama's `/api/chat` endpoint.
pub struct OllamaClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl OllamaClient {
    /// Create a client for the server at `base_url` with a per-request
    /// `timeout`.
    ///
    /// # Errors
    /// Returns [Error::HttpClient] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }
}

impl ChatModel for OllamaClient {
    fn chat(&self, model: &str, system_prompt: &str, user_message: &str) -> Result<String, Error> {
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            stream: false,
        };

        let to_model_error =
            |error: reqwest::Error| Error::ModelRequest(model.to_owned(), error.to_string());

        let response: ChatResponse = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .map_err(to_model_error)?
            .error_for_status()
            .map_err(to_model_error)?
            .json()
            .map_err(to_model_error)?;

        Ok(response.message.content)
    }
}
