use anyhow::{Context, anyhow};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o";
pub const DEFAULT_SUMMARY_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const SUMMARY_TEMPERATURE: f64 = 0.2;
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// What a summarizer is told about one method.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub owner: &'a str,
    pub method_name: &'a str,
    pub documentation: &'a str,
    pub body: &'a str,
}

/// Produces the one-sentence `description` of a method. Shared by every
/// worker thread, so implementations must be thread safe.
pub trait MethodSummarizer: Send + Sync {
    fn summarize(&self, request: &SummaryRequest<'_>) -> anyhow::Result<String>;
}

/// Runs `summarizer`, turning any failure into an empty description.
pub fn describe(summarizer: &dyn MethodSummarizer, request: &SummaryRequest<'_>) -> String {
    match summarizer.summarize(request) {
        Ok(description) => description.trim().to_string(),
        Err(e) => {
            log::warn!(
                "Summary for {}.{} failed, leaving it empty: {e:#}",
                request.owner,
                request.method_name
            );
            String::new()
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSummarizer;

impl MethodSummarizer for DisabledSummarizer {
    fn summarize(&self, _request: &SummaryRequest<'_>) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl SummarizerConfig {
    /// Reads `OPENAI_API_KEY`, `JKG_SUMMARY_MODEL` and `JKG_SUMMARY_ENDPOINT`.
    /// Returns `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        Some(Self {
            api_key,
            model: env_or("JKG_SUMMARY_MODEL", DEFAULT_SUMMARY_MODEL),
            endpoint: env_or("JKG_SUMMARY_ENDPOINT", DEFAULT_SUMMARY_ENDPOINT),
            timeout: Duration::from_secs(60),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Chat-completions client asking for a single-sentence summary.
pub struct OpenAiSummarizer {
    client: reqwest::blocking::Client,
    config: SummarizerConfig,
}

impl OpenAiSummarizer {
    pub fn new(config: SummarizerConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client for method summaries")?;
        Ok(Self { client, config })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

pub(crate) fn summary_prompt(request: &SummaryRequest<'_>) -> String {
    let documentation = if request.documentation.is_empty() {
        "(none)"
    } else {
        request.documentation
    };
    format!(
        "Summarize in one sentence what the Java method `{}` of `{}` does.\n\nJavadoc:\n{}\n\nBody:\n{}",
        request.method_name, request.owner, documentation, request.body
    )
}

impl MethodSummarizer for OpenAiSummarizer {
    fn summarize(&self, request: &SummaryRequest<'_>) -> anyhow::Result<String> {
        let payload = json!({
            "model": self.config.model,
            "temperature": SUMMARY_TEMPERATURE,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": summary_prompt(request)},
            ],
        });

        let response: ChatResponse = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()?
            .error_for_status()?
            .json()?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("completion returned no content"))
    }
}
