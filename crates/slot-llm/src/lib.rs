//! Claude API integration for slot resolution.
//!
//! Implements both remote collaborators of `slot-engine`:
//! - [`AvailabilityTextParser`]: free-text availability → days and a time range
//! - [`PreferenceAnalyzer`]: attendee summaries → preferred ranges, days, notes
//!
//! Every call is a single blocking request bounded by the client timeout.
//! Failures are reported as [`Collaboration::Unavailable`] so the resolver can
//! fall back to its local logic.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use slot_engine::{
    AttendeeSummary, AvailabilityTextParser, Collaboration, ParsedAvailability,
    PreferenceAnalyzer, PreferenceHint,
};
use thiserror::Error;

/// Default request timeout for API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1000;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Claude API client.
///
/// Clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key, model, and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            model: model.into(),
        })
    }

    /// Ask Claude to turn availability text into days and a time range.
    pub fn parse_availability_text(
        &self,
        text: &str,
        timezone_hint: Option<&str>,
    ) -> Result<ParsedAvailability, LlmError> {
        let reply = self.complete(build_availability_prompt(text, timezone_hint))?;
        decode_json(&reply)
    }

    /// Ask Claude for preferred meeting ranges and days across attendees.
    pub fn analyze_meeting_preferences(
        &self,
        attendees: &[AttendeeSummary],
        target_timezone: &str,
    ) -> Result<PreferenceHint, LlmError> {
        let prompt = build_preference_prompt(attendees, target_timezone)?;
        let reply = self.complete(prompt)?;
        decode_json(&reply)
    }

    fn complete(&self, prompt: String) -> Result<String, LlmError> {
        let request = MessageRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: MessageResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        extract_text(payload.content)
    }
}

impl AvailabilityTextParser for Client {
    fn parse_availability(
        &self,
        text: &str,
        timezone_hint: Option<&str>,
    ) -> Collaboration<ParsedAvailability> {
        match self.parse_availability_text(text, timezone_hint) {
            Ok(parsed) => Collaboration::Parsed(parsed),
            Err(err) => {
                tracing::warn!(error = %err, "Claude availability parsing failed");
                Collaboration::Unavailable(err.to_string())
            }
        }
    }
}

impl PreferenceAnalyzer for Client {
    fn analyze_preferences(
        &self,
        attendees: &[AttendeeSummary],
        target_timezone: &str,
    ) -> Collaboration<PreferenceHint> {
        if attendees.is_empty() {
            return Collaboration::Unavailable("no attendees to analyze".to_string());
        }
        match self.analyze_meeting_preferences(attendees, target_timezone) {
            Ok(hint) => Collaboration::Parsed(hint),
            Err(err) => {
                tracing::warn!(error = %err, "Claude preference analysis failed");
                Collaboration::Unavailable(err.to_string())
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}

fn extract_text(blocks: Vec<ContentBlock>) -> Result<String, LlmError> {
    let mut pieces = Vec::new();
    for block in blocks {
        let ContentBlock::Text { text } = block;
        pieces.push(text);
    }
    if pieces.is_empty() {
        return Err(LlmError::InvalidResponse(
            "missing text content".to_string(),
        ));
    }
    Ok(pieces.join("\n"))
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_availability_prompt(text: &str, timezone_hint: Option<&str>) -> String {
    let timezone = timezone_hint.unwrap_or("Not specified (assume local time)");
    let mut lines = Vec::new();
    lines.push(format!("Parse the following availability text: \"{text}\""));
    lines.push(format!("The attendee's timezone is: {timezone}"));
    lines.push(String::new());
    lines.push("Return strict JSON with this structure:".to_string());
    lines.push(
        r#"{"days":["monday","tuesday"],"start_time":{"hour":14,"minute":0},"end_time":{"hour":17,"minute":0}}"#
            .to_string(),
    );
    lines.push("Rules:".to_string());
    lines.push("- For \"working days\" or \"weekdays\", include Monday through Friday.".to_string());
    lines.push("- Use lower-case English day names.".to_string());
    lines.push("- Convert all times to 24-hour format (e.g. 2 pm = 14:00).".to_string());
    lines.join("\n")
}

fn build_preference_prompt(
    attendees: &[AttendeeSummary],
    target_timezone: &str,
) -> Result<String, LlmError> {
    let rendered = serde_json::to_string_pretty(attendees)
        .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
    let mut lines = Vec::new();
    lines.push("Analyze the following attendee information for a meeting:".to_string());
    lines.push(rendered);
    lines.push(String::new());
    lines.push(format!("Target timezone for the meeting: {target_timezone}"));
    lines.push("Identify optimal time ranges, the best days of the week, and notable constraints.".to_string());
    lines.push("Return strict JSON with this structure:".to_string());
    lines.push(
        r#"{"preferred_time_ranges":[{"start":{"hour":10,"minute":0},"end":{"hour":12,"minute":0}}],"preferred_days":["monday"],"notes":"..."}"#
            .to_string(),
    );
    lines.push(format!(
        "Consider timezone overlap for international attendees. All times must be in {target_timezone}."
    ));
    Ok(lines.join("\n"))
}

/// Decode the JSON object in a model reply.
///
/// Prefers the first ```` ```json ```` fenced block, then the span from the
/// first `{` to the last `}`.
fn decode_json<T: serde::de::DeserializeOwned>(reply: &str) -> Result<T, LlmError> {
    let candidate = fenced_json(reply)
        .or_else(|| braced_json(reply))
        .ok_or_else(|| LlmError::InvalidResponse("no JSON object in reply".to_string()))?;
    serde_json::from_str(candidate).map_err(|err| LlmError::InvalidResponse(err.to_string()))
}

fn fenced_json(reply: &str) -> Option<&str> {
    let after_fence = &reply[reply.find("```json")? + "```json".len()..];
    let end = after_fence.find("```")?;
    Some(after_fence[..end].trim())
}

fn braced_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}
