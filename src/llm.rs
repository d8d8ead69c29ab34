//! LLM integration for next-session suggestions
//!
//! This module handles communication with the Claude API. It is an
//! alternate [`GoalAdvisor`]; the rule-based advisor stays the default.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{last_top_set, top_sets_by_day};
use crate::models::LoggedSet;
use crate::progression::{GoalAdvisor, TrendDecision, NOT_ENOUGH_DATA};

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";
const SUGGESTION_MAX_TOKENS: u32 = 300;

/// Sessions included in the prompt
const PROMPT_HISTORY_DAYS: usize = 8;

const COACH_SYSTEM_PROMPT: &str = "You are a concise strength coach. \
Given a lifter's recent top sets for one exercise, recommend the next session's \
top-set target (weight in lb and reps) in two sentences or fewer. \
Favour small, sustainable progressive overload. Do not use markdown.";

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Serialize)]
pub enum LlmError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Claude API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ClaudeRequest {
  model: String,
  max_tokens: u32,
  system: String,
  messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
  role: String,
  content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
  content: Vec<ContentBlock>,
  usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
  #[serde(rename = "type")]
  content_type: String,
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
  pub input_tokens: u32,
  pub output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ClaudeErrorResponse {
  error: ClaudeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ClaudeErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Claude Client
/// ---------------------------------------------------------------------------

pub struct ClaudeClient {
  client: Client,
  api_key: String,
  api_url: String,
}

impl ClaudeClient {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      client: Client::new(),
      api_key: api_key.into(),
      api_url: CLAUDE_API_URL.to_string(),
    }
  }

  /// Create a client from a configured key
  pub fn from_key(api_key: Option<&str>) -> Result<Self, LlmError> {
    api_key
      .filter(|k| !k.trim().is_empty())
      .map(Self::new)
      .ok_or(LlmError::MissingApiKey)
  }

  /// Point the client at a different Messages endpoint
  pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
    self.api_url = api_url.into();
    self
  }

  /// Call Claude with a system prompt and user message
  pub async fn complete(
    &self,
    system_prompt: &str,
    user_message: &str,
    max_tokens: u32,
  ) -> Result<(String, Usage), LlmError> {
    let request = ClaudeRequest {
      model: CLAUDE_MODEL.to_string(),
      max_tokens,
      system: system_prompt.to_string(),
      messages: vec![ClaudeMessage {
        role: "user".to_string(),
        content: user_message.to_string(),
      }],
    };

    let response = self
      .client
      .post(&self.api_url)
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", API_VERSION)
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    if !status.is_success() {
      if let Ok(error_resp) = serde_json::from_str::<ClaudeErrorResponse>(&body) {
        return Err(LlmError::Api(error_resp.error.message));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
    }

    let claude_response: ClaudeResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let text = claude_response
      .content
      .iter()
      .find(|c| c.content_type == "text")
      .and_then(|c| c.text.clone())
      .ok_or_else(|| LlmError::Parse("No text content in response".to_string()))?;

    Ok((text, claude_response.usage))
  }
}

/// ---------------------------------------------------------------------------
/// Prompt
/// ---------------------------------------------------------------------------

/// Summarize one exercise's history for the model
fn build_suggestion_prompt(sets: &[LoggedSet]) -> String {
  let tops = top_sets_by_day(sets);
  let start = tops.len().saturating_sub(PROMPT_HISTORY_DAYS);
  let exercise = sets.first().map(|s| s.exercise.as_str()).unwrap_or("Unknown");

  let mut prompt = format!("Exercise: {}\n\nRecent top sets (date: weight):\n", exercise);
  for top in &tops[start..] {
    prompt.push_str(&format!("- {}: {:.1} lb\n", top.date, top.top_weight));
  }

  if let Some(last) = last_top_set(sets) {
    prompt.push_str(&format!(
      "\nLast session top set: {:.1} lb x {} reps on {}\n",
      last.weight, last.reps, last.date
    ));
  }

  let rule_hint = TrendDecision::classify(&tops).message();
  prompt.push_str(&format!("\nRule-based suggestion for reference: {}\n", rule_hint));
  prompt.push_str("\nWhat should the next top set be?");
  prompt
}

/// ---------------------------------------------------------------------------
/// Advisor
/// ---------------------------------------------------------------------------

/// Generated-text advisor backed by Claude
pub struct ClaudeAdvisor {
  client: ClaudeClient,
}

impl ClaudeAdvisor {
  pub fn new(client: ClaudeClient) -> Self {
    Self { client }
  }
}

#[async_trait]
impl GoalAdvisor for ClaudeAdvisor {
  fn name(&self) -> &'static str {
    "claude"
  }

  async fn suggest_next_goal(&self, sets: &[LoggedSet]) -> Result<String, LlmError> {
    if sets.is_empty() {
      return Ok(NOT_ENOUGH_DATA.to_string());
    }

    let prompt = build_suggestion_prompt(sets);
    let (text, usage) = self
      .client
      .complete(COACH_SYSTEM_PROMPT, &prompt, SUGGESTION_MAX_TOKENS)
      .await?;

    tracing::debug!(
      input_tokens = usage.input_tokens,
      output_tokens = usage.output_tokens,
      "Claude suggestion generated"
    );

    let text = text.trim();
    if text.is_empty() {
      return Err(LlmError::Parse("Empty suggestion".to_string()));
    }
    Ok(text.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
