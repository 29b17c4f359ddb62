//! Generative storyteller collaborator.
//!
//! Once a child has finished picking, the front end may ask a language
//! model to expand the picks into a longer story. Parents can also ask the
//! same service to read the metrics and describe how their child learns.
//! This is optional and best-effort: failures become a friendly status
//! line and never touch metrics or story state.

use crate::activities::StorySelections;
use crate::config::StoryTellerConfig;
use crate::metrics::{keys, Metrics};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

const STORY_SYSTEM_PROMPT: &str = "You are a gentle storyteller for children aged four to eight. \
Write one short, happy story of at most 150 words using simple words. \
Nothing scary, sad or unsafe. Reply with the story text only.";

const INSIGHTS_SYSTEM_PROMPT: &str =
    "You are an educational psychologist analyzing how a child learns.";

/// Errors from the storyteller service.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("Storyteller not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Storyteller timed out")]
    Timeout,

    #[error("Storyteller returned no text")]
    EmptyResponse,
}

impl CollaboratorError {
    /// Message suitable for showing to a child.
    pub fn user_message(&self) -> &'static str {
        match self {
            CollaboratorError::NotConfigured => {
                "Story magic is switched off. Ask a grown-up to set it up!"
            }
            CollaboratorError::Timeout => "The storyteller took too long. Please try again.",
            _ => "The storyteller is taking a nap. Please try again in a moment.",
        }
    }

    /// Message shown on the parent report when insights fail.
    pub fn insights_message(&self) -> &'static str {
        match self {
            CollaboratorError::NotConfigured => {
                "AI insights need an API key. Set ANTHROPIC_API_KEY and restart."
            }
            _ => "Error generating AI insights. Please check your API key and try again.",
        }
    }
}

/// What to ask the storyteller for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPrompt {
    system: &'static str,
    text: String,
}

impl StoryPrompt {
    /// A free-form story prompt.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            system: STORY_SYSTEM_PROMPT,
            text: text.into(),
        }
    }

    /// Ask for a short analysis of the child's learning preferences,
    /// written for parents.
    pub fn insights(metrics: &Metrics) -> Self {
        Self {
            system: INSIGHTS_SYSTEM_PROMPT,
            text: format!(
                "Math attempts: {}. Math correct: {}. Story dragon choices: {}. \
                 Story river choices: {}. Drawing strokes: {}. Drawing time (seconds): {}. \
                 Provide a brief analysis of the child's learning preferences and \
                 suggest personalised advice for their parents.",
                metrics.get(keys::MATH_ATTEMPTS),
                metrics.get(keys::MATH_CORRECT),
                metrics.get(keys::STORY_DRAGON),
                metrics.get(keys::STORY_RIVER),
                metrics.get(keys::DRAWING_STROKES),
                metrics.get(keys::DRAWING_TIME),
            ),
        }
    }

    /// Prompt built from finished story-builder selections.
    pub fn from_selections(selections: &StorySelections) -> Self {
        Self::new(format!(
            "Tell a story about {hero} and their sidekick {sidekick} in the {setting}. \
             Their mission: {mission}.",
            hero = selections.hero,
            sidekick = selections.sidekick,
            setting = selections.setting,
            mission = selections.mission.to_lowercase(),
        ))
    }

    /// Prompt built from an imagination-explorer idea.
    pub fn from_idea(idea: &str) -> Self {
        Self::new(format!("Tell a story that begins: {idea}"))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Instructions sent as the system prompt.
    pub fn system(&self) -> &str {
        self.system
    }
}

/// Text (and possibly an illustration) returned by the storyteller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStory {
    pub text: String,
    /// Link to an illustration, when the service produces one.
    pub image: Option<String>,
}

/// A service that turns a prompt into a story.
#[async_trait]
pub trait StoryTeller: Send + Sync {
    async fn tell(&self, prompt: &StoryPrompt) -> Result<GeneratedStory, CollaboratorError>;
}

/// Storyteller backed by the Anthropic Messages API.
#[derive(Clone)]
pub struct ClaudeStoryTeller {
    client: reqwest::Client,
    config: StoryTellerConfig,
}

impl ClaudeStoryTeller {
    /// Create a storyteller from its configuration.
    pub fn new(config: StoryTellerConfig) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| CollaboratorError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn build_headers(&self) -> Result<HeaderMap, CollaboratorError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.api_key)
                .map_err(|_| CollaboratorError::NotConfigured)?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    async fn request(&self, prompt: &StoryPrompt) -> Result<GeneratedStory, CollaboratorError> {
        let body = ApiRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: prompt.system(),
            messages: vec![ApiMessage {
                role: "user",
                content: prompt.text(),
            }],
        };

        let response = self
            .client
            .post(format!("{API_BASE}/messages"))
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api { status, message });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Parse(e.to_string()))?;

        let text = api_response.text();
        if text.trim().is_empty() {
            return Err(CollaboratorError::EmptyResponse);
        }

        Ok(GeneratedStory {
            text: text.trim().to_string(),
            image: None,
        })
    }
}

#[async_trait]
impl StoryTeller for ClaudeStoryTeller {
    async fn tell(&self, prompt: &StoryPrompt) -> Result<GeneratedStory, CollaboratorError> {
        tracing::info!(model = %self.config.model, "asking storyteller");
        let result = tokio::time::timeout(self.config.timeout, self.request(prompt))
            .await
            .map_err(|_| CollaboratorError::Timeout)?;

        if let Err(e) = &result {
            tracing::warn!(error = %e, "storyteller failed");
        }
        result
    }
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    system: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ApiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiContent {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl ApiResponse {
    fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                ApiContent::Text { text } => Some(text.as_str()),
                ApiContent::Other => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_from_selections() {
        let selections = StorySelections {
            hero: "Curious Fairy".to_string(),
            sidekick: "Clever Fox".to_string(),
            setting: "Coral Reef".to_string(),
            mission: "Throw a party".to_string(),
        };
        let prompt = StoryPrompt::from_selections(&selections);
        assert!(prompt.text().contains("Curious Fairy"));
        assert!(prompt.text().contains("Coral Reef"));
        assert!(prompt.text().ends_with("throw a party."));
        assert!(prompt.system().contains("storyteller"));
    }

    #[test]
    fn test_insights_prompt_lists_metrics() {
        let metrics: Metrics = [
            (keys::MATH_ATTEMPTS, 10),
            (keys::MATH_CORRECT, 9),
            (keys::STORY_RIVER, 2),
            (keys::DRAWING_STROKES, 150),
        ]
        .into_iter()
        .collect();

        let prompt = StoryPrompt::insights(&metrics);
        assert!(prompt.system().contains("educational psychologist"));
        assert!(prompt.text().starts_with("Math attempts: 10. Math correct: 9."));
        assert!(prompt.text().contains("Story dragon choices: 0."));
        assert!(prompt.text().contains("Story river choices: 2."));
        assert!(prompt.text().contains("Drawing strokes: 150."));
        assert!(prompt.text().contains("Drawing time (seconds): 0."));
        assert!(prompt.text().ends_with("advice for their parents."));
    }

    #[test]
    fn test_parse_api_response() {
        let json = r#"{
            "id": "msg_1",
            "content": [
                { "type": "text", "text": "Once upon a time " },
                { "type": "thinking", "thinking": "..." },
                { "type": "text", "text": "there was a fox." }
            ]
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "Once upon a time there was a fox.");
    }

    #[test]
    fn test_user_messages_are_friendly() {
        assert!(CollaboratorError::NotConfigured
            .user_message()
            .contains("grown-up"));
        assert!(CollaboratorError::Timeout.user_message().contains("too long"));
        assert!(CollaboratorError::Api {
            status: 500,
            message: "boom".to_string()
        }
        .user_message()
        .contains("nap"));
        assert!(CollaboratorError::Timeout
            .insights_message()
            .starts_with("Error generating AI insights"));
    }
}
