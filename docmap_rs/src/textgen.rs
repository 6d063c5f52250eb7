//! Optional text generation.
//!
//! Descriptions for files, folders, the project and its architecture can be
//! requested from an OpenAI-compatible chat completions endpoint. Nothing
//! depends on the service being reachable: every caller keeps its
//! heuristic text when a request fails.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;
use crate::error::TextGenError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    File,
    Folder,
    Project,
    Architecture,
}

impl SubjectKind {
    fn instruction(&self) -> &'static str {
        match self {
            SubjectKind::File => "Describe the purpose of this source file in one sentence.",
            SubjectKind::Folder => "Describe the role of this folder in one sentence.",
            SubjectKind::Project => "Write a two-sentence overview of this software project.",
            SubjectKind::Architecture => {
                "Summarise the architecture of this project in two sentences."
            }
        }
    }
}

/// One description request. `context` carries whatever facts the caller has
/// (type, language, imports, child counts, ...), rendered as `key: value`
/// lines in the prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    pub subject: SubjectKind,
    /// Relative path or project name.
    pub name: String,
    pub context: BTreeMap<String, String>,
    /// ISO-639-1 code of the language to answer in.
    pub natural_language: String,
}

impl TextRequest {
    pub fn new(subject: SubjectKind, name: impl Into<String>, natural_language: &str) -> Self {
        Self {
            subject,
            name: name.into(),
            context: BTreeMap::new(),
            natural_language: natural_language.to_string(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.context.insert(key.to_string(), value);
        }
        self
    }

    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "{} Answer in language `{}`. Reply with the description only.\n\nName: {}\n",
            self.subject.instruction(),
            self.natural_language,
            self.name
        );
        for (key, value) in &self.context {
            prompt.push_str(&format!("{key}: {value}\n"));
        }
        prompt
    }
}

/// Source of generated descriptions.
pub trait TextGenerator: Send + Sync {
    /// False when requests would fail without trying.
    fn is_enabled(&self) -> bool {
        true
    }

    fn generate(
        &self,
        request: &TextRequest,
    ) -> impl Future<Output = Result<String, TextGenError>> + Send;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone, Debug)]
pub struct HttpTextGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl HttpTextGenerator {
    /// Build a client from `ai` settings. The API key is read from the
    /// environment variable named by `ai.api_key_env`, if set.
    pub fn from_config(ai: &AiConfig) -> Result<Self, TextGenError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let api_key = std::env::var(&ai.api_key_env)
            .ok()
            .filter(|k| !k.is_empty());
        Ok(Self {
            client,
            endpoint: ai.endpoint.clone(),
            model: ai.model.clone(),
            api_key,
            temperature: ai.temperature,
            max_tokens: ai.max_tokens,
        })
    }

    async fn complete(&self, prompt: String) -> Result<String, TextGenError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TextGenError::Status(status.as_u16()));
        }
        let reply = response.json::<ChatResponse>().await?;
        let text = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(TextGenError::EmptyResponse);
        }
        debug!(chars = text.len(), "generated text received");
        Ok(text)
    }
}

impl TextGenerator for HttpTextGenerator {
    fn generate(
        &self,
        request: &TextRequest,
    ) -> impl Future<Output = Result<String, TextGenError>> + Send {
        let prompt = request.prompt();
        self.complete(prompt)
    }
}

/// Runtime choice between no generation and the HTTP client.
#[derive(Clone, Debug, Default)]
pub enum Generator {
    #[default]
    Disabled,
    Http(HttpTextGenerator),
}

impl Generator {
    pub fn from_config(ai: &AiConfig) -> Result<Self, TextGenError> {
        if !ai.enabled {
            return Ok(Generator::Disabled);
        }
        Ok(Generator::Http(HttpTextGenerator::from_config(ai)?))
    }
}

impl TextGenerator for Generator {
    fn is_enabled(&self) -> bool {
        !matches!(self, Generator::Disabled)
    }

    fn generate(
        &self,
        request: &TextRequest,
    ) -> impl Future<Output = Result<String, TextGenError>> + Send {
        let prompt = request.prompt();
        async move {
            match self {
                Generator::Disabled => Err(TextGenError::Disabled),
                Generator::Http(http) => http.complete(prompt).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_context_in_key_order() {
        let request = TextRequest::new(SubjectKind::File, "src/api/user.js", "de")
            .with("type", "controller")
            .with("language", "javascript")
            .with("imports", "");
        let prompt = request.prompt();
        assert!(prompt.starts_with("Describe the purpose of this source file"));
        assert!(prompt.contains("Answer in language `de`"));
        assert!(prompt.contains("Name: src/api/user.js\n"));
        let lang = prompt.find("language: javascript").expect("language line");
        let ty = prompt.find("type: controller").expect("type line");
        assert!(lang < ty);
        assert!(!prompt.contains("imports:"));
    }

    #[test]
    fn disabled_generator_from_default_config() {
        let generator = Generator::from_config(&AiConfig::default()).expect("generator");
        assert!(!generator.is_enabled());
    }

    #[tokio::test]
    async fn disabled_generator_always_errors() {
        let request = TextRequest::new(SubjectKind::Project, "demo", "en");
        let result = Generator::Disabled.generate(&request).await;
        assert!(matches!(result, Err(TextGenError::Disabled)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error_not_a_panic() {
        let ai = AiConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            ..AiConfig::default()
        };
        let generator = Generator::from_config(&ai).expect("client builds");
        assert!(generator.is_enabled());
        let request = TextRequest::new(SubjectKind::File, "a.js", "en");
        assert!(generator.generate(&request).await.is_err());
    }
}
