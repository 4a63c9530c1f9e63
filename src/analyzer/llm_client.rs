use crate::analyzer::prompts::PromptTemplate;
use crate::error::RonbunError;
use crate::models::ExpertRole;
use rig::client::CompletionClient;
use rig::completion::{AssistantContent, CompletionModel};
use rig::providers::{anthropic, gemini, openai};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model_name: String,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model_name: "gpt-5-mini".to_string(),
            api_key: None,
            endpoint: None,
            temperature: 0.0,
            max_tokens: None,
        }
    }
}

/// The one operation the provider collaborator exposes. Everything above it
/// (concurrency bounding, retries, timeouts) lives in `RateLimitedClient`.
pub trait LlmProvider: Send + Sync {
    fn generate<'a>(
        &'a self,
        role: &'a ExpertRole,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RonbunError>> + Send + 'a>>;
    fn model_name(&self) -> &str;
}

pub struct RigLlmClient {
    config: LlmConfig,
    provider: RigProvider,
}

enum RigProvider {
    OpenAI(openai::Client),
    Anthropic(anthropic::Client),
    Gemini(gemini::Client),
}

impl RigLlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, RonbunError> {
        let provider = create_provider(&config)?;
        Ok(Self { config, provider })
    }

    async fn make_api_request(&self, role: &ExpertRole, text: &str) -> Result<String, RonbunError> {
        let system_prompt = PromptTemplate::system_message(role).to_string();
        debug!(
            role = role.as_str(),
            model = %self.config.model_name,
            chars = text.len(),
            "dispatching provider call"
        );

        match &self.provider {
            RigProvider::OpenAI(client) => {
                let model = client.completion_model(&self.config.model_name);
                self.send_completion_request(model, text, system_prompt)
                    .await
            }
            RigProvider::Anthropic(client) => {
                let model = client.completion_model(&self.config.model_name);
                self.send_completion_request(model, text, system_prompt)
                    .await
            }
            RigProvider::Gemini(client) => {
                let model = client.completion_model(&self.config.model_name);
                self.send_completion_request(model, text, system_prompt)
                    .await
            }
        }
    }

    async fn send_completion_request<M: CompletionModel>(
        &self,
        model: M,
        prompt: &str,
        system_prompt: String,
    ) -> Result<String, RonbunError> {
        let mut builder = model.completion_request(prompt).preamble(system_prompt);

        // Skip temperature for models that don't support it (like GPT-5 series and o1 series)
        if !self.config.model_name.starts_with("gpt-5") && !self.config.model_name.starts_with("o1")
        {
            builder = builder.temperature(self.config.temperature as f64);
        }

        if let Some(max_tokens) = self.config.max_tokens {
            builder = builder.max_tokens(max_tokens as u64);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_provider_error(&e.to_string()))?;

        let mut extracted_text = String::new();
        for content in response.choice.iter() {
            if let AssistantContent::Text(text_content) = content {
                extracted_text.push_str(&text_content.text);
            }
        }

        if extracted_text.trim().is_empty() {
            return Err(RonbunError::TransientOther(
                "provider returned empty completion".to_string(),
            ));
        }

        Ok(extracted_text.trim().to_string())
    }
}

impl LlmProvider for RigLlmClient {
    fn generate<'a>(
        &'a self,
        role: &'a ExpertRole,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RonbunError>> + Send + 'a>> {
        Box::pin(async move { self.make_api_request(role, text).await })
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

/// Sorts provider failures into the retry taxonomy: rate-limit signals vs
/// everything else. The distinction only changes logging, not the backoff.
pub fn classify_provider_error(message: &str) -> RonbunError {
    let lower = message.to_lowercase();
    if lower.contains("429")
        || lower.contains("rate limit")
        || lower.contains("rate_limit")
        || lower.contains("too many requests")
    {
        RonbunError::RateLimited { retry_after: None }
    } else {
        RonbunError::TransientOther(message.to_string())
    }
}

fn create_provider(config: &LlmConfig) -> Result<RigProvider, RonbunError> {
    let model_name = config.model_name.trim();

    if is_openai_model(model_name) {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| RonbunError::LlmClientError("OpenAI API key not found".to_string()))?;

        let client = match &config.endpoint {
            Some(endpoint) => openai::Client::builder(&api_key)
                .base_url(endpoint)
                .build()
                .map_err(|e| RonbunError::LlmClientError(e.to_string()))?,
            None => openai::Client::new(&api_key),
        };
        Ok(RigProvider::OpenAI(client))
    } else if is_claude_model(model_name) {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                RonbunError::LlmClientError("Anthropic API key not found".to_string())
            })?;

        let client = anthropic::Client::new(&api_key);
        Ok(RigProvider::Anthropic(client))
    } else if is_gemini_model(model_name) {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .ok_or_else(|| RonbunError::LlmClientError("Gemini API key not found".to_string()))?;

        let client = gemini::Client::new(&api_key);
        Ok(RigProvider::Gemini(client))
    } else {
        Err(RonbunError::LlmClientError(format!(
            "Unsupported model '{}'. Use OpenAI (gpt-*), Anthropic (claude-*), or Gemini (gemini-*) models",
            model_name
        )))
    }
}

pub fn create_llm_client(
    config: &LlmConfig,
) -> Result<Box<dyn LlmProvider + Send + Sync>, RonbunError> {
    let client = RigLlmClient::new(config.clone())?;
    Ok(Box::new(client))
}

fn is_openai_model(model: &str) -> bool {
    let candidate = model.strip_prefix("openai/").unwrap_or(model);
    let candidate = candidate.strip_prefix("ft:").unwrap_or(candidate);

    candidate.starts_with("gpt-")
        || candidate.starts_with("chatgpt-")
        || candidate.starts_with("o1")
        || candidate.starts_with("o3")
        || candidate.starts_with("o4")
}

fn is_claude_model(model: &str) -> bool {
    let candidate = model.strip_prefix("anthropic/").unwrap_or(model);
    candidate.starts_with("claude-")
}

fn is_gemini_model(model: &str) -> bool {
    let candidate = model.strip_prefix("gemini/").unwrap_or(model);
    candidate.starts_with("gemini-")
}
