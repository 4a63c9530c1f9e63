use crate::analyzer::LlmConfig;
use crate::error::RonbunError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One provider profile from the profile list: which model to call, where,
/// and at what temperature. Loaded once at process start and never re-read
/// mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub temperature: f32,
}

impl ProviderProfile {
    pub fn into_llm_config(self, api_key: Option<String>) -> LlmConfig {
        LlmConfig {
            model_name: self.model,
            api_key,
            endpoint: self.endpoint,
            temperature: self.temperature,
            max_tokens: None,
        }
    }
}

/// The profile list file is a JSON array of profiles.
pub fn parse_profiles(raw: &str) -> Result<Vec<ProviderProfile>, RonbunError> {
    let profiles: Vec<ProviderProfile> = serde_json::from_str(raw)
        .map_err(|e| RonbunError::ConfigError(format!("invalid profile list: {}", e)))?;

    if profiles.is_empty() {
        return Err(RonbunError::ConfigError(
            "profile list is empty".to_string(),
        ));
    }

    Ok(profiles)
}

pub fn load_profiles(path: &Path) -> Result<Vec<ProviderProfile>, RonbunError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        RonbunError::ConfigError(format!("cannot read profile list {}: {}", path.display(), e))
    })?;
    parse_profiles(&raw)
}

/// Selects a profile by name, or the first profile when no name is given.
pub fn select_profile<'a>(
    profiles: &'a [ProviderProfile],
    name: Option<&str>,
) -> Result<&'a ProviderProfile, RonbunError> {
    match name {
        Some(wanted) => profiles
            .iter()
            .find(|p| p.name == wanted)
            .ok_or_else(|| RonbunError::ConfigError(format!("unknown profile '{}'", wanted))),
        None => Ok(&profiles[0]),
    }
}
