//! Runtime configuration from the environment.

use std::path::PathBuf;

pub const DATA_PATH_VAR: &str = "HEROFORGE_DATA";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const MODEL_VAR: &str = "HEROFORGE_MODEL";
pub const DEFAULT_DATA_PATH: &str = "heroforge.json";

/// Where data lives and how to reach the AI model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroForgeConfig {
    pub data_path: PathBuf,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl HeroForgeConfig {
    /// Read `HEROFORGE_DATA`, `ANTHROPIC_API_KEY` and `HEROFORGE_MODEL`.
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            data_path: get(DATA_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            api_key: get(API_KEY_VAR),
            model: get(MODEL_VAR),
        }
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// A Claude client for drafting, if an API key is configured.
    pub fn claude(&self) -> Result<claude::Claude, claude::Error> {
        let key = self.api_key.as_deref().ok_or(claude::Error::NoApiKey)?;
        let client = claude::Claude::new(key)?;
        Ok(match &self.model {
            Some(model) => client.with_model(model),
            None => client,
        })
    }
}

impl Default for HeroForgeConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = HeroForgeConfig::default();
        assert_eq!(config.data_path, PathBuf::from("heroforge.json"));
        assert!(config.api_key.is_none());
        assert!(matches!(config.claude(), Err(claude::Error::NoApiKey)));
    }

    #[test]
    fn test_lookup_values() {
        let vars: HashMap<&str, &str> = [
            (DATA_PATH_VAR, "/tmp/party.json"),
            (API_KEY_VAR, "sk-test"),
            (MODEL_VAR, "  "),
        ]
        .into_iter()
        .collect();
        let config = HeroForgeConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.data_path, PathBuf::from("/tmp/party.json"));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert!(config.model.is_none());
        assert!(config.claude().is_ok());
    }

    #[test]
    fn test_with_data_path_overrides() {
        let config = HeroForgeConfig::default().with_data_path("other.json");
        assert_eq!(config.data_path, PathBuf::from("other.json"));
    }
}
