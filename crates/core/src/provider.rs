pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_BASE_ENV_VAR: &str = "VIDBRIEF_API_BASE";

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_base: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Default endpoint unless `VIDBRIEF_API_BASE` is set and non-empty.
    pub fn from_env() -> Self {
        match std::env::var(API_BASE_ENV_VAR) {
            Ok(base) if !base.trim().is_empty() => Self::new(base.trim()),
            _ => Self::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        "Gemini"
    }

    pub fn models_url(&self) -> String {
        format!("{}/models", self.api_base)
    }

    pub fn generate_content_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }
}
