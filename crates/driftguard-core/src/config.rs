use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DriftError;

/// Top-level configuration loaded from `.driftguard.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
/// The struct is built once at startup and passed into each component; no
/// component reads the environment on its own behind this type's back.
///
/// # Examples
///
/// ```
/// use driftguard_core::DriftguardConfig;
///
/// let config = DriftguardConfig::default();
/// assert_eq!(config.llm.provider, "gemini");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriftguardConfig {
    /// Completion provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// GitHub reporting settings.
    #[serde(default)]
    pub github: GithubConfig,
}

impl DriftguardConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::Io`] if the file cannot be read, or
    /// [`DriftError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use driftguard_core::DriftguardConfig;
    /// use std::path::Path;
    ///
    /// let config = DriftguardConfig::from_file(Path::new(".driftguard.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, DriftError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftguard_core::DriftguardConfig;
    ///
    /// let toml = r#"
    /// [llm]
    /// provider = "openai"
    /// "#;
    /// let config = DriftguardConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.llm.provider, "openai");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, DriftError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Completion provider configuration.
///
/// # Examples
///
/// ```
/// use driftguard_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.models.len(), 3);
/// assert_eq!(config.api_key_env(), "GEMINI_API_KEY");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (e.g. `"gemini"`, `"openai"`, `"anthropic"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Candidate model identifiers, tried strictly in this order.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// API key for the provider.
    pub api_key: Option<String>,
    /// Custom base URL for the OpenAI-compatible endpoint, including any
    /// version path segment (e.g. `https://api.openai.com/v1`).
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "gemini".into()
}

fn default_models() -> Vec<String> {
    vec![
        "gemini-2.0-flash".into(),
        "gemini-2.0-flash-001".into(),
        "gemini-1.5-flash".into(),
    ]
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            models: default_models(),
            api_key: None,
            base_url: None,
        }
    }
}

impl LlmConfig {
    /// Name of the environment variable that holds the API key for the
    /// configured provider.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftguard_core::LlmConfig;
    ///
    /// let config = LlmConfig {
    ///     provider: "anthropic".into(),
    ///     ..LlmConfig::default()
    /// };
    /// assert_eq!(config.api_key_env(), "ANTHROPIC_API_KEY");
    /// ```
    pub fn api_key_env(&self) -> &'static str {
        match self.provider.as_str() {
            "gemini" => "GEMINI_API_KEY",
            "anthropic" => "ANTHROPIC_API_KEY",
            _ => "OPENAI_API_KEY",
        }
    }
}

/// GitHub reporting configuration.
///
/// All fields are optional: when any of token, repository, or PR number
/// cannot be resolved (config or environment), reporting is skipped rather
/// than treated as an error, so local runs have no side effects.
///
/// # Examples
///
/// ```
/// use driftguard_core::GithubConfig;
///
/// let config = GithubConfig::default();
/// assert!(config.token.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Access token used to post PR comments.
    pub token: Option<String>,
    /// Repository slug in `owner/name` form.
    pub repository: Option<String>,
    /// Explicit pull-request or issue number.
    pub pr_number: Option<u64>,
}
