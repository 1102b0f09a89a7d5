//! Configuration resolution for the agent service
//!
//! Pure functions that turn raw variable values into a validated
//! [`FoundryConfig`]. Reading the process environment is the shell's job;
//! this module only decides what the values mean.

use std::fmt;

/// Environment variable holding the service base URL.
pub const ENDPOINT_VAR: &str = "AZURE_AIF_ENDPOINT";
/// Environment variable holding the agent (assistant) identifier.
pub const AGENT_ID_VAR: &str = "AZURE_AIF_AGENT_ID";
/// Environment variable holding an Entra bearer token.
pub const TOKEN_VAR: &str = "AIF_TOKEN";
/// Environment variable holding the API key fallback.
pub const API_KEY_VAR: &str = "AZURE_AIF_API_KEY";

/// Assistants API version appended to every request.
pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

/// Error type for configuration resolution
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("Neither AIF_TOKEN nor AZURE_AIF_API_KEY is set")]
    MissingCredential,
}

/// The single authentication mechanism used for every request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `api-key: <key>`
    ApiKey(String),
}

impl Credential {
    /// Select the credential from the optional token and key.
    ///
    /// A token always wins, even when a key is also present. Empty values
    /// are treated as absent.
    pub fn select(token: Option<String>, key: Option<String>) -> Result<Self, ConfigError> {
        match (non_empty(token), non_empty(key)) {
            (Some(token), _) => Ok(Credential::Bearer(token)),
            (None, Some(key)) => Ok(Credential::ApiKey(key)),
            (None, None) => Err(ConfigError::MissingCredential),
        }
    }

    /// Header name and value carrying this credential.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Credential::Bearer(token) => ("authorization", format!("Bearer {token}")),
            Credential::ApiKey(key) => ("api-key", key.clone()),
        }
    }

    /// Human readable name of the authentication mode.
    pub fn describe(&self) -> &'static str {
        match self {
            Credential::Bearer(_) => "Entra token",
            Credential::ApiKey(_) => "API key",
        }
    }
}

// Never print the secret itself.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Credential::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

/// Raw, unvalidated configuration values.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub endpoint: Option<String>,
    pub agent_id: Option<String>,
    pub token: Option<String>,
    pub api_key: Option<String>,
    pub api_version: Option<String>,
}

impl RawConfig {
    /// Collect the raw values through a variable lookup function.
    ///
    /// The lookup is usually `std::env::var(..).ok()`, tests pass a closure
    /// over fixture data.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            endpoint: lookup(ENDPOINT_VAR),
            agent_id: lookup(AGENT_ID_VAR),
            token: lookup(TOKEN_VAR),
            api_key: lookup(API_KEY_VAR),
            api_version: None,
        }
    }

    /// Apply CLI overrides. `None` keeps the current value.
    pub fn with_overrides(
        mut self,
        endpoint: Option<String>,
        agent_id: Option<String>,
        api_version: Option<String>,
    ) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(agent_id) = agent_id {
            self.agent_id = Some(agent_id);
        }
        if let Some(api_version) = api_version {
            self.api_version = Some(api_version);
        }
        self
    }
}

/// Validated configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundryConfig {
    /// Base URL without a trailing slash
    pub endpoint: String,
    pub api_version: String,
    pub agent_id: String,
    pub credential: Credential,
}

impl FoundryConfig {
    /// Validate raw values.
    ///
    /// Required values are checked first, then the credential, so the error
    /// always names the first thing that is missing.
    pub fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let endpoint = non_empty(raw.endpoint).ok_or(ConfigError::MissingVar(ENDPOINT_VAR))?;
        let agent_id = non_empty(raw.agent_id).ok_or(ConfigError::MissingVar(AGENT_ID_VAR))?;
        let credential = Credential::select(raw.token, raw.api_key)?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version: non_empty(raw.api_version)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            agent_id,
            credential,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
