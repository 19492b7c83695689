//! Configuration types for the chat application.
//!
//! Azure settings are read from an optional `appsettings.json` in the working directory and
//! then overridden by environment variables, mirroring the layout .NET tooling uses:
//!
//! ```json
//! {
//!   "AzureSettings": {
//!     "TenantId": "...",
//!     "ClientId": "...",
//!     "ClientSecret": "...",
//!     "Resource": "https://cognitiveservices.azure.com",
//!     "Endpoint": "https://<resource>.openai.azure.com/openai/deployments/<deployment>/chat/completions?api-version=2024-02-15-preview"
//!   }
//! }
//! ```
//!
//! Each key may be overridden by `AzureSettings__<Key>` (or `AzureSettings:<Key>`).

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::client::DEFAULT_TIMEOUT;
use crate::error::{Error, Result};
use crate::types::GenerationParameters;

/// File consulted for settings, relative to the working directory.
pub const APP_SETTINGS_FILE: &str = "appsettings.json";

/// Section holding the Azure settings, in the file and in environment variable names.
pub const SETTINGS_SECTION: &str = "AzureSettings";

/// System prompt that opens every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an AI assistant that helps people find information.";

/// Greeting recorded as the assistant's first turn.
pub const DEFAULT_GREETING: &str = "Hello! How can I assist you today?";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AzureSettingsSection {
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    resource: Option<String>,
    endpoint: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AppSettingsFile {
    #[serde(rename = "AzureSettings", default)]
    azure_settings: AzureSettingsSection,
}

/// Credentials and endpoint for the Azure OpenAI deployment.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureSettings {
    /// Entra ID tenant.
    pub tenant_id: String,
    /// Application (client) id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// Resource the token is requested for.
    pub resource: String,
    /// Full chat-completions URL, including the API version.
    pub endpoint: Url,
}

impl std::fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSettings")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("resource", &self.resource)
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl AzureSettings {
    /// Load settings from `dir/appsettings.json` and the process environment.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(APP_SETTINGS_FILE);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                return Err(Error::io(
                    format!("failed to read {}", path.display()),
                    err,
                ));
            }
        };
        Self::from_sources(contents.as_deref(), |name| env::var(name).ok())
    }

    /// Resolve settings from optional file contents and an environment lookup.
    ///
    /// Environment values win over the file.  Empty values count as missing.
    pub fn from_sources<F>(file: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = match file {
            Some(contents) => {
                serde_json::from_str::<AppSettingsFile>(contents)
                    .map_err(|err| {
                        Error::configuration(
                            format!("{APP_SETTINGS_FILE} is not valid: {err}"),
                            None,
                        )
                    })?
                    .azure_settings
            }
            None => AzureSettingsSection::default(),
        };

        let lookup = |key: &str, from_file: Option<String>| -> Result<String> {
            env(&format!("{SETTINGS_SECTION}__{key}"))
                .or_else(|| env(&format!("{SETTINGS_SECTION}:{key}")))
                .or(from_file)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    Error::configuration(format!("{key} is not configured"), Some(key.to_string()))
                })
        };

        let tenant_id = lookup("TenantId", section.tenant_id)?;
        let client_id = lookup("ClientId", section.client_id)?;
        let client_secret = lookup("ClientSecret", section.client_secret)?;
        let resource = lookup("Resource", section.resource)?;
        let endpoint = lookup("Endpoint", section.endpoint)?;
        let endpoint = Url::parse(&endpoint).map_err(|err| {
            Error::configuration(
                format!("Endpoint is not a valid URL: {err}"),
                Some("Endpoint".to_string()),
            )
        })?;

        Ok(Self {
            tenant_id,
            client_id,
            client_secret,
            resource,
            endpoint,
        })
    }
}

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The chat-completions URL.
    pub endpoint: Url,

    /// System prompt that opens the transcript.
    pub system_prompt: String,

    /// Greeting recorded as the assistant's first turn.
    pub greeting: String,

    /// Sampling parameters sent with every request.
    pub parameters: GenerationParameters,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Timeout applied to each HTTP request.
    pub timeout: Duration,
}

impl ChatConfig {
    /// Creates a new ChatConfig for `endpoint` with default values.
    ///
    /// Defaults:
    /// - System prompt: an information-finding assistant
    /// - Greeting: "Hello! How can I assist you today?"
    /// - Temperature 0.7, top-p 0.95, 800 max tokens, no streaming
    /// - Color: enabled
    /// - Timeout: 60 seconds
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            parameters: GenerationParameters::default(),
            use_color: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates the configuration for the endpoint in `settings`, honoring `NO_COLOR`.
    pub fn from_settings(settings: &AzureSettings) -> Self {
        let config = Self::new(settings.endpoint.clone());
        if env::var_os("NO_COLOR").is_some() {
            config.without_color()
        } else {
            config
        }
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Sets the generation parameters.
    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
