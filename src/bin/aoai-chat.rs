//! Interactive console chat against an Azure OpenAI deployment.
//!
//! The client authenticates with Microsoft Entra ID using the client-credential grant and then
//! holds a turn-based conversation with the configured chat-completions endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Settings come from ./appsettings.json, overridden by the environment
//! export AzureSettings__TenantId=...
//! export AzureSettings__ClientId=...
//! export AzureSettings__ClientSecret=...
//! export AzureSettings__Resource=https://cognitiveservices.azure.com
//! export AzureSettings__Endpoint='https://<resource>.openai.azure.com/openai/deployments/<deployment>/chat/completions?api-version=2024-02-15-preview'
//! aoai-chat
//!
//! # Disable colors
//! NO_COLOR=1 aoai-chat
//!
//! # Diagnostic logging to stderr
//! RUST_LOG=aoai_chat=debug aoai-chat
//! ```
//!
//! Type `exit` (or press Ctrl+D) to leave.

use std::env;

use tracing::info;
use tracing_subscriber::EnvFilter;

use aoai_chat::chat::{AzureSettings, ChatConfig, ChatSession, LineEditor, PlainTextRenderer};
use aoai_chat::{ClientCredentials, FsImageLoader, HttpSender, TokenProvider};

/// Main entry point for the aoai-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let settings = AzureSettings::load(&env::current_dir()?)?;
    let config = ChatConfig::from_settings(&settings);
    info!(endpoint = %config.endpoint, "configuration loaded");

    let credentials = ClientCredentials::new(
        &settings.tenant_id,
        &settings.client_id,
        &settings.client_secret,
        &settings.resource,
    )?
    .with_timeout(config.timeout)?;
    let token = credentials.acquire_token().await?;
    info!("access token acquired");

    let sender = HttpSender::with_timeout(config.timeout)?;
    let mut session = ChatSession::new(sender, token, &config);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut input = LineEditor::new("> ")?;

    session.greet(&mut renderer);
    session.prompt_for_image(&mut input, &mut renderer, &FsImageLoader)?;
    session.run(&mut input, &mut renderer).await?;

    let stats = session.stats();
    info!(
        requests = stats.total_requests,
        replies = stats.successful_replies,
        total_tokens = stats.total_usage.total_tokens,
        "session finished"
    );
    Ok(())
}
