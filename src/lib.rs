//! Library root for `support-bot`.
//!
//! Support-bot is an OpenAI-powered conversational assistant for Slack designed to:
//! - Answer direct messages with full conversational context
//! - Watch support channels and answer freestanding questions worth a follow-up
//! - Continue thread conversations it is mentioned in
//! - Summarize threads into question/solution digests on request
//!
//! The bot integrates with Slack for chat, OpenAI for completions, and two
//! external triage services for question classification and answer retrieval.
//! The architecture is built around extensible traits that allow for
//! different implementations of each service.

#[deny(missing_docs)]
pub mod base;
pub mod engine;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the support-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the LLM, QA, and chat clients
/// - Starts the socket-mode event loop for processing messages
pub async fn start(config: Config) -> Void {
    info!("Starting support-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
