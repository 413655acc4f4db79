//! pdf-qa - Entry point
//!
//! Ask questions about a PDF from the terminal.

use anyhow::Context;
use pdf_qa::{console::Console, Config, Session};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_qa=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let config = Config::from_env().context("invalid configuration")?;
    if config.api_key.is_empty() {
        tracing::warn!("PDF_QA_API_KEY is not set; requests to the hosted model will be rejected");
    }

    tracing::info!(
        provider = ?config.provider,
        model = %config.model,
        extraction = ?config.extraction,
        "Starting pdf-qa"
    );

    let session = Session::from_config(&config).context("failed to set up session")?;
    let mut console = Console::new(session, std::io::stdout());

    if let Some(path) = std::env::args_os().nth(1) {
        console.preload(PathBuf::from(path)).await?;
    }

    console.run(tokio::io::BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
