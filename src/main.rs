use std::sync::Arc;

use email_classifier::api::classifier_routes;
use email_classifier::classify::{ClassifierConfig, EmailClassifier};
use email_classifier::config::AppConfig;
use email_classifier::error::Result;
use email_classifier::llm::create_provider;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // The credential is mandatory: refuse to serve without it.
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("  export GEMINI_API_KEY=...");
        std::process::exit(1);
    });

    let llm = create_provider(&config)?;
    let classifier = Arc::new(EmailClassifier::new(llm, ClassifierConfig::default()));
    let app = classifier_routes(classifier, config.max_upload_bytes);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    eprintln!("📧 Email Classifier v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   API: http://{}/", addr);
    tracing::info!(%addr, model = %config.model, "Email classifier ready");

    axum::serve(listener, app).await?;

    Ok(())
}
