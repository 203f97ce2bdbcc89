use std::sync::Arc;

use loan_guidance_api::ApiServer;
use loan_guidance_core::{CalculatorConfig, LoanCalculator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Environment is read once at the edge; the calculator itself only sees
    // explicit configuration.
    let config = CalculatorConfig {
        ai_advisor: std::env::var("OPENAI_API_KEY").is_ok(),
    };
    tracing::info!(ai_advisor = config.ai_advisor, "initializing loan calculator");

    let calculator = Arc::new(LoanCalculator::new(config));
    let addr = std::env::var("LOAN_API_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    ApiServer::new(calculator).serve(&addr).await
}
