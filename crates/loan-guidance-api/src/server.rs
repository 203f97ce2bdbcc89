use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use loan_guidance_core::LoanCalculator;

use crate::handlers;

pub struct ApiServer {
    calculator: Arc<LoanCalculator>,
}

impl ApiServer {
    #[must_use]
    pub const fn new(calculator: Arc<LoanCalculator>) -> Self {
        Self { calculator }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handlers::root))
            .route("/analyze", post(handlers::analyze))
            .route("/visualization", post(handlers::visualization))
            .route(
                "/enhanced-visualization",
                post(handlers::enhanced_visualization),
            )
            .route("/payment-schedule", post(handlers::payment_schedule))
            .route("/recommendations", post(handlers::recommendations))
            .route("/health", get(handlers::health))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.calculator.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve
    /// requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Loan guidance API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
