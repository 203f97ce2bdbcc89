use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use loan_guidance_core::validation::{validate_request, ValidationErrors};
use loan_guidance_core::{LoanCalculator, LoanError, LoanRequest, LoanResponse, PaymentEntry};

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// JSON error body: a human-readable detail plus, for validation failures,
/// the per-field messages.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

/// Out-of-range input maps to 400 with per-field messages; anything the
/// calculator itself rejects maps to 500 echoing the triggering error.
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn validation(errors: ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = errors
            .violations
            .iter()
            .map(|v| (v.field.clone(), Value::String(v.message.clone())))
            .collect();
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                detail: errors.to_string(),
                errors: Some(Value::Object(fields)),
            },
        }
    }

    fn internal(context: &str, error: &LoanError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                detail: format!("{context}: {error}"),
                errors: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Loan Guidance System API" }))
}

/// Liveness probe; never touches the calculator.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Full loan analysis: metrics, risk assessment, schedule summary and
/// narrative.
pub async fn analyze(
    State(calculator): State<Arc<LoanCalculator>>,
    Json(request): Json<LoanRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    validate_request(&request).map_err(ApiError::validation)?;

    let response = calculator
        .analyze(&request)
        .map_err(|e| ApiError::internal("Error analyzing loan", &e))?;

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct VisualizationResponse {
    /// Base64 encoded PNG image data
    pub image_data: &'static str,
}

pub async fn visualization(
    State(calculator): State<Arc<LoanCalculator>>,
    Json(request): Json<LoanRequest>,
) -> Result<Json<VisualizationResponse>, ApiError> {
    validate_request(&request).map_err(ApiError::validation)?;

    Ok(Json(VisualizationResponse {
        image_data: calculator.visualization(&request),
    }))
}

pub async fn enhanced_visualization(
    State(calculator): State<Arc<LoanCalculator>>,
    Json(request): Json<LoanRequest>,
) -> Result<Json<VisualizationResponse>, ApiError> {
    validate_request(&request).map_err(ApiError::validation)?;

    Ok(Json(VisualizationResponse {
        image_data: calculator.enhanced_visualization(&request),
    }))
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub schedule: Vec<PaymentEntry>,
}

/// The full amortization schedule, untruncated.
pub async fn payment_schedule(
    State(calculator): State<Arc<LoanCalculator>>,
    Json(request): Json<LoanRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    validate_request(&request).map_err(ApiError::validation)?;

    let schedule = calculator
        .payment_schedule(&request)
        .map_err(|e| ApiError::internal("Error generating payment schedule", &e))?;

    Ok(Json(ScheduleResponse { schedule }))
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<String>,
}

/// The rule-based recommendation list alone.
pub async fn recommendations(
    State(calculator): State<Arc<LoanCalculator>>,
    Json(request): Json<LoanRequest>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    validate_request(&request).map_err(ApiError::validation)?;

    let recommendations = calculator
        .recommendations(&request)
        .map_err(|e| ApiError::internal("Error generating recommendations", &e))?;

    Ok(Json(RecommendationsResponse { recommendations }))
}
