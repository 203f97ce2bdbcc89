//! Request validation. Every violation is collected before reporting;
//! callers get the full list, not just the first failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::LoanRequest;

/// A single out-of-range field with its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every violation found in one request. Usable both as an error and as
/// serializable per-field data for an API error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}", render(.violations))]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

fn render(violations: &[FieldViolation]) -> String {
    let parts: Vec<String> = violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect();
    format!("Invalid loan parameters: {}", parts.join("; "))
}

/// Validate a loan request against the documented ranges.
///
/// Ranges: income > 0, loan_amount > 0, term in [1, 50] years, rate in
/// [0, 30] percent, credit score in [300, 850], monthly_debt >= 0,
/// property_value > 0 when supplied, extra_payment >= 0.
pub fn validate_request(request: &LoanRequest) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();

    let mut reject = |field: &str, message: &str| {
        violations.push(FieldViolation {
            field: field.to_string(),
            message: message.to_string(),
        });
    };

    if request.income <= Decimal::ZERO {
        reject("income", "Income must be greater than zero");
    }

    if request.loan_amount <= Decimal::ZERO {
        reject("loan_amount", "Loan amount must be greater than zero");
    }

    if request.loan_term_years == 0 || request.loan_term_years > 50 {
        reject(
            "loan_term_years",
            "Loan term must be between 1 and 50 years",
        );
    }

    if request.interest_rate < Decimal::ZERO || request.interest_rate > Decimal::from(30) {
        reject(
            "interest_rate",
            "Interest rate must be between 0 and 30 percent",
        );
    }

    if request.credit_score < 300 || request.credit_score > 850 {
        reject("credit_score", "Credit score must be between 300 and 850");
    }

    if request.monthly_debt < Decimal::ZERO {
        reject("monthly_debt", "Monthly debt cannot be negative");
    }

    if let Some(property_value) = request.property_value {
        if property_value <= Decimal::ZERO {
            reject("property_value", "Property value must be greater than zero");
        }
    }

    if request.extra_payment < Decimal::ZERO {
        reject("extra_payment", "Extra payment cannot be negative");
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { violations })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
