use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual rates expressed as percentages (6.5 = 6.5%), matching the wire
/// contract. Never as decimal fractions.
pub type Percent = Decimal;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Input parameters for a single loan scenario.
///
/// All fields must pass [`crate::validation::validate_request`] before the
/// calculator runs; validation is a precondition, never inline in the math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Annual gross income
    pub income: Money,
    /// Principal borrowed
    pub loan_amount: Money,
    /// Term in years, 1..=50
    #[serde(alias = "loan_term")]
    pub loan_term_years: u32,
    /// Annual interest rate as a percentage, 0..=30
    pub interest_rate: Percent,
    /// FICO-style credit score, 300..=850
    pub credit_score: u32,
    /// Existing monthly debt service, excluding the new loan
    pub monthly_debt: Money,
    /// Appraised property value, when the loan is secured against one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_value: Option<Money>,
    /// Additional principal paid each month
    #[serde(default)]
    pub extra_payment: Money,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Affordability band for the post-loan debt-to-income ratio.
///
/// Thresholds are half-open on the upper bound and evaluated in ascending
/// order, first match wins: <28, <36, <43, <50, else critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtiCategory {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl DtiCategory {
    pub fn from_ratio(dti_after: Decimal) -> Self {
        if dti_after < Decimal::from(28) {
            DtiCategory::Excellent
        } else if dti_after < Decimal::from(36) {
            DtiCategory::Good
        } else if dti_after < Decimal::from(43) {
            DtiCategory::Fair
        } else if dti_after < Decimal::from(50) {
            DtiCategory::Poor
        } else {
            DtiCategory::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DtiCategory::Excellent => "excellent",
            DtiCategory::Good => "good",
            DtiCategory::Fair => "fair",
            DtiCategory::Poor => "poor",
            DtiCategory::Critical => "critical",
        }
    }
}

/// Credit-score band: >=740 excellent, >=670 good, >=580 fair, else poor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl CreditCategory {
    pub fn from_score(credit_score: u32) -> Self {
        if credit_score >= 740 {
            CreditCategory::Excellent
        } else if credit_score >= 670 {
            CreditCategory::Good
        } else if credit_score >= 580 {
            CreditCategory::Fair
        } else {
            CreditCategory::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
}

/// Blended risk rating for the whole scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallRisk {
    Low,
    LowModerate,
    Moderate,
    High,
}

impl OverallRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallRisk::Low => "low",
            OverallRisk::LowModerate => "low_moderate",
            OverallRisk::Moderate => "moderate",
            OverallRisk::High => "high",
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Ordinal of a schedule row, or the sentinel carried by the synthetic
/// summary row. Serializes untagged: a plain number or the string "summary".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentNumber {
    Month(u32),
    Sentinel(ScheduleSentinel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleSentinel {
    Summary,
}

impl PaymentNumber {
    pub const SUMMARY: PaymentNumber = PaymentNumber::Sentinel(ScheduleSentinel::Summary);

    pub fn is_summary(&self) -> bool {
        matches!(self, PaymentNumber::Sentinel(ScheduleSentinel::Summary))
    }
}

/// One row of an amortization schedule.
///
/// `payment_date` is a display label, not a true calendar date. The payoff
/// fields are populated only on the summary row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub payment_number: PaymentNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    pub payment_amount: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub remaining_balance: Money,
    pub total_interest_paid: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_to_payoff: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months_to_payoff: Option<i64>,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtToIncome {
    pub before_loan: Decimal,
    pub after_loan: Decimal,
    pub category: DtiCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditScoreDetail {
    pub value: u32,
    pub category: CreditCategory,
}

/// Core affordability metrics, all ratios rounded to 2 decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payments: Money,
    pub debt_to_income: DebtToIncome,
    pub loan_to_income: Decimal,
    pub payment_to_income: Decimal,
    /// Absent when no property value was supplied; never coerced to zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_to_value: Option<Decimal>,
    pub credit_score: CreditScoreDetail,
    pub debt_service_coverage_ratio: Decimal,
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub risk_level: RiskLevel,
    pub impact: Impact,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactors {
    pub credit_score: RiskFactor,
    pub debt_to_income: RiskFactor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_factors: RiskFactors,
    pub overall_risk: OverallRisk,
    /// Ordered, deduplicated by construction, never empty.
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Complete analysis response: metrics, risk, truncated schedule and the
/// formatted narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanResponse {
    pub analysis: AnalysisResult,
    pub risk: RiskAssessment,
    pub schedule_summary: Vec<PaymentEntry>,
    pub visualization_available: bool,
    /// HTML narrative block; strip with [`crate::sanitize::sanitize_html`]
    /// for plain-text display.
    pub recommendations: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
