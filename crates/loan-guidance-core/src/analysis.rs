//! The loan analyzer: affordability ratios, risk classification,
//! rule-based recommendations, and response assembly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::narrative;
use crate::schedule;
use crate::types::{
    AnalysisResult, CreditCategory, CreditScoreDetail, DebtToIncome, DtiCategory, Impact,
    LoanRequest, LoanResponse, OverallRisk, PaymentEntry, RiskAssessment, RiskFactor, RiskFactors,
    RiskLevel,
};
use crate::viz;
use crate::LoanResult;

/// Explicit calculator configuration. Whether an external AI advisor is
/// configured is recorded here at construction instead of being looked up
/// from the environment inside business logic; the recommendation rules
/// stay deterministic either way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub ai_advisor: bool,
}

/// Stateless loan analyzer. Every call computes fresh from its inputs and
/// shares nothing between requests, so concurrent use needs no coordination.
///
/// Callers must run [`crate::validation::validate_request`] first; the
/// calculator assumes in-range fields and positive income.
#[derive(Debug, Clone, Default)]
pub struct LoanCalculator {
    config: CalculatorConfig,
}

impl LoanCalculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Full analysis: metrics, risk assessment, truncated schedule and the
    /// formatted narrative.
    pub fn analyze(&self, request: &LoanRequest) -> LoanResult<LoanResponse> {
        if request.income.is_zero() {
            return Err(LoanError::DivisionByZero {
                context: "monthly income".into(),
            });
        }

        let rate = schedule::monthly_rate(request.interest_rate);
        let n_payments = request.loan_term_years * 12;
        let monthly_payment = schedule::monthly_payment(request.loan_amount, rate, n_payments)?;
        let total_payments = monthly_payment * Decimal::from(n_payments);
        let total_interest = total_payments - request.loan_amount;

        let monthly_income = request.income / dec!(12);
        let dti_before = request.monthly_debt / monthly_income * dec!(100);
        let dti_after = (request.monthly_debt + monthly_payment) / monthly_income * dec!(100);
        let dti_category = DtiCategory::from_ratio(dti_after);

        let loan_to_income = request.loan_amount / request.income * dec!(100);
        let payment_to_income = monthly_payment / monthly_income * dec!(100);
        let loan_to_value = request
            .property_value
            .map(|value| request.loan_amount / value * dec!(100));
        let credit_category = CreditCategory::from_score(request.credit_score);
        let dscr = monthly_income / (request.monthly_debt + monthly_payment);

        let overall_risk = classify_overall_risk(dti_after, request.credit_score);
        let risk_factors = assess_risk_factors(dti_after, request.credit_score);
        let recommendations = derive_recommendations(
            dti_after,
            request.credit_score,
            loan_to_value,
            request.extra_payment,
        );

        let analysis = AnalysisResult {
            monthly_payment: monthly_payment.round_dp(2),
            total_interest: total_interest.round_dp(2),
            total_payments: total_payments.round_dp(2),
            debt_to_income: DebtToIncome {
                before_loan: dti_before.round_dp(2),
                after_loan: dti_after.round_dp(2),
                category: dti_category,
            },
            loan_to_income: loan_to_income.round_dp(2),
            payment_to_income: payment_to_income.round_dp(2),
            loan_to_value: loan_to_value.map(|v| v.round_dp(2)),
            credit_score: CreditScoreDetail {
                value: request.credit_score,
                category: credit_category,
            },
            debt_service_coverage_ratio: dscr.round_dp(2),
        };

        let risk = RiskAssessment {
            risk_factors,
            overall_risk,
            recommendations,
        };

        let narrative = narrative::assessment_narrative(request, &analysis, &risk);
        let schedule_summary = truncate_schedule(schedule::generate_schedule(request)?);

        Ok(LoanResponse {
            analysis,
            risk,
            schedule_summary,
            visualization_available: false,
            recommendations: narrative,
        })
    }

    /// The full generated schedule, untruncated.
    pub fn payment_schedule(&self, request: &LoanRequest) -> LoanResult<Vec<PaymentEntry>> {
        schedule::generate_schedule(request)
    }

    /// The recommendation list alone. Re-runs the full analysis and extracts
    /// one field, so it can never drift from [`LoanCalculator::analyze`].
    pub fn recommendations(&self, request: &LoanRequest) -> LoanResult<Vec<String>> {
        Ok(self.analyze(request)?.risk.recommendations)
    }

    /// Opaque base64-encoded image payload; content unspecified.
    pub fn visualization(&self, _request: &LoanRequest) -> &'static str {
        viz::PLACEHOLDER_PNG
    }

    pub fn enhanced_visualization(&self, request: &LoanRequest) -> &'static str {
        self.visualization(request)
    }
}

// ---------------------------------------------------------------------------
// Risk classification
// ---------------------------------------------------------------------------

fn classify_overall_risk(dti_after: Decimal, credit_score: u32) -> OverallRisk {
    if dti_after > dec!(43) || credit_score < 580 {
        OverallRisk::High
    } else if dti_after > dec!(36) || credit_score < 670 {
        OverallRisk::Moderate
    } else if dti_after > dec!(28) || credit_score < 740 {
        OverallRisk::LowModerate
    } else {
        OverallRisk::Low
    }
}

fn assess_risk_factors(dti_after: Decimal, credit_score: u32) -> RiskFactors {
    let credit = RiskFactor {
        risk_level: if credit_score < 580 {
            RiskLevel::High
        } else if credit_score < 670 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        },
        impact: if credit_score < 670 {
            Impact::Negative
        } else {
            Impact::Positive
        },
        suggestion: if credit_score < 670 {
            "Improve credit score".to_string()
        } else {
            "Maintain excellent credit".to_string()
        },
    };

    let debt_to_income = RiskFactor {
        risk_level: if dti_after > dec!(43) {
            RiskLevel::High
        } else if dti_after > dec!(36) {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        },
        impact: if dti_after > dec!(36) {
            Impact::Negative
        } else {
            Impact::Positive
        },
        suggestion: if dti_after > dec!(36) {
            "Reduce debt or increase income".to_string()
        } else {
            "Maintain healthy DTI ratio".to_string()
        },
    };

    RiskFactors {
        credit_score: credit,
        debt_to_income,
    }
}

/// Ordered rules, each appended independently; the affirmation closes the
/// gap when nothing fires.
fn derive_recommendations(
    dti_after: Decimal,
    credit_score: u32,
    loan_to_value: Option<Decimal>,
    extra_payment: Decimal,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if dti_after > dec!(43) {
        recommendations.push(
            "Your debt-to-income ratio is high. Consider reducing other debt or increasing income."
                .to_string(),
        );
    }
    if credit_score < 670 {
        recommendations.push(
            "Work on improving your credit score to qualify for better interest rates.".to_string(),
        );
    }
    if loan_to_value.is_some_and(|ltv| ltv > dec!(80)) {
        recommendations.push(
            "Consider making a larger down payment to reduce loan-to-value ratio and avoid PMI."
                .to_string(),
        );
    }
    if extra_payment.is_zero() {
        recommendations.push(
            "Making extra payments could significantly reduce your total interest paid and loan term."
                .to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations.push("Your financial profile appears strong for this loan.".to_string());
    }

    recommendations
}

/// First three simulated rows plus the closing row once the schedule grows
/// past four entries; shorter schedules pass through untouched.
fn truncate_schedule(mut schedule: Vec<PaymentEntry>) -> Vec<PaymentEntry> {
    if schedule.len() <= 4 {
        return schedule;
    }
    let last = schedule[schedule.len() - 1].clone();
    schedule.truncate(3);
    schedule.push(last);
    schedule
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentNumber;
    use rust_decimal_macros::dec;

    fn base_request() -> LoanRequest {
        LoanRequest {
            income: dec!(85000),
            loan_amount: dec!(325000),
            loan_term_years: 30,
            interest_rate: dec!(6.5),
            credit_score: 720,
            monthly_debt: dec!(1200),
            property_value: None,
            extra_payment: Decimal::ZERO,
        }
    }

    fn calculator() -> LoanCalculator {
        LoanCalculator::new(CalculatorConfig::default())
    }

    #[test]
    fn test_reference_scenario_metrics() {
        let response = calculator().analyze(&base_request()).unwrap();
        let analysis = &response.analysis;

        assert!((analysis.monthly_payment - dec!(2054.22)).abs() < dec!(0.01));
        // DTI after = (1200 + 2054.22) / 7083.33 * 100 ≈ 45.94
        assert!((analysis.debt_to_income.after_loan - dec!(45.94)).abs() < dec!(0.01));
        assert_eq!(analysis.debt_to_income.category, DtiCategory::Poor);
        assert_eq!(analysis.debt_to_income.before_loan, dec!(16.94));
        assert_eq!(analysis.loan_to_income, dec!(382.35));
        assert_eq!(analysis.credit_score.category, CreditCategory::Good);
        assert!((analysis.debt_service_coverage_ratio - dec!(2.18)).abs() <= dec!(0.01));
        assert!(analysis.loan_to_value.is_none());
    }

    #[test]
    fn test_total_interest_plus_principal_equals_total_payments() {
        let response = calculator().analyze(&base_request()).unwrap();
        let analysis = &response.analysis;
        let reconstructed = analysis.total_interest + dec!(325000);
        assert!((reconstructed - analysis.total_payments).abs() <= dec!(0.01));
    }

    #[test]
    fn test_reference_scenario_risk_and_recommendations() {
        let response = calculator().analyze(&base_request()).unwrap();

        // DTI ≈ 45.94 > 43 drives the overall rating to high.
        assert_eq!(response.risk.overall_risk, OverallRisk::High);
        assert_eq!(
            response.risk.risk_factors.debt_to_income.risk_level,
            RiskLevel::High
        );
        assert_eq!(
            response.risk.risk_factors.credit_score.risk_level,
            RiskLevel::Low
        );
        assert_eq!(
            response.risk.risk_factors.credit_score.impact,
            Impact::Positive
        );

        let recs = &response.risk.recommendations;
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("debt-to-income"));
        assert!(recs[1].contains("extra payments"));
        assert!(!recs.iter().any(|r| r.contains("down payment")));
    }

    #[test]
    fn test_zero_rate_analysis_is_exact() {
        let request = LoanRequest {
            income: dec!(96000),
            loan_amount: dec!(120000),
            loan_term_years: 10,
            interest_rate: Decimal::ZERO,
            credit_score: 760,
            monthly_debt: dec!(400),
            property_value: None,
            extra_payment: Decimal::ZERO,
        };
        let response = calculator().analyze(&request).unwrap();

        assert_eq!(response.analysis.monthly_payment, dec!(1000));
        assert_eq!(response.analysis.total_interest, Decimal::ZERO);
        assert_eq!(response.analysis.total_payments, dec!(120000));
    }

    #[test]
    fn test_overall_risk_threshold_matrix() {
        // (dti_after is driven by payment; here we call the classifier
        // directly to pin the documented boundaries)
        assert_eq!(classify_overall_risk(dec!(43.01), 800), OverallRisk::High);
        assert_eq!(classify_overall_risk(dec!(20), 579), OverallRisk::High);
        assert_eq!(
            classify_overall_risk(dec!(36.01), 800),
            OverallRisk::Moderate
        );
        assert_eq!(classify_overall_risk(dec!(20), 669), OverallRisk::Moderate);
        assert_eq!(
            classify_overall_risk(dec!(28.01), 800),
            OverallRisk::LowModerate
        );
        assert_eq!(
            classify_overall_risk(dec!(20), 739),
            OverallRisk::LowModerate
        );
        assert_eq!(classify_overall_risk(dec!(28), 740), OverallRisk::Low);
        assert_eq!(classify_overall_risk(dec!(43), 700), OverallRisk::Moderate);
    }

    #[test]
    fn test_ltv_present_and_recommendation_fires_above_eighty() {
        let mut request = base_request();
        request.property_value = Some(dec!(350000));
        let response = calculator().analyze(&request).unwrap();

        // 325000 / 350000 = 92.86%
        assert_eq!(response.analysis.loan_to_value, Some(dec!(92.86)));
        assert!(response
            .risk
            .recommendations
            .iter()
            .any(|r| r.contains("down payment")));
    }

    #[test]
    fn test_ltv_recommendation_silent_at_or_below_eighty() {
        let mut request = base_request();
        request.property_value = Some(dec!(406250)); // exactly 80% LTV
        let response = calculator().analyze(&request).unwrap();

        assert_eq!(response.analysis.loan_to_value, Some(dec!(80)));
        assert!(!response
            .risk
            .recommendations
            .iter()
            .any(|r| r.contains("down payment")));
    }

    #[test]
    fn test_strong_profile_gets_affirmation_only() {
        let request = LoanRequest {
            income: dec!(250000),
            loan_amount: dec!(200000),
            loan_term_years: 15,
            interest_rate: dec!(5),
            credit_score: 800,
            monthly_debt: dec!(500),
            property_value: Some(dec!(500000)),
            extra_payment: dec!(200),
        };
        let response = calculator().analyze(&request).unwrap();

        assert_eq!(
            response.risk.recommendations,
            vec!["Your financial profile appears strong for this loan.".to_string()]
        );
        assert_eq!(response.risk.overall_risk, OverallRisk::Low);
    }

    #[test]
    fn test_recommendations_never_empty() {
        let mut request = base_request();
        request.extra_payment = dec!(100);
        request.credit_score = 800;
        request.income = dec!(500000);
        let recs = calculator().recommendations(&request).unwrap();
        assert!(!recs.is_empty());
    }

    #[test]
    fn test_recommendations_accessor_matches_analysis() {
        let request = base_request();
        let calc = calculator();
        let from_analysis = calc.analyze(&request).unwrap().risk.recommendations;
        let standalone = calc.recommendations(&request).unwrap();
        assert_eq!(from_analysis, standalone);
    }

    #[test]
    fn test_schedule_summary_truncated_to_four_rows() {
        let response = calculator().analyze(&base_request()).unwrap();
        let summary = &response.schedule_summary;

        assert_eq!(summary.len(), 4);
        assert_eq!(summary[0].payment_number, PaymentNumber::Month(1));
        assert_eq!(summary[1].payment_number, PaymentNumber::Month(2));
        assert_eq!(summary[2].payment_number, PaymentNumber::Month(3));
        assert!(summary[3].payment_number.is_summary());
    }

    #[test]
    fn test_short_schedule_not_truncated() {
        let rows = vec![
            entry(1),
            entry(2),
            entry(3),
            entry(4),
        ];
        assert_eq!(truncate_schedule(rows.clone()).len(), 4);

        let longer: Vec<PaymentEntry> = (1..=5).map(entry).collect();
        let truncated = truncate_schedule(longer);
        assert_eq!(truncated.len(), 4);
        assert_eq!(truncated[3].payment_number, PaymentNumber::Month(5));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let calc = calculator();
        let request = base_request();
        let first = serde_json::to_string(&calc.analyze(&request).unwrap()).unwrap();
        let second = serde_json::to_string(&calc.analyze(&request).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_visualization_is_fixed_placeholder() {
        let calc = calculator();
        let request = base_request();
        let image = calc.visualization(&request);
        assert!(!image.is_empty());
        assert_eq!(image, calc.enhanced_visualization(&request));

        let response = calc.analyze(&request).unwrap();
        assert!(!response.visualization_available);
    }

    #[test]
    fn test_narrative_reflects_computed_fields() {
        let response = calculator().analyze(&base_request()).unwrap();
        let narrative = &response.recommendations;

        assert!(narrative.contains("<h3>Loan Assessment</h3>"));
        assert!(narrative.contains("high risk"));
        assert!(narrative.contains("45.9%"));
        assert!(narrative.contains("30 year term"));
    }

    fn entry(month: u32) -> PaymentEntry {
        PaymentEntry {
            payment_number: PaymentNumber::Month(month),
            payment_date: None,
            payment_amount: dec!(100),
            principal_payment: dec!(80),
            interest_payment: dec!(20),
            remaining_balance: dec!(1000),
            total_interest_paid: dec!(20),
            years_to_payoff: None,
            months_to_payoff: None,
        }
    }
}
