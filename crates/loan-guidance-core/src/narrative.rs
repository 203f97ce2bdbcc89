//! Fixed-template narrative block. Pure string templating over fields the
//! analyzer already computed; no business logic lives here.

use crate::types::{AnalysisResult, LoanRequest, RiskAssessment};

/// Render the HTML assessment narrative: a risk/DTI summary sentence, the
/// bulleted recommendation list, and a payment/interest/savings paragraph.
pub fn assessment_narrative(
    request: &LoanRequest,
    analysis: &AnalysisResult,
    risk: &RiskAssessment,
) -> String {
    let risk_label = risk.overall_risk.as_str().replace('_', " ");
    let dti_after = analysis.debt_to_income.after_loan.round_dp(1);
    let dti_category = analysis.debt_to_income.category.as_str();

    let bullet_items: String = risk
        .recommendations
        .iter()
        .map(|item| format!("<li>{item}</li>"))
        .collect();

    format!(
        "<h3>Loan Assessment</h3>\n\
         <p>Based on your financial profile, this loan represents a {risk_label} risk. \
         Your debt-to-income ratio is {dti_after:.1}%, which is considered {dti_category}.</p>\n\
         \n\
         <h3>Recommendations</h3>\n\
         <ul>\n\
         {bullet_items}\n\
         </ul>\n\
         \n\
         <h3>Long-term Outlook</h3>\n\
         <p>With a monthly payment of ${monthly_payment:.2}, you'll pay a total of ${total_interest:.2} in interest \
         over the {term} year term. Making extra payments of ${extra_payment:.2} per month could save you \
         significantly in interest costs.</p>",
        monthly_payment = analysis.monthly_payment,
        total_interest = analysis.total_interest,
        term = request.loan_term_years,
        extra_payment = request.extra_payment.round_dp(2),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CreditCategory, CreditScoreDetail, DebtToIncome, DtiCategory, Impact, OverallRisk,
        RiskFactor, RiskFactors, RiskLevel,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn fixtures() -> (LoanRequest, AnalysisResult, RiskAssessment) {
        let request = LoanRequest {
            income: dec!(85000),
            loan_amount: dec!(325000),
            loan_term_years: 30,
            interest_rate: dec!(6.5),
            credit_score: 720,
            monthly_debt: dec!(1200),
            property_value: None,
            extra_payment: Decimal::ZERO,
        };
        let analysis = AnalysisResult {
            monthly_payment: dec!(2054.22),
            total_interest: dec!(414521.51),
            total_payments: dec!(739521.51),
            debt_to_income: DebtToIncome {
                before_loan: dec!(16.94),
                after_loan: dec!(45.94),
                category: DtiCategory::Poor,
            },
            loan_to_income: dec!(382.35),
            payment_to_income: dec!(29.00),
            loan_to_value: None,
            credit_score: CreditScoreDetail {
                value: 720,
                category: CreditCategory::Good,
            },
            debt_service_coverage_ratio: dec!(2.18),
        };
        let factor = RiskFactor {
            risk_level: RiskLevel::Low,
            impact: Impact::Positive,
            suggestion: "Maintain excellent credit".into(),
        };
        let risk = RiskAssessment {
            risk_factors: RiskFactors {
                credit_score: factor.clone(),
                debt_to_income: factor,
            },
            overall_risk: OverallRisk::LowModerate,
            recommendations: vec!["First tip.".into(), "Second tip.".into()],
        };
        (request, analysis, risk)
    }

    #[test]
    fn test_narrative_sections_present() {
        let (request, analysis, risk) = fixtures();
        let text = assessment_narrative(&request, &analysis, &risk);

        assert!(text.contains("<h3>Loan Assessment</h3>"));
        assert!(text.contains("<h3>Recommendations</h3>"));
        assert!(text.contains("<h3>Long-term Outlook</h3>"));
    }

    #[test]
    fn test_underscore_risk_label_rendered_with_space() {
        let (request, analysis, risk) = fixtures();
        let text = assessment_narrative(&request, &analysis, &risk);
        assert!(text.contains("a low moderate risk"));
        assert!(!text.contains("low_moderate"));
    }

    #[test]
    fn test_every_recommendation_becomes_a_list_item() {
        let (request, analysis, risk) = fixtures();
        let text = assessment_narrative(&request, &analysis, &risk);
        assert!(text.contains("<li>First tip.</li>"));
        assert!(text.contains("<li>Second tip.</li>"));
    }

    #[test]
    fn test_amounts_formatted_to_two_decimals() {
        let (request, analysis, risk) = fixtures();
        let text = assessment_narrative(&request, &analysis, &risk);
        assert!(text.contains("$2054.22"));
        assert!(text.contains("$414521.51"));
        assert!(text.contains("$0.00 per month"));
        assert!(text.contains("45.9%"));
    }
}
