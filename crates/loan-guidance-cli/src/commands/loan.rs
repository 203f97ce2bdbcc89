use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_guidance_core::sanitize::sanitize_html;
use loan_guidance_core::validation::validate_request;
use loan_guidance_core::{CalculatorConfig, LoanCalculator, LoanRequest};

use crate::input;

/// Loan scenario parameters, shared by every subcommand
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanParams {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual gross income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Loan principal
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Loan term in years (1-50)
    #[arg(long, alias = "loan-term")]
    pub loan_term_years: Option<u32>,

    /// Annual interest rate as a percentage (0-30)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Credit score (300-850)
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Existing monthly debt payments, excluding the new loan
    #[arg(long)]
    pub monthly_debt: Option<Decimal>,

    /// Property value, when the loan is secured against one
    #[arg(long)]
    pub property_value: Option<Decimal>,

    /// Extra monthly principal payment
    #[arg(long)]
    pub extra_payment: Option<Decimal>,
}

/// Arguments for the full analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub params: LoanParams,

    /// Replace the HTML narrative with its plain-text rendering
    #[arg(long)]
    pub plain: bool,
}

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub params: LoanParams,
}

/// Arguments for the recommendations-only view
#[derive(Args)]
pub struct RecommendationsArgs {
    #[command(flatten)]
    pub params: LoanParams,
}

fn resolve_request(params: &LoanParams) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    let request: LoanRequest = if let Some(ref path) = params.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanRequest {
            income: params
                .income
                .ok_or("--income is required (or provide --input)")?,
            loan_amount: params
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            loan_term_years: params
                .loan_term_years
                .ok_or("--loan-term-years is required (or provide --input)")?,
            interest_rate: params
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            credit_score: params
                .credit_score
                .ok_or("--credit-score is required (or provide --input)")?,
            monthly_debt: params
                .monthly_debt
                .ok_or("--monthly-debt is required (or provide --input)")?,
            property_value: params.property_value,
            extra_payment: params.extra_payment.unwrap_or_default(),
        }
    };

    validate_request(&request)?;
    Ok(request)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(&args.params)?;
    let calculator = LoanCalculator::new(CalculatorConfig::default());

    let mut response = calculator.analyze(&request)?;
    if args.plain {
        response.recommendations = sanitize_html(&response.recommendations);
    }

    Ok(serde_json::to_value(&response)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(&args.params)?;
    let calculator = LoanCalculator::new(CalculatorConfig::default());

    let schedule = calculator.payment_schedule(&request)?;
    Ok(serde_json::to_value(&schedule)?)
}

pub fn run_recommendations(args: RecommendationsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(&args.params)?;
    let calculator = LoanCalculator::new(CalculatorConfig::default());

    let recommendations = calculator.recommendations(&request)?;
    Ok(serde_json::to_value(&recommendations)?)
}
