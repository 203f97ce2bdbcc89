//! Amortization schedule generation.
//!
//! Simulates at most the first twelve monthly rows, then estimates the rest:
//! long loans get one synthesized "final payoff" row from the closed-form
//! payoff-count formula, and every schedule closes with a synthetic summary
//! row carrying term totals. The tail estimates are deliberately inexact
//! (a linear interest approximation, not a month-by-month simulation) and
//! must stay that way for output parity.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanError;
use crate::types::{LoanRequest, Money, PaymentEntry, PaymentNumber, Percent};
use crate::LoanResult;

/// Rows simulated before the tail is estimated.
const SIMULATED_MONTHS: u32 = 12;

/// Convert an annual percentage rate to a monthly decimal rate.
pub fn monthly_rate(interest_rate: Percent) -> Decimal {
    interest_rate / dec!(100) / dec!(12)
}

/// Standard fixed-rate payment: P * r(1+r)^n / ((1+r)^n - 1).
/// Straight-line amortization when the rate is zero.
pub fn monthly_payment(
    loan_amount: Money,
    monthly_rate: Decimal,
    n_payments: u32,
) -> LoanResult<Money> {
    if n_payments == 0 {
        return Err(LoanError::DivisionByZero {
            context: "monthly payment with zero payment count".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(loan_amount / Decimal::from(n_payments));
    }

    // (1 + r)^n via iterative multiplication
    let mut compound = Decimal::ONE;
    for _ in 0..n_payments {
        compound *= Decimal::ONE + monthly_rate;
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(LoanError::DivisionByZero {
            context: "amortization payment denominator".into(),
        });
    }

    Ok(loan_amount * monthly_rate * compound / denominator)
}

/// Generate the full schedule for a validated request: up to twelve simulated
/// rows, the synthesized final row for longer terms, and the summary row.
pub fn generate_schedule(request: &LoanRequest) -> LoanResult<Vec<PaymentEntry>> {
    let rate = monthly_rate(request.interest_rate);
    let n_payments = request.loan_term_years * 12;
    let payment = monthly_payment(request.loan_amount, rate, n_payments)?;

    let mut schedule = Vec::new();
    let mut balance = request.loan_amount;
    let mut total_interest = Decimal::ZERO;

    for month in 1..=n_payments.min(SIMULATED_MONTHS) {
        let interest = balance * rate;
        let principal = payment - interest;

        let mut principal_paid = principal + request.extra_payment;
        balance -= principal_paid;

        // The last payment absorbs any overpayment instead of leaving a
        // negative balance.
        if balance < Decimal::ZERO {
            principal_paid += balance;
            balance = Decimal::ZERO;
        }

        total_interest += interest;

        schedule.push(PaymentEntry {
            payment_number: PaymentNumber::Month(month),
            payment_date: Some(format!("2024-{:02}-01", (month - 1) % 12 + 1)),
            payment_amount: (payment + request.extra_payment).round_dp(2),
            principal_payment: principal_paid.round_dp(2),
            interest_payment: interest.round_dp(2),
            remaining_balance: balance.round_dp(2),
            total_interest_paid: total_interest.round_dp(2),
            years_to_payoff: None,
            months_to_payoff: None,
        });

        if balance <= Decimal::ZERO {
            break;
        }
    }

    if n_payments > SIMULATED_MONTHS && balance > Decimal::ZERO {
        schedule.push(final_payoff_row(payment, rate, balance, total_interest)?);
    }

    schedule.push(summary_row(request, payment, n_payments));

    Ok(schedule)
}

// ---------------------------------------------------------------------------
// Payoff estimation
// ---------------------------------------------------------------------------

/// Closed-form payoff count for the unsimulated tail:
/// ceil(ln(M / (M - B*r)) / ln(1 + r)), or ceil(B / M) at zero rate.
fn estimate_payments_left(payment: Money, rate: Decimal, balance: Money) -> LoanResult<u32> {
    let months = if rate.is_zero() {
        (balance / payment).ceil()
    } else {
        let carrying = payment - balance * rate;
        if carrying <= Decimal::ZERO {
            return Err(LoanError::FinancialImpossibility(
                "monthly payment does not cover interest on the remaining balance".into(),
            ));
        }
        ((payment / carrying).ln() / (Decimal::ONE + rate).ln()).ceil()
    };

    months.to_u32().ok_or_else(|| {
        LoanError::FinancialImpossibility("estimated payoff count is not representable".into())
    })
}

/// Synthesize the single "final payoff" row for loans longer than the
/// simulated window. Cumulative interest over the skipped months is the
/// linear approximation (payments_left - 1) * B*r / 2.
fn final_payoff_row(
    payment: Money,
    rate: Decimal,
    balance: Money,
    total_interest: Money,
) -> LoanResult<PaymentEntry> {
    let payments_left = estimate_payments_left(payment, rate, balance)?;
    let final_number = payments_left + SIMULATED_MONTHS;

    let interest = balance * rate;
    let interest_estimate =
        total_interest + Decimal::from(payments_left - 1) * (balance * rate) / dec!(2);

    let year = final_number / 12 + 1;
    let month = match final_number % 12 {
        0 => 12,
        m => m,
    };

    Ok(PaymentEntry {
        payment_number: PaymentNumber::Month(final_number),
        payment_date: Some(format!("Year {year}, Month {month}")),
        payment_amount: (balance + interest).round_dp(2),
        principal_payment: balance.round_dp(2),
        interest_payment: interest.round_dp(2),
        remaining_balance: Decimal::ZERO,
        total_interest_paid: interest_estimate.round_dp(2),
        years_to_payoff: None,
        months_to_payoff: None,
    })
}

/// Synthetic closing row with term totals and the simplified
/// proportional-reduction payoff heuristic for extra payments.
fn summary_row(request: &LoanRequest, payment: Money, n_payments: u32) -> PaymentEntry {
    let n = Decimal::from(n_payments);
    let term_years = Decimal::from(request.loan_term_years);
    let total_paid = payment * n;
    let total_interest = total_paid - request.loan_amount;

    let (years_to_payoff, months_to_payoff) = if request.extra_payment > Decimal::ZERO {
        let reduction_base = request.loan_amount / dec!(3);
        let estimated_months = n - request.extra_payment * n / reduction_base;
        let estimated_years = term_years - request.extra_payment * term_years / reduction_base;
        (estimated_years, estimated_months.trunc())
    } else {
        (term_years, n)
    };

    PaymentEntry {
        payment_number: PaymentNumber::SUMMARY,
        payment_date: None,
        payment_amount: total_paid.round_dp(2),
        principal_payment: request.loan_amount.round_dp(2),
        interest_payment: total_interest.round_dp(2),
        remaining_balance: Decimal::ZERO,
        total_interest_paid: total_interest.round_dp(2),
        years_to_payoff: Some(years_to_payoff),
        months_to_payoff: months_to_payoff.to_i64(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
