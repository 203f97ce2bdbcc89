pub mod analysis;
pub mod error;
pub mod narrative;
pub mod sanitize;
pub mod schedule;
pub mod types;
pub mod validation;
pub mod viz;

pub use analysis::{CalculatorConfig, LoanCalculator};
pub use error::LoanError;
pub use types::*;

/// Standard result type for all loan-guidance operations
pub type LoanResult<T> = Result<T, LoanError>;
