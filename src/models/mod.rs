//! The application's domain models and the business rules that operate on
//! them. Nothing in this module touches the database or the network.

mod password;
mod report;
mod transaction;
mod user;

pub use password::{PasswordHash, ValidatedPassword};
pub use report::{FinancialReport, MonthlySummary, build_report};
pub use transaction::{
    Transaction, TransactionBuilder, TransactionType, calculate_balance, filter_by_type,
    total_expenses, total_income,
};
pub use user::{User, UserID, UserRole};

/// An alias for integer row IDs used by the database layer.
pub type DatabaseID = i64;
