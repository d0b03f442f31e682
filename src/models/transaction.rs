//! This file defines the type `Transaction`, the core type of the
//! application, along with the aggregation functions that the reporting
//! layer runs over lists of transactions.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use time::{Date, OffsetDateTime};

use crate::models::{DatabaseID, UserID};

/// Whether a transaction brought money in or took money out.
///
/// Serialized as `"INCOME"`/`"EXPENSE"` both on the wire and in the database.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money earned, counts towards the balance.
    Income,
    /// Money spent, counts against the balance.
    Expense,
}

impl TransactionType {
    /// The canonical string form, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An income or expense, i.e. an event where money was either earned or spent.
///
/// The amount is always positive, [TransactionType] carries the sign.
///
/// To create a new `Transaction` use [Transaction::build] and finalize the
/// builder with [TransactionStore::create](crate::stores::TransactionStore::create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    description: String,
    amount: f64,
    date: Date,
    #[serde(rename = "type")]
    kind: TransactionType,
    user_id: UserID,
}

impl Transaction {
    /// Start building a new transaction owned by `user_id`.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    pub fn build(amount: f64, kind: TransactionType, user_id: UserID) -> TransactionBuilder {
        TransactionBuilder::new(amount, kind, user_id)
    }

    /// Assemble a transaction from its parts, without validation.
    ///
    /// Intended for the storage layer when reading rows that were validated
    /// on the way in.
    pub fn new_unchecked(
        id: DatabaseID,
        description: String,
        amount: f64,
        date: Date,
        kind: TransactionType,
        user_id: UserID,
    ) -> Self {
        Self {
            id,
            description,
            amount,
            date,
            kind,
            user_id,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The amount of money earned or spent in this transaction.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// When the transaction happened.
    pub fn date(&self) -> &Date {
        &self.date
    }

    /// Whether the transaction is an income or an expense.
    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    /// The ID of the user that owns this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }
}

/// Builder for creating a new [Transaction].
///
/// The builder is finalized by
/// [TransactionStore::create](crate::stores::TransactionStore::create), which
/// assigns the database ID.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    pub(crate) description: String,
    pub(crate) amount: f64,
    pub(crate) date: Date,
    pub(crate) kind: TransactionType,
    pub(crate) user_id: UserID,
}

impl TransactionBuilder {
    /// Create a builder for a transaction of `amount` owned by `user_id`.
    ///
    /// The date defaults to today (UTC) and the description to the empty
    /// string.
    pub fn new(amount: f64, kind: TransactionType, user_id: UserID) -> Self {
        Self {
            description: String::new(),
            amount,
            date: OffsetDateTime::now_utc().date(),
            kind,
            user_id,
        }
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }
}

/// The net balance of `transactions`: total income minus total expenses.
pub fn calculate_balance(transactions: &[Transaction]) -> f64 {
    transactions.iter().fold(0.0, |balance, transaction| {
        match transaction.kind() {
            TransactionType::Income => balance + transaction.amount(),
            TransactionType::Expense => balance - transaction.amount(),
        }
    })
}

/// The transactions in `transactions` that have type `kind`.
pub fn filter_by_type(transactions: &[Transaction], kind: TransactionType) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.kind() == kind)
        .collect()
}

/// The sum of all income amounts in `transactions`.
pub fn total_income(transactions: &[Transaction]) -> f64 {
    filter_by_type(transactions, TransactionType::Income)
        .iter()
        .map(|transaction| transaction.amount())
        .sum()
}

/// The sum of all expense amounts in `transactions`.
pub fn total_expenses(transactions: &[Transaction]) -> f64 {
    filter_by_type(transactions, TransactionType::Expense)
        .iter()
        .map(|transaction| transaction.amount())
        .sum()
}
