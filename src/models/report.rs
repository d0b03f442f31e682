//! Consolidated financial reporting: totals over the whole ledger and a
//! per-month breakdown suitable for charting on the client.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::models::{
    Transaction, TransactionType, calculate_balance, total_expenses, total_income,
};

/// A consolidated view of the ledger: overall totals, a monthly breakdown,
/// and the underlying transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    /// Total income minus total expenses.
    pub balance: f64,
    /// The sum of all income amounts.
    pub total_income: f64,
    /// The sum of all expense amounts.
    pub total_expenses: f64,
    /// Income, expenses, and net per calendar month, oldest month first.
    pub monthly_summaries: Vec<MonthlySummary>,
    /// The transactions the report was built from.
    pub transactions: Vec<Transaction>,
}

/// The income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Human readable month label, e.g. "Aug 2024".
    pub month: String,
    /// The sum of the month's income amounts.
    pub income: f64,
    /// The sum of the month's expense amounts.
    pub expenses: f64,
    /// Income minus expenses for the month.
    pub net: f64,
}

/// Build a [FinancialReport] over `transactions`.
///
/// The monthly breakdown only contains months that have at least one
/// transaction, sorted chronologically.
pub fn build_report(transactions: Vec<Transaction>) -> FinancialReport {
    FinancialReport {
        balance: calculate_balance(&transactions),
        total_income: total_income(&transactions),
        total_expenses: total_expenses(&transactions),
        monthly_summaries: build_monthly_summaries(&transactions),
        transactions,
    }
}

/// Aggregates income and expense amounts by calendar month.
///
/// Returns one summary per month that has transactions, oldest month first.
fn build_monthly_summaries(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut totals: HashMap<Date, (f64, f64)> = HashMap::new();

    for transaction in transactions {
        let month = transaction.date().replace_day(1).unwrap();
        let entry = totals.entry(month).or_insert((0.0, 0.0));

        match transaction.kind() {
            TransactionType::Income => entry.0 += transaction.amount(),
            TransactionType::Expense => entry.1 += transaction.amount(),
        }
    }

    let mut months: Vec<Date> = totals.keys().copied().collect();
    months.sort();

    months
        .into_iter()
        .map(|month| {
            let (income, expenses) = totals[&month];

            MonthlySummary {
                month: month_label(month),
                income,
                expenses,
                net: income - expenses,
            }
        })
        .collect()
}

/// Formats a month as a three-letter abbreviation followed by the year,
/// e.g. "Jan 2025".
fn month_label(date: Date) -> String {
    let month = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{} {}", month, date.year())
}
