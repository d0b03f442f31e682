//! Defines the transaction store trait, the port that the application layer
//! uses to persist and retrieve [Transaction] objects.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, Transaction, TransactionBuilder, TransactionType, UserID},
};

/// Handles the creation and retrieval of [Transaction] objects.
pub trait TransactionStore {
    /// Persist the transaction described by `builder` and return it with its
    /// assigned ID.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction by its ID.
    ///
    /// Returns [Error::NotFound] if no transaction with the given ID exists.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve all transactions, most recent date first.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the transactions owned by `user_id`, most recent date first.
    ///
    /// An empty vector is returned if the user has no transactions.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Apply `update` to the transaction with the given ID and return the
    /// updated transaction.
    ///
    /// Returns [Error::NotFound] if no transaction with the given ID exists.
    fn update(&mut self, id: DatabaseID, update: TransactionUpdate) -> Result<Transaction, Error>;

    /// Delete the transaction with the given ID.
    ///
    /// Returns [Error::NotFound] if no transaction with the given ID exists.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}

/// A partial update to a transaction. Fields set to `None` are left
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionUpdate {
    /// The new description.
    pub description: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new date.
    pub date: Option<Date>,
    /// The new transaction type.
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
}
