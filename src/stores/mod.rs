//! Contains traits and implementations for objects that store the domain
//! [models](crate::models). The traits are the ports that the application
//! layer depends on; [sqlite] provides the SQLite-backed implementations.

mod transaction;
mod user;

pub mod sqlite;

pub use transaction::{TransactionStore, TransactionUpdate};
pub use user::{UserStore, UserUpdate};
