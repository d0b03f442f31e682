//! SQLite-backed implementations of the store traits.
//!
//! All stores share a single [rusqlite::Connection] behind an `Arc<Mutex>`,
//! the way the server binary wires them up.

mod transaction;
mod user;

pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;
