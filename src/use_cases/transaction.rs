//! Use cases for recording and reporting on transactions.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    models::{
        DatabaseID, FinancialReport, Transaction, TransactionType, User, build_report,
    },
    stores::{TransactionStore, TransactionUpdate},
};

/// The data needed to record a new transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionData {
    /// What the transaction was for.
    pub description: String,
    /// The amount of money earned or spent. Must be positive.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// Implements the transaction related use cases: recording, editing, and
/// deleting transactions, and generating the consolidated financial report.
///
/// Permission rules:
/// - any authenticated user may record transactions and see the ledger,
/// - a transaction may only be edited or deleted by its owner or an
///   administrator,
/// - reports are restricted to users that
///   [can view reports](User::can_view_reports).
pub struct TransactionUseCases<T> {
    transaction_store: T,
}

impl<T> TransactionUseCases<T>
where
    T: TransactionStore,
{
    /// Create the use cases over `transaction_store`.
    pub fn new(transaction_store: T) -> Self {
        Self { transaction_store }
    }

    /// All transactions in the ledger, most recent date first.
    ///
    /// The ledger is shared: every authenticated user sees all transactions.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the store fails.
    pub fn get_all_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.transaction_store.get_all()
    }

    /// Record a new transaction owned by `current_user`.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::InvalidAmount] if the amount is zero, negative, or not finite,
    /// - [Error::EmptyDescription] if the description is blank,
    /// - [Error::SqlError] if the store fails.
    pub fn create_transaction(
        &mut self,
        data: TransactionData,
        current_user: &User,
    ) -> Result<Transaction, Error> {
        validate_amount(data.amount)?;
        let description = validate_description(&data.description)?;

        self.transaction_store.create(
            Transaction::build(data.amount, data.kind, current_user.id())
                .description(description)
                .date(data.date),
        )
    }

    /// Apply `update` to the transaction with the given `id`.
    ///
    /// Administrators may update any transaction, other users only their own.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::NotFound] if the transaction does not exist,
    /// - [Error::Forbidden] if `current_user` does not own the transaction and
    ///   is not an administrator,
    /// - [Error::InvalidAmount] or [Error::EmptyDescription] if an updated
    ///   field fails validation,
    /// - [Error::SqlError] if the store fails.
    pub fn update_transaction(
        &mut self,
        id: DatabaseID,
        mut update: TransactionUpdate,
        current_user: &User,
    ) -> Result<Transaction, Error> {
        let existing = self.transaction_store.get(id)?;
        check_can_modify(&existing, current_user)?;

        if let Some(amount) = update.amount {
            validate_amount(amount)?;
        }

        if let Some(description) = update.description.take() {
            update.description = Some(validate_description(&description)?);
        }

        self.transaction_store.update(id, update)
    }

    /// Delete the transaction with the given `id`.
    ///
    /// Administrators may delete any transaction, other users only their own.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::NotFound] if the transaction does not exist,
    /// - [Error::Forbidden] if `current_user` does not own the transaction and
    ///   is not an administrator,
    /// - [Error::SqlError] if the store fails.
    pub fn delete_transaction(
        &mut self,
        id: DatabaseID,
        current_user: &User,
    ) -> Result<(), Error> {
        let existing = self.transaction_store.get(id)?;
        check_can_modify(&existing, current_user)?;

        self.transaction_store.delete(id)
    }

    /// Build the consolidated financial report over the whole ledger.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::Forbidden] if `current_user` may not view reports,
    /// - [Error::SqlError] if the store fails.
    pub fn generate_financial_report(
        &self,
        current_user: &User,
    ) -> Result<FinancialReport, Error> {
        if !current_user.can_view_reports() {
            return Err(Error::Forbidden(
                "only administrators may view financial reports".to_string(),
            ));
        }

        let transactions = self.transaction_store.get_all()?;

        Ok(build_report(transactions))
    }
}

/// Owners and administrators may modify a transaction, nobody else.
fn check_can_modify(transaction: &Transaction, current_user: &User) -> Result<(), Error> {
    if !current_user.is_admin() && transaction.user_id() != current_user.id() {
        return Err(Error::Forbidden(
            "you do not have permission to modify this transaction".to_string(),
        ));
    }

    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), Error> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount(amount));
    }

    Ok(())
}

fn validate_description(description: &str) -> Result<String, Error> {
    let description = description.trim();

    if description.is_empty() {
        return Err(Error::EmptyDescription);
    }

    Ok(description.to_string())
}

#[cfg(test)]
mod transaction_use_case_tests {
    use std::str::FromStr;

    use email_address::EmailAddress;
    use time::macros::date;

    use crate::{
        Error,
        models::{
            DatabaseID, PasswordHash, Transaction, TransactionType, User, UserID, UserRole,
        },
        stores::{TransactionStore, TransactionUpdate},
    };

    use super::{TransactionData, TransactionUseCases};

    /// An in-memory transaction store for driving the use cases without a
    /// database.
    #[derive(Clone, Default)]
    struct StubTransactionStore {
        transactions: Vec<Transaction>,
        next_id: DatabaseID,
    }

    impl TransactionStore for StubTransactionStore {
        fn create(
            &mut self,
            builder: crate::models::TransactionBuilder,
        ) -> Result<Transaction, Error> {
            self.next_id += 1;

            let transaction = Transaction::new_unchecked(
                self.next_id,
                builder.description,
                builder.amount,
                builder.date,
                builder.kind,
                builder.user_id,
            );
            self.transactions.push(transaction.clone());

            Ok(transaction)
        }

        fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
            self.transactions
                .iter()
                .find(|transaction| transaction.id() == id)
                .cloned()
                .ok_or(Error::NotFound)
        }

        fn get_all(&self) -> Result<Vec<Transaction>, Error> {
            Ok(self.transactions.clone())
        }

        fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
            Ok(self
                .transactions
                .iter()
                .filter(|transaction| transaction.user_id() == user_id)
                .cloned()
                .collect())
        }

        fn update(
            &mut self,
            id: DatabaseID,
            update: TransactionUpdate,
        ) -> Result<Transaction, Error> {
            let existing = self.get(id)?;

            let updated = Transaction::new_unchecked(
                id,
                update
                    .description
                    .unwrap_or_else(|| existing.description().to_string()),
                update.amount.unwrap_or(existing.amount()),
                update.date.unwrap_or(*existing.date()),
                update.kind.unwrap_or(existing.kind()),
                existing.user_id(),
            );

            let index = self
                .transactions
                .iter()
                .position(|transaction| transaction.id() == id)
                .ok_or(Error::NotFound)?;
            self.transactions[index] = updated.clone();

            Ok(updated)
        }

        fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
            let index = self
                .transactions
                .iter()
                .position(|transaction| transaction.id() == id)
                .ok_or(Error::NotFound)?;
            self.transactions.remove(index);

            Ok(())
        }
    }

    fn get_user(id: i64, role: UserRole) -> User {
        User::new(
            UserID::new(id),
            EmailAddress::from_str(&format!("user{id}@test.com")).unwrap(),
            None,
            None,
            role,
            PasswordHash::new_unchecked("hunter2"),
        )
    }

    fn get_transaction_data() -> TransactionData {
        TransactionData {
            description: "Product sale".to_string(),
            amount: 1_500.0,
            date: date!(2024 - 01 - 15),
            kind: TransactionType::Income,
        }
    }

    #[test]
    fn any_user_can_record_a_transaction() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let user = get_user(1, UserRole::User);

        let transaction = use_cases
            .create_transaction(get_transaction_data(), &user)
            .unwrap();

        assert_eq!(transaction.user_id(), user.id());
        assert_eq!(transaction.description(), "Product sale");
        assert_eq!(transaction.amount(), 1_500.0);
        assert_eq!(transaction.kind(), TransactionType::Income);
    }

    #[test]
    fn create_rejects_non_positive_amounts() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let user = get_user(1, UserRole::User);

        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let data = TransactionData {
                amount,
                ..get_transaction_data()
            };

            assert!(matches!(
                use_cases.create_transaction(data, &user),
                Err(Error::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn create_rejects_blank_descriptions() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let user = get_user(1, UserRole::User);

        let data = TransactionData {
            description: "   ".to_string(),
            ..get_transaction_data()
        };

        assert_eq!(
            use_cases.create_transaction(data, &user),
            Err(Error::EmptyDescription)
        );
    }

    #[test]
    fn owner_can_update_their_transaction() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let owner = get_user(1, UserRole::User);

        let transaction = use_cases
            .create_transaction(get_transaction_data(), &owner)
            .unwrap();

        let updated = use_cases
            .update_transaction(
                transaction.id(),
                TransactionUpdate {
                    amount: Some(2_000.0),
                    ..Default::default()
                },
                &owner,
            )
            .unwrap();

        assert_eq!(updated.amount(), 2_000.0);
        assert_eq!(updated.description(), transaction.description());
    }

    #[test]
    fn admin_can_update_someone_elses_transaction() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let owner = get_user(1, UserRole::User);
        let admin = get_user(2, UserRole::Admin);

        let transaction = use_cases
            .create_transaction(get_transaction_data(), &owner)
            .unwrap();

        let updated = use_cases.update_transaction(
            transaction.id(),
            TransactionUpdate {
                kind: Some(TransactionType::Expense),
                ..Default::default()
            },
            &admin,
        );

        assert!(updated.is_ok());
    }

    #[test]
    fn update_is_forbidden_for_non_owners() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let owner = get_user(1, UserRole::User);
        let other_user = get_user(2, UserRole::User);

        let transaction = use_cases
            .create_transaction(get_transaction_data(), &owner)
            .unwrap();

        let result = use_cases.update_transaction(
            transaction.id(),
            TransactionUpdate::default(),
            &other_user,
        );

        assert!(matches!(result, Err(Error::Forbidden(_))));
    }

    #[test]
    fn update_fails_for_missing_transaction() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let admin = get_user(1, UserRole::Admin);

        let result = use_cases.update_transaction(1337, TransactionUpdate::default(), &admin);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_rejects_invalid_amounts() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let owner = get_user(1, UserRole::User);

        let transaction = use_cases
            .create_transaction(get_transaction_data(), &owner)
            .unwrap();

        let result = use_cases.update_transaction(
            transaction.id(),
            TransactionUpdate {
                amount: Some(-5.0),
                ..Default::default()
            },
            &owner,
        );

        assert_eq!(result, Err(Error::InvalidAmount(-5.0)));
    }

    #[test]
    fn owner_can_delete_their_transaction() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let owner = get_user(1, UserRole::User);

        let transaction = use_cases
            .create_transaction(get_transaction_data(), &owner)
            .unwrap();

        assert_eq!(
            use_cases.delete_transaction(transaction.id(), &owner),
            Ok(())
        );
        assert!(use_cases.get_all_transactions().unwrap().is_empty());
    }

    #[test]
    fn delete_is_forbidden_for_non_owners() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let owner = get_user(1, UserRole::User);
        let other_user = get_user(2, UserRole::User);

        let transaction = use_cases
            .create_transaction(get_transaction_data(), &owner)
            .unwrap();

        let result = use_cases.delete_transaction(transaction.id(), &other_user);

        assert!(matches!(result, Err(Error::Forbidden(_))));
    }

    #[test]
    fn delete_fails_for_missing_transaction() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let admin = get_user(1, UserRole::Admin);

        assert_eq!(
            use_cases.delete_transaction(1337, &admin),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn report_is_forbidden_for_regular_users() {
        let use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let user = get_user(1, UserRole::User);

        let result = use_cases.generate_financial_report(&user);

        assert!(matches!(result, Err(Error::Forbidden(_))));
    }

    #[test]
    fn report_consolidates_transactions_from_all_users() {
        let mut use_cases = TransactionUseCases::new(StubTransactionStore::default());
        let admin = get_user(1, UserRole::Admin);
        let user = get_user(2, UserRole::User);

        use_cases
            .create_transaction(get_transaction_data(), &admin)
            .unwrap();
        use_cases
            .create_transaction(
                TransactionData {
                    description: "Office supplies".to_string(),
                    amount: 500.0,
                    date: date!(2024 - 01 - 20),
                    kind: TransactionType::Expense,
                },
                &user,
            )
            .unwrap();

        let report = use_cases.generate_financial_report(&admin).unwrap();

        assert_eq!(report.total_income, 1_500.0);
        assert_eq!(report.total_expenses, 500.0);
        assert_eq!(report.balance, 1_000.0);
        assert_eq!(report.transactions.len(), 2);
    }
}
