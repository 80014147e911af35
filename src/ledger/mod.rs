//! Persistence of balances, inventory and coin transfers.
//!
//! [`LedgerStore`] is the only writer of the `users`, `inventory` and
//! `transactions` tables. Every mutating operation is a single all-or-nothing
//! transaction; a balance is never debited below zero.

use async_trait::async_trait;
use uuid::Uuid;

pub mod repo;
mod repo_types;

pub use repo::PgLedger;
pub use repo_types::{
    InfoSnapshot, InventoryRow, PurchaseReceipt, TransferReceipt, TransferRow, UserRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("user {0} does not exist")]
    UnknownUser(Uuid),
    #[error("user {0} not found")]
    RecipientNotFound(String),
    #[error("cannot send coins to yourself")]
    SelfTransfer,
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: i64, required: i64 },
    #[error("recipient balance would overflow")]
    BalanceOverflow,
    #[error("username {0} is already taken")]
    UsernameTaken(String),
    #[error("ledger is busy, try again")]
    Busy,
    #[error("store error: {0}")]
    Store(sqlx::Error),
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            match db.code().as_deref() {
                // serialization_failure, deadlock_detected
                Some("40001") | Some("40P01") => return LedgerError::Busy,
                // numeric_value_out_of_range: a credit past BIGINT
                Some("22003") => return LedgerError::BalanceOverflow,
                _ => {}
            }
        }
        LedgerError::Store(err)
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn find_user_by_username(&self, username: &str)
        -> Result<Option<UserRecord>, LedgerError>;

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        coins: i64,
    ) -> Result<UserRecord, LedgerError>;

    async fn fetch_info(&self, user_id: Uuid) -> Result<InfoSnapshot, LedgerError>;

    /// Move `amount` coins from `from` to the user named `to_username`.
    /// `amount` must already be validated as positive.
    async fn transfer_coins(
        &self,
        from: Uuid,
        to_username: &str,
        amount: i64,
    ) -> Result<TransferReceipt, LedgerError>;

    /// Debit `price` and add one `item_name` to the user's inventory.
    async fn purchase_item(
        &self,
        user_id: Uuid,
        item_name: &str,
        price: i64,
    ) -> Result<PurchaseReceipt, LedgerError>;
}
