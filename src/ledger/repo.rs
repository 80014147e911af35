use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    InfoSnapshot, InventoryRow, LedgerError, LedgerStore, PurchaseReceipt, TransferReceipt,
    TransferRow, UserRecord,
};

/// Postgres-backed ledger.
#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
    tx_timeout: Duration,
}

impl PgLedger {
    pub fn new(pool: PgPool, tx_timeout: Duration) -> Self {
        Self { pool, tx_timeout }
    }

    /// Run `op` under the transaction timeout. Dropping the future on timeout
    /// drops its open transaction, which rolls it back.
    async fn bounded<T, F>(&self, name: &'static str, op: F) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<T, LedgerError>>,
    {
        match tokio::time::timeout(self.tx_timeout, op).await {
            Ok(res) => res,
            Err(_) => {
                warn!(op = name, timeout_ms = self.tx_timeout.as_millis() as u64, "ledger transaction timed out");
                Err(LedgerError::Busy)
            }
        }
    }
}

#[async_trait]
impl LedgerStore for PgLedger {
    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, LedgerError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, coins, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        coins: i64,
    ) -> Result<UserRecord, LedgerError> {
        let res = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, password_hash, coins)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, coins, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(coins)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
                Err(LedgerError::UsernameTaken(username.to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch_info(&self, user_id: Uuid) -> Result<InfoSnapshot, LedgerError> {
        self.bounded("fetch_info", async {
            let mut tx = self.pool.begin().await?;
            sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
                .execute(&mut *tx)
                .await?;

            let coins = sqlx::query_scalar::<_, i64>("SELECT coins FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(LedgerError::UnknownUser(user_id))?;

            let inventory = sqlx::query_as::<_, InventoryRow>(
                r#"
                SELECT item_name, quantity
                FROM inventory
                WHERE user_id = $1
                ORDER BY item_name
                "#,
            )
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;

            let history = sqlx::query_as::<_, TransferRow>(
                r#"
                SELECT t.id,
                       t.from_user_id, sender.username   AS from_username,
                       t.to_user_id,   receiver.username AS to_username,
                       t.amount, t.created_at
                  FROM transactions t
                  JOIN users sender   ON sender.id   = t.from_user_id
                  JOIN users receiver ON receiver.id = t.to_user_id
                 WHERE t.from_user_id = $1 OR t.to_user_id = $1
                 ORDER BY t.id
                "#,
            )
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(InfoSnapshot {
                coins,
                inventory,
                history,
            })
        })
        .await
    }

    async fn transfer_coins(
        &self,
        from: Uuid,
        to_username: &str,
        amount: i64,
    ) -> Result<TransferReceipt, LedgerError> {
        self.bounded("transfer_coins", async {
            let mut tx = self.pool.begin().await?;

            let to = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE username = $1")
                .bind(to_username)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| LedgerError::RecipientNotFound(to_username.to_owned()))?;

            if to == from {
                return Err(LedgerError::SelfTransfer);
            }

            // Lock in id order so opposite transfers cannot deadlock.
            let locked = sqlx::query_as::<_, (Uuid, i64)>(
                "SELECT id, coins FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE",
            )
            .bind(vec![from, to])
            .fetch_all(&mut *tx)
            .await?;

            let balance = locked
                .iter()
                .find(|(id, _)| *id == from)
                .map(|(_, coins)| *coins)
                .ok_or(LedgerError::UnknownUser(from))?;

            let sender_balance = sqlx::query_scalar::<_, i64>(
                r#"
                UPDATE users SET coins = coins - $1
                 WHERE id = $2 AND coins >= $1
                RETURNING coins
                "#,
            )
            .bind(amount)
            .bind(from)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(LedgerError::InsufficientFunds {
                balance,
                required: amount,
            })?;

            sqlx::query("UPDATE users SET coins = coins + $1 WHERE id = $2")
                .bind(amount)
                .bind(to)
                .execute(&mut *tx)
                .await?;

            let transaction_id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO transactions (from_user_id, to_user_id, amount)
                VALUES ($1, $2, $3)
                RETURNING id
                "#,
            )
            .bind(from)
            .bind(to)
            .bind(amount)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            debug!(%from, %to, amount, transaction_id, "transfer committed");
            Ok(TransferReceipt {
                transaction_id,
                sender_balance,
            })
        })
        .await
    }

    async fn purchase_item(
        &self,
        user_id: Uuid,
        item_name: &str,
        price: i64,
    ) -> Result<PurchaseReceipt, LedgerError> {
        self.bounded("purchase_item", async {
            let mut tx = self.pool.begin().await?;

            let balance =
                sqlx::query_scalar::<_, i64>("SELECT coins FROM users WHERE id = $1 FOR UPDATE")
                    .bind(user_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(LedgerError::UnknownUser(user_id))?;

            let remaining = sqlx::query_scalar::<_, i64>(
                r#"
                UPDATE users SET coins = coins - $1
                 WHERE id = $2 AND coins >= $1
                RETURNING coins
                "#,
            )
            .bind(price)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(LedgerError::InsufficientFunds {
                balance,
                required: price,
            })?;

            let quantity = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO inventory (user_id, item_name, quantity)
                VALUES ($1, $2, 1)
                ON CONFLICT (user_id, item_name)
                DO UPDATE SET quantity = inventory.quantity + 1
                RETURNING quantity
                "#,
            )
            .bind(user_id)
            .bind(item_name)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            debug!(%user_id, item = item_name, price, quantity, "purchase committed");
            Ok(PurchaseReceipt {
                balance: remaining,
                quantity,
            })
        })
        .await
    }
}
