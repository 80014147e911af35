use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String, // Argon2 PHC string
    pub coins: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct InventoryRow {
    pub item_name: String,
    pub quantity: i64,
}

/// One `transactions` row joined with both usernames.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TransferRow {
    pub id: i64,
    pub from_user_id: Uuid,
    pub from_username: String,
    pub to_user_id: Uuid,
    pub to_username: String,
    pub amount: i64,
    pub created_at: OffsetDateTime,
}

/// Balance, inventory and transfer history read from a single snapshot.
#[derive(Debug, Clone)]
pub struct InfoSnapshot {
    pub coins: i64,
    pub inventory: Vec<InventoryRow>,
    pub history: Vec<TransferRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub transaction_id: i64,
    pub sender_balance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub balance: i64,
    pub quantity: i64,
}
