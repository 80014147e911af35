use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    error::AppError,
    ledger::{InfoSnapshot, LedgerStore, PurchaseReceipt, TransferReceipt},
    merch::dto::{CoinHistory, CoinTransfer, InfoResponse, InventoryItem, SendCoinRequest},
};

/// Shape a ledger snapshot for `user_id`. Each history row is bucketed by the
/// sender id stored on that row.
pub fn build_info(user_id: Uuid, snapshot: InfoSnapshot) -> InfoResponse {
    let mut coin_history = CoinHistory::default();
    for row in snapshot.history {
        let sent = row.from_user_id == user_id;
        let entry = CoinTransfer {
            from_user: row.from_username,
            to_user: row.to_username,
            amount: row.amount,
        };
        if sent {
            coin_history.sent.push(entry);
        } else {
            coin_history.received.push(entry);
        }
    }

    InfoResponse {
        coins: snapshot.coins,
        inventory: snapshot
            .inventory
            .into_iter()
            .map(|row| InventoryItem {
                item_type: row.item_name,
                quantity: row.quantity,
            })
            .collect(),
        coin_history,
    }
}

pub async fn fetch_info(ledger: &dyn LedgerStore, user_id: Uuid) -> Result<InfoResponse, AppError> {
    let snapshot = ledger.fetch_info(user_id).await?;
    Ok(build_info(user_id, snapshot))
}

pub async fn send_coins(
    ledger: &dyn LedgerStore,
    from: Uuid,
    req: &SendCoinRequest,
) -> Result<TransferReceipt, AppError> {
    let to_user = req.to_user.trim();
    if to_user.is_empty() {
        return Err(AppError::Validation("toUser is required".into()));
    }
    if req.amount <= 0 {
        return Err(AppError::Validation("amount must be positive".into()));
    }

    match ledger.transfer_coins(from, to_user, req.amount).await {
        Ok(receipt) => {
            info!(%from, to_user, amount = req.amount, transaction_id = receipt.transaction_id, "coins sent");
            Ok(receipt)
        }
        Err(e) => {
            warn!(%from, to_user, amount = req.amount, error = %e, "send coins rejected");
            Err(e.into())
        }
    }
}

pub async fn buy_item(
    ledger: &dyn LedgerStore,
    catalog: &Catalog,
    user_id: Uuid,
    item: &str,
) -> Result<PurchaseReceipt, AppError> {
    let Some(price) = catalog.price_of(item) else {
        warn!(%user_id, item, "unknown item");
        return Err(AppError::NotFound(format!("Unknown item: {item}")));
    };

    match ledger.purchase_item(user_id, item, price).await {
        Ok(receipt) => {
            info!(%user_id, item, price, quantity = receipt.quantity, "item purchased");
            Ok(receipt)
        }
        Err(e) => {
            warn!(%user_id, item, price, error = %e, "purchase rejected");
            Err(e.into())
        }
    }
}
