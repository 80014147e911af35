use serde::{Deserialize, Serialize};

/// Response body for `GET /api/info`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub coins: i64,
    pub inventory: Vec<InventoryItem>,
    pub coin_history: CoinHistory,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoinHistory {
    pub received: Vec<CoinTransfer>,
    pub sent: Vec<CoinTransfer>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CoinTransfer {
    pub from_user: String,
    pub to_user: String,
    pub amount: i64,
}

/// Request body for `POST /api/sendCoin`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinRequest {
    pub to_user: String,
    pub amount: i64,
}
