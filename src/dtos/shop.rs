use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub code: String,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateShopRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct ShopResponse {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub next_order_sequence: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ShopSummary {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub is_active: bool,
}
