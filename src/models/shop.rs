use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, FromRow)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub next_order_sequence: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
