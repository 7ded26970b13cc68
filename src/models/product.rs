use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, FromRow)]
pub struct ProductType {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct ProductSize {
    pub id: i64,
    pub product_type_id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
