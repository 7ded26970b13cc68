use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct CustomerSummary {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub total_orders: i64,
}
