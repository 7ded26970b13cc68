use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Deserialize)]
pub struct CreatePaymentRequest {
    pub method: String,
    pub amount: Decimal,
    pub transaction_id: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub mobile_number: Option<String>,
    // Defaults to now when omitted
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct PaymentResponse {
    pub id: i64,
    pub order_id: i64,
    pub order_number: String,
    pub method: String,
    pub amount: Decimal,
    pub transaction_id: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub mobile_number: Option<String>,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
