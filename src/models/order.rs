use sqlx::FromRow;
use chrono::{DateTime, Utc, NaiveDate};
use rust_decimal::Decimal;

pub const ORDER_STATUSES: &[&str] = &["pending", "delivered", "cancelled"];
pub const PAYMENT_METHODS: &[&str] = &["cash", "bkash", "nagad", "bank"];

pub fn is_valid_status(status: &str) -> bool {
    ORDER_STATUSES.contains(&status)
}

pub fn is_valid_payment_method(method: &str) -> bool {
    PAYMENT_METHODS.contains(&method)
}

#[derive(Debug, FromRow)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub shop_id: i64,
    pub customer_id: i64,
    pub status: String,
    pub total_amount: Decimal,
    pub advance_paid: Decimal,
    pub discount_amount: Decimal,
    pub discount_type: String,
    pub due_amount: Decimal,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_type_id: i64,
    pub product_size_id: i64,
    pub quantity: i32,
    pub price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, FromRow)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub method: String,
    pub amount: Decimal,
    pub transaction_id: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub mobile_number: Option<String>,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_set_is_closed() {
        assert!(is_valid_status("pending"));
        assert!(is_valid_status("delivered"));
        assert!(is_valid_status("cancelled"));
        assert!(!is_valid_status("shipped"));
        assert!(!is_valid_status("Pending"));
    }

    #[test]
    fn payment_method_set_is_closed() {
        assert!(is_valid_payment_method("cash"));
        assert!(is_valid_payment_method("bkash"));
        assert!(is_valid_payment_method("nagad"));
        assert!(is_valid_payment_method("bank"));
        assert!(!is_valid_payment_method("card"));
    }
}
