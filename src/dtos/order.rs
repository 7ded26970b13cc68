use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, NaiveDate};
use rust_decimal::Decimal;
use crate::orders::totals::DiscountType;

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub shop_id: i64,
    // Either an existing customer id or an inline new-customer payload
    pub customer_id: Option<i64>,
    pub customer: Option<NewCustomerPayload>,
    pub items: Vec<OrderItemRequest>,
    pub discount_amount: Option<Decimal>,
    pub discount_type: Option<DiscountType>,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct NewCustomerPayload {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_type_id: i64,
    pub product_size_id: i64,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub discount_amount: Option<Decimal>,
    pub discount_type: Option<DiscountType>,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    // When present the whole item set is replaced
    pub items: Option<Vec<OrderItemRequest>>,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub order_number: String,
    pub shop_id: i64,
    pub shop_name: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub status: String,
    pub total_amount: Decimal,
    pub advance_paid: Decimal,
    pub discount_amount: Decimal,
    pub discount_type: DiscountType,
    pub due_amount: Decimal,
    pub delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
    pub payments: Vec<OrderPaymentResponse>,
    pub summary: OrderSummary,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub id: i64,
    pub product_type_id: i64,
    pub product_type_name: String,
    pub product_size_id: i64,
    pub product_size_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub line_total: Decimal,
}

#[derive(Serialize)]
pub struct OrderPaymentResponse {
    pub id: i64,
    pub method: String,
    pub amount: Decimal,
    pub transaction_id: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub mobile_number: Option<String>,
    pub paid_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct OrderSummary {
    pub total_items: i64,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub balance_due: Decimal,
}

#[derive(Serialize)]
pub struct OrderListItem {
    pub id: i64,
    pub order_number: String,
    pub shop_name: String,
    pub customer_name: String,
    pub status: String,
    pub total_amount: Decimal,
    pub advance_paid: Decimal,
    pub due_amount: Decimal,
    pub delivery_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub total_items: i64,
}
