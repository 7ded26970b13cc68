use serde::Serialize;
use rust_decimal::Decimal;

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub delivered_orders: i64,
    pub cancelled_orders: i64,
    pub total_revenue: Decimal,
    pub total_collected: Decimal,
    pub outstanding_due: Decimal,
    pub total_customers: i64,
    pub active_shops: i64,
    pub shops: Vec<ShopStats>,
}

#[derive(Serialize)]
pub struct ShopStats {
    pub shop_id: i64,
    pub shop_name: String,
    pub shop_code: String,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub total_revenue: Decimal,
    pub outstanding_due: Decimal,
}
