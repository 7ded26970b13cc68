use axum::{extract::State, Json, Extension};
use rust_decimal::Decimal;
use crate::state::AppState;
use crate::error::AppError;
use crate::auth::permissions::STATS_VIEW;
use crate::dtos::stats::{StatsResponse, ShopStats};
use crate::middleware::auth::AuthContext;

pub async fn get_stats(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<StatsResponse>, AppError> {
    auth.require(STATS_VIEW)?;

    // Dashboard headline numbers in one round trip
    let (
        total_orders,
        pending_orders,
        delivered_orders,
        cancelled_orders,
        total_revenue,
        total_collected,
        outstanding_due,
        total_customers,
        active_shops,
    ): (i64, i64, i64, i64, Decimal, Decimal, Decimal, i64, i64) = sqlx::query_as(
        r#"SELECT
            (SELECT COUNT(*) FROM orders),
            (SELECT COUNT(*) FROM orders WHERE status = 'pending'),
            (SELECT COUNT(*) FROM orders WHERE status = 'delivered'),
            (SELECT COUNT(*) FROM orders WHERE status = 'cancelled'),
            (SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE status <> 'cancelled'),
            (SELECT COALESCE(SUM(advance_paid), 0) FROM orders WHERE status <> 'cancelled'),
            (SELECT COALESCE(SUM(due_amount), 0) FROM orders WHERE status = 'pending'),
            (SELECT COUNT(*) FROM customers),
            (SELECT COUNT(*) FROM shops WHERE is_active)"#,
    )
    .fetch_one(&db_pool)
    .await?;

    let shop_rows: Vec<(i64, String, String, i64, i64, Decimal, Decimal)> = sqlx::query_as(
        r#"SELECT
            s.id, s.name, s.code,
            COUNT(o.id),
            COUNT(o.id) FILTER (WHERE o.status = 'pending'),
            COALESCE(SUM(o.total_amount) FILTER (WHERE o.status <> 'cancelled'), 0),
            COALESCE(SUM(o.due_amount) FILTER (WHERE o.status = 'pending'), 0)
        FROM shops s
        LEFT JOIN orders o ON o.shop_id = s.id
        GROUP BY s.id, s.name, s.code
        ORDER BY s.name ASC"#,
    )
    .fetch_all(&db_pool)
    .await?;

    let shops = shop_rows
        .into_iter()
        .map(|(shop_id, shop_name, shop_code, total_orders, pending_orders, total_revenue, outstanding_due)| {
            ShopStats {
                shop_id,
                shop_name,
                shop_code: shop_code.trim().to_string(),
                total_orders,
                pending_orders,
                total_revenue,
                outstanding_due,
            }
        })
        .collect();

    Ok(Json(StatsResponse {
        total_orders,
        pending_orders,
        delivered_orders,
        cancelled_orders,
        total_revenue,
        total_collected,
        outstanding_due,
        total_customers,
        active_shops,
        shops,
    }))
}
