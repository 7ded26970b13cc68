use axum::{extract::State, Json, Extension};
use axum::http::StatusCode;
use crate::state::AppState;
use crate::error::AppError;
use crate::auth::permissions::{ORDERS_CREATE, ORDERS_UPDATE, ORDERS_DELETE};
use crate::dtos::order::{CreateOrderRequest, UpdateOrderRequest, OrderResponse, OrderListItem};
use crate::middleware::auth::AuthContext;
use crate::models::order::is_valid_status;
use crate::orders::lifecycle;

pub async fn create_order(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    auth.require(ORDERS_CREATE)?;

    let order = lifecycle::create_order(&db_pool, req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<OrderResponse>, AppError> {
    lifecycle::fetch_order(&db_pool, id).await.map(Json)
}

pub async fn list_orders(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
) -> Result<Json<Vec<OrderListItem>>, AppError> {
    let shop_id = params.get("shop_id").and_then(|s| s.parse::<i64>().ok());
    let customer_id = params.get("customer_id").and_then(|s| s.parse::<i64>().ok());
    let status = params.get("status").cloned();

    if let Some(s) = &status {
        if !is_valid_status(s) {
            return Err(AppError::validation("Status must be one of: pending, delivered, cancelled"));
        }
    }

    let rows: Vec<OrderListRow> = sqlx::query_as(
        r#"SELECT
            o.id, o.order_number, s.name AS shop_name, c.name AS customer_name,
            o.status, o.total_amount, o.advance_paid, o.due_amount,
            o.delivery_date, o.created_at,
            COALESCE(SUM(oi.quantity), 0)::BIGINT AS total_items
        FROM orders o
        JOIN shops s ON o.shop_id = s.id
        JOIN customers c ON o.customer_id = c.id
        LEFT JOIN order_items oi ON oi.order_id = o.id
        WHERE ($1::BIGINT IS NULL OR o.shop_id = $1)
          AND ($2::BIGINT IS NULL OR o.customer_id = $2)
          AND ($3::TEXT IS NULL OR o.status = $3)
        GROUP BY o.id, s.name, c.name
        ORDER BY o.created_at DESC, o.id DESC"#,
    )
    .bind(shop_id)
    .bind(customer_id)
    .bind(status)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(|r| OrderListItem {
                id: r.id,
                order_number: r.order_number,
                shop_name: r.shop_name,
                customer_name: r.customer_name,
                status: r.status,
                total_amount: r.total_amount,
                advance_paid: r.advance_paid,
                due_amount: r.due_amount,
                delivery_date: r.delivery_date,
                created_at: r.created_at,
                total_items: r.total_items,
            })
            .collect(),
    ))
}

#[derive(sqlx::FromRow)]
struct OrderListRow {
    id: i64,
    order_number: String,
    shop_name: String,
    customer_name: String,
    status: String,
    total_amount: rust_decimal::Decimal,
    advance_paid: rust_decimal::Decimal,
    due_amount: rust_decimal::Decimal,
    delivery_date: Option<chrono::NaiveDate>,
    created_at: chrono::DateTime<chrono::Utc>,
    total_items: i64,
}

pub async fn update_order(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    auth.require(ORDERS_UPDATE)?;

    lifecycle::update_order(&db_pool, id, req).await.map(Json)
}

pub async fn delete_order(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<StatusCode, AppError> {
    auth.require(ORDERS_DELETE)?;

    // Items and payments cascade with the order row
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Order not found"));
    }

    tracing::info!(order_id = id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn recalculate_order(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<OrderResponse>, AppError> {
    auth.require(ORDERS_UPDATE)?;

    lifecycle::recalculate_order(&db_pool, id).await.map(Json)
}
