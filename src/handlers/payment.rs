use axum::{extract::State, Json, Extension};
use axum::http::StatusCode;
use crate::state::AppState;
use crate::error::AppError;
use crate::auth::permissions::{PAYMENTS_CREATE, PAYMENTS_DELETE};
use crate::dtos::order::OrderResponse;
use crate::dtos::payment::{CreatePaymentRequest, PaymentResponse};
use crate::middleware::auth::AuthContext;
use crate::orders::lifecycle;

pub async fn add_payment(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(order_id): axum::extract::Path<i64>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    auth.require(PAYMENTS_CREATE)?;

    let order = lifecycle::add_payment(&db_pool, order_id, req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_payments(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(order_id): axum::extract::Path<i64>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let _order: (i64,) = sqlx::query_as("SELECT id FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    let rows: Vec<PaymentRow> = sqlx::query_as(
        r#"SELECT p.id, p.order_id, o.order_number, p.method, p.amount,
            p.transaction_id, p.account_number, p.bank_name, p.mobile_number,
            p.paid_at, p.created_at
        FROM payments p
        JOIN orders o ON p.order_id = o.id
        WHERE p.order_id = $1
        ORDER BY p.paid_at, p.id"#,
    )
    .bind(order_id)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(|r| PaymentResponse {
                id: r.id,
                order_id: r.order_id,
                order_number: r.order_number,
                method: r.method,
                amount: r.amount,
                transaction_id: r.transaction_id,
                account_number: r.account_number,
                bank_name: r.bank_name,
                mobile_number: r.mobile_number,
                paid_at: r.paid_at,
                created_at: r.created_at,
            })
            .collect(),
    ))
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    order_id: i64,
    order_number: String,
    method: String,
    amount: rust_decimal::Decimal,
    transaction_id: Option<String>,
    account_number: Option<String>,
    bank_name: Option<String>,
    mobile_number: Option<String>,
    paid_at: chrono::DateTime<chrono::Utc>,
    created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn delete_payment(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<OrderResponse>, AppError> {
    auth.require(PAYMENTS_DELETE)?;

    lifecycle::delete_payment(&db_pool, id).await.map(Json)
}
