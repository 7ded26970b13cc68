use axum::{extract::State, Json, Extension};
use axum::http::StatusCode;
use crate::state::AppState;
use crate::error::AppError;
use crate::auth::permissions::CUSTOMERS_MANAGE;
use crate::dtos::customer::{CreateCustomerRequest, UpdateCustomerRequest, CustomerResponse, CustomerSummary};
use crate::middleware::auth::AuthContext;
use crate::models::customer::{Customer, is_valid_phone};

fn to_response(c: Customer) -> CustomerResponse {
    CustomerResponse {
        id: c.id,
        name: c.name,
        phone: c.phone,
        address: c.address,
        created_at: c.created_at,
    }
}

pub async fn create_customer(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    auth.require(CUSTOMERS_MANAGE)?;

    if req.name.trim().is_empty() {
        return Err(AppError::validation("Customer name is required"));
    }
    if !is_valid_phone(&req.phone) {
        return Err(AppError::validation("Phone must be an 11-digit number starting with 01"));
    }

    let customer: Customer = sqlx::query_as(
        r#"INSERT INTO customers (name, phone, address)
        VALUES ($1, $2, $3)
        RETURNING id, name, phone, address, created_at"#,
    )
    .bind(req.name.trim())
    .bind(&req.phone)
    .bind(&req.address)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("A customer with this phone already exists");
            }
        }
        AppError::db(e)
    })?;

    Ok((StatusCode::CREATED, Json(to_response(customer))))
}

pub async fn get_customer(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer: Customer = sqlx::query_as(
        "SELECT id, name, phone, address, created_at FROM customers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Customer not found"))?;

    Ok(Json(to_response(customer)))
}

pub async fn list_customers(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
) -> Result<Json<Vec<CustomerSummary>>, AppError> {
    // Optional substring search over name and phone
    let search = params.get("search").map(|s| format!("%{}%", s.trim()));

    let rows: Vec<(i64, String, String, i64)> = sqlx::query_as(
        r#"SELECT c.id, c.name, c.phone, COUNT(o.id) AS total_orders
        FROM customers c
        LEFT JOIN orders o ON o.customer_id = c.id
        WHERE ($1::TEXT IS NULL OR c.name ILIKE $1 OR c.phone LIKE $1)
        GROUP BY c.id, c.name, c.phone
        ORDER BY c.name ASC"#,
    )
    .bind(search)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(|(id, name, phone, total_orders)| CustomerSummary { id, name, phone, total_orders })
            .collect(),
    ))
}

pub async fn update_customer(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    auth.require(CUSTOMERS_MANAGE)?;

    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Customer name cannot be empty"));
        }
    }
    if let Some(phone) = &req.phone {
        if !is_valid_phone(phone) {
            return Err(AppError::validation("Phone must be an 11-digit number starting with 01"));
        }
    }

    let _existing: (i64,) = sqlx::query_as("SELECT id FROM customers WHERE id = $1")
        .bind(id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    let customer: Customer = sqlx::query_as(
        r#"UPDATE customers SET
            name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            address = COALESCE($4, address)
        WHERE id = $1
        RETURNING id, name, phone, address, created_at"#,
    )
    .bind(id)
    .bind(req.name.as_deref().map(|s| s.trim()))
    .bind(&req.phone)
    .bind(&req.address)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("A customer with this phone already exists");
            }
        }
        AppError::db(e)
    })?;

    Ok(Json(to_response(customer)))
}

pub async fn delete_customer(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<StatusCode, AppError> {
    auth.require(CUSTOMERS_MANAGE)?;

    // Customers with orders are restrict-deleted
    let has_orders: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE customer_id = $1)")
        .bind(id)
        .fetch_one(&db_pool)
        .await?;

    if has_orders {
        return Err(AppError::conflict("Cannot delete customer with existing orders"));
    }

    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Customer not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
