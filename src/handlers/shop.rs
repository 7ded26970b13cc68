use axum::{extract::State, Json, Extension};
use axum::http::StatusCode;
use crate::state::AppState;
use crate::error::AppError;
use crate::auth::permissions::SHOPS_MANAGE;
use crate::dtos::shop::{CreateShopRequest, UpdateShopRequest, ShopResponse, ShopSummary};
use crate::middleware::auth::AuthContext;
use crate::models::shop::Shop;

fn validate_code(code: &str) -> Result<String, AppError> {
    let code = code.trim().to_uppercase();
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(AppError::validation("Shop code must be exactly 3 letters"));
    }
    Ok(code)
}

fn to_response(shop: Shop) -> ShopResponse {
    ShopResponse {
        id: shop.id,
        name: shop.name,
        code: shop.code.trim().to_string(),
        next_order_sequence: shop.next_order_sequence,
        is_active: shop.is_active,
        created_at: shop.created_at,
    }
}

pub async fn create_shop(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateShopRequest>,
) -> Result<(StatusCode, Json<ShopResponse>), AppError> {
    auth.require(SHOPS_MANAGE)?;

    if req.name.trim().is_empty() {
        return Err(AppError::validation("Shop name is required"));
    }
    let code = validate_code(&req.code)?;

    let shop: Shop = sqlx::query_as(
        r#"INSERT INTO shops (name, code, is_active)
        VALUES ($1, $2, $3)
        RETURNING id, name, code, next_order_sequence, is_active, created_at"#,
    )
    .bind(req.name.trim())
    .bind(&code)
    .bind(req.is_active.unwrap_or(true))
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("Shop name or code already exists");
            }
        }
        AppError::db(e)
    })?;

    Ok((StatusCode::CREATED, Json(to_response(shop))))
}

pub async fn get_shop(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<ShopResponse>, AppError> {
    let shop: Shop = sqlx::query_as(
        r#"SELECT id, name, code, next_order_sequence, is_active, created_at
        FROM shops
        WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Shop not found"))?;

    Ok(Json(to_response(shop)))
}

pub async fn list_shops(
    State(AppState { db_pool }): State<AppState>,
) -> Result<Json<Vec<ShopSummary>>, AppError> {
    let shops: Vec<Shop> = sqlx::query_as(
        r#"SELECT id, name, code, next_order_sequence, is_active, created_at
        FROM shops
        ORDER BY name ASC"#,
    )
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        shops
            .into_iter()
            .map(|s| ShopSummary {
                id: s.id,
                name: s.name,
                code: s.code.trim().to_string(),
                is_active: s.is_active,
            })
            .collect(),
    ))
}

pub async fn update_shop(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<UpdateShopRequest>,
) -> Result<Json<ShopResponse>, AppError> {
    auth.require(SHOPS_MANAGE)?;

    let code = match &req.code {
        Some(c) => Some(validate_code(c)?),
        None => None,
    };
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Shop name cannot be empty"));
        }
    }

    // Check if shop exists
    let _existing: (i64,) = sqlx::query_as("SELECT id FROM shops WHERE id = $1")
        .bind(id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Shop not found"))?;

    let shop: Shop = sqlx::query_as(
        r#"UPDATE shops SET
            name = COALESCE($2, name),
            code = COALESCE($3, code),
            is_active = COALESCE($4, is_active)
        WHERE id = $1
        RETURNING id, name, code, next_order_sequence, is_active, created_at"#,
    )
    .bind(id)
    .bind(req.name.as_deref().map(|s| s.trim()))
    .bind(code)
    .bind(req.is_active)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("Shop name or code already exists");
            }
        }
        AppError::db(e)
    })?;

    Ok(Json(to_response(shop)))
}

pub async fn delete_shop(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<StatusCode, AppError> {
    auth.require(SHOPS_MANAGE)?;

    // Check if shop has orders
    let has_orders: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE shop_id = $1)")
        .bind(id)
        .fetch_one(&db_pool)
        .await?;

    if has_orders {
        return Err(AppError::conflict("Cannot delete shop with existing orders"));
    }

    let result = sqlx::query("DELETE FROM shops WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Shop not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
