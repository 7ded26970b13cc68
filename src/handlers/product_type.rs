use axum::{extract::State, Json, Extension};
use axum::http::StatusCode;
use crate::state::AppState;
use crate::error::AppError;
use crate::auth::permissions::PRODUCTS_MANAGE;
use crate::dtos::product::{CreateProductTypeRequest, UpdateProductTypeRequest, ProductTypeResponse};
use crate::middleware::auth::AuthContext;
use crate::models::product::ProductType;

fn to_response(pt: ProductType) -> ProductTypeResponse {
    ProductTypeResponse {
        id: pt.id,
        name: pt.name,
        is_active: pt.is_active,
        created_at: pt.created_at,
    }
}

pub async fn create_product_type(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProductTypeRequest>,
) -> Result<(StatusCode, Json<ProductTypeResponse>), AppError> {
    auth.require(PRODUCTS_MANAGE)?;

    if req.name.trim().is_empty() {
        return Err(AppError::validation("Product type name is required"));
    }

    let product_type: ProductType = sqlx::query_as(
        r#"INSERT INTO product_types (name, is_active)
        VALUES ($1, $2)
        RETURNING id, name, is_active, created_at"#,
    )
    .bind(req.name.trim())
    .bind(req.is_active.unwrap_or(true))
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("Product type name already exists");
            }
        }
        AppError::db(e)
    })?;

    Ok((StatusCode::CREATED, Json(to_response(product_type))))
}

pub async fn get_product_type(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<ProductTypeResponse>, AppError> {
    let product_type: ProductType = sqlx::query_as(
        "SELECT id, name, is_active, created_at FROM product_types WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product type not found"))?;

    Ok(Json(to_response(product_type)))
}

pub async fn list_product_types(
    State(AppState { db_pool }): State<AppState>,
) -> Result<Json<Vec<ProductTypeResponse>>, AppError> {
    let types: Vec<ProductType> = sqlx::query_as(
        "SELECT id, name, is_active, created_at FROM product_types ORDER BY name ASC",
    )
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(types.into_iter().map(to_response).collect()))
}

pub async fn update_product_type(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<UpdateProductTypeRequest>,
) -> Result<Json<ProductTypeResponse>, AppError> {
    auth.require(PRODUCTS_MANAGE)?;

    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Product type name cannot be empty"));
        }
    }

    let _existing: (i64,) = sqlx::query_as("SELECT id FROM product_types WHERE id = $1")
        .bind(id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Product type not found"))?;

    let product_type: ProductType = sqlx::query_as(
        r#"UPDATE product_types SET
            name = COALESCE($2, name),
            is_active = COALESCE($3, is_active)
        WHERE id = $1
        RETURNING id, name, is_active, created_at"#,
    )
    .bind(id)
    .bind(req.name.as_deref().map(|s| s.trim()))
    .bind(req.is_active)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("Product type name already exists");
            }
        }
        AppError::db(e)
    })?;

    Ok(Json(to_response(product_type)))
}

pub async fn delete_product_type(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<StatusCode, AppError> {
    auth.require(PRODUCTS_MANAGE)?;

    // Referenced by order items, or still has sizes: restrict
    let referenced: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM order_items WHERE product_type_id = $1)",
    )
    .bind(id)
    .fetch_one(&db_pool)
    .await?;
    if referenced {
        return Err(AppError::conflict("Cannot delete product type referenced by order items"));
    }

    let has_sizes: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM product_sizes WHERE product_type_id = $1)",
    )
    .bind(id)
    .fetch_one(&db_pool)
    .await?;
    if has_sizes {
        return Err(AppError::conflict("Cannot delete product type that still has sizes"));
    }

    let result = sqlx::query("DELETE FROM product_types WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product type not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
