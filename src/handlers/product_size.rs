use axum::{extract::State, Json, Extension};
use axum::http::StatusCode;
use crate::state::AppState;
use crate::error::AppError;
use crate::auth::permissions::PRODUCTS_MANAGE;
use crate::dtos::product::{CreateProductSizeRequest, UpdateProductSizeRequest, ProductSizeResponse};
use crate::middleware::auth::AuthContext;
use crate::models::product::ProductSize;

fn to_response(ps: ProductSize) -> ProductSizeResponse {
    ProductSizeResponse {
        id: ps.id,
        product_type_id: ps.product_type_id,
        name: ps.name,
        is_active: ps.is_active,
        created_at: ps.created_at,
    }
}

pub async fn create_product_size(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(type_id): axum::extract::Path<i64>,
    Json(req): Json<CreateProductSizeRequest>,
) -> Result<(StatusCode, Json<ProductSizeResponse>), AppError> {
    auth.require(PRODUCTS_MANAGE)?;

    if req.name.trim().is_empty() {
        return Err(AppError::validation("Product size name is required"));
    }

    // Parent type must exist
    let _parent: (i64,) = sqlx::query_as("SELECT id FROM product_types WHERE id = $1")
        .bind(type_id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Product type not found"))?;

    let size: ProductSize = sqlx::query_as(
        r#"INSERT INTO product_sizes (product_type_id, name, is_active)
        VALUES ($1, $2, $3)
        RETURNING id, product_type_id, name, is_active, created_at"#,
    )
    .bind(type_id)
    .bind(req.name.trim())
    .bind(req.is_active.unwrap_or(true))
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("This size already exists for the product type");
            }
        }
        AppError::db(e)
    })?;

    Ok((StatusCode::CREATED, Json(to_response(size))))
}

pub async fn list_product_sizes(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(type_id): axum::extract::Path<i64>,
) -> Result<Json<Vec<ProductSizeResponse>>, AppError> {
    let _parent: (i64,) = sqlx::query_as("SELECT id FROM product_types WHERE id = $1")
        .bind(type_id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Product type not found"))?;

    let sizes: Vec<ProductSize> = sqlx::query_as(
        r#"SELECT id, product_type_id, name, is_active, created_at
        FROM product_sizes
        WHERE product_type_id = $1
        ORDER BY name ASC"#,
    )
    .bind(type_id)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(sizes.into_iter().map(to_response).collect()))
}

pub async fn update_product_size(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<UpdateProductSizeRequest>,
) -> Result<Json<ProductSizeResponse>, AppError> {
    auth.require(PRODUCTS_MANAGE)?;

    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Product size name cannot be empty"));
        }
    }

    let _existing: (i64,) = sqlx::query_as("SELECT id FROM product_sizes WHERE id = $1")
        .bind(id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Product size not found"))?;

    let size: ProductSize = sqlx::query_as(
        r#"UPDATE product_sizes SET
            name = COALESCE($2, name),
            is_active = COALESCE($3, is_active)
        WHERE id = $1
        RETURNING id, product_type_id, name, is_active, created_at"#,
    )
    .bind(id)
    .bind(req.name.as_deref().map(|s| s.trim()))
    .bind(req.is_active)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("This size already exists for the product type");
            }
        }
        AppError::db(e)
    })?;

    Ok(Json(to_response(size)))
}

pub async fn delete_product_size(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<StatusCode, AppError> {
    auth.require(PRODUCTS_MANAGE)?;

    let referenced: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM order_items WHERE product_size_id = $1)",
    )
    .bind(id)
    .fetch_one(&db_pool)
    .await?;
    if referenced {
        return Err(AppError::conflict("Cannot delete product size referenced by order items"));
    }

    let result = sqlx::query("DELETE FROM product_sizes WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product size not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
