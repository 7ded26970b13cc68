// src/dtos/product.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Deserialize)]
pub struct CreateProductTypeRequest {
    pub name: String,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateProductTypeRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct ProductTypeResponse {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateProductSizeRequest {
    pub name: String,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateProductSizeRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct ProductSizeResponse {
    pub id: i64,
    pub product_type_id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
