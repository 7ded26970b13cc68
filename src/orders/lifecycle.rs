// src/orders/lifecycle.rs
//
// Multi-entity order workflows. Every operation runs in a single
// transaction: a failure at any step rolls back everything before it.
// Money fields on the order row are always rewritten from the persisted
// item and payment sets (see recalculate), never adjusted incrementally.

use chrono::{DateTime, Utc, NaiveDate};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::dtos::order::{
    CreateOrderRequest, UpdateOrderRequest, OrderItemRequest, OrderResponse,
    OrderItemResponse, OrderPaymentResponse, OrderSummary,
};
use crate::dtos::payment::CreatePaymentRequest;
use crate::error::AppError;
use crate::models::customer::is_valid_phone;
use crate::models::order::{is_valid_payment_method, is_valid_status, Order, OrderItem, Payment};
use crate::orders::sequence;
use crate::orders::totals::{self, DiscountType};

pub async fn create_order(pool: &PgPool, req: CreateOrderRequest) -> Result<OrderResponse, AppError> {
    if req.items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    let discount_amount = req.discount_amount.unwrap_or(Decimal::ZERO);
    let discount_type = req.discount_type.unwrap_or(DiscountType::Fixed);
    validate_discount(discount_amount, discount_type)?;

    let mut tx = pool.begin().await?;

    // Verify shop exists and is active before taking its row lock
    let shop: Option<(bool,)> = sqlx::query_as("SELECT is_active FROM shops WHERE id = $1")
        .bind(req.shop_id)
        .fetch_optional(&mut *tx)
        .await?;
    match shop {
        None => return Err(AppError::not_found("Shop not found")),
        Some((false,)) => return Err(AppError::validation("Shop is not active")),
        Some((true,)) => {}
    }

    let customer_id = resolve_customer(&mut tx, req.customer_id, req.customer.as_ref()).await?;

    // Reserve the order number under the shop row lock
    let order_number = sequence::allocate(&mut tx, req.shop_id).await?;

    // Insert with zeroed money fields; recalculate fills them in below
    let (order_id,): (i64,) = sqlx::query_as(
        r#"INSERT INTO orders
            (order_number, shop_id, customer_id, status, discount_amount, discount_type, delivery_date, notes)
        VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7)
        RETURNING id"#,
    )
    .bind(&order_number)
    .bind(req.shop_id)
    .bind(customer_id)
    .bind(discount_amount)
    .bind(discount_type.as_str())
    .bind(req.delivery_date)
    .bind(&req.notes)
    .fetch_one(&mut *tx)
    .await?;

    insert_items(&mut tx, order_id, &req.items).await?;
    recalculate(&mut tx, order_id).await?;

    tx.commit().await?;

    tracing::info!(order_id, %order_number, shop_id = req.shop_id, "Order created");

    fetch_order(pool, order_id).await
}

pub async fn update_order(pool: &PgPool, order_id: i64, req: UpdateOrderRequest) -> Result<OrderResponse, AppError> {
    if let Some(status) = &req.status {
        if !is_valid_status(status) {
            return Err(AppError::validation("Status must be one of: pending, delivered, cancelled"));
        }
    }
    if let Some(items) = &req.items {
        if items.is_empty() {
            return Err(AppError::validation("Order must contain at least one item"));
        }
    }

    let mut tx = pool.begin().await?;

    let existing: Option<Order> = sqlx::query_as(
        r#"SELECT id, order_number, shop_id, customer_id, status, total_amount,
            advance_paid, discount_amount, discount_type, due_amount,
            delivery_date, notes, created_at, updated_at
        FROM orders WHERE id = $1 FOR UPDATE"#,
    )
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await?;
    let current = existing.ok_or_else(|| AppError::not_found("Order not found"))?;

    // Validate the discount pair as it will be after the patch
    let effective_amount = req.discount_amount.unwrap_or(current.discount_amount);
    let effective_type = match &req.discount_type {
        Some(t) => *t,
        None => DiscountType::parse(&current.discount_type)
            .ok_or_else(|| AppError::internal("Unknown discount type stored on order"))?,
    };
    validate_discount(effective_amount, effective_type)?;

    sqlx::query(
        r#"UPDATE orders SET
            status = COALESCE($2, status),
            discount_amount = COALESCE($3, discount_amount),
            discount_type = COALESCE($4, discount_type),
            delivery_date = COALESCE($5, delivery_date),
            notes = COALESCE($6, notes),
            updated_at = NOW()
        WHERE id = $1"#,
    )
    .bind(order_id)
    .bind(&req.status)
    .bind(req.discount_amount)
    .bind(req.discount_type.map(|t| t.as_str()))
    .bind(req.delivery_date)
    .bind(&req.notes)
    .execute(&mut *tx)
    .await?;

    // Full item-set replacement: no stale contribution from removed items
    if let Some(items) = &req.items {
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, order_id, items).await?;
    }

    recalculate(&mut tx, order_id).await?;
    tx.commit().await?;

    tracing::info!(order_id, "Order updated");

    fetch_order(pool, order_id).await
}

pub async fn add_payment(pool: &PgPool, order_id: i64, req: CreatePaymentRequest) -> Result<OrderResponse, AppError> {
    if !is_valid_payment_method(&req.method) {
        return Err(AppError::validation("Payment method must be one of: cash, bkash, nagad, bank"));
    }
    if req.amount <= Decimal::ZERO {
        return Err(AppError::validation("Payment amount must be greater than 0"));
    }

    let mut tx = pool.begin().await?;

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM orders WHERE id = $1 FOR UPDATE")
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;
    exists.ok_or_else(|| AppError::not_found("Order not found"))?;

    sqlx::query(
        r#"INSERT INTO payments
            (order_id, method, amount, transaction_id, account_number, bank_name, mobile_number, paid_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()))"#,
    )
    .bind(order_id)
    .bind(&req.method)
    .bind(req.amount)
    .bind(&req.transaction_id)
    .bind(&req.account_number)
    .bind(&req.bank_name)
    .bind(&req.mobile_number)
    .bind(req.paid_at)
    .execute(&mut *tx)
    .await?;

    // Overpayment is allowed: due_amount simply goes negative
    recalculate(&mut tx, order_id).await?;
    tx.commit().await?;

    tracing::info!(order_id, method = %req.method, amount = %req.amount, "Payment recorded");

    fetch_order(pool, order_id).await
}

pub async fn delete_payment(pool: &PgPool, payment_id: i64) -> Result<OrderResponse, AppError> {
    let mut tx = pool.begin().await?;

    let payment: Option<(i64,)> = sqlx::query_as("SELECT order_id FROM payments WHERE id = $1")
        .bind(payment_id)
        .fetch_optional(&mut *tx)
        .await?;
    let (order_id,) = payment.ok_or_else(|| AppError::not_found("Payment not found"))?;

    // Same order-row lock as add_payment, so concurrent payment writes on
    // one order serialize and recalculate always sees the committed set
    let locked: Option<(i64,)> = sqlx::query_as("SELECT id FROM orders WHERE id = $1 FOR UPDATE")
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;
    locked.ok_or_else(|| AppError::not_found("Order not found"))?;

    sqlx::query("DELETE FROM payments WHERE id = $1")
        .bind(payment_id)
        .execute(&mut *tx)
        .await?;

    recalculate(&mut tx, order_id).await?;
    tx.commit().await?;

    tracing::info!(payment_id, order_id, "Payment removed");

    fetch_order(pool, order_id).await
}

/// Recompute and persist the order's money fields. Used as a repair
/// endpoint too; with no intervening writes it rewrites the same values.
pub async fn recalculate_order(pool: &PgPool, order_id: i64) -> Result<OrderResponse, AppError> {
    let mut tx = pool.begin().await?;

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM orders WHERE id = $1 FOR UPDATE")
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;
    exists.ok_or_else(|| AppError::not_found("Order not found"))?;

    recalculate(&mut tx, order_id).await?;
    tx.commit().await?;

    fetch_order(pool, order_id).await
}

/// Rewrite total/advance/due from the persisted items and payments.
/// Always reloads from storage so concurrent mutations cannot leave a
/// stale incremental total behind.
async fn recalculate(tx: &mut Transaction<'_, Postgres>, order_id: i64) -> Result<(), AppError> {
    let items: Vec<OrderItem> = sqlx::query_as(
        r#"SELECT id, order_id, product_type_id, product_size_id, quantity, price, line_total
        FROM order_items WHERE order_id = $1"#,
    )
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await?;
    let line_totals: Vec<Decimal> = items.iter().map(|i| i.line_total).collect();

    let payment_amounts: Vec<Decimal> =
        sqlx::query_scalar("SELECT amount FROM payments WHERE order_id = $1")
            .bind(order_id)
            .fetch_all(&mut **tx)
            .await?;

    let (discount_amount, discount_type_str): (Decimal, String) =
        sqlx::query_as("SELECT discount_amount, discount_type FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_one(&mut **tx)
            .await?;
    let discount_type = DiscountType::parse(&discount_type_str)
        .ok_or_else(|| AppError::internal("Unknown discount type stored on order"))?;

    let snapshot = totals::recompute(&line_totals, &payment_amounts, discount_amount, discount_type);

    sqlx::query(
        "UPDATE orders SET total_amount = $2, advance_paid = $3, due_amount = $4, updated_at = NOW() WHERE id = $1",
    )
    .bind(order_id)
    .bind(snapshot.total_amount)
    .bind(snapshot.advance_paid)
    .bind(snapshot.due_amount)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_items(tx: &mut Transaction<'_, Postgres>, order_id: i64, items: &[OrderItemRequest]) -> Result<(), AppError> {
    for item in items {
        // Server-side line total; client-provided totals are never trusted
        let line_total = totals::line_total(item.price, item.quantity)?;

        let size: Option<(i64, bool, bool)> = sqlx::query_as(
            r#"SELECT ps.product_type_id, ps.is_active, pt.is_active
            FROM product_sizes ps
            JOIN product_types pt ON ps.product_type_id = pt.id
            WHERE ps.id = $1"#,
        )
        .bind(item.product_size_id)
        .fetch_optional(&mut **tx)
        .await?;

        let (type_of_size, size_active, type_active) = size.ok_or_else(|| {
            AppError::not_found(format!("Product size {} not found", item.product_size_id))
        })?;
        if type_of_size != item.product_type_id {
            return Err(AppError::validation(format!(
                "Product size {} does not belong to product type {}",
                item.product_size_id, item.product_type_id
            )));
        }
        if !size_active || !type_active {
            return Err(AppError::validation("Product type or size is not active"));
        }

        sqlx::query(
            r#"INSERT INTO order_items (order_id, product_type_id, product_size_id, quantity, price, line_total)
            VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(order_id)
        .bind(item.product_type_id)
        .bind(item.product_size_id)
        .bind(item.quantity)
        .bind(item.price)
        .bind(line_total)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn resolve_customer(
    tx: &mut Transaction<'_, Postgres>,
    customer_id: Option<i64>,
    payload: Option<&crate::dtos::order::NewCustomerPayload>,
) -> Result<i64, AppError> {
    if let Some(id) = customer_id {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        return found.map(|(id,)| id).ok_or_else(|| AppError::not_found("Customer not found"));
    }

    let payload = payload.ok_or_else(|| {
        AppError::validation("Either customer_id or a customer payload is required")
    })?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Customer name is required"));
    }
    if !is_valid_phone(&payload.phone) {
        return Err(AppError::validation("Phone must be an 11-digit number starting with 01"));
    }

    // Find-or-create by phone
    let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM customers WHERE phone = $1")
        .bind(&payload.phone)
        .fetch_optional(&mut **tx)
        .await?;
    if let Some((id,)) = found {
        return Ok(id);
    }

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO customers (name, phone, address) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(payload.name.trim())
    .bind(&payload.phone)
    .bind(&payload.address)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id)
}

fn validate_discount(amount: Decimal, discount_type: DiscountType) -> Result<(), AppError> {
    if amount < Decimal::ZERO {
        return Err(AppError::validation("Discount amount cannot be negative"));
    }
    if discount_type == DiscountType::Percentage && amount > Decimal::from(100) {
        return Err(AppError::validation("Percentage discount cannot exceed 100"));
    }
    Ok(())
}

#[derive(FromRow)]
struct OrderHeaderRow {
    id: i64,
    order_number: String,
    shop_id: i64,
    shop_name: String,
    customer_id: i64,
    customer_name: String,
    customer_phone: String,
    status: String,
    total_amount: Decimal,
    advance_paid: Decimal,
    discount_amount: Decimal,
    discount_type: String,
    due_amount: Decimal,
    delivery_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct OrderItemRow {
    id: i64,
    product_type_id: i64,
    product_type_name: String,
    product_size_id: i64,
    product_size_name: String,
    quantity: i32,
    price: Decimal,
    line_total: Decimal,
}

// Full order view with items, payments and a derived summary block
pub async fn fetch_order(pool: &PgPool, order_id: i64) -> Result<OrderResponse, AppError> {
    let order: Option<OrderHeaderRow> = sqlx::query_as(
        r#"SELECT
            o.id, o.order_number, o.shop_id, s.name AS shop_name,
            o.customer_id, c.name AS customer_name, c.phone AS customer_phone,
            o.status, o.total_amount, o.advance_paid, o.discount_amount,
            o.discount_type, o.due_amount, o.delivery_date, o.notes,
            o.created_at, o.updated_at
        FROM orders o
        JOIN shops s ON o.shop_id = s.id
        JOIN customers c ON o.customer_id = c.id
        WHERE o.id = $1"#,
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    let order = order.ok_or_else(|| AppError::not_found("Order not found"))?;

    let item_rows: Vec<OrderItemRow> = sqlx::query_as(
        r#"SELECT
            oi.id, oi.product_type_id, pt.name AS product_type_name,
            oi.product_size_id, ps.name AS product_size_name,
            oi.quantity, oi.price, oi.line_total
        FROM order_items oi
        JOIN product_types pt ON oi.product_type_id = pt.id
        JOIN product_sizes ps ON oi.product_size_id = ps.id
        WHERE oi.order_id = $1
        ORDER BY oi.id"#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    let payment_rows: Vec<Payment> = sqlx::query_as(
        r#"SELECT id, order_id, method, amount, transaction_id, account_number, bank_name, mobile_number, paid_at, created_at
        FROM payments
        WHERE order_id = $1
        ORDER BY paid_at, id"#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    let discount_type = DiscountType::parse(&order.discount_type)
        .ok_or_else(|| AppError::internal("Unknown discount type stored on order"))?;

    let mut total_items: i64 = 0;
    let mut subtotal = Decimal::ZERO;
    let items: Vec<OrderItemResponse> = item_rows
        .into_iter()
        .map(|row| {
            total_items += row.quantity as i64;
            subtotal += row.line_total;
            OrderItemResponse {
                id: row.id,
                product_type_id: row.product_type_id,
                product_type_name: row.product_type_name,
                product_size_id: row.product_size_id,
                product_size_name: row.product_size_name,
                quantity: row.quantity,
                price: row.price,
                line_total: row.line_total,
            }
        })
        .collect();

    let payments: Vec<OrderPaymentResponse> = payment_rows
        .into_iter()
        .map(|row| OrderPaymentResponse {
            id: row.id,
            method: row.method,
            amount: row.amount,
            transaction_id: row.transaction_id,
            account_number: row.account_number,
            bank_name: row.bank_name,
            mobile_number: row.mobile_number,
            paid_at: row.paid_at,
        })
        .collect();

    Ok(OrderResponse {
        id: order.id,
        order_number: order.order_number,
        shop_id: order.shop_id,
        shop_name: order.shop_name,
        customer_id: order.customer_id,
        customer_name: order.customer_name,
        customer_phone: order.customer_phone,
        status: order.status,
        total_amount: order.total_amount,
        advance_paid: order.advance_paid,
        discount_amount: order.discount_amount,
        discount_type,
        due_amount: order.due_amount,
        delivery_date: order.delivery_date,
        notes: order.notes,
        created_at: order.created_at,
        updated_at: order.updated_at,
        items,
        payments,
        summary: OrderSummary {
            total_items,
            subtotal,
            discount: subtotal - order.total_amount,
            balance_due: order.due_amount,
        },
    })
}
