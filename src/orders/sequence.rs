// src/orders/sequence.rs
//
// Per-shop order number allocation. The shop row is locked FOR UPDATE inside
// the caller's transaction, so exactly one allocator proceeds per shop at a
// time and the counter bump commits (or rolls back) together with the order
// insert that consumes the number. A crash after commit of an aborted create
// can leave a gap in the sequence; duplicates are impossible.

use sqlx::{Postgres, Transaction};
use crate::error::AppError;

const SEQUENCE_PAD: usize = 6;

/// Reserve the next order number for `shop_id`, e.g. "ABC-000001".
///
/// Waits at most `lock_timeout` for the row lock; on timeout Postgres raises
/// 55P03, which maps to a retryable conflict. No retry happens here.
pub async fn allocate(tx: &mut Transaction<'_, Postgres>, shop_id: i64) -> Result<String, AppError> {
    // Bounded wait for the shop row lock, scoped to this transaction
    sqlx::query("SET LOCAL lock_timeout = '5s'")
        .execute(&mut **tx)
        .await?;

    let row: Option<(String, i64)> = sqlx::query_as(
        "SELECT code, next_order_sequence FROM shops WHERE id = $1 FOR UPDATE",
    )
    .bind(shop_id)
    .fetch_optional(&mut **tx)
    .await?;

    let (code, sequence) = row.ok_or_else(|| AppError::not_found("Shop not found"))?;

    let order_number = format_order_number(code.trim(), sequence);

    sqlx::query("UPDATE shops SET next_order_sequence = $2 WHERE id = $1")
        .bind(shop_id)
        .bind(sequence + 1)
        .execute(&mut **tx)
        .await?;

    Ok(order_number)
}

pub fn format_order_number(code: &str, sequence: i64) -> String {
    format!("{}-{:0pad$}", code, sequence, pad = SEQUENCE_PAD)
}

#[cfg(test)]
mod tests {
    use super::format_order_number;

    #[test]
    fn pads_sequence_to_six_digits() {
        assert_eq!(format_order_number("ABC", 1), "ABC-000001");
        assert_eq!(format_order_number("XYZ", 42), "XYZ-000042");
    }

    #[test]
    fn advanced_counter_yields_the_next_number() {
        // First allocation consumes 1 and leaves the counter at 2
        assert_eq!(format_order_number("ABC", 1), "ABC-000001");
        assert_eq!(format_order_number("ABC", 1 + 1), "ABC-000002");
    }

    #[test]
    fn wide_sequences_are_not_truncated() {
        assert_eq!(format_order_number("ABC", 1_234_567), "ABC-1234567");
    }

    #[test]
    fn different_shops_never_collide() {
        assert_ne!(format_order_number("ABC", 7), format_order_number("XYZ", 7));
    }
}
