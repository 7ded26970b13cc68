use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// 11-digit Bangladeshi mobile number, e.g. 01712345678
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 11 && phone.starts_with("01") && phone.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::is_valid_phone;

    #[test]
    fn accepts_well_formed_numbers() {
        assert!(is_valid_phone("01712345678"));
        assert!(is_valid_phone("01998765432"));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(!is_valid_phone("1712345678"));     // 10 digits
        assert!(!is_valid_phone("017123456789"));   // 12 digits
        assert!(!is_valid_phone("02712345678"));    // wrong prefix
        assert!(!is_valid_phone("0171234567a"));    // non-digit
        assert!(!is_valid_phone(""));
    }
}
