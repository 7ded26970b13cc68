pub mod shop;
pub mod customer;
pub mod product_type;
pub mod product_size;
pub mod order;
pub mod payment;
pub mod stats;
pub mod user;
