pub mod shop;
pub mod customer;
pub mod product;
pub mod order;
pub mod payment;
pub mod stats;
pub mod user;
