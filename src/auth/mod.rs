pub mod jwt;
pub mod permissions;
