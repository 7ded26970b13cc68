pub mod totals;
pub mod sequence;
pub mod lifecycle;
