pub mod pharmacy;
pub mod select;
