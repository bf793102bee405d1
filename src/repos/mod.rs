pub mod drinks;
pub mod error;
