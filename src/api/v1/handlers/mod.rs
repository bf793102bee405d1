pub mod drinks;
pub mod health;
