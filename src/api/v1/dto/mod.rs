pub mod drinks;
