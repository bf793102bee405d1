pub mod permission;

pub use permission::requires_auth;
