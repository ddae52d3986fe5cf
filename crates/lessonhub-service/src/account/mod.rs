//! Account management: self-service and admin operations.

pub mod admin;
pub mod service;

pub use admin::AdminAccountService;
pub use service::{AccountService, SignUpRequest};
