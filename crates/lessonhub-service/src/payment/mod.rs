//! Payment submission and review workflow.

pub mod service;

pub use service::{NewPayment, PaymentService};
