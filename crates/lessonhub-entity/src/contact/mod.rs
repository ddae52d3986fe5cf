//! Contact message entity.

pub mod model;

pub use model::{ContactMessage, CreateContactMessage};
