//! Contact message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    /// Unique message identifier.
    pub id: Uuid,
    /// Sender's name.
    pub name: String,
    /// Sender's email address.
    pub email: String,
    /// Message body.
    pub message: String,
    /// When the message was received.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a contact message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactMessage {
    /// Sender's name.
    pub name: String,
    /// Sender's email address.
    pub email: String,
    /// Message body.
    pub message: String,
}
