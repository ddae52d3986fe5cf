//! Session-related domain events.
//!
//! The identity provider wrapper publishes these on its broadcast channel
//! whenever the authentication state changes. The access gate is the
//! single consumer that owns the authoritative session state machine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to the current authentication session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A principal signed in and a session was established.
    SignedIn {
        /// The principal's ID.
        principal_id: Uuid,
        /// The principal's email address.
        email: String,
    },
    /// The current principal signed out (or the session was invalidated).
    SignedOut {
        /// The principal whose session ended.
        principal_id: Uuid,
    },
}
