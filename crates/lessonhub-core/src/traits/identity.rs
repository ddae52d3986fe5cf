//! Identity & session provider trait.
//!
//! Authentication and session management are handled by a hosted identity
//! service; this trait is the full interface the application requires from
//! it. Profile attributes (role, grade, plan) are not modeled by the
//! identity service — they live in the mirrored profile record owned by
//! the content repository.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::events::SessionEvent;
use crate::result::AppResult;

/// An established authentication session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated principal's ID.
    pub principal_id: Uuid,
    /// The principal's email address.
    pub email: String,
    /// Opaque access token for subsequent identity-service calls.
    #[serde(skip_serializing)]
    pub access_token: String,
}

/// Trait for the external identity & session provider.
///
/// Implementations exist for the hosted HTTP identity service and for an
/// in-process provider used in development and tests. Both emit
/// [`SessionEvent`]s on a broadcast channel whenever the session state
/// changes; the access gate owns the single authoritative state machine
/// fed by that stream.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "http", "memory").
    fn provider_type(&self) -> &str;

    /// Create a new account and establish a session for it.
    async fn create_account(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Authenticate with credentials and establish a session.
    ///
    /// Failures must not disclose whether the account exists; implementations
    /// return a single generic authentication error for both unknown
    /// accounts and wrong passwords.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Return the current session, if one is established.
    async fn current_session(&self) -> AppResult<Option<AuthSession>>;

    /// End the current session.
    async fn end_session(&self) -> AppResult<()>;

    /// Request a password-reset email for the given address.
    async fn request_password_reset(&self, email: &str) -> AppResult<()>;

    /// Update the current principal's password. Requires a session.
    async fn update_password(&self, new_password: &str) -> AppResult<()>;

    /// Subscribe to session-change notifications.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
