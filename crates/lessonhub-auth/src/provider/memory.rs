//! In-memory identity provider for development and tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};
use tracing::info;
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::events::SessionEvent;
use lessonhub_core::result::AppResult;
use lessonhub_core::traits::{AuthSession, IdentityProvider};

/// Generic credential-failure message. Unknown account and wrong password
/// are deliberately indistinguishable.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct MemoryAccount {
    id: Uuid,
    email: String,
    password: String,
}

#[derive(Debug, Default)]
struct InnerState {
    accounts: Vec<MemoryAccount>,
    current: Option<AuthSession>,
}

/// In-process identity provider.
///
/// Single-node development and test double for the hosted identity
/// service. Credentials are held in plain memory; nothing here is meant
/// for production use. Emits the same [`SessionEvent`] stream as the
/// HTTP provider.
#[derive(Debug, Clone)]
pub struct MemoryIdentityProvider {
    state: Arc<Mutex<InnerState>>,
    events: broadcast::Sender<SessionEvent>,
}

impl MemoryIdentityProvider {
    /// Create a new empty provider.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(InnerState::default())),
            events,
        }
    }

    fn session_for(account: &MemoryAccount) -> AuthSession {
        AuthSession {
            principal_id: account.id,
            email: account.email.clone(),
            access_token: format!("memory-{}", Uuid::new_v4()),
        }
    }
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn create_account(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let mut state = self.state.lock().await;

        if state
            .accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(email))
        {
            return Err(AppError::conflict("An account with this email already exists"));
        }

        let account = MemoryAccount {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let session = Self::session_for(&account);
        state.accounts.push(account);
        state.current = Some(session.clone());

        let _ = self.events.send(SessionEvent::SignedIn {
            principal_id: session.principal_id,
            email: session.email.clone(),
        });

        Ok(session)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let mut state = self.state.lock().await;

        let account = state
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)
            .cloned()
            .ok_or_else(|| AppError::authentication(INVALID_CREDENTIALS))?;

        let session = Self::session_for(&account);
        state.current = Some(session.clone());

        let _ = self.events.send(SessionEvent::SignedIn {
            principal_id: session.principal_id,
            email: session.email.clone(),
        });

        Ok(session)
    }

    async fn current_session(&self) -> AppResult<Option<AuthSession>> {
        let state = self.state.lock().await;
        Ok(state.current.clone())
    }

    async fn end_session(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(session) = state.current.take() {
            let _ = self.events.send(SessionEvent::SignedOut {
                principal_id: session.principal_id,
            });
        }
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        // Always succeeds, whether or not the account exists.
        info!(email = %email, "Password reset requested");
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let principal_id = state
            .current
            .as_ref()
            .map(|s| s.principal_id)
            .ok_or_else(|| AppError::authentication("No active session"))?;

        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.id == principal_id)
            .ok_or_else(|| AppError::authentication("No active session"))?;
        account.password = new_password.to_string();
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
