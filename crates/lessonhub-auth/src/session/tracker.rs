//! Session tracker: owns the session state machine.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use lessonhub_core::events::SessionEvent;
use lessonhub_core::traits::IdentityProvider;
use lessonhub_database::ProfileStore;

use crate::gate::AccessGate;

use super::state::SessionState;

/// Owns the single authoritative session state.
///
/// Consumes the identity provider's session-change event stream, resolves
/// the mirrored profile for each sign-in, and publishes the resulting
/// state on a watch channel that gates observe. There is no ambient
/// current-user singleton; this is the one place session state lives.
#[derive(Debug)]
pub struct SessionTracker {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    tx: watch::Sender<SessionState>,
}

impl SessionTracker {
    /// Create a tracker in the `Unresolved` state.
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::Unresolved);
        Self {
            identity,
            profiles,
            tx,
        }
    }

    /// Subscribe to session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Build an access gate observing this tracker.
    pub fn gate(&self, resolve_timeout: Duration) -> AccessGate {
        AccessGate::new(self.tx.subscribe(), resolve_timeout)
    }

    /// Resolve the current session once, then follow the event stream.
    ///
    /// The returned handle runs until the identity provider drops its
    /// event channel.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let mut events = self.identity.subscribe();

        tokio::spawn(async move {
            self.resolve_initial().await;

            loop {
                match events.recv().await {
                    Ok(SessionEvent::SignedIn { principal_id, .. }) => {
                        self.resolve_principal(principal_id).await;
                    }
                    Ok(SessionEvent::SignedOut { .. }) => {
                        self.tx.send_replace(SessionState::Anonymous);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Missed events; re-derive the state from scratch.
                        warn!(skipped, "Session event stream lagged; re-resolving");
                        self.resolve_initial().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("Session event stream closed; tracker stopping");
                        break;
                    }
                }
            }
        })
    }

    /// Resolve state from the provider's current session, if any.
    async fn resolve_initial(&self) {
        match self.identity.current_session().await {
            Ok(Some(session)) => self.resolve_principal(session.principal_id).await,
            Ok(None) => {
                self.tx.send_replace(SessionState::Anonymous);
            }
            Err(e) => {
                // Fail closed: an unreachable identity service never
                // yields an authenticated state.
                warn!(error = %e, "Failed to read current session");
                self.tx.send_replace(SessionState::Anonymous);
            }
        }
    }

    /// Fetch the mirrored profile and publish the resolved state.
    async fn resolve_principal(&self, principal_id: Uuid) {
        match self.profiles.find_by_id(principal_id).await {
            Ok(Some(profile)) => {
                info!(principal_id = %principal_id, role = %profile.role, "Session resolved");
                self.tx.send_replace(SessionState::Resolved(profile));
            }
            Ok(None) => {
                warn!(principal_id = %principal_id, "No profile for signed-in principal");
                self.tx.send_replace(SessionState::Anonymous);
            }
            Err(e) => {
                warn!(principal_id = %principal_id, error = %e, "Profile fetch failed");
                self.tx.send_replace(SessionState::Anonymous);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryIdentityProvider;
    use lessonhub_database::memory::MemoryProfileStore;
    use lessonhub_entity::profile::{CreateProfile, PlanTier, Role};

    async fn wait_settled(rx: &mut watch::Receiver<SessionState>) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !rx.borrow().is_settled() {
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_sign_in_resolves_profile() {
        let identity = Arc::new(MemoryIdentityProvider::new());
        let profiles = Arc::new(MemoryProfileStore::new());

        let tracker = Arc::new(SessionTracker::new(
            identity.clone(),
            profiles.clone(),
        ));
        let mut rx = tracker.subscribe();
        let _handle = tracker.start();
        wait_settled(&mut rx).await;
        assert!(rx.borrow().profile().is_none());

        let session = identity
            .create_account("amal@example.com", "secret-password")
            .await
            .unwrap();
        profiles
            .create(&CreateProfile {
                id: session.principal_id,
                display_name: "Amal".to_string(),
                email: "amal@example.com".to_string(),
                role: Role::Student,
                grade: None,
                plan: PlanTier::Free,
            })
            .await
            .unwrap();

        identity
            .authenticate("amal@example.com", "secret-password")
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if rx.borrow().profile().is_some() {
                    break;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap();

        let state = rx.borrow().clone();
        assert_eq!(state.profile().unwrap().role, Role::Student);
    }

    #[tokio::test]
    async fn test_sign_out_goes_anonymous() {
        let identity = Arc::new(MemoryIdentityProvider::new());
        let profiles = Arc::new(MemoryProfileStore::new());

        let tracker = Arc::new(SessionTracker::new(
            identity.clone(),
            profiles.clone(),
        ));
        let mut rx = tracker.subscribe();
        let _handle = tracker.start();
        wait_settled(&mut rx).await;

        identity
            .create_account("sami@example.com", "secret-password")
            .await
            .unwrap();
        identity.end_session().await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if matches!(*rx.borrow(), SessionState::Anonymous) {
                    break;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap();
    }
}
