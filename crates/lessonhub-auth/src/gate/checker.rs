//! Access gate implementation.

use std::time::Duration;

use tokio::sync::watch;
use tracing::warn;

use super::category::RouteCategory;
use super::decision::AccessDecision;
use crate::session::SessionState;

/// Parameterized route guard.
///
/// Observes the session state machine through a watch channel and
/// classifies the current principal against a requested route category.
/// The same gate serves every category; nothing is duplicated per role.
#[derive(Debug, Clone)]
pub struct AccessGate {
    /// Live view of the session state.
    state: watch::Receiver<SessionState>,
    /// How long [`AccessGate::resolve_access`] waits before failing closed.
    resolve_timeout: Duration,
}

impl AccessGate {
    /// Create a gate over the given session state channel.
    pub fn new(state: watch::Receiver<SessionState>, resolve_timeout: Duration) -> Self {
        Self {
            state,
            resolve_timeout,
        }
    }

    /// Classify the current session state against a route category.
    ///
    /// While resolution is in flight, non-public categories yield
    /// `Pending` — not `Denied` — so callers can render a loading state
    /// instead of prematurely redirecting.
    pub fn can_access(&self, category: RouteCategory) -> AccessDecision {
        decide(&self.state.borrow(), category)
    }

    /// Wait (bounded) for the session state to settle, then classify.
    ///
    /// If the state is still unresolved when the timeout elapses, the
    /// result is `Denied` — fail closed, never open.
    pub async fn resolve_access(&self, category: RouteCategory) -> AccessDecision {
        let mut state = self.state.clone();

        let settled = tokio::time::timeout(self.resolve_timeout, async {
            while !state.borrow().is_settled() {
                if state.changed().await.is_err() {
                    break;
                }
            }
        })
        .await;

        if settled.is_err() {
            warn!(%category, "Session resolution timed out; denying access");
            return AccessDecision::Denied;
        }

        match decide(&state.borrow(), category) {
            AccessDecision::Pending => AccessDecision::Denied,
            decision => decision,
        }
    }

    /// Snapshot the current session state.
    pub fn session_state(&self) -> SessionState {
        self.state.borrow().clone()
    }
}

/// Pure classification of a session state against a route category.
fn decide(state: &SessionState, category: RouteCategory) -> AccessDecision {
    let Some(required_role) = category.required_role() else {
        return AccessDecision::Allowed;
    };

    match state {
        SessionState::Unresolved => AccessDecision::Pending,
        SessionState::Anonymous => AccessDecision::Denied,
        SessionState::Resolved(profile) => {
            if profile.active && profile.role == required_role {
                AccessDecision::Allowed
            } else {
                AccessDecision::Denied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lessonhub_entity::profile::{PlanTier, Profile, Role};
    use uuid::Uuid;

    fn profile(role: Role, active: bool) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            display_name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role,
            grade: None,
            plan: PlanTier::Free,
            active,
            created_at: Utc::now(),
        }
    }

    fn gate(state: SessionState) -> AccessGate {
        let (tx, rx) = watch::channel(state);
        // Keep the sender alive for the lifetime of the test gate.
        std::mem::forget(tx);
        AccessGate::new(rx, Duration::from_millis(50))
    }

    #[test]
    fn test_public_always_allowed() {
        assert!(
            gate(SessionState::Unresolved)
                .can_access(RouteCategory::Public)
                .is_allowed()
        );
        assert!(
            gate(SessionState::Anonymous)
                .can_access(RouteCategory::Public)
                .is_allowed()
        );
    }

    #[test]
    fn test_unresolved_is_pending_not_denied() {
        let gate = gate(SessionState::Unresolved);
        for category in [
            RouteCategory::StudentArea,
            RouteCategory::AssistantArea,
            RouteCategory::AdminArea,
        ] {
            assert_eq!(gate.can_access(category), AccessDecision::Pending);
        }
    }

    #[test]
    fn test_role_mismatch_denied() {
        let gate = gate(SessionState::Resolved(profile(Role::Assistant, true)));
        assert_eq!(
            gate.can_access(RouteCategory::AdminArea),
            AccessDecision::Denied
        );
        assert_eq!(
            gate.can_access(RouteCategory::AssistantArea),
            AccessDecision::Allowed
        );
    }

    #[test]
    fn test_exactly_one_area_reachable() {
        let gate = gate(SessionState::Resolved(profile(Role::Student, true)));
        let decisions = [
            gate.can_access(RouteCategory::StudentArea),
            gate.can_access(RouteCategory::AssistantArea),
            gate.can_access(RouteCategory::AdminArea),
        ];
        assert_eq!(
            decisions
                .iter()
                .filter(|d| d.is_allowed())
                .count(),
            1
        );
        assert_eq!(decisions[0], AccessDecision::Allowed);
    }

    #[test]
    fn test_suspended_profile_denied() {
        let gate = gate(SessionState::Resolved(profile(Role::Student, false)));
        assert_eq!(
            gate.can_access(RouteCategory::StudentArea),
            AccessDecision::Denied
        );
    }

    #[tokio::test]
    async fn test_resolve_access_fails_closed_on_timeout() {
        let (_tx, rx) = watch::channel(SessionState::Unresolved);
        let gate = AccessGate::new(rx, Duration::from_millis(20));
        assert_eq!(
            gate.resolve_access(RouteCategory::StudentArea).await,
            AccessDecision::Denied
        );
    }

    #[tokio::test]
    async fn test_resolve_access_waits_for_settlement() {
        let (tx, rx) = watch::channel(SessionState::Unresolved);
        let gate = AccessGate::new(rx, Duration::from_secs(1));

        let handle = tokio::spawn({
            let gate = gate.clone();
            async move { gate.resolve_access(RouteCategory::StudentArea).await }
        });

        tx.send_replace(SessionState::Resolved(profile(Role::Student, true)));
        assert_eq!(handle.await.unwrap(), AccessDecision::Allowed);
    }
}
