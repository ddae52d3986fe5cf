//! Access gate scenarios over the live session tracker.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::TestEnv;
use lessonhub_auth::{AccessDecision, MemoryIdentityProvider, RouteCategory, SessionTracker};
use lessonhub_core::traits::IdentityProvider;
use lessonhub_database::ProfileStore;
use lessonhub_entity::content::Grade;
use lessonhub_entity::profile::{CreateProfile, PlanTier, Role};

const RESOLVE_TIMEOUT: Duration = Duration::from_secs(1);

async fn wait_for(gate: &lessonhub_auth::AccessGate, category: RouteCategory, expected: AccessDecision) {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if gate.can_access(category) == expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| {
        panic!(
            "gate never reached {expected} for {category}, still {}",
            gate.can_access(category)
        )
    });
}

#[tokio::test]
async fn unresolved_session_yields_pending_not_denied() {
    let env = TestEnv::new().await;
    let identity = Arc::new(MemoryIdentityProvider::new());
    let tracker = Arc::new(SessionTracker::new(
        identity,
        Arc::clone(&env.profiles) as Arc<dyn ProfileStore>,
    ));

    // Tracker not started: resolution is still in flight.
    let gate = tracker.gate(RESOLVE_TIMEOUT);
    for category in [
        RouteCategory::StudentArea,
        RouteCategory::AssistantArea,
        RouteCategory::AdminArea,
    ] {
        let decision = gate.can_access(category);
        assert_eq!(decision, AccessDecision::Pending);
        assert!(!decision.is_denied());
    }
    assert_eq!(gate.can_access(RouteCategory::Public), AccessDecision::Allowed);
}

#[tokio::test]
async fn assistant_is_denied_the_admin_area() {
    let env = TestEnv::new().await;
    let identity = Arc::new(MemoryIdentityProvider::new());
    let tracker = Arc::new(SessionTracker::new(
        Arc::clone(&identity) as Arc<dyn IdentityProvider>,
        Arc::clone(&env.profiles) as Arc<dyn ProfileStore>,
    ));
    let gate = tracker.gate(RESOLVE_TIMEOUT);
    let _handle = Arc::clone(&tracker).start();

    let session = identity
        .create_account("assistant@example.com", "secret-password")
        .await
        .unwrap();
    env.profiles
        .create(&CreateProfile {
            id: session.principal_id,
            display_name: "Assistant".to_string(),
            email: "assistant@example.com".to_string(),
            role: Role::Assistant,
            grade: None,
            plan: PlanTier::Free,
        })
        .await
        .unwrap();
    identity
        .authenticate("assistant@example.com", "secret-password")
        .await
        .unwrap();

    wait_for(&gate, RouteCategory::AssistantArea, AccessDecision::Allowed).await;
    assert_eq!(gate.can_access(RouteCategory::AdminArea), AccessDecision::Denied);
    assert_eq!(gate.can_access(RouteCategory::StudentArea), AccessDecision::Denied);
}

#[tokio::test]
async fn sign_out_closes_every_protected_area() {
    let env = TestEnv::new().await;
    let identity = Arc::new(MemoryIdentityProvider::new());
    let tracker = Arc::new(SessionTracker::new(
        Arc::clone(&identity) as Arc<dyn IdentityProvider>,
        Arc::clone(&env.profiles) as Arc<dyn ProfileStore>,
    ));
    let gate = tracker.gate(RESOLVE_TIMEOUT);
    let _handle = Arc::clone(&tracker).start();

    let session = identity
        .create_account("student@example.com", "secret-password")
        .await
        .unwrap();
    env.profiles
        .create(&CreateProfile {
            id: session.principal_id,
            display_name: "Student".to_string(),
            email: "student@example.com".to_string(),
            role: Role::Student,
            grade: Some(Grade::new(3).unwrap()),
            plan: PlanTier::Free,
        })
        .await
        .unwrap();
    identity
        .authenticate("student@example.com", "secret-password")
        .await
        .unwrap();
    wait_for(&gate, RouteCategory::StudentArea, AccessDecision::Allowed).await;

    identity.end_session().await.unwrap();
    wait_for(&gate, RouteCategory::StudentArea, AccessDecision::Denied).await;
    assert_eq!(gate.can_access(RouteCategory::Public), AccessDecision::Allowed);
}

#[tokio::test]
async fn resolve_access_fails_closed_when_resolution_never_settles() {
    let env = TestEnv::new().await;
    let identity = Arc::new(MemoryIdentityProvider::new());
    let tracker = Arc::new(SessionTracker::new(
        identity,
        Arc::clone(&env.profiles) as Arc<dyn ProfileStore>,
    ));

    // Never started: the bounded wait elapses and the gate fails closed.
    let gate = tracker.gate(Duration::from_millis(50));
    assert_eq!(
        gate.resolve_access(RouteCategory::AdminArea).await,
        AccessDecision::Denied
    );
}
