//! Account lifecycle and contact form scenarios.

mod helpers;

use std::sync::Arc;

use helpers::{TestEnv, admin_ctx, ctx_for, grade};
use lessonhub_auth::MemoryIdentityProvider;
use lessonhub_core::error::ErrorKind;
use lessonhub_core::traits::IdentityProvider;
use lessonhub_core::types::pagination::PageRequest;
use lessonhub_database::{PaymentStore as _, ProfileStore as _, SubscriptionStore as _};
use lessonhub_entity::contact::CreateContactMessage;
use lessonhub_entity::profile::{PlanTier, Role};
use lessonhub_service::account::SignUpRequest;

fn signup(email: &str) -> SignUpRequest {
    SignUpRequest {
        email: email.to_string(),
        password: "long-enough-password".to_string(),
        display_name: "Amal".to_string(),
        grade: grade(3),
    }
}

#[tokio::test]
async fn signup_defaults_to_free_student() {
    let env = TestEnv::new().await;
    let identity = Arc::new(MemoryIdentityProvider::new());
    let accounts = env.account_service(Arc::clone(&identity) as Arc<dyn IdentityProvider>);

    let profile = accounts.sign_up(signup("amal@example.com")).await.unwrap();
    assert_eq!(profile.role, Role::Student);
    assert_eq!(profile.plan, PlanTier::Free);
    assert_eq!(profile.grade, Some(grade(3)));
    assert!(profile.active);

    // The mirror and the identity account share the principal id.
    let (session, signed_in) = accounts
        .sign_in("amal@example.com", "long-enough-password")
        .await
        .unwrap();
    assert_eq!(session.principal_id, profile.id);
    assert_eq!(signed_in.id, profile.id);
}

#[tokio::test]
async fn local_validation_runs_before_any_identity_call() {
    let env = TestEnv::new().await;
    let identity = Arc::new(MemoryIdentityProvider::new());
    let accounts = env.account_service(Arc::clone(&identity) as Arc<dyn IdentityProvider>);

    let short_password = SignUpRequest {
        password: "short".to_string(),
        ..signup("amal@example.com")
    };
    let err = accounts.sign_up(short_password).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let bad_email = signup("not-an-email");
    let err = accounts.sign_up(bad_email).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Nothing reached the identity provider: the address is still free.
    accounts.sign_up(signup("amal@example.com")).await.unwrap();
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let env = TestEnv::new().await;
    let identity = Arc::new(MemoryIdentityProvider::new());
    let accounts = env.account_service(Arc::clone(&identity) as Arc<dyn IdentityProvider>);

    accounts.sign_up(signup("amal@example.com")).await.unwrap();
    let err = accounts.sign_up(signup("amal@example.com")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn admin_suspension_and_reinstatement_toggle_the_active_flag() {
    let env = TestEnv::new().await;
    let admins = env.admin_accounts();
    let admin = admin_ctx();

    let student = env.seed_profile(Role::Student, PlanTier::Free, Some(2)).await;

    let suspended = admins.suspend(&admin, student.id).await.unwrap();
    assert!(!suspended.active);

    let reinstated = admins.reinstate(&admin, student.id).await.unwrap();
    assert!(reinstated.active);

    let err = admins.suspend(&admin, admin.principal_id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn manual_plan_change_mirrors_the_approval_side_effect() {
    let env = TestEnv::new().await;
    let admins = env.admin_accounts();
    let admin = admin_ctx();

    let student = env.seed_profile(Role::Student, PlanTier::Free, Some(2)).await;

    let upgraded = admins
        .set_plan(&admin, student.id, PlanTier::Paid)
        .await
        .unwrap();
    assert_eq!(upgraded.plan, PlanTier::Paid);
    let subscription = env
        .subscriptions
        .find_by_profile(student.id)
        .await
        .unwrap()
        .unwrap();
    assert!(subscription.is_paid);
    assert!(subscription.expires_at.is_some());

    let downgraded = admins
        .set_plan(&admin, student.id, PlanTier::Free)
        .await
        .unwrap();
    assert_eq!(downgraded.plan, PlanTier::Free);
    let cleared = env
        .subscriptions
        .find_by_profile(student.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!cleared.is_paid);
    assert!(cleared.expires_at.is_none());
}

#[tokio::test]
async fn account_deletion_cascades_to_owned_records() {
    let env = TestEnv::new().await;
    let admins = env.admin_accounts();
    let payment_service = env.payment_service();
    let admin = admin_ctx();

    let student = env.seed_profile(Role::Student, PlanTier::Free, Some(3)).await;
    payment_service
        .submit(
            &ctx_for(&student),
            lessonhub_service::payment::NewPayment {
                amount: 100,
                method: lessonhub_entity::payment::PaymentMethod::PostalTransfer,
                transaction_ref: None,
                notes: None,
                receipt: None,
            },
        )
        .await
        .unwrap();
    admins
        .set_plan(&admin, student.id, PlanTier::Paid)
        .await
        .unwrap();

    assert!(admins.delete_user(&admin, student.id).await.unwrap());

    assert!(env.profiles.find_by_id(student.id).await.unwrap().is_none());
    assert!(
        env.payments
            .find_by_submitter(student.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        env.subscriptions
            .find_by_profile(student.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn contact_form_validates_then_stores() {
    let env = TestEnv::new().await;
    let contact = env.contact_service();

    let err = contact
        .submit(CreateContactMessage {
            name: "Rami".to_string(),
            email: "not-an-email".to_string(),
            message: "Hello".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    contact
        .submit(CreateContactMessage {
            name: "Rami".to_string(),
            email: "rami@example.com".to_string(),
            message: "When does grade 5 content arrive?".to_string(),
        })
        .await
        .unwrap();

    let inbox = contact
        .list(&admin_ctx(), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(inbox.total_items, 1);
}
