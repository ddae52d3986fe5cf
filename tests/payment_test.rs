//! Payment review scenarios, including the plan upgrade side effect.

mod helpers;

use bytes::Bytes;
use chrono::Duration;
use helpers::{TestEnv, admin_ctx, ctx_for};
use lessonhub_core::error::ErrorKind;
use lessonhub_core::traits::ObjectStore as _;
use lessonhub_database::{ProfileStore as _, SubscriptionStore as _};
use lessonhub_entity::payment::{PaymentMethod, PaymentStatus};
use lessonhub_entity::profile::{PlanTier, Role};
use lessonhub_service::payment::NewPayment;

fn postal_payment() -> NewPayment {
    NewPayment {
        amount: 100,
        method: PaymentMethod::PostalTransfer,
        transaction_ref: Some("PT-2291".to_string()),
        notes: None,
        receipt: None,
    }
}

#[tokio::test]
async fn approval_upgrades_plan_with_exact_window() {
    let env = TestEnv::new().await;
    let service = env.payment_service();

    let student = env.seed_profile(Role::Student, PlanTier::Free, Some(3)).await;
    let submitted = service
        .submit(&ctx_for(&student), postal_payment())
        .await
        .unwrap();
    assert_eq!(submitted.status, PaymentStatus::Pending);

    let approved = service.approve(&admin_ctx(), submitted.id).await.unwrap();
    assert_eq!(approved.status, PaymentStatus::Approved);
    let reviewed_at = approved.reviewed_at.unwrap();

    // Exactly thirty days from the review time, not "about a month".
    let subscription = env
        .subscriptions
        .find_by_profile(student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        subscription.expires_at.unwrap(),
        reviewed_at + Duration::days(30)
    );
    assert!(subscription.is_paid);

    let profile = env.profiles.find_by_id(student.id).await.unwrap().unwrap();
    assert_eq!(profile.plan, PlanTier::Paid);
}

#[tokio::test]
async fn reapproval_is_a_noop_without_duplicate_side_effects() {
    let env = TestEnv::new().await;
    let service = env.payment_service();

    let student = env.seed_profile(Role::Student, PlanTier::Free, Some(3)).await;
    let submitted = service
        .submit(&ctx_for(&student), postal_payment())
        .await
        .unwrap();

    service.approve(&admin_ctx(), submitted.id).await.unwrap();
    let first_window = env
        .subscriptions
        .find_by_profile(student.id)
        .await
        .unwrap()
        .unwrap();

    service.approve(&admin_ctx(), submitted.id).await.unwrap();
    let second_window = env
        .subscriptions
        .find_by_profile(student.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first_window.expires_at, second_window.expires_at);
    assert_eq!(first_window.updated_at, second_window.updated_at);
}

#[tokio::test]
async fn bank_transfer_requires_a_receipt() {
    let env = TestEnv::new().await;
    let service = env.payment_service();
    let student = env.seed_profile(Role::Student, PlanTier::Free, Some(3)).await;
    let student_ctx = ctx_for(&student);

    let err = service
        .submit(
            &student_ctx,
            NewPayment {
                method: PaymentMethod::BankTransfer,
                ..postal_payment()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(service.my_submissions(&student_ctx).await.unwrap().is_empty());

    let submitted = service
        .submit(
            &student_ctx,
            NewPayment {
                method: PaymentMethod::BankTransfer,
                receipt: Some(Bytes::from_static(b"\x89PNG receipt")),
                ..postal_payment()
            },
        )
        .await
        .unwrap();
    let receipt_path = submitted.receipt_path.unwrap();
    assert!(env.objects.exists(&receipt_path).await.unwrap());
}

#[tokio::test]
async fn revision_request_requires_feedback_and_permits_resubmission() {
    let env = TestEnv::new().await;
    let service = env.payment_service();

    let student = env.seed_profile(Role::Student, PlanTier::Free, Some(3)).await;
    let student_ctx = ctx_for(&student);
    let submitted = service.submit(&student_ctx, postal_payment()).await.unwrap();

    let err = service
        .request_revision(&admin_ctx(), submitted.id, "")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let returned = service
        .request_revision(&admin_ctx(), submitted.id, "The reference does not match")
        .await
        .unwrap();
    assert_eq!(returned.status, PaymentStatus::NeedsRevision);
    assert_eq!(
        returned.admin_feedback.as_deref(),
        Some("The reference does not match")
    );

    let resubmitted = service
        .resubmit(
            &student_ctx,
            submitted.id,
            NewPayment {
                transaction_ref: Some("PT-2292".to_string()),
                ..postal_payment()
            },
        )
        .await
        .unwrap();
    assert_eq!(resubmitted.id, submitted.id);
    assert_eq!(resubmitted.status, PaymentStatus::Pending);
    assert!(resubmitted.admin_feedback.is_none());
    assert!(resubmitted.reviewed_at.is_none());

    service.approve(&admin_ctx(), submitted.id).await.unwrap();
    let profile = env.profiles.find_by_id(student.id).await.unwrap().unwrap();
    assert_eq!(profile.plan, PlanTier::Paid);
}

#[tokio::test]
async fn decided_payments_cannot_be_redecided() {
    let env = TestEnv::new().await;
    let service = env.payment_service();

    let student = env.seed_profile(Role::Student, PlanTier::Free, Some(3)).await;
    let submitted = service
        .submit(&ctx_for(&student), postal_payment())
        .await
        .unwrap();

    service.reject(&admin_ctx(), submitted.id).await.unwrap();

    let err = service.approve(&admin_ctx(), submitted.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // The rejection stands and no upgrade happened.
    let profile = env.profiles.find_by_id(student.id).await.unwrap().unwrap();
    assert_eq!(profile.plan, PlanTier::Free);
    assert!(
        env.subscriptions
            .find_by_profile(student.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn only_the_submitter_may_resubmit() {
    let env = TestEnv::new().await;
    let service = env.payment_service();

    let student = env.seed_profile(Role::Student, PlanTier::Free, Some(3)).await;
    let other = env.seed_profile(Role::Student, PlanTier::Free, Some(4)).await;
    let submitted = service
        .submit(&ctx_for(&student), postal_payment())
        .await
        .unwrap();
    service
        .request_revision(&admin_ctx(), submitted.id, "Wrong amount")
        .await
        .unwrap();

    let err = service
        .resubmit(&ctx_for(&other), submitted.id, postal_payment())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}
