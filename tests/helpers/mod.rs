//! Shared builders for the integration tests.
//!
//! Everything runs against the in-memory stores and the local object
//! store in a temp directory, so the suite is deterministic and needs no
//! external services.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use lessonhub_core::config::plan::PlanPolicy;
use lessonhub_core::traits::ObjectStore;
use lessonhub_database::memory::{
    MemoryContactStore, MemoryContentStore, MemoryPaymentStore, MemoryProfileStore,
    MemorySubscriptionStore,
};
use lessonhub_database::{
    ContactStore, ContentStore, PaymentStore, ProfileStore, SubscriptionStore,
};
use lessonhub_entity::content::Grade;
use lessonhub_entity::profile::{CreateProfile, PlanTier, Profile, Role};
use lessonhub_service::catalog::EntitlementResolver;
use lessonhub_service::{
    AccountService, AdminAccountService, CatalogService, ContactService, ModerationService,
    PaymentService, RequestContext,
};
use lessonhub_storage::LocalObjectStore;

/// A full in-memory test environment.
pub struct TestEnv {
    pub profiles: Arc<MemoryProfileStore>,
    pub content: Arc<MemoryContentStore>,
    pub payments: Arc<MemoryPaymentStore>,
    pub subscriptions: Arc<MemorySubscriptionStore>,
    pub contacts: Arc<MemoryContactStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub policy: PlanPolicy,
    _storage_dir: tempfile::TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        let storage_dir = tempfile::tempdir().expect("temp dir");
        let objects: Arc<dyn ObjectStore> = Arc::new(
            LocalObjectStore::new(
                storage_dir.path().to_str().expect("utf-8 temp path"),
                "http://localhost:8080/files",
            )
            .await
            .expect("local object store"),
        );

        Self {
            profiles: Arc::new(MemoryProfileStore::new()),
            content: Arc::new(MemoryContentStore::new()),
            payments: Arc::new(MemoryPaymentStore::new()),
            subscriptions: Arc::new(MemorySubscriptionStore::new()),
            contacts: Arc::new(MemoryContactStore::new()),
            objects,
            policy: PlanPolicy::default(),
            _storage_dir: storage_dir,
        }
    }

    pub fn moderation(&self) -> ModerationService {
        ModerationService::new(
            Arc::clone(&self.content) as Arc<dyn ContentStore>,
            Arc::clone(&self.objects),
        )
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(
            Arc::clone(&self.content) as Arc<dyn ContentStore>,
            Arc::clone(&self.objects),
            EntitlementResolver::new(self.policy.clone()),
        )
    }

    pub fn payment_service(&self) -> PaymentService {
        PaymentService::new(
            Arc::clone(&self.payments) as Arc<dyn PaymentStore>,
            Arc::clone(&self.profiles) as Arc<dyn ProfileStore>,
            Arc::clone(&self.subscriptions) as Arc<dyn SubscriptionStore>,
            Arc::clone(&self.objects),
            self.policy.clone(),
        )
    }

    pub fn admin_accounts(&self) -> AdminAccountService {
        AdminAccountService::new(
            Arc::clone(&self.profiles) as Arc<dyn ProfileStore>,
            Arc::clone(&self.content) as Arc<dyn ContentStore>,
            Arc::clone(&self.payments) as Arc<dyn PaymentStore>,
            Arc::clone(&self.subscriptions) as Arc<dyn SubscriptionStore>,
            self.policy.clone(),
        )
    }

    pub fn contact_service(&self) -> ContactService {
        ContactService::new(Arc::clone(&self.contacts) as Arc<dyn ContactStore>)
    }

    pub fn account_service(&self, identity: Arc<dyn lessonhub_core::traits::IdentityProvider>) -> AccountService {
        AccountService::new(identity, Arc::clone(&self.profiles) as Arc<dyn ProfileStore>)
    }

    /// Create a stored profile and return it.
    pub async fn seed_profile(&self, role: Role, plan: PlanTier, grade: Option<i16>) -> Profile {
        let id = Uuid::new_v4();
        self.profiles
            .create(&CreateProfile {
                id,
                display_name: format!("user-{id}"),
                email: format!("{id}@example.com"),
                role,
                grade: grade.map(|g| Grade::new(g).expect("valid grade")),
                plan,
            })
            .await
            .expect("seed profile")
    }
}

/// A request context for a principal that exists only in the context
/// (no stored profile needed).
pub fn ctx(role: Role, plan: PlanTier, grade: Option<i16>) -> RequestContext {
    RequestContext {
        principal_id: Uuid::new_v4(),
        role,
        plan,
        grade: grade.map(|g| Grade::new(g).expect("valid grade")),
        active: true,
        request_time: Utc::now(),
    }
}

pub fn admin_ctx() -> RequestContext {
    ctx(Role::Admin, PlanTier::Free, None)
}

pub fn assistant_ctx() -> RequestContext {
    ctx(Role::Assistant, PlanTier::Free, None)
}

pub fn student_ctx(plan: PlanTier, grade: i16) -> RequestContext {
    ctx(Role::Student, plan, Some(grade))
}

/// A context acting as the given stored profile.
pub fn ctx_for(profile: &Profile) -> RequestContext {
    RequestContext::from_profile(profile)
}

/// Minimal stand-in PDF bytes.
pub fn pdf() -> Bytes {
    Bytes::from_static(b"%PDF-1.7\n%test document\n")
}

/// A valid grade for tests.
pub fn grade(value: i16) -> Grade {
    Grade::new(value).expect("valid grade")
}
