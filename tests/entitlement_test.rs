//! Plan entitlement scenarios.

mod helpers;

use helpers::{TestEnv, admin_ctx, assistant_ctx, grade, pdf, student_ctx};
use lessonhub_core::error::ErrorKind;
use lessonhub_entity::content::{ContentQuery, Section};
use lessonhub_entity::profile::PlanTier;
use lessonhub_service::moderation::NewSubmission;

async fn seed_approved(env: &TestEnv, count: usize, section: Section, grade_level: i16) {
    let moderation = env.moderation();
    let admin = admin_ctx();
    for i in 0..count {
        moderation
            .create_approved(
                &admin,
                NewSubmission {
                    title: format!("{section} #{i:02}"),
                    section,
                    grade: grade(grade_level),
                    pdf: pdf(),
                },
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn free_tier_sees_ten_paid_sees_all() {
    let env = TestEnv::new().await;
    seed_approved(&env, 15, Section::Lessons, 3).await;
    let catalog = env.catalog();
    let query = ContentQuery::section(Section::Lessons, Some(grade(3)));

    let free = catalog
        .browse(&student_ctx(PlanTier::Free, 3), query)
        .await
        .unwrap();
    assert_eq!(free.entries.len(), 10);
    assert_eq!(free.eligible_total, 15);
    assert!(free.capped);

    let paid = catalog
        .browse(&student_ctx(PlanTier::Paid, 3), query)
        .await
        .unwrap();
    assert_eq!(paid.entries.len(), 15);
    assert!(!paid.capped);
}

#[tokio::test]
async fn free_tier_cap_keeps_oldest_items() {
    let env = TestEnv::new().await;
    seed_approved(&env, 15, Section::Lessons, 3).await;
    let catalog = env.catalog();

    let page = catalog
        .browse(
            &student_ctx(PlanTier::Free, 3),
            ContentQuery::section(Section::Lessons, Some(grade(3))),
        )
        .await
        .unwrap();

    // Truncation of the creation-ordered set is deterministic.
    let titles: Vec<&str> = page.entries.iter().map(|e| e.title.as_str()).collect();
    let expected: Vec<String> = (0..10).map(|i| format!("lessons #{i:02}")).collect();
    assert_eq!(titles, expected);
}

#[tokio::test]
async fn all_sections_query_caps_at_thirty() {
    let env = TestEnv::new().await;
    for section in Section::ALL {
        seed_approved(&env, 12, section, 3).await;
    }
    let catalog = env.catalog();
    let query = ContentQuery::all_sections(Some(grade(3)));

    let free = catalog
        .browse(&student_ctx(PlanTier::Free, 3), query)
        .await
        .unwrap();
    assert_eq!(free.entries.len(), 30);
    assert_eq!(free.eligible_total, 36);

    let paid = catalog
        .browse(&student_ctx(PlanTier::Paid, 3), query)
        .await
        .unwrap();
    assert_eq!(paid.entries.len(), 36);
}

#[tokio::test]
async fn unapproved_items_are_invisible_to_every_plan() {
    let env = TestEnv::new().await;
    let moderation = env.moderation();
    let catalog = env.catalog();

    let approved = moderation
        .create_approved(
            &admin_ctx(),
            NewSubmission {
                title: "Published".to_string(),
                section: Section::Lessons,
                grade: grade(3),
                pdf: pdf(),
            },
        )
        .await
        .unwrap();
    let pending = moderation
        .submit(
            &assistant_ctx(),
            NewSubmission {
                title: "Awaiting review".to_string(),
                section: Section::Lessons,
                grade: grade(3),
                pdf: pdf(),
            },
        )
        .await
        .unwrap();

    let query = ContentQuery::section(Section::Lessons, Some(grade(3)));
    for plan in [PlanTier::Free, PlanTier::Paid] {
        let page = catalog.browse(&student_ctx(plan, 3), query).await.unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].id, approved.id);
        assert!(page.entries.iter().all(|e| e.id != pending.id));
    }
}

#[tokio::test]
async fn grade_filter_bounds_eligibility() {
    let env = TestEnv::new().await;
    seed_approved(&env, 3, Section::Exercises, 2).await;
    seed_approved(&env, 4, Section::Exercises, 5).await;
    let catalog = env.catalog();

    let page = catalog
        .browse(
            &student_ctx(PlanTier::Paid, 2),
            ContentQuery::section(Section::Exercises, Some(grade(2))),
        )
        .await
        .unwrap();
    assert_eq!(page.entries.len(), 3);
}

#[tokio::test]
async fn non_student_principals_are_denied() {
    let env = TestEnv::new().await;
    let catalog = env.catalog();
    let query = ContentQuery::all_sections(None);

    let err = catalog.browse(&assistant_ctx(), query).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let err = catalog.browse(&admin_ctx(), query).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn download_url_only_resolves_approved_items() {
    let env = TestEnv::new().await;
    let moderation = env.moderation();
    let catalog = env.catalog();

    let pending = moderation
        .submit(
            &assistant_ctx(),
            NewSubmission {
                title: "Awaiting review".to_string(),
                section: Section::Summaries,
                grade: grade(4),
                pdf: pdf(),
            },
        )
        .await
        .unwrap();

    let student = student_ctx(PlanTier::Free, 4);
    let err = catalog.download_url(&student, pending.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let approved = moderation.approve(&admin_ctx(), pending.id).await.unwrap();
    let url = catalog.download_url(&student, approved.id).await.unwrap();
    assert!(url.starts_with("http://localhost:8080/files/content/grade-4/"));
}
