//! Exam catalogue: webhook upserts and status refresh.

use chrono::{Duration, Utc};
use sangam_db::models::exam::{CreateExam, ExamFilter};
use sangam_db::repositories::ExamRepo;
use sqlx::PgPool;

fn exam(name: &str, org: &str) -> CreateExam {
    CreateExam {
        exam_name: name.to_string(),
        organization: org.to_string(),
        ..Default::default()
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_matches_case_insensitively(pool: PgPool) {
    let first = ExamRepo::upsert(&pool, &exam("CGL 2026", "SSC"), "Open")
        .await
        .unwrap();
    assert!(first.inserted);

    let again = CreateExam {
        description: Some("Combined Graduate Level".to_string()),
        ..exam("cgl 2026", "ssc")
    };
    let second = ExamRepo::upsert(&pool, &again, "Open").await.unwrap();
    assert!(!second.inserted);
    assert_eq!(second.id, first.id);

    let stored = ExamRepo::find_by_id(&pool, first.id).await.unwrap().unwrap();
    assert_eq!(stored.exam_name, "CGL 2026");
    assert_eq!(stored.level, "Central");
    assert_eq!(stored.description.as_deref(), Some("Combined Graduate Level"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_keeps_known_fields_when_absent(pool: PgPool) {
    let with_site = CreateExam {
        official_website: Some("https://ssc.gov.in".to_string()),
        ..exam("CHSL", "SSC")
    };
    let first = ExamRepo::upsert(&pool, &with_site, "Open").await.unwrap();
    ExamRepo::upsert(&pool, &exam("CHSL", "SSC"), "Open")
        .await
        .unwrap();

    let stored = ExamRepo::find_by_id(&pool, first.id).await.unwrap().unwrap();
    assert_eq!(stored.official_website.as_deref(), Some("https://ssc.gov.in"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_only_touches_changed_rows(pool: PgPool) {
    let today = Utc::now().date_naive();

    let past = CreateExam {
        application_last_date: Some(today - Duration::days(1)),
        ..exam("Past", "UPSC")
    };
    let future = CreateExam {
        application_start_date: Some(today + Duration::days(10)),
        ..exam("Future", "UPSC")
    };
    let current = CreateExam {
        application_start_date: Some(today - Duration::days(3)),
        application_last_date: Some(today + Duration::days(3)),
        ..exam("Current", "UPSC")
    };
    for input in [&past, &future, &current] {
        ExamRepo::create(&pool, input, "Open").await.unwrap();
    }

    let refresh = ExamRepo::refresh_statuses(&pool, today).await.unwrap();
    assert_eq!(refresh.closed_count, 1);
    assert_eq!(refresh.coming_soon_count, 1);
    assert_eq!(refresh.opened_count, 0);

    let again = ExamRepo::refresh_statuses(&pool, today).await.unwrap();
    assert_eq!(again.total(), 0);

    let open = ExamFilter {
        status: Some("Open".to_string()),
        ..Default::default()
    };
    assert_eq!(ExamRepo::count(&pool, &open).await.unwrap(), 1);
}
