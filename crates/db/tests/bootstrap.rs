use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    sangam_db::health_check(&pool).await.unwrap();

    let tables = [
        "profiles",
        "sessions",
        "site_settings",
        "books",
        "library_patrons",
        "book_issues",
        "book_donations",
        "campaigns",
        "donations",
        "transactions",
        "events",
        "event_registrations",
        "volunteer_applications",
        "exams",
        "saved_exams",
        "crawler_runs",
        "students",
        "community_members",
        "community_posts",
        "community_dm",
        "notifications",
        "activity_logs",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The updated_at trigger bumps the column on UPDATE.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger(pool: PgPool) {
    let (id, created): (i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
        "INSERT INTO site_settings (key, value) VALUES ('site_name', '\"Sangam\"')
         RETURNING id, updated_at",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let (updated,): (chrono::DateTime<chrono::Utc>,) = sqlx::query_as(
        "UPDATE site_settings SET value = '\"Sangam Trust\"' WHERE id = $1 RETURNING updated_at",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert!(updated >= created);
}
