//! Integration tests for the storage layer against a live Postgres.
//!
//! Tests all repository operations using the production SQL to ensure
//! correctness of queries and data integrity: the insert/find round-trip,
//! update and delete of existing rows, the duplicate-title constraint,
//! bulk replacement, and the value-filter pagination over real media rows.
//!
//! Requires `DATABASE_URL`; every test skips cleanly when it is not set so
//! the suite passes in environments without a database. Tests share the
//! `gpts_data` and `media` tables and therefore run serialized.

use std::{
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use gptdex_core::{
    storage::{media, profiles, Storage},
    CoreError, GptProfile, ProfilePatch,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

static DB_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// Connects to the database named by `DATABASE_URL`, or `None` to skip.
async fn connect() -> Option<(Storage, sqlx::PgPool)> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: DATABASE_URL not set");
            return None;
        },
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to test database");

    let storage = Storage::new(pool.clone());
    storage.profiles.ensure_schema().await.expect("failed to create profile table");

    Some((storage, pool))
}

/// Title unique to one test invocation, so runs never collide.
fn unique_title(stem: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    format!("{stem} {nanos}")
}

fn sample_profile(title: &str) -> GptProfile {
    GptProfile {
        title: title.to_string(),
        profile_picture: Some("https://example.com/avatar.png".to_string()),
        welcome_message: Some("Hello!".to_string()),
        description: Some("Helps with code.".to_string()),
        prompt_starters: Some(vec!["Explain this".to_string(), "Review my PR".to_string()]),
        system_prompt: Some("You are a tutor.".to_string()),
    }
}

async fn cleanup(profiles: &profiles::Repository, title: &str) {
    profiles.delete(title).await.expect("cleanup delete failed");
}

#[tokio::test]
async fn storage_health_check() {
    let _guard = DB_LOCK.lock().await;
    let Some((storage, _pool)) = connect().await else { return };

    assert!(storage.health_check().await.is_ok());
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let _guard = DB_LOCK.lock().await;
    let Some((storage, _pool)) = connect().await else { return };

    // Second invocation must be a no-op, not an error.
    storage.profiles.ensure_schema().await.expect("first ensure_schema failed");
    storage.profiles.ensure_schema().await.expect("repeated ensure_schema failed");
}

#[tokio::test]
async fn insert_then_find_round_trips_unchanged() {
    let _guard = DB_LOCK.lock().await;
    let Some((storage, _pool)) = connect().await else { return };

    let title = unique_title("Round Trip");
    let profile = sample_profile(&title);

    let stored = storage.profiles.insert(&profile).await.expect("insert failed");
    assert_eq!(stored, profile);

    let found = storage
        .profiles
        .find_by_title(&title)
        .await
        .expect("find failed")
        .expect("inserted profile should be found");
    assert_eq!(found, profile);

    // Listing includes the new row as well.
    let all = storage.profiles.list_all().await.expect("list failed");
    assert!(all.iter().any(|p| p.title == title));

    cleanup(&storage.profiles, &title).await;
}

#[tokio::test]
async fn find_is_case_sensitive_exact_match() {
    let _guard = DB_LOCK.lock().await;
    let Some((storage, _pool)) = connect().await else { return };

    let title = unique_title("Exact Match");
    storage.profiles.insert(&sample_profile(&title)).await.expect("insert failed");

    let miss = storage
        .profiles
        .find_by_title(&title.to_uppercase())
        .await
        .expect("find failed");
    assert!(miss.is_none());

    cleanup(&storage.profiles, &title).await;
}

#[tokio::test]
async fn duplicate_title_is_a_constraint_violation() {
    let _guard = DB_LOCK.lock().await;
    let Some((storage, _pool)) = connect().await else { return };

    let title = unique_title("Duplicate");
    storage.profiles.insert(&sample_profile(&title)).await.expect("first insert failed");

    let err = storage
        .profiles
        .insert(&sample_profile(&title))
        .await
        .expect_err("second insert should violate the primary key");
    assert!(matches!(err, CoreError::ConstraintViolation(_)));

    cleanup(&storage.profiles, &title).await;
}

#[tokio::test]
async fn update_replaces_non_key_fields_and_keeps_title() {
    let _guard = DB_LOCK.lock().await;
    let Some((storage, _pool)) = connect().await else { return };

    let title = unique_title("Update Target");
    storage.profiles.insert(&sample_profile(&title)).await.expect("insert failed");

    let patch = ProfilePatch {
        profile_picture: None,
        welcome_message: Some("Welcome back".to_string()),
        description: Some("Updated description".to_string()),
        prompt_starters: Some(vec!["New starter".to_string()]),
        system_prompt: None,
    };

    let updated = storage
        .profiles
        .update(&title, &patch)
        .await
        .expect("update failed")
        .expect("existing profile should be updated");

    assert_eq!(updated.title, title);
    assert_eq!(updated.profile_picture, None);
    assert_eq!(updated.welcome_message.as_deref(), Some("Welcome back"));
    assert_eq!(updated.prompt_starters, Some(vec!["New starter".to_string()]));

    cleanup(&storage.profiles, &title).await;
}

#[tokio::test]
async fn update_of_missing_title_returns_none() {
    let _guard = DB_LOCK.lock().await;
    let Some((storage, _pool)) = connect().await else { return };

    let patch = ProfilePatch {
        profile_picture: None,
        welcome_message: None,
        description: None,
        prompt_starters: None,
        system_prompt: None,
    };

    let result = storage
        .profiles
        .update(&unique_title("Never Inserted"), &patch)
        .await
        .expect("update query failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_removes_the_row_once() {
    let _guard = DB_LOCK.lock().await;
    let Some((storage, _pool)) = connect().await else { return };

    let title = unique_title("Delete Target");
    storage.profiles.insert(&sample_profile(&title)).await.expect("insert failed");

    let deleted = storage.profiles.delete(&title).await.expect("delete failed");
    assert_eq!(deleted.as_deref(), Some(title.as_str()));

    // Second delete finds nothing.
    let deleted_again = storage.profiles.delete(&title).await.expect("delete failed");
    assert!(deleted_again.is_none());

    let found = storage.profiles.find_by_title(&title).await.expect("find failed");
    assert!(found.is_none());
}

#[tokio::test]
async fn replace_all_clears_prior_rows() {
    let _guard = DB_LOCK.lock().await;
    let Some((storage, _pool)) = connect().await else { return };

    let prior = unique_title("Prior Row");
    storage.profiles.insert(&sample_profile(&prior)).await.expect("insert failed");

    let replacements =
        vec![sample_profile(&unique_title("Replacement A")), sample_profile(&unique_title("Replacement B"))];

    storage.profiles.replace_all(&replacements).await.expect("replace_all failed");

    // Post-state is exactly the supplied set; the prior row is gone.
    let mut all = storage.profiles.list_all().await.expect("list failed");
    all.sort_by(|a, b| a.title.cmp(&b.title));
    let mut expected = replacements.clone();
    expected.sort_by(|a, b| a.title.cmp(&b.title));
    assert_eq!(all, expected);

    for profile in &replacements {
        cleanup(&storage.profiles, &profile.title).await;
    }
}

#[tokio::test]
async fn media_pagination_filters_by_id_value() {
    let _guard = DB_LOCK.lock().await;
    let Some((_storage, pool)) = connect().await else { return };

    // The service itself performs no DDL on the media table; the test owns
    // its fixture.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS media (
            "Id" BIGINT PRIMARY KEY,
            "Image_url" TEXT,
            "Variants" JSONB
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("failed to create media fixture table");

    sqlx::query(r#"DELETE FROM media"#).execute(&pool).await.expect("failed to clear media");

    for id in 1..=5_i64 {
        sqlx::query(r#"INSERT INTO media ("Id", "Image_url", "Variants") VALUES ($1, $2, $3)"#)
            .bind(id)
            .bind(format!("https://cdn.example.com/{id}.jpg"))
            .bind(serde_json::json!({ "thumb": format!("{id}-thumb.jpg") }))
            .execute(&pool)
            .await
            .expect("failed to insert media row");
    }

    let url = std::env::var("DATABASE_URL").unwrap();
    let options = PgConnectOptions::from_str(&url).expect("invalid DATABASE_URL");

    // page_size=2, page=1: Id > 0, limit 2.
    let page1 = media::fetch_page(&options, 0, 2).await.expect("fetch failed");
    assert_eq!(page1.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);

    // page=2: Id > 2, limit 2. A value filter, not a row skip.
    let page2 = media::fetch_page(&options, 2, 2).await.expect("fetch failed");
    assert_eq!(page2.iter().map(|m| m.id).collect::<Vec<_>>(), vec![3, 4]);

    // Beyond the data: empty page.
    let page4 = media::fetch_page(&options, 6, 2).await.expect("fetch failed");
    assert!(page4.is_empty());

    let first = &page1[0];
    assert_eq!(first.image_url.as_deref(), Some("https://cdn.example.com/1.jpg"));
    assert_eq!(first.variants["thumb"], "1-thumb.jpg");

    sqlx::query(r#"DELETE FROM media"#).execute(&pool).await.expect("failed to clear media");
}
