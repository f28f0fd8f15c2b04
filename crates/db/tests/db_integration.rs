//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `hotdeals_test`)
//!   `TEST_DB_PASSWORD` (default: `hotdeals_test`)
//!   `TEST_DB_NAME` (default: `hotdeals_test`)

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use hotdeals_common::AppError;
use hotdeals_db::entities::{deal, user, vote};
use hotdeals_db::repositories::{DealRepository, UserRepository, VoteRepository};
use hotdeals_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::Set;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_vote_unique_index_reports_conflict() {
    let test_db = TestDatabase::create_unique()
        .await
        .expect("Failed to create test database");

    hotdeals_db::migrations::Migrator::up(test_db.connection(), None)
        .await
        .expect("Migrations failed");

    let conn = Arc::new(
        sea_orm::Database::connect(&test_db.config.database_url())
            .await
            .expect("Failed to open shared connection"),
    );
    let user_repo = UserRepository::new(Arc::clone(&conn));
    let deal_repo = DealRepository::new(Arc::clone(&conn));
    let vote_repo = VoteRepository::new(Arc::clone(&conn));

    let author = user_repo
        .create(user::ActiveModel {
            id: Set("u1".to_string()),
            username: Set("alice".to_string()),
            email: Set("alice@example.com".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            role: Set(user::Role::User),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .await
        .unwrap();

    deal_repo
        .create(deal::ActiveModel {
            id: Set("d1".to_string()),
            title: Set("Integration test deal".to_string()),
            description: Set("A deal inserted by the vote index test".to_string()),
            price: Set(10.0),
            original_price: Set(None),
            url: Set(None),
            category: Set(deal::Category::Autre),
            status: Set(deal::Status::Approved),
            temperature: Set(0),
            author_id: Set(author.id.clone()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let make_vote = |id: &str| vote::ActiveModel {
        id: Set(id.to_string()),
        kind: Set(vote::VoteKind::Hot),
        voter_id: Set("u1".to_string()),
        deal_id: Set("d1".to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    vote_repo.create(make_vote("v1")).await.unwrap();

    // Second row for the same (voter, deal) pair must hit the unique index
    let duplicate = vote_repo.create(make_vote("v2")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    test_db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}
