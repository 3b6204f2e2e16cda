//! Unit tests for database initialization
//!
//! Tests:
//! - Automatic database creation with the specimens schema
//! - Idempotent startup against an existing database
//! - AUTOINCREMENT semantics of the primary key

use mscope_common::db::init::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("sub").join("microscope.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing_and_keeps_rows() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("microscope.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO specimens (name) VALUES ('Amoeba')")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM specimens")
        .fetch_one(&pool2)
        .await
        .unwrap();

    assert_eq!(count, 1, "Re-initialization must not drop existing rows");
}

#[tokio::test]
async fn test_specimens_schema_columns() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("microscope.db")).await.unwrap();

    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('specimens')")
        .fetch_all(&pool)
        .await
        .unwrap();

    assert_eq!(
        columns,
        vec![
            "id",
            "name",
            "image_data",
            "analysis",
            "magnification",
            "microscope_type",
            "created_at"
        ]
    );
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("microscope.db")).await.unwrap();

    let first = sqlx::query("INSERT INTO specimens (name) VALUES ('a')")
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();
    sqlx::query("DELETE FROM specimens WHERE id = ?")
        .bind(first)
        .execute(&pool)
        .await
        .unwrap();
    let second = sqlx::query("INSERT INTO specimens (name) VALUES ('b')")
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

    assert!(second > first);
}

#[tokio::test]
async fn test_created_at_assigned_by_database() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("microscope.db")).await.unwrap();

    sqlx::query("INSERT INTO specimens (name) VALUES ('Volvox')")
        .execute(&pool)
        .await
        .unwrap();

    let created_at: String = sqlx::query_scalar("SELECT created_at FROM specimens")
        .fetch_one(&pool)
        .await
        .unwrap();

    // CURRENT_TIMESTAMP format: YYYY-MM-DD HH:MM:SS
    assert_eq!(created_at.len(), 19);
    assert_eq!(&created_at[4..5], "-");
    assert_eq!(&created_at[10..11], " ");
}
