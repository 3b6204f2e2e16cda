//! Specimen persistence
//!
//! Single statements, no transactions. Fields are stored exactly as given.

use mscope_common::{NewSpecimen, Specimen};
use sqlx::SqlitePool;

const SELECT_COLUMNS: &str =
    "SELECT id, name, image_data, analysis, magnification, microscope_type, created_at FROM specimens";

/// All specimens, newest first
///
/// `created_at` has one-second resolution, so ties fall back to the id.
pub async fn list_specimens(pool: &SqlitePool) -> Result<Vec<Specimen>, sqlx::Error> {
    sqlx::query_as::<_, Specimen>(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
}

/// Insert a specimen and return its new id
pub async fn insert_specimen(pool: &SqlitePool, specimen: &NewSpecimen) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO specimens (name, image_data, analysis, magnification, microscope_type) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&specimen.name)
    .bind(&specimen.image_data)
    .bind(&specimen.analysis)
    .bind(&specimen.magnification)
    .bind(&specimen.microscope_type)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_specimen(pool: &SqlitePool, id: i64) -> Result<Option<Specimen>, sqlx::Error> {
    sqlx::query_as::<_, Specimen>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Delete a specimen; returns whether a row was removed
pub async fn delete_specimen(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM specimens WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
