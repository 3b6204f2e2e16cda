//! Specimen record model
//!
//! The only persisted entity. Text fields are nullable: the persistence
//! layer stores whatever the caller sends, missing fields included.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A persisted specimen row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Specimen {
    /// Server-assigned, monotonically increasing primary key
    pub id: i64,
    pub name: Option<String>,
    /// Base64-encoded JPEG (no data-URI prefix)
    pub image_data: Option<String>,
    /// Free-text model output
    pub analysis: Option<String>,
    pub magnification: Option<String>,
    pub microscope_type: Option<String>,
    /// SQLite `CURRENT_TIMESTAMP` text (`YYYY-MM-DD HH:MM:SS`, UTC)
    pub created_at: String,
}

/// The five caller-supplied fields of a specimen
///
/// Also the `POST /api/specimens` request body. Any JSON scalar is accepted
/// and kept as text: `400` becomes `"400"`, `null` stays NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSpecimen {
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub image_data: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub analysis: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub magnification: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub microscope_type: Option<String>,
}

/// Text form of whatever JSON value the caller sent
///
/// Arrays and objects are kept as their compact JSON text.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    })
}
