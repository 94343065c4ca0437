use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub city: Option<String>,
    /// Free-form intake questionnaire answers.
    pub q_and_a: Option<serde_json::Value>,
    pub sessions: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields supplied to an upsert. `None` means "leave unchanged" on update
/// and "unset" on insert.
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub city: Option<String>,
    pub q_and_a: Option<serde_json::Value>,
}
