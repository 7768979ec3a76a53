use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sns_database::SqlxObject;

#[derive(Debug, Serialize, Deserialize, Clone, Default, SqlxObject)]
#[table_name = "users"]
pub struct User {
    pub id: i32,

    #[column_type = "VARCHAR(255)"]
    #[unique]
    pub username: String,

    #[column_type = "VARCHAR(1024)"]
    pub profile: Option<String>,

    #[column_name = "registerd_at"]
    #[column_default = "CURRENT_TIMESTAMP"]
    #[db_managed]
    pub registered_at: DateTime<Utc>,
}

impl User {
    /// A user that is not stored yet; `id` and `registered_at` come back from the insert.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn profile_text(&self) -> String {
        self.profile.clone().unwrap_or_default()
    }
}
