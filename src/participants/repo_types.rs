use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Participant record as read back from the database. The password hash
/// column is write-only and never selected.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated partial update; `password_hash` is already hashed.
#[derive(Debug, Clone, Default)]
pub struct ParticipantChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl ParticipantChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}
