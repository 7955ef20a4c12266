use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::Participant;

const REDACTED: &str = "[redacted]";

/// Request body for participant registration.
#[derive(Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Request body for participant updates; only present fields are changed.
#[derive(Default, Deserialize)]
pub struct UpdateParticipantRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for UpdateParticipantRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateParticipantRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Returned after registration.
#[derive(Debug, Serialize)]
pub struct RegisteredParticipant {
    pub id: i64,
    pub email: String,
}

/// Public part of the participant returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicParticipant {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Participant> for PublicParticipant {
    fn from(p: Participant) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
