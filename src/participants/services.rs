use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::dto::{PublicParticipant, RegisterRequest, RegisteredParticipant, UpdateParticipantRequest};
use super::password::hash_password_blocking;
use super::repo::DuplicateEmail;
use super::repo_types::ParticipantChanges;
use crate::error::ApiError;
use crate::state::AppState;

const EMAIL_TAKEN: &str = "email already registered";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::validation("invalid email"));
    }
    Ok(email)
}

fn non_empty(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("{field} must not be empty"))),
    }
}

/// Names are stored trimmed; passwords are hashed exactly as typed.
fn display_name(value: Option<String>) -> Result<String, ApiError> {
    non_empty("name", value).map(|v| v.trim().to_string())
}

fn conflict_on_duplicate(e: anyhow::Error) -> ApiError {
    if e.downcast_ref::<DuplicateEmail>().is_some() {
        ApiError::Conflict(EMAIL_TAKEN.into())
    } else {
        ApiError::Internal(e)
    }
}

pub async fn register_participant(
    st: &AppState,
    req: RegisterRequest,
) -> Result<RegisteredParticipant, ApiError> {
    let name = display_name(req.name)?;
    let email = normalize_email(&non_empty("email", req.email)?)?;
    let password = non_empty("password", req.password)?;

    if st.participants.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict(EMAIL_TAKEN.into()));
    }

    let hash = hash_password_blocking(password).await?;
    let participant = st
        .participants
        .create(&name, &email, &hash)
        .await
        .map_err(conflict_on_duplicate)?;

    info!(participant_id = participant.id, email = %participant.email, "participant registered");
    Ok(RegisteredParticipant {
        id: participant.id,
        email: participant.email,
    })
}

pub async fn list_participants(st: &AppState) -> Result<Vec<PublicParticipant>, ApiError> {
    let rows = st.participants.list().await?;
    Ok(rows.into_iter().map(PublicParticipant::from).collect())
}

pub async fn get_participant(st: &AppState, id: i64) -> Result<PublicParticipant, ApiError> {
    st.participants
        .find_by_id(id)
        .await?
        .map(PublicParticipant::from)
        .ok_or_else(|| ApiError::not_found(format!("participant {id} not found")))
}

pub async fn update_participant(
    st: &AppState,
    id: i64,
    req: UpdateParticipantRequest,
) -> Result<PublicParticipant, ApiError> {
    let name = req.name.map(|v| display_name(Some(v))).transpose()?;
    let email = req.email.as_deref().map(normalize_email).transpose()?;
    let password = req
        .password
        .map(|v| non_empty("password", Some(v)))
        .transpose()?;

    let mut changes = ParticipantChanges {
        name,
        email,
        password_hash: None,
    };
    if changes.is_empty() && password.is_none() {
        return Err(ApiError::validation("no fields supplied for update"));
    }

    if st.participants.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found(format!("participant {id} not found")));
    }

    if let Some(email) = &changes.email {
        if let Some(owner) = st.participants.find_by_email(email).await? {
            if owner.id != id {
                warn!(email = %email, participant_id = id, "email already registered");
                return Err(ApiError::Conflict(EMAIL_TAKEN.into()));
            }
        }
    }

    if let Some(plain) = password {
        changes.password_hash = Some(hash_password_blocking(plain).await?);
    }

    let updated = st
        .participants
        .update(id, &changes)
        .await
        .map_err(conflict_on_duplicate)?
        .ok_or_else(|| ApiError::not_found(format!("participant {id} not found")))?;

    info!(
        participant_id = id,
        password_changed = changes.password_hash.is_some(),
        "participant updated"
    );
    Ok(updated.into())
}

pub async fn delete_participant(st: &AppState, id: i64) -> Result<i64, ApiError> {
    if !st.participants.delete(id).await? {
        return Err(ApiError::not_found(format!("participant {id} not found")));
    }
    info!(participant_id = id, "participant deleted");
    Ok(id)
}
