use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{PublicParticipant, RegisterRequest, RegisteredParticipant, UpdateParticipantRequest};
use super::services;
use crate::{
    error::ApiError,
    extract::{JsonBody, RecordId},
    response::{ApiResponse, Deleted},
    state::AppState,
};

type Reply<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn participant_routes() -> Router<AppState> {
    Router::new()
        .route("/peserta/daftar", post(register))
        .route("/peserta", get(list_participants))
        .route(
            "/peserta/:id",
            get(get_participant)
                .put(update_participant)
                .delete(delete_participant),
        )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Reply<RegisteredParticipant> {
    let registered = services::register_participant(&state, payload).await?;
    Ok(ApiResponse::created("participant registered", registered))
}

#[instrument(skip(state))]
pub async fn list_participants(State(state): State<AppState>) -> Reply<Vec<PublicParticipant>> {
    let participants = services::list_participants(&state).await?;
    Ok(ApiResponse::ok("participants fetched", participants))
}

#[instrument(skip(state))]
pub async fn get_participant(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Reply<PublicParticipant> {
    let participant = services::get_participant(&state, id).await?;
    Ok(ApiResponse::ok(format!("participant {id} fetched"), participant))
}

#[instrument(skip(state, payload))]
pub async fn update_participant(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<UpdateParticipantRequest>,
) -> Reply<PublicParticipant> {
    let participant = services::update_participant(&state, id, payload).await?;
    Ok(ApiResponse::ok(format!("participant {id} updated"), participant))
}

#[instrument(skip(state))]
pub async fn delete_participant(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Reply<Deleted> {
    let id = services::delete_participant(&state, id).await?;
    Ok(ApiResponse::ok(format!("participant {id} deleted"), Deleted { id }))
}
