use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateCourseRequest, UpdateCourseRequest};
use super::repo_types::Course;
use super::services;
use crate::{
    error::ApiError,
    extract::{JsonBody, RecordId},
    response::{ApiResponse, Deleted},
    state::AppState,
};

type Reply<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/kursus", get(list_courses).post(create_course))
        .route(
            "/kursus/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
}

#[instrument(skip(state))]
pub async fn list_courses(State(state): State<AppState>) -> Reply<Vec<Course>> {
    let courses = services::list_courses(&state).await?;
    Ok(ApiResponse::ok("courses fetched", courses))
}

#[instrument(skip(state))]
pub async fn get_course(State(state): State<AppState>, RecordId(id): RecordId) -> Reply<Course> {
    let course = services::get_course(&state, id).await?;
    Ok(ApiResponse::ok(format!("course {id} fetched"), course))
}

#[instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCourseRequest>,
) -> Reply<Course> {
    let course = services::create_course(&state, payload).await?;
    Ok(ApiResponse::created("course created", course))
}

#[instrument(skip(state, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    JsonBody(payload): JsonBody<UpdateCourseRequest>,
) -> Reply<Course> {
    let course = services::update_course(&state, id, payload).await?;
    Ok(ApiResponse::ok(format!("course {id} updated"), course))
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Reply<Deleted> {
    let id = services::delete_course(&state, id).await?;
    Ok(ApiResponse::ok(format!("course {id} deleted"), Deleted { id }))
}
