use tracing::info;

use super::dto::{CreateCourseRequest, UpdateCourseRequest};
use super::repo_types::{Course, CourseChanges, NewCourse};
use crate::error::ApiError;
use crate::state::AppState;

const REQUIRED_FIELDS: &str =
    "all required fields (name, description, duration_hours, level, price) must be filled";

fn text(field: &str, value: String) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    Ok(value)
}

fn duration(value: i32) -> Result<i32, ApiError> {
    if value <= 0 {
        return Err(ApiError::validation("duration_hours must be a positive integer"));
    }
    Ok(value)
}

fn price(value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::validation("price must be a non-negative number"));
    }
    Ok(value)
}

fn image_url(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub fn validate_new(req: CreateCourseRequest) -> Result<NewCourse, ApiError> {
    let (Some(name), Some(description), Some(duration_hours), Some(level), Some(p)) = (
        req.name,
        req.description,
        req.duration_hours,
        req.level,
        req.price,
    ) else {
        return Err(ApiError::validation(REQUIRED_FIELDS));
    };

    Ok(NewCourse {
        name: text("name", name)?,
        description: text("description", description)?,
        duration_hours: duration(duration_hours)?,
        level: text("level", level)?,
        price: price(p)?,
        image_url: image_url(req.image_url),
    })
}

pub fn validate_changes(req: UpdateCourseRequest) -> Result<CourseChanges, ApiError> {
    let changes = CourseChanges {
        name: req.name.map(|v| text("name", v)).transpose()?,
        description: req.description.map(|v| text("description", v)).transpose()?,
        duration_hours: req.duration_hours.map(duration).transpose()?,
        level: req.level.map(|v| text("level", v)).transpose()?,
        price: req.price.map(price).transpose()?,
        image_url: req.image_url.map(image_url),
    };
    if changes.is_empty() {
        return Err(ApiError::validation("no fields supplied for update"));
    }
    Ok(changes)
}

/// An empty catalog is reported as not-found; this is the only place that rule lives.
pub async fn list_courses(st: &AppState) -> Result<Vec<Course>, ApiError> {
    let courses = st.courses.list().await?;
    if courses.is_empty() {
        return Err(ApiError::not_found("no courses found"));
    }
    Ok(courses)
}

pub async fn get_course(st: &AppState, id: i64) -> Result<Course, ApiError> {
    st.courses
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("course {id} not found")))
}

pub async fn create_course(st: &AppState, req: CreateCourseRequest) -> Result<Course, ApiError> {
    let new = validate_new(req)?;
    let course = st.courses.create(&new).await?;
    info!(course_id = course.id, "course created");
    Ok(course)
}

pub async fn update_course(
    st: &AppState,
    id: i64,
    req: UpdateCourseRequest,
) -> Result<Course, ApiError> {
    let changes = validate_changes(req)?;
    let course = st
        .courses
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("course {id} not found")))?;
    info!(course_id = id, "course updated");
    Ok(course)
}

pub async fn delete_course(st: &AppState, id: i64) -> Result<i64, ApiError> {
    if !st.courses.delete(id).await? {
        return Err(ApiError::not_found(format!("course {id} not found")));
    }
    info!(course_id = id, "course deleted");
    Ok(id)
}
