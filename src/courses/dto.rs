use serde::Deserialize;

use crate::extract::double_option;

/// Request body for creating a course. Every field is optional here so that
/// missing fields are reported by validation rather than by the JSON parser.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "duration")]
    pub duration_hours: Option<i32>,
    pub level: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

/// Request body for updating a course; only present fields are changed.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "duration")]
    pub duration_hours: Option<i32>,
    pub level: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
}
