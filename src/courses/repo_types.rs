use serde::Serialize;
use sqlx::FromRow;

/// Course record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub duration_hours: i32,
    pub level: String,
    pub price: f64,
    pub image_url: Option<String>,
}

/// Validated input for inserting a course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub duration_hours: i32,
    pub level: String,
    pub price: f64,
    pub image_url: Option<String>,
}

/// Validated partial update. `None` leaves the column untouched;
/// `image_url: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_hours: Option<i32>,
    pub level: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<Option<String>>,
}

impl CourseChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.duration_hours.is_none()
            && self.level.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
    }
}
