use std::sync::Arc;

use sqlx::PgPool;

use crate::courses::repo::{CourseRepo, PgCourseRepo};
use crate::participants::repo::{ParticipantRepo, PgParticipantRepo};

#[derive(Clone)]
pub struct AppState {
    pub courses: Arc<dyn CourseRepo>,
    pub participants: Arc<dyn ParticipantRepo>,
}

impl AppState {
    /// Repositories backed by the shared pool. The caller owns the pool and closes it.
    pub fn init(db: PgPool) -> Self {
        Self {
            courses: Arc::new(PgCourseRepo::new(db.clone())),
            participants: Arc::new(PgParticipantRepo::new(db)),
        }
    }
}
