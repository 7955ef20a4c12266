//! In-memory repositories and a request helper for router tests.

use std::sync::{
    atomic::{AtomicI64, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::app::build_app;
use crate::courses::{
    repo::CourseRepo,
    repo_types::{Course, CourseChanges, NewCourse},
};
use crate::participants::{
    repo::{DuplicateEmail, ParticipantRepo},
    repo_types::{Participant, ParticipantChanges},
};
use crate::state::AppState;

#[derive(Default)]
pub struct MemoryCourseRepo {
    rows: Mutex<Vec<Course>>,
    next_id: AtomicI64,
    calls: AtomicUsize,
}

impl MemoryCourseRepo {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CourseRepo for MemoryCourseRepo {
    async fn list(&self) -> anyhow::Result<Vec<Course>> {
        self.touch();
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Course>> {
        self.touch();
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, new: &NewCourse) -> anyhow::Result<Course> {
        self.touch();
        let course = Course {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: new.name.clone(),
            description: new.description.clone(),
            duration_hours: new.duration_hours,
            level: new.level.clone(),
            price: new.price,
            image_url: new.image_url.clone(),
        };
        self.rows.lock().unwrap().push(course.clone());
        Ok(course)
    }

    async fn update(&self, id: i64, changes: &CourseChanges) -> anyhow::Result<Option<Course>> {
        self.touch();
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|c| c.id == id).map(|c| {
            apply_course_changes(changes, c);
            c.clone()
        }))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        self.touch();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() < before)
    }
}

fn apply_course_changes(changes: &CourseChanges, course: &mut Course) {
    if let Some(v) = &changes.name {
        course.name = v.clone();
    }
    if let Some(v) = &changes.description {
        course.description = v.clone();
    }
    if let Some(v) = changes.duration_hours {
        course.duration_hours = v;
    }
    if let Some(v) = &changes.level {
        course.level = v.clone();
    }
    if let Some(v) = changes.price {
        course.price = v;
    }
    if let Some(v) = &changes.image_url {
        course.image_url = v.clone();
    }
}

/// Participant row together with the hash the database would hold.
#[derive(Clone)]
struct StoredParticipant {
    row: Participant,
    password_hash: String,
}

#[derive(Default)]
pub struct MemoryParticipantRepo {
    rows: Mutex<Vec<StoredParticipant>>,
    next_id: AtomicI64,
    calls: AtomicUsize,
}

impl MemoryParticipantRepo {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Hash currently stored for a participant.
    pub fn stored_hash(&self, id: i64) -> Option<String> {
        self.find(|p| p.row.id == id).map(|p| p.password_hash)
    }

    fn find(&self, pred: impl Fn(&StoredParticipant) -> bool) -> Option<StoredParticipant> {
        self.rows.lock().unwrap().iter().find(|p| pred(*p)).cloned()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ParticipantRepo for MemoryParticipantRepo {
    async fn list(&self) -> anyhow::Result<Vec<Participant>> {
        self.touch();
        Ok(self.rows.lock().unwrap().iter().map(|p| p.row.clone()).collect())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Participant>> {
        self.touch();
        Ok(self.find(|p| p.row.id == id).map(|p| p.row))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Participant>> {
        self.touch();
        Ok(self.find(|p| p.row.email == email).map(|p| p.row))
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Participant> {
        self.touch();
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.row.email == email) {
            return Err(DuplicateEmail.into());
        }
        let now = OffsetDateTime::now_utc();
        let participant = Participant {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: name.into(),
            email: email.into(),
            created_at: now,
            updated_at: now,
        };
        rows.push(StoredParticipant {
            row: participant.clone(),
            password_hash: password_hash.into(),
        });
        Ok(participant)
    }

    async fn update(
        &self,
        id: i64,
        changes: &ParticipantChanges,
    ) -> anyhow::Result<Option<Participant>> {
        self.touch();
        let mut rows = self.rows.lock().unwrap();
        if let Some(email) = &changes.email {
            if rows.iter().any(|p| p.row.id != id && &p.row.email == email) {
                return Err(DuplicateEmail.into());
            }
        }
        Ok(rows.iter_mut().find(|p| p.row.id == id).map(|p| {
            if let Some(v) = &changes.name {
                p.row.name = v.clone();
            }
            if let Some(v) = &changes.email {
                p.row.email = v.clone();
            }
            if let Some(v) = &changes.password_hash {
                p.password_hash = v.clone();
            }
            p.row.updated_at = OffsetDateTime::now_utc();
            p.row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        self.touch();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.row.id != id);
        Ok(rows.len() < before)
    }
}

impl AppState {
    pub fn fake() -> (Self, Arc<MemoryCourseRepo>, Arc<MemoryParticipantRepo>) {
        let courses = Arc::new(MemoryCourseRepo::default());
        let participants = Arc::new(MemoryParticipantRepo::default());
        let state = AppState {
            courses: courses.clone(),
            participants: participants.clone(),
        };
        (state, courses, participants)
    }
}

/// Full router over in-memory repositories.
pub struct TestApp {
    pub router: Router,
    pub courses: Arc<MemoryCourseRepo>,
    pub participants: Arc<MemoryParticipantRepo>,
}

impl TestApp {
    pub fn new() -> Self {
        let (state, courses, participants) = AppState::fake();
        Self {
            router: build_app(state),
            courses,
            participants,
        }
    }
}

/// Sends one request through the router and decodes the JSON body.
pub async fn send(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let res = app
        .router
        .clone()
        .oneshot(req.body(body).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, json)
}

#[tokio::test]
async fn unknown_route_uses_envelope() {
    let app = TestApp::new();
    let (status, res) = send(&app, "GET", "/api/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(res["success"], false);
}

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new();
    let (status, res) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res, Value::String("ok".into()));
}
