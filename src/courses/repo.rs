use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Course, CourseChanges, NewCourse};

#[async_trait]
pub trait CourseRepo: Send + Sync {
    /// All courses ordered by name.
    async fn list(&self) -> anyhow::Result<Vec<Course>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Course>>;
    async fn create(&self, new: &NewCourse) -> anyhow::Result<Course>;
    /// Returns `None` when no row has this id.
    async fn update(&self, id: i64, changes: &CourseChanges) -> anyhow::Result<Option<Course>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

pub struct PgCourseRepo {
    db: PgPool,
}

impl PgCourseRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseRepo for PgCourseRepo {
    async fn list(&self) -> anyhow::Result<Vec<Course>> {
        let rows = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, description, duration_hours, level, price, image_url
            FROM courses
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list courses")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Course>> {
        let row = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, description, duration_hours, level, price, image_url
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("find course {id}"))?;
        Ok(row)
    }

    async fn create(&self, new: &NewCourse) -> anyhow::Result<Course> {
        let row = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (name, description, duration_hours, level, price, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, duration_hours, level, price, image_url
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.duration_hours)
        .bind(&new.level)
        .bind(new.price)
        .bind(&new.image_url)
        .fetch_one(&self.db)
        .await
        .context("insert course")?;
        Ok(row)
    }

    async fn update(&self, id: i64, changes: &CourseChanges) -> anyhow::Result<Option<Course>> {
        let row = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
               SET name           = COALESCE($2, name),
                   description    = COALESCE($3, description),
                   duration_hours = COALESCE($4, duration_hours),
                   level          = COALESCE($5, level),
                   price          = COALESCE($6, price),
                   image_url      = CASE WHEN $7 THEN $8 ELSE image_url END
             WHERE id = $1
            RETURNING id, name, description, duration_hours, level, price, image_url
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.duration_hours)
        .bind(&changes.level)
        .bind(changes.price)
        .bind(changes.image_url.is_some())
        .bind(changes.image_url.clone().flatten())
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("update course {id}"))?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete course {id}"))?;
        Ok(res.rows_affected() > 0)
    }
}
