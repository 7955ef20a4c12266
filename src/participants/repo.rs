use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use super::repo_types::{Participant, ParticipantChanges};

/// Raised by `create`/`update` when the email belongs to another participant.
#[derive(Debug, Error)]
#[error("email already registered")]
pub struct DuplicateEmail;

#[async_trait]
pub trait ParticipantRepo: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Participant>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Participant>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Participant>>;
    async fn create(&self, name: &str, email: &str, password_hash: &str)
        -> anyhow::Result<Participant>;
    async fn update(
        &self,
        id: i64,
        changes: &ParticipantChanges,
    ) -> anyhow::Result<Option<Participant>>;
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

pub struct PgParticipantRepo {
    db: PgPool,
}

impl PgParticipantRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn unique_violation(e: sqlx::Error) -> anyhow::Error {
    let duplicate = e
        .as_database_error()
        .map_or(false, |db| db.is_unique_violation());
    if duplicate {
        DuplicateEmail.into()
    } else {
        anyhow::Error::new(e).context("write participant")
    }
}

#[async_trait]
impl ParticipantRepo for PgParticipantRepo {
    async fn list(&self) -> anyhow::Result<Vec<Participant>> {
        let rows = sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM participants
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list participants")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Participant>> {
        let row = sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM participants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("find participant {id}"))?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Participant>> {
        let row = sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM participants
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find participant by email")?;
        Ok(row)
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Participant> {
        sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(unique_violation)
    }

    async fn update(
        &self,
        id: i64,
        changes: &ParticipantChanges,
    ) -> anyhow::Result<Option<Participant>> {
        sqlx::query_as::<_, Participant>(
            r#"
            UPDATE participants
               SET name          = COALESCE($2, name),
                   email         = COALESCE($3, email),
                   password_hash = COALESCE($4, password_hash),
                   updated_at    = now()
             WHERE id = $1
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_optional(&self.db)
        .await
        .map_err(unique_violation)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete participant {id}"))?;
        Ok(res.rows_affected() > 0)
    }
}
