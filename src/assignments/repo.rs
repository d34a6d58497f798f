use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub course_id: Option<i64>,
    pub file_key: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Assignment {
    pub async fn create(
        db: &PgPool,
        title: &str,
        description: Option<&str>,
        due_date: Option<OffsetDateTime>,
        course_id: Option<i64>,
    ) -> sqlx::Result<Assignment> {
        sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (title, description, due_date, course_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, due_date, course_id, file_key, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(due_date)
        .bind(course_id)
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Assignment>> {
        sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, title, description, due_date, course_id, file_key, created_at
            FROM assignments
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<Assignment>> {
        sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, title, description, due_date, course_id, file_key, created_at
            FROM assignments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// None when the assignment does not exist.
    pub async fn update(
        db: &PgPool,
        id: i64,
        title: &str,
        description: Option<&str>,
        due_date: Option<OffsetDateTime>,
        course_id: Option<i64>,
    ) -> sqlx::Result<Option<Assignment>> {
        sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET title = $2, description = $3, due_date = $4, course_id = $5
            WHERE id = $1
            RETURNING id, title, description, due_date, course_id, file_key, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(due_date)
        .bind(course_id)
        .fetch_optional(db)
        .await
    }

    /// Outer None when the assignment does not exist; the inner value is
    /// the attachment key of the deleted row, if it had one.
    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<Option<Option<String>>> {
        sqlx::query_scalar::<_, Option<String>>(
            r#"
            DELETE FROM assignments WHERE id = $1 RETURNING file_key
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Record the object-storage key of an uploaded attachment.
    pub async fn set_attachment(
        db: &PgPool,
        id: i64,
        file_key: &str,
    ) -> sqlx::Result<Option<Assignment>> {
        sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments SET file_key = $2
            WHERE id = $1
            RETURNING id, title, description, due_date, course_id, file_key, created_at
            "#,
        )
        .bind(id)
        .bind(file_key)
        .fetch_optional(db)
        .await
    }
}
