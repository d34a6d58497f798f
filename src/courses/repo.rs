use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub instructor: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Course {
    pub async fn create(
        db: &PgPool,
        name: &str,
        description: Option<&str>,
        instructor: Option<&str>,
    ) -> sqlx::Result<Course> {
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (name, description, instructor)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, instructor, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(instructor)
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Course>> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, description, instructor, created_at
            FROM courses
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<Course>> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, description, instructor, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// None when the course does not exist.
    pub async fn update(
        db: &PgPool,
        id: i64,
        name: &str,
        description: Option<&str>,
        instructor: Option<&str>,
    ) -> sqlx::Result<Option<Course>> {
        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses SET name = $2, description = $3, instructor = $4
            WHERE id = $1
            RETURNING id, name, description, instructor, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(instructor)
        .fetch_optional(db)
        .await
    }

    /// Deletes the course row only. Users' tracked lists are left
    /// untouched, so a tracked id may dangle afterwards.
    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
