use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub verified: bool,
    pub tracked_courses: Vec<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Insert a new user; the unique index on email rejects duplicates,
    /// so there is no racy existence pre-check here.
    pub async fn create(db: &PgPool, email: &str, password_hash: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, verified, tracked_courses, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, verified, tracked_courses, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, verified, tracked_courses, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// All users, or only those matching the verified flag.
    pub async fn list(db: &PgPool, verified: Option<bool>) -> sqlx::Result<Vec<User>> {
        match verified {
            Some(flag) => {
                sqlx::query_as::<_, User>(
                    r#"
                    SELECT id, email, password_hash, verified, tracked_courses, created_at
                    FROM users
                    WHERE verified = $1
                    ORDER BY id
                    "#,
                )
                .bind(flag)
                .fetch_all(db)
                .await
            }
            None => {
                sqlx::query_as::<_, User>(
                    r#"
                    SELECT id, email, password_hash, verified, tracked_courses, created_at
                    FROM users
                    ORDER BY id
                    "#,
                )
                .fetch_all(db)
                .await
            }
        }
    }

    /// Flip the verified flag in one conditional statement.
    /// None means the user does not exist.
    pub async fn mark_verified(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET verified = TRUE
            WHERE id = $1
            RETURNING id, email, password_hash, verified, tracked_courses, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Append a course id to the user's tracked list. Duplicates are
    /// preserved: tracking the same course twice yields two entries.
    /// Single UPDATE, so nothing can interleave between an existence
    /// check and the mutation.
    pub async fn track_course(
        db: &PgPool,
        user_id: i64,
        course_id: i64,
    ) -> sqlx::Result<Option<Vec<i64>>> {
        sqlx::query_scalar::<_, Vec<i64>>(
            r#"
            UPDATE users SET tracked_courses = array_append(tracked_courses, $2)
            WHERE id = $1
            RETURNING tracked_courses
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(db)
        .await
    }

    /// Remove every occurrence of the course id; a no-op when absent.
    pub async fn untrack_course(
        db: &PgPool,
        user_id: i64,
        course_id: i64,
    ) -> sqlx::Result<Option<Vec<i64>>> {
        sqlx::query_scalar::<_, Vec<i64>>(
            r#"
            UPDATE users SET tracked_courses = array_remove(tracked_courses, $2)
            WHERE id = $1
            RETURNING tracked_courses
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(db)
        .await
    }

    pub async fn tracked_courses(db: &PgPool, user_id: i64) -> sqlx::Result<Option<Vec<i64>>> {
        sqlx::query_scalar::<_, Vec<i64>>(
            r#"
            SELECT tracked_courses FROM users WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::courses::repo::Course;
    use crate::error::AppError;

    #[sqlx::test(migrations = "./migrations")]
    async fn new_users_start_unverified_with_nothing_tracked(db: PgPool) -> sqlx::Result<()> {
        let user = User::create(&db, "a@x.com", "hash").await?;
        assert!(!user.verified);
        assert!(user.tracked_courses.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn duplicate_email_is_a_unique_violation(db: PgPool) -> sqlx::Result<()> {
        User::create(&db, "a@x.com", "hash").await?;
        let err = User::create(&db, "a@x.com", "other-hash")
            .await
            .expect_err("second insert must fail");
        assert!(matches!(
            AppError::from(err),
            AppError::Validation(msg) if msg == "Email already registered"
        ));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn mark_verified_flips_the_flag(db: PgPool) -> sqlx::Result<()> {
        let user = User::create(&db, "a@x.com", "hash").await?;
        let user = User::mark_verified(&db, user.id).await?.expect("user exists");
        assert!(user.verified);
        assert!(User::mark_verified(&db, user.id + 1).await?.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn tracking_twice_stores_two_entries(db: PgPool) -> sqlx::Result<()> {
        let user = User::create(&db, "a@x.com", "hash").await?;
        User::track_course(&db, user.id, 5).await?;
        let tracked = User::track_course(&db, user.id, 5)
            .await?
            .expect("user exists");
        assert_eq!(tracked, vec![5, 5]);
        let fetched = User::tracked_courses(&db, user.id)
            .await?
            .expect("user exists");
        assert_eq!(fetched, vec![5, 5]);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn untrack_removes_every_occurrence(db: PgPool) -> sqlx::Result<()> {
        let user = User::create(&db, "a@x.com", "hash").await?;
        User::track_course(&db, user.id, 5).await?;
        User::track_course(&db, user.id, 9).await?;
        User::track_course(&db, user.id, 5).await?;
        let tracked = User::untrack_course(&db, user.id, 5)
            .await?
            .expect("user exists");
        assert_eq!(tracked, vec![9]);
        let tracked = User::untrack_course(&db, user.id, 9)
            .await?
            .expect("user exists");
        assert!(tracked.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn untracking_an_absent_course_is_a_noop(db: PgPool) -> sqlx::Result<()> {
        let user = User::create(&db, "a@x.com", "hash").await?;
        User::track_course(&db, user.id, 3).await?;
        let tracked = User::untrack_course(&db, user.id, 7)
            .await?
            .expect("user exists");
        assert_eq!(tracked, vec![3]);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn tracked_course_ops_report_missing_users(db: PgPool) -> sqlx::Result<()> {
        assert!(User::track_course(&db, 999, 1).await?.is_none());
        assert!(User::untrack_course(&db, 999, 1).await?.is_none());
        assert!(User::tracked_courses(&db, 999).await?.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn course_delete_leaves_tracked_lists_untouched(db: PgPool) -> sqlx::Result<()> {
        let course = Course::create(&db, "Algorithms", None, None).await?;
        let user = User::create(&db, "a@x.com", "hash").await?;
        User::track_course(&db, user.id, course.id).await?;

        assert!(Course::delete(&db, course.id).await?);

        // The id dangles on purpose: no cascade into tracked lists.
        let tracked = User::tracked_courses(&db, user.id)
            .await?
            .expect("user exists");
        assert_eq!(tracked, vec![course.id]);
        Ok(())
    }
}
