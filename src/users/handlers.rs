use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
    },
    error::AppError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, LoginRequest, LoginResponse, PublicUser},
        repo::User,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/create", post(create_user))
        .route("/users/login", post(login))
        .route("/users/me", get(get_me))
        .route("/users", get(list_users))
        .route("/users/verified", get(list_verified))
        .route("/users/unverified", get(list_unverified))
        .route("/users/:user_id/verify", post(verify_user))
        .route("/users/:user_id/track_course/:course_id", post(track_course))
        .route(
            "/users/:user_id/untrack_course/:course_id",
            post(untrack_course),
        )
        .route("/users/:user_id/tracked_courses", get(tracked_courses))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::Internal(e)
    })?;

    // A duplicate email surfaces as a unique violation and maps to 400.
    let user = User::create(&state.db, &payload.email, &hash).await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(AppError::Auth);
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        AppError::Internal(e)
    })?;
    if !ok {
        warn!(email = %payload.email, user_id = user.id, "login invalid password");
        return Err(AppError::Auth);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.verified).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = User::list(&state.db, None).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_verified(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = User::list(&state.db, Some(true)).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_unverified(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = User::list(&state.db, Some(false)).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
pub async fn verify_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::mark_verified(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(user_id, "user verified");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn track_course(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<i64>>, AppError> {
    let tracked = User::track_course(&state.db, user_id, course_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(user_id, course_id, "course tracked");
    Ok(Json(tracked))
}

#[instrument(skip(state))]
pub async fn untrack_course(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<i64>>, AppError> {
    let tracked = User::untrack_course(&state.db, user_id, course_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(user_id, course_id, "course untracked");
    Ok(Json(tracked))
}

#[instrument(skip(state))]
pub async fn tracked_courses(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<i64>>, AppError> {
    let tracked = User::tracked_courses(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(tracked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("student.name+tag@uni.edu"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@x.com"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email("missing@tld"));
    }
}
