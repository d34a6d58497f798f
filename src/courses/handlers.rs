use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    courses::{dto::CourseRequest, repo::Course},
    error::AppError,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    Json(payload): Json<CourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Course name is required".into()));
    }
    let course = Course::create(
        &state.db,
        payload.name.trim(),
        payload.description.as_deref(),
        payload.instructor.as_deref(),
    )
    .await?;
    info!(course_id = course.id, "course created");
    Ok((StatusCode::CREATED, Json(course)))
}

#[instrument(skip(state))]
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(Course::list(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = Course::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;
    Ok(Json(course))
}

#[instrument(skip(state, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CourseRequest>,
) -> Result<Json<Course>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Course name is required".into()));
    }
    let course = Course::update(
        &state.db,
        id,
        payload.name.trim(),
        payload.description.as_deref(),
        payload.instructor.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound("Course"))?;
    info!(course_id = id, "course updated");
    Ok(Json(course))
}

/// Tracked lists are not cascaded: users keep the deleted course's id
/// until they untrack it themselves.
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !Course::delete(&state.db, id).await? {
        return Err(AppError::NotFound("Course"));
    }
    info!(course_id = id, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}
