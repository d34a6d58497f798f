use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    assignments::{dto::AssignmentRequest, repo::Assignment},
    error::AppError,
    state::AppState,
    storage::attachment_key,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assignments", get(list_assignments).post(create_assignment))
        .route(
            "/assignments/:id",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
        .route("/assignments/:id/attach", post(attach_file))
        .route("/assignments/:id/attachment", get(get_attachment))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
}

#[instrument(skip(state, payload))]
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<AssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Assignment title is required".into()));
    }
    let assignment = Assignment::create(
        &state.db,
        payload.title.trim(),
        payload.description.as_deref(),
        payload.due_date,
        payload.course_id,
    )
    .await?;
    info!(assignment_id = assignment.id, "assignment created");
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[instrument(skip(state))]
pub async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    Ok(Json(Assignment::list(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = Assignment::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Assignment"))?;
    Ok(Json(assignment))
}

#[instrument(skip(state, payload))]
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignmentRequest>,
) -> Result<Json<Assignment>, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Assignment title is required".into()));
    }
    let assignment = Assignment::update(
        &state.db,
        id,
        payload.title.trim(),
        payload.description.as_deref(),
        payload.due_date,
        payload.course_id,
    )
    .await?
    .ok_or(AppError::NotFound("Assignment"))?;
    info!(assignment_id = id, "assignment updated");
    Ok(Json(assignment))
}

#[instrument(skip(state))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let file_key = Assignment::delete(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Assignment"))?;

    // Best-effort cleanup of the stored attachment; the row is already gone.
    if let Some(key) = file_key {
        if let Err(e) = state.storage.delete_object(&key).await {
            warn!(error = %e, assignment_id = id, key = %key, "attachment cleanup failed");
        }
    }

    info!(assignment_id = id, "assignment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 302 to a short-lived presigned URL for the attachment.
#[instrument(skip(state))]
pub async fn get_attachment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let assignment = Assignment::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Assignment"))?;
    let key = assignment.file_key.ok_or(AppError::NotFound("Attachment"))?;

    let url = state.storage.presign_get(&key, 600).await.map_err(|e| {
        error!(error = %e, assignment_id = id, "presign failed");
        AppError::Internal(e)
    })?;
    Ok(Redirect::temporary(&url))
}

/// POST /assignments/:id/attach (multipart, field `file`)
#[instrument(skip(state, mp))]
pub async fn attach_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut mp: Multipart,
) -> Result<Json<Assignment>, AppError> {
    if Assignment::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("Assignment"));
    }

    let mut upload = None;
    loop {
        let field = match mp.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "reading multipart field failed");
                return Err(AppError::Validation("Malformed multipart body".into()));
            }
        };
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "attachment".into());
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field.bytes().await.map_err(|e| {
                error!(error = %e, "reading multipart field failed");
                AppError::Validation("Malformed multipart body".into())
            })?;
            upload = Some((filename, content_type, data));
            break;
        }
    }
    let Some((filename, content_type, data)) = upload else {
        return Err(AppError::Validation("file field is required".into()));
    };

    let key = attachment_key(id, &filename);
    state
        .storage
        .put_object(&key, data, &content_type)
        .await
        .map_err(|e| {
            error!(error = %e, assignment_id = id, "attachment upload failed");
            AppError::Internal(e)
        })?;

    let assignment = Assignment::set_attachment(&state.db, id, &key)
        .await?
        .ok_or(AppError::NotFound("Assignment"))?;
    info!(assignment_id = id, key = %key, "file attached");
    Ok(Json(assignment))
}
