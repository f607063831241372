/// Comment endpoints
///
/// Comments are created through their parent task, which must belong to the
/// caller; deletion checks the comment's own owner. Both paths return 404
/// rather than 403 for resources outside the caller's scope.
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use tasktrack_shared::auth::AuthUser;
use tasktrack_shared::models::comment::Comment;
use tasktrack_shared::store::{Document, QuerySpec};

use super::tasks::find_owned_task;
use super::DeleteResponse;
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// Create comment request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub text: Option<String>,
}

/// `POST /api/tasks/:id/comments`
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
    Json(request): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    // The parent task must exist and belong to the caller
    let task = find_owned_task(&state, &user, task_id).await?;

    let text = request
        .text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Comment text is required".to_string()))?;

    let comment = state
        .comments()
        .create(&Comment::create(task.id, &user.user_id, text))
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// `DELETE /api/comments/:id`
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let comment = state
        .comments()
        .find_one(
            &QuerySpec::new()
                .filter("id", id.to_string())
                .filter("userId", user.user_id.clone()),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    state
        .comments()
        .delete(comment.id, &comment.partition_key())
        .await?;

    Ok(Json(DeleteResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_tolerates_missing_text() {
        let request: CreateCommentRequest = serde_json::from_str("{}").unwrap();
        assert!(request.text.is_none());
    }
}
