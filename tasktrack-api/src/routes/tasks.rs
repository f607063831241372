/// Task endpoints
///
/// CRUD plus a filtered, sorted listing. Every operation is scoped to the
/// authenticated user; a task another user owns reads as 404.
///
/// # Endpoints
///
/// - `GET    /api/tasks?status=&sort=`
/// - `GET    /api/tasks/:id` (task with embedded comments, newest first)
/// - `POST   /api/tasks`
/// - `PUT    /api/tasks/:id`
/// - `DELETE /api/tasks/:id` (cascades comment deletion)
///
/// # Example Request
///
/// ```json
/// { "title": "Ship the release", "priority": 2, "status": "in-progress" }
/// ```
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tasktrack_shared::auth::AuthUser;
use tasktrack_shared::models::comment::Comment;
use tasktrack_shared::models::task::{
    sort_tasks, Task, TaskDraft, TaskSort, TaskStatus, TaskUpdate,
};
use tasktrack_shared::store::{Document, QuerySpec, SortDirection};

use super::DeleteResponse;
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// Query parameters for the task listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListTasksParams {
    /// Optional status filter; unknown values are ignored
    pub status: Option<String>,

    /// Sort mode: `priority` (default), `date` or `progress`
    pub sort: Option<String>,
}

/// Create task request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i64>,
}

/// Update task request; absent fields keep their stored value
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i64>,
    pub progress: Option<i64>,
}

/// Task with its comments embedded, newest comment first
#[derive(Debug, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,

    pub comments: Vec<Comment>,
}

/// `GET /api/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListTasksParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let mut spec = QuerySpec::new().filter("userId", user.user_id.clone());

    if let Some(status) = params.status.as_deref().and_then(TaskStatus::parse) {
        spec = spec.filter("status", status.as_str());
    }

    let mut tasks = state.tasks().query(&spec).await?;
    sort_tasks(&mut tasks, TaskSort::from_param(params.sort.as_deref()));

    Ok(Json(tasks))
}

/// `GET /api/tasks/:id`
pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetail>> {
    let task = find_owned_task(&state, &user, id).await?;

    let comments = state
        .comments()
        .query(
            &QuerySpec::new()
                .filter("taskId", task.id.to_string())
                .order_by("createdAt", SortDirection::Descending),
        )
        .await?;

    Ok(Json(TaskDetail { task, comments }))
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;

    let task = Task::create(
        &user.user_id,
        TaskDraft {
            title: title.to_string(),
            description: request.description,
            status: request.status,
            priority: request.priority,
        },
    );

    tracing::info!(task_id = %task.id, user_id = %user.user_id, "Creating task");

    let task = state.tasks().create(&task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /api/tasks/:id`
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let mut task = find_owned_task(&state, &user, id).await?;

    task.apply_update(TaskUpdate {
        // A blank title keeps the stored one; titles never become empty
        title: request
            .title
            .filter(|title| !title.trim().is_empty()),
        description: request.description,
        status: request.status,
        priority: request.priority,
        progress: request.progress,
    });

    let task = state.tasks().replace(&task).await?;
    Ok(Json(task))
}

/// `DELETE /api/tasks/:id`
///
/// Deletes the task's comments first, then the task itself. The sequence is
/// not transactional; a failure partway through leaves the remaining
/// comments and the task in place and surfaces as 500.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let task = find_owned_task(&state, &user, id).await?;

    let comments = state
        .comments()
        .query(&QuerySpec::new().filter("taskId", task.id.to_string()))
        .await?;

    tracing::info!(
        task_id = %task.id,
        comment_count = comments.len(),
        "Deleting task and its comments"
    );

    for comment in &comments {
        state
            .comments()
            .delete(comment.id, &comment.partition_key())
            .await?;
    }

    state.tasks().delete(task.id, &task.partition_key()).await?;

    Ok(Json(DeleteResponse::ok()))
}

/// Looks up a task by id within the caller's scope.
///
/// Absent and unowned both read as 404 so existence is not leaked.
pub(crate) async fn find_owned_task(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> ApiResult<Task> {
    state
        .tasks()
        .find_one(
            &QuerySpec::new()
                .filter("id", id.to_string())
                .filter("userId", user.user_id.clone()),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_allows_partial_bodies() {
        let request: CreateTaskRequest = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(request.title.as_deref(), Some("x"));
        assert!(request.priority.is_none());
        assert!(request.status.is_none());
    }

    #[test]
    fn test_task_detail_embeds_comments_alongside_task_fields() {
        let task = Task::create(
            "u",
            TaskDraft {
                title: "x".to_string(),
                ..Default::default()
            },
        );
        let detail = TaskDetail {
            comments: vec![Comment::create(task.id, "u", "hello")],
            task,
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert!(value.get("title").is_some());
        assert_eq!(value["comments"].as_array().unwrap().len(), 1);
    }
}
