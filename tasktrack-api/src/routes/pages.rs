/// Page endpoints
///
/// Pages have no owner field of their own; every operation authorizes
/// through the parent folder, so a page in another user's folder reads as
/// 404 just like a missing one.
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use tasktrack_shared::auth::AuthUser;
use tasktrack_shared::models::page::{Page, PageUpdate};
use tasktrack_shared::store::{Document, QuerySpec};

use super::folders::find_owned_folder;
use super::DeleteResponse;
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// Create page request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePageRequest {
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Content exceeds 500 character limit"))]
    pub content: Option<String>,
}

/// Update page request; absent fields keep their stored value
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePageRequest {
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Content exceeds 500 character limit"))]
    pub content: Option<String>,
}

/// `GET /api/folders/:id/pages`
pub async fn list_pages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(folder_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Page>>> {
    let folder = find_owned_folder(&state, &user, folder_id).await?;

    let mut pages = state
        .pages()
        .query(&QuerySpec::new().filter("folderId", folder.id.to_string()))
        .await?;

    pages.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    Ok(Json(pages))
}

/// `POST /api/folders/:id/pages`
pub async fn create_page(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(folder_id): Path<Uuid>,
    Json(request): Json<CreatePageRequest>,
) -> ApiResult<(StatusCode, Json<Page>)> {
    let folder = find_owned_folder(&state, &user, folder_id).await?;

    request.validate()?;

    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Page title is required".to_string()))?;

    let page = state
        .pages()
        .create(&Page::create(
            folder.id,
            title,
            request.content.as_deref().unwrap_or_default(),
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(page)))
}

/// `GET /api/pages/:id`
pub async fn get_page(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Page>> {
    let page = find_owned_page(&state, &user, id).await?;
    Ok(Json(page))
}

/// `PUT /api/pages/:id`
pub async fn update_page(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePageRequest>,
) -> ApiResult<Json<Page>> {
    let mut page = find_owned_page(&state, &user, id).await?;

    request.validate()?;

    page.apply_update(PageUpdate {
        title: request.title,
        content: request.content,
    });

    let page = state.pages().replace(&page).await?;
    Ok(Json(page))
}

/// `DELETE /api/pages/:id`
pub async fn delete_page(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let page = find_owned_page(&state, &user, id).await?;

    state.pages().delete(page.id, &page.partition_key()).await?;

    Ok(Json(DeleteResponse::ok()))
}

/// Looks up a page and authorizes it through its parent folder.
async fn find_owned_page(state: &AppState, user: &AuthUser, id: Uuid) -> ApiResult<Page> {
    let page = state
        .pages()
        .find_one(&QuerySpec::new().filter("id", id.to_string()))
        .await?
        .ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;

    // A page in someone else's folder is indistinguishable from a missing one
    find_owned_folder(state, user, page.folder_id)
        .await
        .map_err(|_| ApiError::NotFound("Page not found".to_string()))?;

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasktrack_shared::models::page::MAX_CONTENT_LENGTH;

    #[test]
    fn test_content_length_is_bounded() {
        let request = CreatePageRequest {
            title: Some("t".to_string()),
            content: Some("x".repeat(MAX_CONTENT_LENGTH + 1)),
        };
        assert!(request.validate().is_err());

        let request = CreatePageRequest {
            title: Some("t".to_string()),
            content: Some("x".repeat(MAX_CONTENT_LENGTH)),
        };
        assert!(request.validate().is_ok());
    }
}
