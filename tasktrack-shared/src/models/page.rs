/// Page model
///
/// Pages live inside a folder; the folder id is the partition key. Content
/// is capped at [`MAX_CONTENT_LENGTH`] characters, enforced in the API
/// layer before a page is built or updated.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// Upper bound on page content length, in characters
pub const MAX_CONTENT_LENGTH: usize = 500;

/// A notes page inside a folder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Unique page ID
    pub id: Uuid,

    /// Parent folder; also the partition key
    pub folder_id: Uuid,

    /// Page title, non-empty after trimming
    pub title: String,

    /// Page body, at most [`MAX_CONTENT_LENGTH`] characters
    pub content: String,

    /// When the page was created
    #[serde(with = "super::time")]
    pub created_at: DateTime<Utc>,

    /// When the page was last updated
    #[serde(with = "super::time")]
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a page; absent fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct PageUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Page {
    pub fn create(folder_id: Uuid, title: &str, content: &str) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            folder_id,
            title: title.trim().to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges an update into the page and refreshes `updated_at`.
    pub fn apply_update(&mut self, update: PageUpdate) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }
}

impl Document for Page {
    const COLLECTION: &'static str = "pages";

    fn id(&self) -> Uuid {
        self.id
    }

    fn partition_key(&self) -> String {
        self.folder_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_title_but_not_content() {
        let folder_id = Uuid::new_v4();
        let page = Page::create(folder_id, "  Notes  ", "  keep spaces  ");

        assert_eq!(page.title, "Notes");
        assert_eq!(page.content, "  keep spaces  ");
        assert_eq!(page.partition_key(), folder_id.to_string());
    }

    #[test]
    fn test_apply_update_merges_fields() {
        let mut page = Page::create(Uuid::new_v4(), "Notes", "old");
        let before = page.updated_at;

        page.apply_update(PageUpdate {
            content: Some("new".to_string()),
            ..Default::default()
        });

        assert_eq!(page.title, "Notes");
        assert_eq!(page.content, "new");
        assert!(page.updated_at >= before);
    }
}
