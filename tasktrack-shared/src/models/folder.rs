/// Folder model
///
/// Folders are the top level of the notes hierarchy. Names are trimmed on
/// every write; the non-empty and length checks live in the API layer.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// A named container for notes pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder ID
    pub id: Uuid,

    /// Fixed partition key for the folders collection
    pub partition_key: String,

    /// Owning user (identity provider subject)
    pub user_id: String,

    /// Display name, non-empty after trimming
    pub name: String,

    /// When the folder was created
    #[serde(with = "super::time")]
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Partition key shared by every folder document
    pub const PARTITION_KEY: &'static str = "folder";

    pub fn create(user_id: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            partition_key: Self::PARTITION_KEY.to_string(),
            user_id: user_id.to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }
}

impl Document for Folder {
    const COLLECTION: &'static str = "folders";

    fn id(&self) -> Uuid {
        self.id
    }

    fn partition_key(&self) -> String {
        self.partition_key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_name() {
        let folder = Folder::create("user-1", "  Work  ");
        assert_eq!(folder.name, "Work");
        assert_eq!(folder.partition_key, Folder::PARTITION_KEY);
    }

    #[test]
    fn test_rename() {
        let mut folder = Folder::create("user-1", "Work");
        folder.rename(" Personal ");
        assert_eq!(folder.name, "Personal");
    }
}
