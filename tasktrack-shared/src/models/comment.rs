/// Comment model
///
/// Comments hang off a single task; the task id doubles as the partition
/// key, so a task's comments live in one partition and cascade deletes stay
/// cheap. Text is trimmed on create and must be validated non-empty by the
/// caller.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// A note attached to one task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Parent task; also the partition key
    pub task_id: Uuid,

    /// Owning user (identity provider subject)
    pub user_id: String,

    /// Comment body, non-empty after trimming
    pub text: String,

    /// When the comment was created
    #[serde(with = "super::time")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn create(task_id: Uuid, user_id: &str, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            user_id: user_id.to_string(),
            text: text.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

impl Document for Comment {
    const COLLECTION: &'static str = "comments";

    fn id(&self) -> Uuid {
        self.id
    }

    fn partition_key(&self) -> String {
        self.task_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_text() {
        let task_id = Uuid::new_v4();
        let comment = Comment::create(task_id, "user-1", "  looks good  ");

        assert_eq!(comment.text, "looks good");
        assert_eq!(comment.task_id, task_id);
        assert_eq!(comment.partition_key(), task_id.to_string());
    }

    #[test]
    fn test_wire_format() {
        let comment = Comment::create(Uuid::new_v4(), "user-1", "hi");
        let value = serde_json::to_value(&comment).unwrap();

        assert!(value.get("taskId").is_some());
        assert!(value.get("userId").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
