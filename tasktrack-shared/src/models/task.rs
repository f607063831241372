/// Task model and write-side rules
///
/// Tasks are the core entity of the tracker. All write paths go through
/// [`Task::create`] and [`Task::apply_update`] so the range rules hold for
/// every stored document:
///
/// - `priority` is clamped into `[1, 5]` (default 3)
/// - `progress` is clamped into `[0, 100]` and always starts at 0
/// - an invalid `status` falls back to `todo` on create and keeps the
///   previous value on update
///
/// # Example
///
/// ```
/// use tasktrack_shared::models::task::{Task, TaskDraft, TaskStatus};
///
/// let task = Task::create(
///     "user-1",
///     TaskDraft {
///         title: "Ship the release".to_string(),
///         description: Some("  cut a tag  ".to_string()),
///         status: Some("in-progress".to_string()),
///         priority: Some(99),
///     },
/// );
///
/// assert_eq!(task.priority, 5);
/// assert_eq!(task.progress, 0);
/// assert_eq!(task.status, TaskStatus::InProgress);
/// assert_eq!(task.description, "cut a tag");
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "todo")]
    Todo,

    #[serde(rename = "in-progress")]
    InProgress,

    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    /// Parses a wire-format status string, returning `None` for anything
    /// outside the three known values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

/// A to-do item owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Fixed partition key for the tasks collection
    pub partition_key: String,

    /// Owning user (identity provider subject)
    pub user_id: String,

    /// Short title, non-empty after trimming
    pub title: String,

    /// Free-form description, may be empty
    pub description: String,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority in `[1, 5]`, 1 is most urgent
    pub priority: u8,

    /// Completion percentage in `[0, 100]`
    pub progress: u8,

    /// When the task was created
    #[serde(with = "super::time")]
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    #[serde(with = "super::time")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
///
/// `title` must already be checked non-empty by the caller; the remaining
/// fields are optional and fall back to their defaults.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i64>,
}

/// Partial update for a task; absent fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i64>,
    pub progress: Option<i64>,
}

impl Task {
    /// Partition key shared by every task document
    pub const PARTITION_KEY: &'static str = "task";

    /// Creates a new task for `user_id`, applying defaults and clamping.
    ///
    /// `progress` always starts at 0; callers cannot seed it.
    pub fn create(user_id: &str, draft: TaskDraft) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            partition_key: Self::PARTITION_KEY.to_string(),
            user_id: user_id.to_string(),
            title: draft.title.trim().to_string(),
            description: draft
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            status: draft
                .status
                .as_deref()
                .and_then(TaskStatus::parse)
                .unwrap_or(TaskStatus::Todo),
            priority: clamp_priority(draft.priority.unwrap_or(DEFAULT_PRIORITY)),
            progress: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges an update into the task and refreshes `updated_at`.
    ///
    /// An unparseable status keeps the stored value rather than erroring;
    /// empty-after-trim titles are the caller's to reject.
    pub fn apply_update(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(status) = update.status.as_deref().and_then(TaskStatus::parse) {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = clamp_priority(priority);
        }
        if let Some(progress) = update.progress {
            self.progress = clamp_progress(progress);
        }
        self.updated_at = Utc::now();
    }
}

impl Document for Task {
    const COLLECTION: &'static str = "tasks";

    fn id(&self) -> Uuid {
        self.id
    }

    fn partition_key(&self) -> String {
        self.partition_key.clone()
    }
}

const DEFAULT_PRIORITY: i64 = 3;

fn clamp_priority(value: i64) -> u8 {
    value.clamp(1, 5) as u8
}

fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Sort order for task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Priority ascending, then newest first (the default)
    #[default]
    Priority,

    /// Newest first
    Date,

    /// Progress descending, then priority ascending
    Progress,
}

impl TaskSort {
    /// Resolves the `sort` query parameter; unknown values use the default.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("date") => TaskSort::Date,
            Some("progress") => TaskSort::Progress,
            _ => TaskSort::Priority,
        }
    }
}

/// Sorts a task listing according to the requested order.
pub fn sort_tasks(tasks: &mut [Task], sort: TaskSort) {
    match sort {
        TaskSort::Date => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        TaskSort::Progress => tasks.sort_by(|a, b| {
            b.progress
                .cmp(&a.progress)
                .then(a.priority.cmp(&b.priority))
        }),
        TaskSort::Priority => tasks.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(b.created_at.cmp(&a.created_at))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TaskStatus::parse("todo"), Some(TaskStatus::Todo));
        assert_eq!(TaskStatus::parse("in-progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("done"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::parse("archived"), None);
        assert_eq!(TaskStatus::parse(""), None);
    }

    #[test]
    fn test_create_applies_defaults() {
        let task = Task::create("user-1", draft("  hello  "));

        assert_eq!(task.title, "hello");
        assert_eq!(task.description, "");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, 3);
        assert_eq!(task.progress, 0);
        assert_eq!(task.partition_key, Task::PARTITION_KEY);
        assert_eq!(task.user_id, "user-1");
    }

    #[test]
    fn test_create_clamps_priority() {
        let mut d = draft("x");
        d.priority = Some(99);
        assert_eq!(Task::create("u", d).priority, 5);

        let mut d = draft("x");
        d.priority = Some(-4);
        assert_eq!(Task::create("u", d).priority, 1);
    }

    #[test]
    fn test_create_ignores_invalid_status() {
        let mut d = draft("x");
        d.status = Some("bogus".to_string());
        assert_eq!(Task::create("u", d).status, TaskStatus::Todo);
    }

    #[test]
    fn test_update_clamps_progress() {
        let mut task = Task::create("u", draft("x"));

        task.apply_update(TaskUpdate {
            progress: Some(150),
            ..Default::default()
        });
        assert_eq!(task.progress, 100);

        task.apply_update(TaskUpdate {
            progress: Some(-20),
            ..Default::default()
        });
        assert_eq!(task.progress, 0);
    }

    #[test]
    fn test_update_retains_status_on_invalid_value() {
        let mut d = draft("x");
        d.status = Some("done".to_string());
        let mut task = Task::create("u", d);

        task.apply_update(TaskUpdate {
            status: Some("not-a-status".to_string()),
            ..Default::default()
        });
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn test_update_refreshes_updated_at() {
        let mut task = Task::create("u", draft("x"));
        let before = task.updated_at;

        task.apply_update(TaskUpdate {
            title: Some("renamed".to_string()),
            ..Default::default()
        });

        assert_eq!(task.title, "renamed");
        assert!(task.updated_at >= before);
    }

    #[test]
    fn test_sort_param_resolution() {
        assert_eq!(TaskSort::from_param(None), TaskSort::Priority);
        assert_eq!(TaskSort::from_param(Some("date")), TaskSort::Date);
        assert_eq!(TaskSort::from_param(Some("progress")), TaskSort::Progress);
        assert_eq!(TaskSort::from_param(Some("nonsense")), TaskSort::Priority);
    }

    fn task_with(priority: u8, progress: u8, age: Duration) -> Task {
        let mut task = Task::create("u", draft("x"));
        task.priority = priority;
        task.progress = progress;
        task.created_at = Utc::now() - age;
        task
    }

    #[test]
    fn test_sort_by_date_newest_first() {
        let mut tasks = vec![
            task_with(1, 0, Duration::hours(2)),
            task_with(1, 0, Duration::hours(1)),
            task_with(1, 0, Duration::hours(3)),
        ];
        sort_tasks(&mut tasks, TaskSort::Date);

        assert!(tasks[0].created_at >= tasks[1].created_at);
        assert!(tasks[1].created_at >= tasks[2].created_at);
    }

    #[test]
    fn test_sort_by_progress_breaks_ties_on_priority() {
        let mut tasks = vec![
            task_with(4, 50, Duration::hours(1)),
            task_with(2, 50, Duration::hours(1)),
            task_with(1, 80, Duration::hours(1)),
        ];
        sort_tasks(&mut tasks, TaskSort::Progress);

        assert_eq!(tasks[0].progress, 80);
        assert_eq!(tasks[1].priority, 2);
        assert_eq!(tasks[2].priority, 4);
    }

    #[test]
    fn test_sort_by_priority_breaks_ties_on_date() {
        let mut tasks = vec![
            task_with(2, 0, Duration::hours(2)),
            task_with(2, 0, Duration::hours(1)),
            task_with(1, 0, Duration::hours(3)),
        ];
        sort_tasks(&mut tasks, TaskSort::Priority);

        assert_eq!(tasks[0].priority, 1);
        assert!(tasks[1].created_at >= tasks[2].created_at);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let task = Task::create("user-1", draft("x"));
        let value = serde_json::to_value(&task).unwrap();

        assert!(value.get("userId").is_some());
        assert!(value.get("partitionKey").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["status"], "todo");
    }
}
