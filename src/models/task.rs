use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite};
use validator::Validate;

/// Input structure for creating a task.
///
/// There is no owner field: the owner is always the authenticated caller.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// At most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: String,

    /// Free-form; "High", "Medium" and "Low" are the usual values.
    #[validate(length(min = 1, max = 50))]
    pub priority: String,
}

/// Represents a task as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: String,
    /// Identifier of the user who owns the task.
    pub owner_id: i64,
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Exact, case-sensitive priority match. An empty value means no filter.
    pub priority: Option<String>,
}

impl TaskQuery {
    pub fn priority_filter(&self) -> Option<&str> {
        self.priority.as_deref().filter(|p| !p.is_empty())
    }
}

impl Task {
    pub async fn create<'e, E>(
        executor: E,
        input: TaskInput,
        owner_id: i64,
    ) -> Result<Task, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, description, priority, owner_id)
             VALUES (?, ?, ?, ?)
             RETURNING id, title, description, priority, owner_id",
        )
        .bind(input.title)
        .bind(input.description)
        .bind(input.priority)
        .bind(owner_id)
        .fetch_one(executor)
        .await
    }

    /// Lists the tasks owned by `owner_id`, optionally narrowed to one priority.
    pub async fn list_for_owner<'e, E>(
        executor: E,
        owner_id: i64,
        priority: Option<&str>,
    ) -> Result<Vec<Task>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        match priority {
            Some(priority) => {
                sqlx::query_as::<_, Task>(
                    "SELECT id, title, description, priority, owner_id FROM tasks
                     WHERE owner_id = ? AND priority = ? ORDER BY id",
                )
                .bind(owner_id)
                .bind(priority)
                .fetch_all(executor)
                .await
            }
            None => {
                sqlx::query_as::<_, Task>(
                    "SELECT id, title, description, priority, owner_id FROM tasks
                     WHERE owner_id = ? ORDER BY id",
                )
                .bind(owner_id)
                .fetch_all(executor)
                .await
            }
        }
    }
}
