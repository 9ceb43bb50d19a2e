//! Persistence for the single `tasks` table.
//!
//! [`TaskDb`] is constructed once at startup and cloned into handlers. The
//! pool connects lazily, and the schema is created on first use behind a
//! `OnceCell`, so concurrent first requests all wait on a single
//! `CREATE TABLE IF NOT EXISTS`.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use shared::{completed, Task, UpdateTaskRequest};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::sync::OnceCell;

const MAX_CONNECTIONS: u32 = 4;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        completed INTEGER DEFAULT 0,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )
"#;

const SELECT_COLUMNS: &str = "SELECT id, title, description, completed, created_at FROM tasks";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// A validated task ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Fields to overwrite on an existing task; `None` keeps the stored value.
/// An empty description clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: Option<String>,
    completed: Option<i64>,
    created_at: NaiveDateTime,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed.is_some_and(|c| c != 0),
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct TaskDb {
    pool: SqlitePool,
    schema: Arc<OnceCell<()>>,
}

impl TaskDb {
    /// Prepares a handle on the SQLite file at `path`. Nothing touches the
    /// disk until the first query.
    pub fn open(path: &Path) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy_with(options);
        Self {
            pool,
            schema: Arc::new(OnceCell::new()),
        }
    }

    async fn pool(&self) -> DbResult<&SqlitePool> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
                tracing::debug!("tasks table ready");
                Ok::<_, sqlx::Error>(())
            })
            .await?;
        Ok(&self.pool)
    }

    /// All tasks, newest first. Rows created within the same second fall back
    /// to id order.
    pub async fn list_all(&self) -> DbResult<Vec<Task>> {
        let pool = self.pool().await?;
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    pub async fn get_one(&self, id: i64) -> DbResult<Option<Task>> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, TaskRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Task::from))
    }

    pub async fn create(&self, task: NewTask) -> DbResult<Task> {
        let pool = self.pool().await?;
        let description = task.description.filter(|d| !d.is_empty());
        let result =
            sqlx::query("INSERT INTO tasks (title, description, completed) VALUES (?, ?, ?)")
                .bind(&task.title)
                .bind(description)
                .bind(i64::from(completed::as_int(task.completed)))
                .execute(pool)
                .await?;
        let id = result.last_insert_rowid();
        self.get_one(id)
            .await?
            .ok_or(DbError::Sqlx(sqlx::Error::RowNotFound))
    }

    /// Merges `patch` over the stored row. Returns `None` when `id` is
    /// unknown. Concurrent updates to the same id are last-write-wins.
    pub async fn update(&self, id: i64, patch: TaskPatch) -> DbResult<Option<Task>> {
        let Some(existing) = self.get_one(id).await? else {
            return Ok(None);
        };
        let title = patch.title.unwrap_or(existing.title);
        let description = match patch.description {
            Some(d) if d.is_empty() => None,
            Some(d) => Some(d),
            None => existing.description,
        };
        let completed = patch.completed.unwrap_or(existing.completed);

        let pool = self.pool().await?;
        sqlx::query("UPDATE tasks SET title = ?, description = ?, completed = ? WHERE id = ?")
            .bind(title)
            .bind(description)
            .bind(i64::from(completed::as_int(completed)))
            .bind(id)
            .execute(pool)
            .await?;
        self.get_one(id).await
    }

    /// Returns whether a row was actually removed.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, TaskDb) {
        let dir = tempfile::tempdir().unwrap();
        let db = TaskDb::open(&dir.path().join("tasks.db"));
        (dir, db)
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            completed: false,
        }
    }

    #[tokio::test]
    async fn empty_table_lists_nothing() {
        let (_dir, db) = open_temp();
        assert!(db.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_first_access_creates_schema_once() {
        let (_dir, db) = open_temp();
        let (a, b, c) = tokio::join!(db.list_all(), db.list_all(), db.create(new_task("x")));
        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(c.unwrap().title, "x");
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let (_dir, db) = open_temp();
        let task = db.create(new_task("Buy milk")).await.unwrap();
        assert!(task.id > 0);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, None);
        assert!(!task.completed);
        assert!(task.created_at.and_utc().timestamp() > 0);
    }

    #[tokio::test]
    async fn create_stores_empty_description_as_null() {
        let (_dir, db) = open_temp();
        let task = db
            .create(NewTask {
                description: Some(String::new()),
                ..new_task("a")
            })
            .await
            .unwrap();
        assert_eq!(task.description, None);
    }

    #[tokio::test]
    async fn get_one_missing_is_none() {
        let (_dir, db) = open_temp();
        assert_eq!(db.get_one(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (_dir, db) = open_temp();
        let first = db.create(new_task("first")).await.unwrap();
        let second = db.create(new_task("second")).await.unwrap();
        let third = db.create(new_task("third")).await.unwrap();

        let ids: Vec<i64> = db.list_all().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let (_dir, db) = open_temp();
        let task = db
            .create(NewTask {
                title: "Write report".into(),
                description: Some("quarterly".into()),
                completed: false,
            })
            .await
            .unwrap();

        let updated = db
            .update(
                task.id,
                TaskPatch {
                    completed: Some(true),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Write report");
        assert_eq!(updated.description.as_deref(), Some("quarterly"));
        assert_eq!(updated.created_at, task.created_at);

        let retitled = db
            .update(
                task.id,
                TaskPatch {
                    title: Some("Write annual report".into()),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retitled.title, "Write annual report");
        assert!(retitled.completed);
    }

    #[tokio::test]
    async fn update_with_empty_description_clears_it() {
        let (_dir, db) = open_temp();
        let task = db
            .create(NewTask {
                description: Some("notes".into()),
                ..new_task("a")
            })
            .await
            .unwrap();
        let cleared = db
            .update(
                task.id,
                TaskPatch {
                    description: Some(String::new()),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.description, None);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let (_dir, db) = open_temp();
        let result = db
            .update(
                9,
                TaskPatch {
                    title: Some("nope".into()),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(result, None);
        assert!(db.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn completed_flag_round_trips() {
        let (_dir, db) = open_temp();
        let task = db
            .create(NewTask {
                completed: true,
                ..new_task("done already")
            })
            .await
            .unwrap();
        assert!(task.completed);

        let reopened = db
            .update(task.id, TaskPatch::from(shared::UpdateTaskRequest::completed(false)))
            .await
            .unwrap()
            .unwrap();
        assert!(!reopened.completed);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_row() {
        let (_dir, db) = open_temp();
        let keep = db.create(new_task("keep")).await.unwrap();
        let drop = db.create(new_task("drop")).await.unwrap();

        assert!(db.delete(drop.id).await.unwrap());
        let remaining = db.list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
        assert_eq!(db.get_one(drop.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_missing_leaves_table_unchanged() {
        let (_dir, db) = open_temp();
        db.create(new_task("only")).await.unwrap();
        assert!(!db.delete(1234).await.unwrap());
        assert_eq!(db.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        let created = TaskDb::open(&path).create(new_task("persist")).await.unwrap();

        let reopened = TaskDb::open(&path);
        let found = reopened.get_one(created.id).await.unwrap().unwrap();
        assert_eq!(found.title, "persist");
    }
}
