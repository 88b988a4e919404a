//! SQLite task store.
//!
//! Implements [`TaskStore`] from `todosync_core::storage` using SQLite.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use todosync_core::storage::{Result, StoreError, TaskStore};
use todosync_core::task::{is_remote_id, Task, TaskId};

use super::conversions::{format_datetime, row_to_task};
use super::error::{map_store_error, map_task_error};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Owned column values for a task, ready to be moved into a connection closure.
struct TaskParams {
    id: TaskId,
    title: String,
    completed: bool,
    image_url: Option<String>,
    is_local_only: bool,
    is_modified: bool,
    created_at: String,
}

impl From<&Task> for TaskParams {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            completed: task.completed,
            image_url: task.image_url.clone(),
            is_local_only: task.is_local_only,
            is_modified: task.is_modified,
            created_at: format_datetime(&task.created_at),
        }
    }
}

/// Rejects a task whose id does not match its provenance.
///
/// Synced tasks carry positive remote ids and local-only tasks negative ones.
fn check_task_id(task: &Task) -> Result<()> {
    let valid = if task.is_local_only {
        task.id < 0
    } else {
        is_remote_id(task.id)
    };
    if valid {
        Ok(())
    } else {
        let kind = if task.is_local_only { "local-only" } else { "synced" };
        Err(StoreError::InvalidData(format!(
            "{kind} task cannot have id {}",
            task.id
        )))
    }
}

impl TaskParams {
    fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<usize> {
        conn.execute(
            schema::INSERT_OR_REPLACE_TASK,
            rusqlite::params![
                self.id,
                self.title,
                self.completed,
                self.image_url,
                self.is_local_only,
                self.is_modified,
                self.created_at
            ],
        )
    }
}

/// SQLite-based task store.
pub struct SqliteTaskStore {
    conn: Connection,
}

impl SqliteTaskStore {
    /// Creates a new store with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;
        tracing::debug!(%path, "Opened task database");

        Ok(Self { conn })
    }

    /// Creates a new store with an in-memory database.
    ///
    /// Data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_TASKS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_task).map_err(wrap_err)?;

                let mut tasks = Vec::new();
                for row_result in rows {
                    tasks.push(row_result.map_err(wrap_err)?);
                }
                Ok(tasks)
            })
            .await
            .map_err(map_store_error)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_TASK_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_task) {
                    Ok(task) => Ok(Some(task)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_task_error(e, id))
    }

    async fn insert_task(&self, task: &Task) -> Result<()> {
        check_task_id(task)?;
        let params = TaskParams::from(task);
        let id = task.id;

        self.conn
            .call(move |conn| {
                params.insert(conn).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_task_error(e, id))
    }

    async fn insert_tasks(&self, tasks: &[Task]) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }
        tasks.iter().try_for_each(check_task_id)?;
        let params: Vec<TaskParams> = tasks.iter().map(TaskParams::from).collect();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                for task in &params {
                    task.insert(&tx).map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(map_store_error)
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let params = TaskParams::from(task);
        let id = task.id;

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_TASK,
                        rusqlite::params![
                            params.id,
                            params.title,
                            params.completed,
                            params.image_url,
                            params.is_modified
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_task_error(e, id))
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_TASK, [id]).map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_task_error(e, id))
    }

    async fn delete_synced_tasks(&self) -> Result<usize> {
        self.conn
            .call(|conn| {
                conn.execute(schema::DELETE_SYNCED_UNMODIFIED_TASKS, [])
                    .map_err(wrap_err)
            })
            .await
            .map_err(map_store_error)
    }

    async fn replace_synced_tasks(&self, tasks: &[Task]) -> Result<usize> {
        if let Some(task) = tasks.iter().find(|task| task.is_local_only) {
            return Err(StoreError::InvalidData(format!(
                "task {} is local-only and cannot replace synced tasks",
                task.id
            )));
        }
        tasks.iter().try_for_each(check_task_id)?;
        let params: Vec<TaskParams> = tasks.iter().map(TaskParams::from).collect();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let deleted = tx
                    .execute(schema::DELETE_SYNCED_UNMODIFIED_TASKS, [])
                    .map_err(wrap_err)?;
                for task in &params {
                    task.insert(&tx).map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(deleted)
            })
            .await
            .map_err(map_store_error)
    }

    async fn modified_synced_ids(&self) -> Result<HashSet<TaskId>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_MODIFIED_SYNCED_IDS)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, TaskId>(0))
                    .map_err(wrap_err)?;

                let mut ids = HashSet::new();
                for row_result in rows {
                    ids.insert(row_result.map_err(wrap_err)?);
                }
                Ok(ids)
            })
            .await
            .map_err(map_store_error)
    }

    async fn next_local_id(&self) -> Result<TaskId> {
        self.conn
            .call(|conn| {
                conn.query_row(schema::SELECT_NEXT_LOCAL_ID, [], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    async fn store() -> SqliteTaskStore {
        SqliteTaskStore::new_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = store().await;
        let task = Task::synced(1, "Task 1", false).with_image_url("https://img/small");

        store.insert_task(&task).await.unwrap();

        let retrieved = store.get_task(1).await.unwrap();
        assert_eq!(retrieved, Some(task));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = store().await;
        assert!(store.get_task(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_on_same_id() {
        let store = store().await;
        store
            .insert_task(&Task::synced(1, "first", false))
            .await
            .unwrap();
        store
            .insert_task(&Task::synced(1, "second", true))
            .await
            .unwrap();

        let tasks = store.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "second");
    }

    #[tokio::test]
    async fn test_list_orders_local_first_then_newest() {
        let store = store().await;
        let now = Utc::now();
        let tasks = vec![
            Task::synced(2, "synced b", false).with_created_at(now),
            Task::synced(1, "synced a", false).with_created_at(now),
            Task::local(-1, "old local").with_created_at(now - Duration::hours(2)),
            Task::local(-2, "new local").with_created_at(now - Duration::hours(1)),
        ];
        store.insert_tasks(&tasks).await.unwrap();

        let ids: Vec<_> = store
            .list_tasks()
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(ids, vec![-2, -1, 1, 2]);
    }

    #[tokio::test]
    async fn test_update_task() {
        let store = store().await;
        let mut task = Task::synced(1, "Original", false);
        store.insert_task(&task).await.unwrap();

        task.title = "Updated".to_string();
        task.completed = true;
        task.is_modified = true;
        store.update_task(&task).await.unwrap();

        let retrieved = store.get_task(1).await.unwrap().unwrap();
        assert_eq!(retrieved.title, "Updated");
        assert!(retrieved.completed);
        assert!(retrieved.is_modified);
    }

    #[tokio::test]
    async fn test_update_nonexistent() {
        let store = store().await;
        let result = store.update_task(&Task::synced(8, "x", false)).await;
        assert_eq!(result, Err(StoreError::task_not_found(8)));
    }

    #[tokio::test]
    async fn test_delete_task() {
        let store = store().await;
        store.insert_task(&Task::local(-1, "x")).await.unwrap();

        store.delete_task(-1).await.unwrap();

        assert!(store.get_task(-1).await.unwrap().is_none());
        assert_eq!(
            store.delete_task(-1).await,
            Err(StoreError::task_not_found(-1))
        );
    }

    #[tokio::test]
    async fn test_delete_synced_keeps_local_and_modified() {
        let store = store().await;
        let mut edited = Task::synced(2, "edited", false);
        edited.is_modified = true;
        store
            .insert_tasks(&[Task::synced(1, "plain", false), edited, Task::local(-1, "local")])
            .await
            .unwrap();

        let deleted = store.delete_synced_tasks().await.unwrap();

        assert_eq!(deleted, 1);
        let ids: HashSet<_> = store
            .list_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, [2, -1].into_iter().collect::<HashSet<_>>());
        assert_eq!(
            store.modified_synced_ids().await.unwrap(),
            [2].into_iter().collect::<HashSet<_>>()
        );
    }

    #[tokio::test]
    async fn test_replace_synced_tasks() {
        let store = store().await;
        store
            .insert_tasks(&[Task::synced(1, "stale", false), Task::local(-1, "local")])
            .await
            .unwrap();

        let deleted = store
            .replace_synced_tasks(&[Task::synced(2, "fresh", true)])
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        let titles: Vec<_> = store
            .list_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["local", "fresh"]);
    }

    #[tokio::test]
    async fn test_replace_synced_rejects_clashing_id() {
        let store = store().await;
        store.insert_task(&Task::local(-1, "local")).await.unwrap();

        let result = store
            .replace_synced_tasks(&[Task::synced(-1, "remote", false)])
            .await;

        assert!(matches!(result, Err(StoreError::InvalidData(_))));
        let tasks = store.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "local");
        assert!(tasks[0].is_local_only);
    }

    #[tokio::test]
    async fn test_insert_rejects_id_of_wrong_kind() {
        let store = store().await;

        assert!(matches!(
            store.insert_task(&Task::synced(0, "zero", false)).await,
            Err(StoreError::InvalidData(_))
        ));
        assert!(matches!(
            store.insert_tasks(&[Task::local(3, "positive local")]).await,
            Err(StoreError::InvalidData(_))
        ));
        assert!(matches!(
            store.replace_synced_tasks(&[Task::local(-2, "local")]).await,
            Err(StoreError::InvalidData(_))
        ));
        assert!(store.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_next_local_id() {
        let store = store().await;
        assert_eq!(store.next_local_id().await.unwrap(), -1);

        store
            .insert_task(&Task::synced(50, "synced", false))
            .await
            .unwrap();
        assert_eq!(store.next_local_id().await.unwrap(), -1);

        store.insert_task(&Task::local(-1, "a")).await.unwrap();
        store.insert_task(&Task::local(-7, "b")).await.unwrap();
        assert_eq!(store.next_local_id().await.unwrap(), -8);
    }

    #[tokio::test]
    async fn test_insert_tasks_empty_is_noop() {
        let store = store().await;
        store.insert_tasks(&[]).await.unwrap();
        assert!(store.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let path = std::env::temp_dir().join(format!(
            "todosync-test-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path_str = path.to_string_lossy().to_string();

        {
            let store = SqliteTaskStore::new(&path_str).await.unwrap();
            store.insert_task(&Task::local(-1, "persisted")).await.unwrap();
        }

        let reopened = SqliteTaskStore::new(&path_str).await.unwrap();
        let task = reopened.get_task(-1).await.unwrap();
        assert_eq!(task.map(|t| t.title), Some("persisted".to_string()));

        drop(reopened);
        let _ = std::fs::remove_file(&path);
    }
}
