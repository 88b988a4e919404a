//! Repository reconciling the remote task API, the photo API and the local store.
//!
//! The local store is the single source of truth for reads. A refresh pulls
//! remote tasks, decorates them with random photos fetched in parallel
//! batches, and swaps them in for the previously synced tasks. Local-only
//! tasks and synced tasks edited on this device are never overwritten.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::join_all;
use tokio::sync::{watch, Mutex};

use todosync_core::photo::{plan_batches, select_photos, MAX_PHOTOS_PER_REQUEST};
use todosync_core::remote::{PhotoSource, RemoteError, TaskSource};
use todosync_core::repository::TaskRepository;
use todosync_core::storage::TaskStore;
use todosync_core::task::{
    is_remote_id, limit_remote_tasks, reconcile_synced, NewTask, Photo, SyncReport, Task, TaskId,
};
use todosync_core::{Error, Result};

use crate::config::Config;

/// Tunables for synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Remote tasks kept per refresh.
    pub max_synced_tasks: usize,
    /// Photos requested per photo API call.
    pub photo_batch_size: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_synced_tasks: 100,
            photo_batch_size: MAX_PHOTOS_PER_REQUEST,
        }
    }
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_synced_tasks: config.max_synced_tasks,
            photo_batch_size: config.effective_batch_size(),
        }
    }
}

/// Photos gathered from a batched fetch.
#[derive(Debug, Default)]
struct PhotoFetch {
    photos: Vec<Photo>,
    batches: usize,
    errors: Vec<RemoteError>,
}

impl PhotoFetch {
    fn all_failed(&self) -> bool {
        self.batches > 0 && self.errors.len() == self.batches
    }
}

/// [`TaskRepository`] backed by remote sources and a local [`TaskStore`].
pub struct SyncedTaskRepository {
    tasks_api: Arc<dyn TaskSource>,
    photos_api: Arc<dyn PhotoSource>,
    store: Arc<dyn TaskStore>,
    options: SyncOptions,
    tasks_tx: watch::Sender<Vec<Task>>,
    /// Serializes writes so id allocation and synced swaps do not interleave.
    write_lock: Mutex<()>,
}

impl SyncedTaskRepository {
    /// Creates the repository and loads the current task list from the store.
    pub async fn new(
        tasks_api: Arc<dyn TaskSource>,
        photos_api: Arc<dyn PhotoSource>,
        store: Arc<dyn TaskStore>,
        options: SyncOptions,
    ) -> Result<Self> {
        let initial = store.list_tasks().await?;
        let (tasks_tx, _) = watch::channel(initial);

        Ok(Self {
            tasks_api,
            photos_api,
            store,
            options,
            tasks_tx,
            write_lock: Mutex::new(()),
        })
    }

    /// Reloads the task list from the store and notifies subscribers.
    async fn publish(&self) -> Result<()> {
        let tasks = self.store.list_tasks().await?;
        tracing::trace!(count = tasks.len(), "Publishing task list");
        self.tasks_tx.send_replace(tasks);
        Ok(())
    }

    /// Fetches `count` random photos in parallel batches.
    ///
    /// A batch that fails with a transient error is retried once. A batch
    /// that still fails contributes no photos; its error is collected.
    async fn fetch_random_photos(&self, count: usize) -> PhotoFetch {
        let batches = plan_batches(count, self.options.photo_batch_size);
        tracing::debug!(count, batches = batches.len(), "Fetching random photos");

        let requests = batches.iter().enumerate().map(|(index, &size)| async move {
            let mut result = self.photos_api.random_photos(size).await;
            if let Err(err) = &result {
                if err.is_transient() {
                    tracing::debug!(batch = index + 1, error = %err, "Retrying photo batch");
                    result = self.photos_api.random_photos(size).await;
                }
            }
            match &result {
                Ok(photos) => {
                    tracing::debug!(batch = index + 1, fetched = photos.len(), "Photo batch fetched")
                }
                Err(err) => {
                    tracing::warn!(batch = index + 1, error = %err, "Photo batch failed")
                }
            }
            result
        });

        let mut fetch = PhotoFetch {
            batches: batches.len(),
            ..PhotoFetch::default()
        };
        let mut fetched = Vec::new();
        for result in join_all(requests).await {
            match result {
                Ok(photos) => fetched.extend(photos.into_iter().map(Photo::from)),
                Err(err) => fetch.errors.push(err),
            }
        }

        let total = fetched.len();
        fetch.photos = select_photos(fetched, count, &mut rand::rng());
        tracing::debug!(
            total,
            selected = fetch.photos.len(),
            "Random photos collected"
        );
        fetch
    }
}

#[async_trait]
impl TaskRepository for SyncedTaskRepository {
    async fn get_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.store.list_tasks().await?)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.store.get_task(id).await?)
    }

    fn watch_tasks(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks_tx.subscribe()
    }

    async fn refresh(&self) -> Result<SyncReport> {
        let remote = self.tasks_api.fetch_tasks().await.map_err(|err| {
            tracing::error!(error = %err, "Failed to fetch remote tasks");
            err
        })?;
        let invalid = remote.iter().filter(|dto| !is_remote_id(dto.id)).count();
        if invalid > 0 {
            tracing::warn!(invalid, "Dropping remote tasks with non-positive ids");
        }
        let remote = limit_remote_tasks(remote, self.options.max_synced_tasks);

        let fetch = self.fetch_random_photos(remote.len()).await;
        if fetch.all_failed() {
            tracing::warn!("No photos available, using placeholder images");
        }

        let _guard = self.write_lock.lock().await;
        let preserved = self.store.modified_synced_ids().await?;
        let tasks = reconcile_synced(&remote, &fetch.photos, &preserved, Utc::now());
        let replaced = self.store.replace_synced_tasks(&tasks).await?;
        self.publish().await?;

        let report = SyncReport {
            synced: tasks.len(),
            photos: fetch.photos.len(),
            preserved: remote.len() - tasks.len(),
        };
        tracing::info!(
            synced = report.synced,
            replaced,
            photos = report.photos,
            preserved = report.preserved,
            "Tasks refreshed from network"
        );
        Ok(report)
    }

    async fn add_task(&self, task: NewTask) -> Result<Task> {
        let _guard = self.write_lock.lock().await;
        let id = self.store.next_local_id().await?;
        let task = task.into_task(id, Utc::now());
        self.store.insert_task(&task).await?;
        self.publish().await?;

        tracing::info!(id, title = %task.title, "Local task added");
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> Result<Task> {
        let mut modified = task.clone();
        modified.is_modified = true;

        {
            let _guard = self.write_lock.lock().await;
            self.store
                .update_task(&modified)
                .await
                .map_err(|err| not_found_or(err, task.id))?;
            self.publish().await?;
        }

        tracing::info!(id = task.id, "Task updated");
        self.store
            .get_task(task.id)
            .await?
            .ok_or(Error::TaskNotFound(task.id))
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store
            .delete_task(id)
            .await
            .map_err(|err| not_found_or(err, id))?;
        self.publish().await?;

        tracing::info!(id, "Task deleted");
        Ok(())
    }

    async fn get_photos(&self, count: usize) -> Result<Vec<Photo>> {
        let mut fetch = self.fetch_random_photos(count).await;
        if fetch.all_failed() {
            if let Some(err) = fetch.errors.pop() {
                tracing::error!(error = %err, "Failed to fetch photos for the picker");
                return Err(err.into());
            }
        }
        Ok(fetch.photos)
    }
}

fn not_found_or(err: todosync_core::storage::StoreError, id: TaskId) -> Error {
    if err.is_not_found() {
        Error::TaskNotFound(id)
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use todosync_core::remote::{PhotoDto, PhotoUrls, TaskDto};
    use todosync_core::task::PLACEHOLDER_IMAGE_URL;

    use crate::storage::SqliteTaskStore;

    struct FakeTasks {
        result: std::result::Result<Vec<TaskDto>, RemoteError>,
    }

    #[async_trait]
    impl TaskSource for FakeTasks {
        async fn fetch_tasks(&self) -> todosync_core::remote::Result<Vec<TaskDto>> {
            self.result.clone()
        }
    }

    /// Serves photos with sequential ids; fails every call whose index is in `fail_calls`.
    struct FakePhotos {
        calls: AtomicUsize,
        requested: std::sync::Mutex<Vec<usize>>,
        fail_calls: Vec<usize>,
        status: u16,
    }

    impl FakePhotos {
        /// Failures are permanent (404), so they are not retried.
        fn new(fail_calls: Vec<usize>) -> Self {
            Self::failing_with(fail_calls, 404)
        }

        fn failing_with(fail_calls: Vec<usize>, status: u16) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                requested: std::sync::Mutex::new(Vec::new()),
                fail_calls,
                status,
            }
        }
    }

    #[async_trait]
    impl PhotoSource for FakePhotos {
        async fn random_photos(
            &self,
            count: usize,
        ) -> todosync_core::remote::Result<Vec<PhotoDto>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(count);
            if self.fail_calls.contains(&call) {
                return Err(RemoteError::Status {
                    status: self.status,
                    message: "unavailable".to_string(),
                });
            }
            Ok((0..count)
                .map(|i| PhotoDto {
                    id: format!("{call}-{i}"),
                    urls: PhotoUrls {
                        small: format!("https://img/{call}-{i}/small"),
                        regular: format!("https://img/{call}-{i}/regular"),
                    },
                })
                .collect())
        }
    }

    fn remote_tasks(n: i64) -> Vec<TaskDto> {
        (1..=n)
            .map(|id| TaskDto {
                id,
                title: format!("Task {id}"),
                completed: id % 2 == 0,
            })
            .collect()
    }

    async fn repository(
        tasks: std::result::Result<Vec<TaskDto>, RemoteError>,
        photos: Arc<FakePhotos>,
    ) -> SyncedTaskRepository {
        let store = Arc::new(SqliteTaskStore::new_in_memory().await.unwrap());
        SyncedTaskRepository::new(
            Arc::new(FakeTasks { result: tasks }),
            photos,
            store,
            SyncOptions::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_limits_tasks_and_batches_photos() {
        let photos = Arc::new(FakePhotos::new(vec![]));
        let repo = repository(Ok(remote_tasks(200)), photos.clone()).await;

        let report = repo.refresh().await.unwrap();

        assert_eq!(report.synced, 100);
        assert_eq!(report.photos, 100);
        let mut requested = photos.requested.lock().unwrap().clone();
        requested.sort_unstable();
        assert_eq!(requested, vec![10, 30, 30, 30]);

        let tasks = repo.get_tasks().await.unwrap();
        assert_eq!(tasks.len(), 100);
        assert_eq!(tasks.first().map(|t| t.id), Some(1));
        assert_eq!(tasks.last().map(|t| t.id), Some(100));
        assert!(tasks.iter().all(|t| t.image_url.is_some() && !t.is_local_only));
    }

    #[tokio::test]
    async fn test_refresh_tolerates_partial_photo_failure() {
        let photos = Arc::new(FakePhotos::new(vec![0]));
        let repo = repository(Ok(remote_tasks(40)), photos).await;

        let report = repo.refresh().await.unwrap();

        assert_eq!(report.synced, 40);
        assert!(report.photos > 0 && report.photos < 40);
        let tasks = repo.get_tasks().await.unwrap();
        assert!(tasks
            .iter()
            .all(|t| t.image_url.as_deref() != Some(PLACEHOLDER_IMAGE_URL)));
    }

    #[tokio::test]
    async fn test_transient_photo_failure_is_retried_once() {
        let photos = Arc::new(FakePhotos::failing_with(vec![0], 503));
        let repo = repository(Ok(remote_tasks(5)), photos.clone()).await;

        let report = repo.refresh().await.unwrap();

        assert_eq!(report.photos, 5);
        assert_eq!(*photos.requested.lock().unwrap(), vec![5, 5]);
    }

    #[tokio::test]
    async fn test_transient_photo_failure_retried_only_once() {
        let photos = Arc::new(FakePhotos::failing_with(vec![0, 1], 503));
        let repo = repository(Ok(vec![]), photos.clone()).await;

        assert!(matches!(
            repo.get_photos(10).await,
            Err(Error::Remote(RemoteError::Status { status: 503, .. }))
        ));
        assert_eq!(photos.requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_permanent_photo_failure_is_not_retried() {
        let photos = Arc::new(FakePhotos::new(vec![0]));
        let repo = repository(Ok(vec![]), photos.clone()).await;

        assert!(repo.get_photos(10).await.is_err());
        assert_eq!(photos.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_never_overwrites_local_task() {
        let photos = Arc::new(FakePhotos::new(vec![]));
        let remote = vec![
            TaskDto {
                id: -1,
                title: "remote".to_string(),
                completed: true,
            },
            TaskDto {
                id: 0,
                title: "zero".to_string(),
                completed: false,
            },
            TaskDto {
                id: 7,
                title: "valid".to_string(),
                completed: false,
            },
        ];
        let repo = repository(Ok(remote), photos).await;
        let local = repo.add_task(NewTask::new("mine")).await.unwrap();
        assert_eq!(local.id, -1);

        let report = repo.refresh().await.unwrap();

        assert_eq!(report.synced, 1);
        let kept = repo.get_task(-1).await.unwrap().unwrap();
        assert_eq!(kept.title, "mine");
        assert!(kept.is_local_only);
        assert!(repo.get_task(0).await.unwrap().is_none());
        assert_eq!(repo.get_tasks().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_uses_placeholder_when_all_photos_fail() {
        let photos = Arc::new(FakePhotos::new(vec![0, 1]));
        let repo = repository(Ok(remote_tasks(3)), photos).await;

        let report = repo.refresh().await.unwrap();

        assert_eq!(report.photos, 0);
        let tasks = repo.get_tasks().await.unwrap();
        assert!(tasks
            .iter()
            .all(|t| t.image_url.as_deref() == Some(PLACEHOLDER_IMAGE_URL)));
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_store_untouched() {
        let photos = Arc::new(FakePhotos::new(vec![]));
        let repo = repository(
            Err(RemoteError::Request("connection refused".to_string())),
            photos.clone(),
        )
        .await;
        repo.add_task(NewTask::new("local")).await.unwrap();

        let result = repo.refresh().await;

        assert!(matches!(result, Err(Error::Remote(RemoteError::Request(_)))));
        assert_eq!(repo.get_tasks().await.unwrap().len(), 1);
        assert!(photos.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_keeps_local_and_edited_tasks() {
        let photos = Arc::new(FakePhotos::new(vec![]));
        let repo = repository(Ok(remote_tasks(3)), photos).await;
        repo.refresh().await.unwrap();

        let local = repo.add_task(NewTask::new("mine")).await.unwrap();
        let mut edited = repo.get_task(2).await.unwrap().unwrap();
        edited.title = "Edited locally".to_string();
        repo.update_task(&edited).await.unwrap();

        let report = repo.refresh().await.unwrap();

        assert_eq!(report.synced, 2);
        assert_eq!(report.preserved, 1);
        let tasks = repo.get_tasks().await.unwrap();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].id, local.id);
        assert_eq!(
            repo.get_task(2).await.unwrap().map(|t| t.title),
            Some("Edited locally".to_string())
        );
    }

    #[tokio::test]
    async fn test_refresh_with_no_remote_tasks_requests_no_photos() {
        let photos = Arc::new(FakePhotos::new(vec![]));
        let repo = repository(Ok(vec![]), photos.clone()).await;

        let report = repo.refresh().await.unwrap();

        assert_eq!(report, SyncReport::default());
        assert!(photos.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_task_allocates_negative_ids() {
        let photos = Arc::new(FakePhotos::new(vec![]));
        let repo = repository(Ok(vec![]), photos).await;

        let first = repo.add_task(NewTask::new("first")).await.unwrap();
        let second = repo
            .add_task(NewTask::new("second").with_image_url("https://img/x/small"))
            .await
            .unwrap();

        assert_eq!(first.id, -1);
        assert_eq!(second.id, -2);
        assert!(second.is_local_only);
        let tasks = repo.get_tasks().await.unwrap();
        assert_eq!(tasks[0].title, "second");
    }

    #[tokio::test]
    async fn test_watch_publishes_after_mutations() {
        let photos = Arc::new(FakePhotos::new(vec![]));
        let repo = repository(Ok(remote_tasks(2)), photos).await;
        let mut rx = repo.watch_tasks();
        assert!(rx.borrow().is_empty());

        repo.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);

        repo.delete_task(1).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn test_update_marks_modified() {
        let photos = Arc::new(FakePhotos::new(vec![]));
        let repo = repository(Ok(remote_tasks(1)), photos).await;
        repo.refresh().await.unwrap();

        let task = repo.get_task(1).await.unwrap().unwrap();
        let saved = repo.update_task(&task.toggled()).await.unwrap();

        assert!(saved.is_modified);
        assert_eq!(saved.completed, !task.completed);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_task() {
        let photos = Arc::new(FakePhotos::new(vec![]));
        let repo = repository(Ok(vec![]), photos).await;

        assert_eq!(
            repo.update_task(&Task::synced(5, "x", false)).await,
            Err(Error::TaskNotFound(5))
        );
        assert_eq!(repo.delete_task(5).await, Err(Error::TaskNotFound(5)));
    }

    #[tokio::test]
    async fn test_get_photos_partial_failure_returns_rest() {
        let photos = Arc::new(FakePhotos::new(vec![1]));
        let repo = repository(Ok(vec![]), photos).await;

        let result = repo.get_photos(45).await.unwrap();

        assert!(!result.is_empty());
        assert!(result.len() < 45);
    }

    #[tokio::test]
    async fn test_get_photos_all_failed_is_error() {
        let photos = Arc::new(FakePhotos::new(vec![0]));
        let repo = repository(Ok(vec![]), photos).await;

        assert!(matches!(
            repo.get_photos(30).await,
            Err(Error::Remote(RemoteError::Status { status: 404, .. }))
        ));
    }

    #[tokio::test]
    async fn test_get_photos_zero() {
        let photos = Arc::new(FakePhotos::new(vec![0]));
        let repo = repository(Ok(vec![]), photos.clone()).await;

        assert!(repo.get_photos(0).await.unwrap().is_empty());
        assert!(photos.requested.lock().unwrap().is_empty());
    }
}
