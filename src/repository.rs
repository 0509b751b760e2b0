use crate::errors::{AppError, AppResult};
use crate::models::ListRecord;
use crate::normalize::parse_collection;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Where a list view's records come from, usually a REST endpoint.
pub trait RecordSource {
    type Record: ListRecord;

    fn name(&self) -> &str;

    fn fetch(&self) -> impl Future<Output = AppResult<Vec<Self::Record>>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum FetchStatus {
    Empty,
    Fresh,
    Stale,
    Failed { message: String },
}

impl FetchStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

struct CacheState<R> {
    snapshot: Option<Arc<[R]>>,
    stale: bool,
    status: FetchStatus,
    fetched_at: Option<DateTime<Utc>>,
}

/// Cached copy of one record collection.
///
/// Records are fetched wholesale and handed out as an immutable snapshot.
/// Nothing refetches on its own: callers `invalidate()` after a mutation or
/// `refresh()` on a user request. A failed fetch keeps the previous snapshot
/// and reports `FetchStatus::Failed`.
pub struct RecordCache<S: RecordSource> {
    source: S,
    state: Mutex<CacheState<S::Record>>,
}

impl<S: RecordSource> RecordCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(CacheState {
                snapshot: None,
                stale: false,
                status: FetchStatus::Empty,
                fetched_at: None,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The cached records, fetching first when nothing is cached or the
    /// cache was invalidated.
    pub async fn snapshot(&self) -> AppResult<Arc<[S::Record]>> {
        let mut state = self.state.lock().await;
        if let Some(snapshot) = state.snapshot.as_ref() {
            if !state.stale {
                return Ok(Arc::clone(snapshot));
            }
        }
        self.fetch_into(&mut state).await
    }

    /// The cached records without fetching, even if stale or after a failure.
    pub async fn cached(&self) -> Option<Arc<[S::Record]>> {
        self.state.lock().await.snapshot.clone()
    }

    pub async fn refresh(&self) -> AppResult<Arc<[S::Record]>> {
        let mut state = self.state.lock().await;
        self.fetch_into(&mut state).await
    }

    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.stale = true;
        if state.snapshot.is_some() {
            state.status = FetchStatus::Stale;
        }
        tracing::debug!(source = self.source.name(), "record cache invalidated");
    }

    pub async fn status(&self) -> FetchStatus {
        self.state.lock().await.status.clone()
    }

    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.fetched_at
    }

    async fn fetch_into(&self, state: &mut CacheState<S::Record>) -> AppResult<Arc<[S::Record]>> {
        match self.source.fetch().await {
            Ok(records) => {
                let snapshot: Arc<[S::Record]> = records.into();
                tracing::info!(
                    source = self.source.name(),
                    count = snapshot.len(),
                    "record cache refreshed"
                );
                state.snapshot = Some(Arc::clone(&snapshot));
                state.stale = false;
                state.status = FetchStatus::Fresh;
                state.fetched_at = Some(Utc::now());
                Ok(snapshot)
            }
            Err(error) => {
                tracing::warn!(
                    source = self.source.name(),
                    error = %error,
                    kept_previous = state.snapshot.is_some(),
                    "record fetch failed"
                );
                state.status = FetchStatus::Failed {
                    message: error.to_string(),
                };
                Err(error)
            }
        }
    }
}

/// Reads a collection payload from a JSON file, e.g. an exported API
/// response used as fixture data.
pub struct JsonFileSource<R> {
    name: String,
    path: PathBuf,
    normalize: fn(&Value) -> AppResult<R>,
}

impl<R> JsonFileSource<R> {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, normalize: fn(&Value) -> AppResult<R>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            normalize,
        }
    }
}

impl<R: ListRecord + Send> RecordSource for JsonFileSource<R> {
    type Record = R;

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> AppResult<Vec<R>> {
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|error| {
            AppError::Fetch(format!("{}: {}", self.path.to_string_lossy(), error))
        })?;
        parse_collection(&body, self.normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::RecordDate;
    use crate::models::TaskRecord;
    use crate::normalize::normalize_task;
    use std::io::Write;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FakeSource {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }
        }
    }

    impl RecordSource for FakeSource {
        type Record = TaskRecord;

        fn name(&self) -> &str {
            "fake"
        }

        async fn fetch(&self) -> AppResult<Vec<TaskRecord>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::Fetch("backend unavailable".to_string()));
            }
            Ok((0..call)
                .map(|index| TaskRecord {
                    id: format!("T-{index}"),
                    title: format!("fetch {call}"),
                    description: None,
                    status: None,
                    priority: None,
                    assignee_id: None,
                    start_date: RecordDate::Missing,
                    end_date: RecordDate::Missing,
                    kind: None,
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn snapshot_fetches_once_until_invalidated() {
        let cache = RecordCache::new(FakeSource::new());
        assert_eq!(cache.status().await, FetchStatus::Empty);

        let first = cache.snapshot().await.expect("first fetch");
        let again = cache.snapshot().await.expect("cached");
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(cache.source().calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status().await, FetchStatus::Fresh);
        assert!(cache.fetched_at().await.is_some());

        cache.invalidate().await;
        assert_eq!(cache.status().await, FetchStatus::Stale);
        let refetched = cache.snapshot().await.expect("refetch");
        assert_eq!(refetched.len(), 2);
        assert_eq!(cache.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let cache = RecordCache::new(FakeSource::new());
        cache.snapshot().await.expect("first fetch");

        cache.source().fail.store(true, Ordering::SeqCst);
        let error = cache.refresh().await.unwrap_err();
        assert!(matches!(error, AppError::Fetch(_)));

        let status = cache.status().await;
        assert!(status.is_error());
        let kept = cache.cached().await.expect("previous snapshot kept");
        assert_eq!(kept.len(), 1);

        cache.source().fail.store(false, Ordering::SeqCst);
        let recovered = cache.refresh().await.expect("manual refetch");
        assert_eq!(recovered.len(), 3);
        assert_eq!(cache.status().await, FetchStatus::Fresh);
    }

    #[tokio::test]
    async fn first_fetch_failure_leaves_cache_empty() {
        let source = FakeSource::new();
        source.fail.store(true, Ordering::SeqCst);
        let cache = RecordCache::new(source);
        assert!(cache.snapshot().await.is_err());
        assert!(cache.cached().await.is_none());
    }

    #[tokio::test]
    async fn json_file_source_normalizes_payload() {
        let mut file = tempfile::NamedTempFile::new().expect("temp payload");
        write!(
            file,
            r#"{{"data":[{{"id":"T-1","attributes":{{"title":{{"value":"Close NC-12"}}}}}},{{"attributes":{{}}}}]}}"#
        )
        .expect("write payload");

        let cache = RecordCache::new(JsonFileSource::new("tasks", file.path(), normalize_task));
        let records = cache.snapshot().await.expect("records");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Close NC-12");

        let missing = RecordCache::new(JsonFileSource::new(
            "tasks",
            file.path().with_extension("gone"),
            normalize_task,
        ));
        let error = missing.snapshot().await.unwrap_err();
        assert!(error.to_string().starts_with("FETCH_FAILED"));
    }
}
