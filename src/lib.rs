pub mod config;
pub mod dates;
pub mod errors;
pub mod listing;
pub mod models;
pub mod normalize;
pub mod repository;
pub mod row_state;
pub mod view;

pub use crate::config::ListConfig;
pub use crate::dates::RecordDate;
pub use crate::errors::{AppError, AppResult};
pub use crate::listing::{FilterField, FilterSet, Page, SortDirection, SortKey, Sorter};
pub use crate::models::{AssetRecord, ChecklistItem, ListRecord, TaskKind, TaskRecord};
pub use crate::repository::{FetchStatus, JsonFileSource, RecordCache, RecordSource};
pub use crate::row_state::{RowState, RowStates};
pub use crate::view::{DisplayRow, ListPage, ListView};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// Installs JSON logging to a daily rolling file under `log_dir`.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_tracing(log_dir: &Path) -> AppResult<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "listkit.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| AppError::Internal(error.to_string()))
}
