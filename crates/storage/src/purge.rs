//! Garbage collection of abandoned upload sessions.
//!
//! Upload sessions live under a repository's `_uploads` directory, keyed by
//! UUID, with a `startedat` file recording when the session began. Sessions
//! older than a cutoff are reclaimed; anything that cannot be classified
//! reliably is preserved.

use crate::paths::repositories_root;
use crate::walk::{walk, WalkControl};
use berth_core::PurgeConfig;
use berth_driver::StorageDriver;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// An error encountered during a purge sweep, tagged with the path that
/// produced it. Sweep errors never abort the sweep.
#[derive(Debug, Error)]
#[error("{path}: {reason}")]
pub struct PurgeError {
    pub path: String,
    pub reason: String,
}

impl PurgeError {
    fn new(path: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// The location of an upload session's files and the time it started.
struct UploadData {
    containing_dir: Option<String>,
    started_at: OffsetDateTime,
    started_at_file: Option<String>,
}

impl UploadData {
    fn new() -> Self {
        Self {
            containing_dir: None,
            // Far in the future, so an upload whose startedat file is
            // missing or unreadable is never deleted.
            started_at: OffsetDateTime::now_utc() + Duration::hours(10_000),
            started_at_file: None,
        }
    }
}

/// Delete upload sessions started before `older_than` from the repositories
/// subtree. Returns the containing directories removed (or, when
/// `actually_delete` is false, those that would have been) and the errors
/// encountered along the way.
pub async fn purge_uploads(
    driver: &dyn StorageDriver,
    older_than: OffsetDateTime,
    actually_delete: bool,
) -> (Vec<String>, Vec<PurgeError>) {
    tracing::info!(%older_than, actually_delete, "purging uploads");
    let (uploads, mut errors) = outstanding_uploads(driver).await;

    let mut deleted = Vec::new();
    for upload in uploads.into_values() {
        if upload.started_at >= older_than {
            continue;
        }
        let Some(dir) = upload.containing_dir else {
            // UUID seen only in file names; there is no directory to remove.
            continue;
        };
        tracing::info!(
            dir = %dir,
            started_at = %upload.started_at,
            "upload is older than purge date, removing directory"
        );
        if actually_delete {
            if let Err(err) = driver.delete(&dir).await {
                errors.push(PurgeError::new(dir, err));
                continue;
            }
        }
        deleted.push(dir);
    }

    tracing::info!(
        num_deleted = deleted.len(),
        num_errors = errors.len(),
        "purge uploads finished"
    );
    (deleted, errors)
}

/// Walk the repositories subtree collecting upload sessions eligible for
/// classification. The only reliable age signal is the date in an upload's
/// `startedat` file, so sessions are gathered by UUID and dated afterwards.
async fn outstanding_uploads(
    driver: &dyn StorageDriver,
) -> (HashMap<Uuid, UploadData>, Vec<PurgeError>) {
    let mut uploads: HashMap<Uuid, UploadData> = HashMap::new();
    let mut errors = Vec::new();

    let root = repositories_root();
    let mut visit = |info: &berth_driver::FileInfo| {
        let file_path = info.path();
        let base = file_path.rsplit('/').next().unwrap_or(file_path);

        // Reserved directories: only _uploads is descended into.
        if base.starts_with('_') && info.is_dir() && base != "_uploads" {
            return Ok(WalkControl::SkipDir);
        }

        let Some((uuid, is_containing_dir)) = uuid_from_path(file_path) else {
            // No UUID, cannot classify this path reliably.
            return Ok(WalkControl::Continue);
        };

        let upload = uploads.entry(uuid).or_insert_with(UploadData::new);
        if is_containing_dir {
            upload.containing_dir = Some(file_path.to_string());
        }
        if base == "startedat" {
            upload.started_at_file = Some(file_path.to_string());
        }
        Ok(WalkControl::Continue)
    };

    if let Err(err) = walk(driver, &root, &mut visit).await {
        errors.push(PurgeError::new(root, err));
    }

    // Read the startedat files after the walk so the callback stays free of
    // driver I/O. Read or parse failures leave the far-future default, which
    // preserves the record.
    for upload in uploads.values_mut() {
        let Some(path) = upload.started_at_file.take() else {
            continue;
        };
        match read_started_at(driver, &path).await {
            Ok(started_at) => upload.started_at = started_at,
            Err(err) => errors.push(err),
        }
    }

    (uploads, errors)
}

/// Extract the upload UUID from a path. If the UUID is the last path
/// component, this path is the containing directory for the upload's files.
fn uuid_from_path(path: &str) -> Option<(Uuid, bool)> {
    let components: Vec<&str> = path.split('/').collect();
    for (i, component) in components.iter().enumerate().rev() {
        if let Ok(uuid) = Uuid::parse_str(component) {
            return Some((uuid, i == components.len() - 1));
        }
    }
    None
}

/// Read and parse the RFC-3339 timestamp in an upload's startedat file.
async fn read_started_at(
    driver: &dyn StorageDriver,
    path: &str,
) -> Result<OffsetDateTime, PurgeError> {
    let content = driver
        .get_content(path)
        .await
        .map_err(|err| PurgeError::new(path, err))?;
    let text =
        std::str::from_utf8(&content).map_err(|err| PurgeError::new(path, err))?;
    OffsetDateTime::parse(text, &Rfc3339).map_err(|err| PurgeError::new(path, err))
}

/// Run the purger on a schedule. The first round runs immediately; subsequent
/// rounds follow the configured interval. A disabled configuration resolves
/// at once.
pub fn spawn_purge_task(
    driver: Arc<dyn StorageDriver>,
    config: PurgeConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if !config.enabled {
            return;
        }
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(config.interval_secs));
        loop {
            ticker.tick().await;
            let older_than =
                OffsetDateTime::now_utc() - Duration::hours(config.age_hours as i64);
            let (deleted, errors) =
                purge_uploads(driver.as_ref(), older_than, !config.dry_run).await;
            tracing::info!(
                num_deleted = deleted.len(),
                num_errors = errors.len(),
                dry_run = config.dry_run,
                "scheduled purge round complete"
            );
        }
    })
}
