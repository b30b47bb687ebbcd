//! Per-file driver shared by the strip and inspect passes.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use rayon::prelude::*;

use crate::CancelToken;
use crate::JobConfig;
use crate::ProgressCallback;
use crate::Result;
use crate::ScrubError;

/// Applies `work` to every file and returns the results in input order.
///
/// With one worker the files are processed sequentially on the calling
/// thread. Otherwise a dedicated rayon pool of
/// [`JobConfig::effective_workers`] threads is used; no two workers ever see
/// the same file. Cancellation is checked before each file is started.
pub(crate) fn for_each_file<T, F>(
    files: &[PathBuf],
    config: &JobConfig,
    cancel: &CancelToken,
    progress: &mut dyn ProgressCallback,
    work: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&Path) -> T + Sync,
{
    let total = files.len();
    let workers = config.effective_workers();

    if workers <= 1 {
        let mut results = Vec::with_capacity(total);
        for (idx, file) in files.iter().enumerate() {
            cancel.check()?;
            progress.on_entry_start(file, total, idx + 1);
            results.push(work(file));
            progress.on_entry_complete(file);
        }
        progress.on_complete();
        return Ok(results);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("metascrub-worker-{i}"))
        .build()
        .map_err(|e| ScrubError::Io(std::io::Error::other(e)))?;

    tracing::debug!(workers, files = total, "starting worker pool");

    let started = AtomicUsize::new(0);
    let progress = Mutex::new(progress);

    let results: Vec<Option<T>> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                if cancel.is_cancelled() {
                    return None;
                }
                let current = started.fetch_add(1, Ordering::Relaxed) + 1;
                if let Ok(mut progress) = progress.lock() {
                    progress.on_entry_start(file, total, current);
                }
                let result = work(file);
                if let Ok(mut progress) = progress.lock() {
                    progress.on_entry_complete(file);
                }
                Some(result)
            })
            .collect()
    });

    cancel.check()?;
    if let Ok(mut progress) = progress.lock() {
        progress.on_complete();
    }

    // Without cancellation every slot is filled.
    Ok(results.into_iter().flatten().collect())
}
