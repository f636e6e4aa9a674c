//! Parallel staging for bulk folder imports
//!
//! Large `add_folder` calls fan their files out to a worker pool. Each
//! worker reads its source file, hashes, compresses, and (when configured)
//! encrypts independently, returning a self-contained staged entry with a
//! placeholder offset. The driver owns the table: directory markers are
//! staged before the fan-out and worker results are merged sequentially, so
//! nothing shares the table across threads and layout stays deterministic.

use std::path::PathBuf;

use log::debug;
use rayon::prelude::*;

use crate::editor::{build_file_entry, EntryOptions, StagedEntry, StagingContext};
use crate::error::Result;
use crate::host::HostEnv;

/// Minimum file count before `add_folder` switches to the worker pool
pub(crate) const PARALLEL_FILE_THRESHOLD: usize = 36;

/// Stage `files` (archive key, source path) on the worker pool.
///
/// Any failing file fails the whole batch; nothing is merged on error.
pub(crate) fn stage_files(
    files: Vec<(String, PathBuf)>,
    ctx: &StagingContext,
    options: &EntryOptions,
    host: &dyn HostEnv,
) -> Result<Vec<(String, StagedEntry)>> {
    debug!("staging {} files on the worker pool", files.len());
    files
        .into_par_iter()
        .map(|(key, path)| {
            let bytes = crate::editor::read_source(&path)?;
            let mtime = options
                .last_modified
                .or_else(|| host.modified(&path))
                .unwrap_or_else(|| host.now());
            let mode = host.unix_mode(&path);
            let staged = build_file_entry(ctx, &key, &bytes, options, mtime, mode)?;
            Ok((key, staged))
        })
        .collect()
}
