//! Stage one: mirror raw PNG objects into a local directory tree.

use std::path::{Path, PathBuf};

use blobstore::{StoreHandle, is_png, relative_key};
use diagnostics::{debug, info};

use crate::error::Result;

/// Behavior switches for [`mirror`].
#[derive(Debug, Default, Clone)]
pub struct MirrorOptions {
    /// Leave files that already exist locally untouched instead of
    /// downloading them again.
    pub skip_existing: bool,
}

/// Counters reported by a mirror run.
#[derive(Debug, Default, Clone)]
pub struct MirrorStats {
    /// Objects listed under the source prefix
    pub listed: usize,
    /// Objects passed over (non-PNG keys and prefix placeholders)
    pub ignored: usize,
    /// Files written locally
    pub downloaded: usize,
    /// Files left untouched because of `skip_existing`
    pub skipped_existing: usize,
    /// Total bytes written
    pub bytes_downloaded: u64,
}

/// Download every `.png` object under the source prefix into
/// `local_dir`, recreating the key hierarchy as directories.
///
/// Existing local files are overwritten unless
/// [`MirrorOptions::skip_existing`] is set. Any store or filesystem
/// error aborts the run; partially mirrored trees are safe to resume.
pub async fn mirror(
    source: &StoreHandle,
    local_dir: &Path,
    options: &MirrorOptions,
) -> Result<MirrorStats> {
    let objects = source.list().await?;

    let mut stats = MirrorStats {
        listed: objects.len(),
        ..MirrorStats::default()
    };

    let listed = stats.listed;
    let source_label = source.to_string();
    info!("Mirroring PNG objects from {source_label} ({listed} listed)", source_label: source_label, listed: listed);

    tokio::fs::create_dir_all(local_dir).await?;

    for meta in objects {
        if !is_png(&meta.location) {
            stats.ignored += 1;
            continue;
        }

        let Some(subpath) = relative_key(&meta.location, source.prefix()) else {
            stats.ignored += 1;
            continue;
        };

        let local_path = local_file_path(local_dir, &subpath);
        if options.skip_existing && local_path.exists() {
            stats.skipped_existing += 1;
            let key = meta.location.as_ref();
            debug!("Skipping {key}, local copy exists", key: key);
            continue;
        }

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = source.get_bytes(&meta.location).await?;
        tokio::fs::write(&local_path, &data).await?;
        stats.bytes_downloaded += data.len() as u64;
        stats.downloaded += 1;

        let key = meta.location.as_ref();
        let path = local_path.display().to_string();
        info!("Downloaded {key} to {path}", key: key, path: path);
    }

    let downloaded = stats.downloaded;
    let skipped = stats.skipped_existing;
    info!("Mirror complete: {downloaded} downloaded, {skipped} already present", downloaded: downloaded, skipped: skipped);
    Ok(stats)
}

/// Map an object subpath onto the local tree, one directory per key
/// segment.
fn local_file_path(local_dir: &Path, subpath: &object_store::path::Path) -> PathBuf {
    let mut path = local_dir.to_path_buf();
    for part in subpath.as_ref().split('/') {
        path.push(part);
    }
    path
}
