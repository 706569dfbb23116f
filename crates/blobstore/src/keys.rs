//! Key helpers shared by both pipeline stages.

use object_store::path::Path;

/// Derive the part of `key` below `prefix`.
///
/// Matching is segment-wise, so `raw-extra/x.png` is not under the
/// prefix `raw`. Returns `None` when `key` does not live under `prefix`
/// or names the prefix itself (directory placeholder objects). An empty
/// prefix leaves keys unchanged.
pub fn relative_key(key: &Path, prefix: &Path) -> Option<Path> {
    if prefix.as_ref().is_empty() {
        if key.as_ref().is_empty() {
            return None;
        }
        return Some(key.clone());
    }
    let mut rest = key.prefix_match(prefix)?;
    let first = rest.next()?;
    Some(Path::from_iter(std::iter::once(first).chain(rest)))
}

/// Whether a key names a PNG object.
///
/// Suffix match is exact: `IMG.PNG` is not selected.
pub fn is_png(key: &Path) -> bool {
    key.as_ref().ends_with(".png")
}
