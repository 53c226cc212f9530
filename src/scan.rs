//! Incremental replay discovery

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

/// Extension substring incremental scans filter on
pub const REPLAY_EXTENSION: &str = ".replay";

/// Lazily yield candidate replay paths under the tracked roots.
///
/// Each root is walked recursively. With `full_scan` every file is
/// yielded regardless of age or name; otherwise a file is yielded only
/// when its modification time is strictly greater than `since` and its
/// name contains `extension`. Roots that do not exist yield nothing,
/// since tracked subdirectories are optional. Files whose metadata
/// cannot be read are skipped. Order across roots is unspecified.
pub fn scan_replays<'a>(
    roots: &'a [PathBuf],
    since: SystemTime,
    full_scan: bool,
    extension: &'a str,
) -> impl Iterator<Item = PathBuf> + 'a {
    roots.iter().flat_map(move |root| {
        WalkDir::new(root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(move |entry| {
                entry.file_type().is_file() && (full_scan || is_new_replay(entry, since, extension))
            })
            .map(walkdir::DirEntry::into_path)
    })
}

fn is_new_replay(entry: &walkdir::DirEntry, since: SystemTime, extension: &str) -> bool {
    let Some(modified) = entry.metadata().ok().and_then(|m| m.modified().ok()) else {
        return false;
    };
    modified > since && entry.file_name().to_string_lossy().contains(extension)
}

/// The two trackable subdirectories under a replay root
#[must_use]
pub fn tracked_roots(replay_dir: &Path, track_matches: bool, track_spectations: bool) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if track_matches {
        roots.push(replay_dir.join("Matches"));
    }
    if track_spectations {
        roots.push(replay_dir.join("Spectations"));
    }
    roots
}
