//! Batch scan-and-decode orchestration

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::replay;
use crate::scan::{scan_replays, tracked_roots, REPLAY_EXTENSION};
use crate::sink::MatchSink;
use crate::watermark::{Watermark, WATERMARK_FILENAME};
use crate::Result;

/// First-run tracking preferences, supplied by the caller.
///
/// Only consulted when no watermark file exists yet; afterwards the
/// persisted flags win.
#[derive(Debug, Clone, Copy)]
pub struct TrackingPrefs {
    /// Scan the `Matches` subdirectory
    pub matches: bool,
    /// Scan the `Spectations` subdirectory
    pub spectations: bool,
}

impl Default for TrackingPrefs {
    fn default() -> Self {
        Self {
            matches: true,
            spectations: false,
        }
    }
}

/// Counters for one batch run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    /// Files decoded into a record
    pub decoded: usize,
    /// Files skipped with a per-file error
    pub skipped: usize,
}

/// Run one batch: load the watermark, scan the tracked subdirectories,
/// decode each candidate exactly once, then advance and persist the
/// watermark.
///
/// Per-file decode failures are isolated: they go to `sink.rejected` and
/// the batch continues. On a first run (no watermark file) `prefs`
/// supplies the tracking flags and every file under the tracked roots is
/// scanned regardless of age.
///
/// # Errors
///
/// Returns an error only for fatal conditions: a corrupt watermark file
/// or failure to persist the updated watermark.
pub fn run(replay_dir: &Path, prefs: TrackingPrefs, sink: &mut dyn MatchSink) -> Result<RunStats> {
    let watermark_path = replay_dir.join(WATERMARK_FILENAME);

    let (mut watermark, full_scan) = match Watermark::load(&watermark_path)? {
        Some(existing) => {
            debug!(?existing, "loaded watermark");
            (existing, false)
        }
        None => {
            info!("no watermark file found, assuming first run");
            let fresh = Watermark::first_run(prefs.matches, prefs.spectations);
            fresh.save(&watermark_path)?;
            (fresh, true)
        }
    };

    let roots = tracked_roots(replay_dir, watermark.track_matches, watermark.track_spectations);
    let stats = ingest_roots(&roots, watermark.last_checked, full_scan, sink);

    watermark.touch();
    watermark.save(&watermark_path)?;

    info!(
        decoded = stats.decoded,
        skipped = stats.skipped,
        "batch run complete"
    );
    Ok(stats)
}

fn ingest_roots(
    roots: &[PathBuf],
    since: std::time::SystemTime,
    full_scan: bool,
    sink: &mut dyn MatchSink,
) -> RunStats {
    let mut stats = RunStats::default();

    for path in scan_replays(roots, since, full_scan, REPLAY_EXTENSION) {
        match replay::decode(&path) {
            Ok(record) => {
                stats.decoded += 1;
                sink.record(&path, &record);
            }
            Err(error) => {
                stats.skipped += 1;
                sink.rejected(&path, &error);
            }
        }
    }

    stats
}
