//! Reporting sinks for decoded records and per-file failures

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::replay::{MatchRecord, Stage};
use crate::StatPartyError;

/// Receiver for the outcome of each candidate file.
///
/// Decoding is decoupled from presentation: the ingest loop hands every
/// decoded record and every per-file failure to a sink and never prints
/// anything itself.
pub trait MatchSink {
    /// A file decoded successfully
    fn record(&mut self, path: &Path, record: &MatchRecord);

    /// A file was skipped; the batch continues with the next candidate
    fn rejected(&mut self, path: &Path, error: &StatPartyError);
}

/// Sink that reports through `tracing`
#[derive(Debug, Default)]
pub struct LogSink;

impl MatchSink for LogSink {
    fn record(&mut self, path: &Path, record: &MatchRecord) {
        info!(
            path = %path.display(),
            spy = %record.spy_name,
            sniper = %record.sniper_name,
            map = %record.map,
            result = %record.result,
            duration_seconds = record.duration_seconds,
            "decoded replay"
        );
        for stage in Stage::ALL {
            let missions: Vec<_> = record
                .missions
                .stage(stage)
                .iter()
                .map(|m| m.name())
                .collect();
            info!(stage = %stage, ?missions, "missions");
        }
    }

    fn rejected(&mut self, path: &Path, error: &StatPartyError) {
        warn!(path = %path.display(), reason = %error, "skipping replay");
    }
}

/// Sink that collects outcomes in memory, for tests
#[derive(Debug, Default)]
pub struct CollectSink {
    /// Successfully decoded records with their source paths
    pub records: Vec<(PathBuf, MatchRecord)>,
    /// Skipped paths with the reason rendered as text
    pub rejections: Vec<(PathBuf, String)>,
}

impl MatchSink for CollectSink {
    fn record(&mut self, path: &Path, record: &MatchRecord) {
        self.records.push((path.to_path_buf(), record.clone()));
    }

    fn rejected(&mut self, path: &Path, error: &StatPartyError) {
        self.rejections.push((path.to_path_buf(), error.to_string()));
    }
}
