//! Persisted ingestion watermark

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Result, StatPartyError};

/// Default file name of the watermark file under the replay root
pub const WATERMARK_FILENAME: &str = "statparty";

/// Persisted cursor plus tracked-subdirectory preferences.
///
/// Stored as three newline-separated lines: a float Unix timestamp and
/// two boolean literals. Every save rewrites all three lines; the
/// tracking flags survive across runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Watermark {
    /// Instant of the last completed scan
    pub last_checked: SystemTime,
    /// Whether the `Matches` subdirectory is scanned
    pub track_matches: bool,
    /// Whether the `Spectations` subdirectory is scanned
    pub track_spectations: bool,
}

impl Watermark {
    /// Fresh watermark for a first run, with `last_checked` set to now
    #[must_use]
    pub fn first_run(track_matches: bool, track_spectations: bool) -> Self {
        Self {
            last_checked: SystemTime::now(),
            track_matches,
            track_spectations,
        }
    }

    /// Load the persisted watermark, or `None` when no file exists yet
    /// (first run).
    ///
    /// # Errors
    ///
    /// Returns `ConfigCorrupt` if the file exists but any of the three
    /// lines is missing or unparseable, or `Io` on read failure.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let mut lines = content.lines();

        let timestamp: f64 = next_line(&mut lines, "timestamp")?
            .trim()
            .parse()
            .map_err(|_| StatPartyError::ConfigCorrupt("timestamp is not a float".to_string()))?;
        let since_epoch = Duration::try_from_secs_f64(timestamp).map_err(|_| {
            StatPartyError::ConfigCorrupt(format!("timestamp {timestamp} out of range"))
        })?;

        let track_matches = parse_bool(next_line(&mut lines, "track_matches")?)?;
        let track_spectations = parse_bool(next_line(&mut lines, "track_spectations")?)?;

        Ok(Some(Self {
            last_checked: UNIX_EPOCH + since_epoch,
            track_matches,
            track_spectations,
        }))
    }

    /// Persist all three fields, atomically (temp file + rename).
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written or renamed, or
    /// `ConfigCorrupt` if `last_checked` predates the Unix epoch.
    pub fn save(&self, path: &Path) -> Result<()> {
        let timestamp = self
            .last_checked
            .duration_since(UNIX_EPOCH)
            .map_err(|_| {
                StatPartyError::ConfigCorrupt("last_checked predates the Unix epoch".to_string())
            })?
            .as_secs_f64();

        let content = format!(
            "{timestamp}\n{}\n{}\n",
            self.track_matches, self.track_spectations
        );

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);

        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Advance `last_checked` to now
    pub fn touch(&mut self) {
        self.last_checked = SystemTime::now();
    }
}

fn next_line<'a>(lines: &mut std::str::Lines<'a>, field: &str) -> Result<&'a str> {
    lines
        .next()
        .ok_or_else(|| StatPartyError::ConfigCorrupt(format!("missing {field} line")))
}

fn parse_bool(line: &str) -> Result<bool> {
    line.trim()
        .parse()
        .map_err(|_| StatPartyError::ConfigCorrupt(format!("bad boolean literal {line:?}")))
}
