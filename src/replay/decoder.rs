//! Replay file decoder

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::field::{read_bytes, read_f32, read_u32, read_u8};
use super::format::{
    mission_set, Map, MatchResult, Mission, Stage, DURATION_OFFSET, FILE_MAGIC, FILE_VERSION,
    MAP_OFFSET, NAMES_OFFSET, PREFIX_LEN, RESULT_OFFSET, SNIPER_NAME_LEN_OFFSET,
    SPY_NAME_LEN_OFFSET, START_TIME_OFFSET, VERSION_OFFSET,
};
use crate::{Result, StatPartyError};

/// Per-stage mission sets decoded from the three stage bitmasks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MissionSets {
    /// Missions available at match start
    pub selected: BTreeSet<Mission>,
    /// Missions the spy chose to attempt
    pub picked: BTreeSet<Mission>,
    /// Missions the spy completed
    pub completed: BTreeSet<Mission>,
}

impl MissionSets {
    /// The mission set for a given stage
    #[must_use]
    pub fn stage(&self, stage: Stage) -> &BTreeSet<Mission> {
        match stage {
            Stage::Selected => &self.selected,
            Stage::Picked => &self.picked,
            Stage::Completed => &self.completed,
        }
    }

    fn stage_mut(&mut self, stage: Stage) -> &mut BTreeSet<Mission> {
        match stage {
            Stage::Selected => &mut self.selected,
            Stage::Picked => &mut self.picked,
            Stage::Completed => &mut self.completed,
        }
    }
}

/// Fully decoded match statistics for one replay
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    /// Spy player name
    pub spy_name: String,
    /// Sniper player name
    pub sniper_name: String,
    /// Match start instant
    pub start_time: SystemTime,
    /// Match duration, truncated to whole seconds
    pub duration_seconds: u32,
    /// Match outcome
    pub result: MatchResult,
    /// Venue the match was played on
    pub map: Map,
    /// Per-stage mission sets
    pub missions: MissionSets,
}

/// Decode the replay file at `path` into a [`MatchRecord`].
///
/// Reads at most the first [`PREFIX_LEN`] bytes; a shorter file is an
/// error. Decoding is all-or-nothing: no partial record is ever returned.
///
/// # Errors
///
/// Returns `Truncated`, `InvalidFormat`, `UnsupportedVersion`,
/// `InvalidText`, or `UnknownEnumValue` per the validation that failed,
/// or `Io` if the file cannot be opened or read.
pub fn decode(path: &Path) -> Result<MatchRecord> {
    let mut buf = Vec::with_capacity(PREFIX_LEN);
    File::open(path)?
        .take(PREFIX_LEN as u64)
        .read_to_end(&mut buf)?;

    if buf.len() < PREFIX_LEN {
        return Err(StatPartyError::Truncated {
            needed: PREFIX_LEN,
            actual: buf.len(),
        });
    }

    decode_buffer(&buf)
}

/// Decode a replay prefix already in memory.
///
/// Only the first [`PREFIX_LEN`] bytes of `buf` are inspected.
///
/// # Errors
///
/// Same validation errors as [`decode`].
pub fn decode_buffer(buf: &[u8]) -> Result<MatchRecord> {
    let buf = &buf[..buf.len().min(PREFIX_LEN)];

    let magic = read_bytes(buf, 0, 4)?;
    if magic != FILE_MAGIC {
        return Err(StatPartyError::InvalidFormat {
            found: [magic[0], magic[1], magic[2], magic[3]],
        });
    }

    let version = read_u32(buf, VERSION_OFFSET)?;
    if version != FILE_VERSION {
        return Err(StatPartyError::UnsupportedVersion {
            found: version,
            supported: FILE_VERSION,
        });
    }

    let spy_len = usize::from(read_u8(buf, SPY_NAME_LEN_OFFSET)?);
    let sniper_len = usize::from(read_u8(buf, SNIPER_NAME_LEN_OFFSET)?);

    let spy_name = decode_name(buf, NAMES_OFFSET, spy_len, "spy")?;
    let sniper_name = decode_name(buf, NAMES_OFFSET + spy_len, sniper_len, "sniper")?;

    let result_code = read_u32(buf, RESULT_OFFSET)?;
    let result = MatchResult::from_code(result_code).ok_or(StatPartyError::UnknownEnumValue {
        table: "result",
        value: result_code,
    })?;

    let map_id = read_u32(buf, MAP_OFFSET)?;
    let map = Map::from_id(map_id).ok_or(StatPartyError::UnknownEnumValue {
        table: "map",
        value: map_id,
    })?;

    let mut missions = MissionSets::default();
    for stage in Stage::ALL {
        let mask = read_u32(buf, stage.mask_offset())?;
        *missions.stage_mut(stage) = mission_set(mask);
    }

    let timestamp = read_u32(buf, START_TIME_OFFSET)?;
    let start_time = UNIX_EPOCH + Duration::from_secs(u64::from(timestamp));

    let duration = read_f32(buf, DURATION_OFFSET)?;
    let duration_seconds = duration as u32;

    Ok(MatchRecord {
        spy_name,
        sniper_name,
        start_time,
        duration_seconds,
        result,
        map,
        missions,
    })
}

fn decode_name(buf: &[u8], offset: usize, len: usize, field: &'static str) -> Result<String> {
    let bytes = read_bytes(buf, offset, len)?;
    let name = std::str::from_utf8(bytes).map_err(|_| StatPartyError::InvalidText { field })?;
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A valid version-4 prefix with the given names, masks, and codes
    fn build_replay(
        spy: &str,
        sniper: &str,
        result_code: u32,
        map_id: u32,
        masks: [u32; 3],
    ) -> Vec<u8> {
        let mut buf = vec![0u8; PREFIX_LEN];
        buf[..4].copy_from_slice(&FILE_MAGIC);
        buf[VERSION_OFFSET..VERSION_OFFSET + 4].copy_from_slice(&FILE_VERSION.to_le_bytes());
        buf[DURATION_OFFSET..DURATION_OFFSET + 4].copy_from_slice(&192.75f32.to_le_bytes());
        buf[START_TIME_OFFSET..START_TIME_OFFSET + 4]
            .copy_from_slice(&1_500_000_000u32.to_le_bytes());
        buf[SPY_NAME_LEN_OFFSET] = spy.len() as u8;
        buf[SNIPER_NAME_LEN_OFFSET] = sniper.len() as u8;
        buf[RESULT_OFFSET..RESULT_OFFSET + 4].copy_from_slice(&result_code.to_le_bytes());
        buf[MAP_OFFSET..MAP_OFFSET + 4].copy_from_slice(&map_id.to_le_bytes());
        for (stage, mask) in Stage::ALL.into_iter().zip(masks) {
            let off = stage.mask_offset();
            buf[off..off + 4].copy_from_slice(&mask.to_le_bytes());
        }
        let names_end = NAMES_OFFSET + spy.len();
        buf[NAMES_OFFSET..names_end].copy_from_slice(spy.as_bytes());
        buf[names_end..names_end + sniper.len()].copy_from_slice(sniper.as_bytes());
        buf
    }

    #[test]
    fn test_decode_known_replay() {
        // result 0, Courtyard, Selected={bit 0}, Picked={bits 0,2}, Completed={}
        let buf = build_replay("Bob", "Alice", 0, 2_646_981_470, [0b1, 0b101, 0]);
        let record = decode_buffer(&buf).unwrap();

        assert_eq!(record.spy_name, "Bob");
        assert_eq!(record.sniper_name, "Alice");
        assert_eq!(record.result, MatchResult::MissionsWin);
        assert_eq!(record.map, Map::Courtyard);
        assert_eq!(record.duration_seconds, 192);
        assert_eq!(
            record.start_time,
            UNIX_EPOCH + Duration::from_secs(1_500_000_000)
        );

        let selected: BTreeSet<_> = [Mission::BugAmbassador].into_iter().collect();
        let picked: BTreeSet<_> = [Mission::BugAmbassador, Mission::TransferMicrofilm]
            .into_iter()
            .collect();
        assert_eq!(record.missions.stage(Stage::Selected), &selected);
        assert_eq!(record.missions.stage(Stage::Picked), &picked);
        assert!(record.missions.stage(Stage::Completed).is_empty());
    }

    #[test]
    fn test_decode_empty_names() {
        let buf = build_replay("", "", 4, 998_637_555, [0, 0, 0]);
        let record = decode_buffer(&buf).unwrap();
        assert!(record.spy_name.is_empty());
        assert!(record.sniper_name.is_empty());
        assert_eq!(record.result, MatchResult::InProgress);
        assert_eq!(record.map, Map::Pub);
    }

    #[test]
    fn test_bad_magic() {
        let mut buf = build_replay("Bob", "Alice", 0, 2_646_981_470, [0, 0, 0]);
        buf[..4].copy_from_slice(b"NOPE");
        // Unknown result code too: magic must be rejected first
        buf[RESULT_OFFSET..RESULT_OFFSET + 4].copy_from_slice(&99u32.to_le_bytes());

        match decode_buffer(&buf).unwrap_err() {
            StatPartyError::InvalidFormat { found } => assert_eq!(&found, b"NOPE"),
            other => panic!("expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_version() {
        let mut buf = build_replay("Bob", "Alice", 0, 2_646_981_470, [0, 0, 0]);
        buf[VERSION_OFFSET..VERSION_OFFSET + 4].copy_from_slice(&5u32.to_le_bytes());

        match decode_buffer(&buf).unwrap_err() {
            StatPartyError::UnsupportedVersion { found, supported } => {
                assert_eq!(found, 5);
                assert_eq!(supported, 4);
            }
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_result_code() {
        let buf = build_replay("Bob", "Alice", 7, 2_646_981_470, [0, 0, 0]);
        match decode_buffer(&buf).unwrap_err() {
            StatPartyError::UnknownEnumValue { table, value } => {
                assert_eq!(table, "result");
                assert_eq!(value, 7);
            }
            other => panic!("expected UnknownEnumValue, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_map_id() {
        let buf = build_replay("Bob", "Alice", 0, 12345, [0, 0, 0]);
        match decode_buffer(&buf).unwrap_err() {
            StatPartyError::UnknownEnumValue { table, value } => {
                assert_eq!(table, "map");
                assert_eq!(value, 12345);
            }
            other => panic!("expected UnknownEnumValue, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_name_text() {
        let mut buf = build_replay("Bob", "Alice", 0, 2_646_981_470, [0, 0, 0]);
        buf[NAMES_OFFSET] = 0xFF; // lone continuation byte
        match decode_buffer(&buf).unwrap_err() {
            StatPartyError::InvalidText { field } => assert_eq!(field, "spy"),
            other => panic!("expected InvalidText, got {other:?}"),
        }
    }

    #[test]
    fn test_name_range_past_prefix() {
        let mut buf = build_replay("Bob", "Alice", 0, 2_646_981_470, [0, 0, 0]);
        buf[SPY_NAME_LEN_OFFSET] = 255;
        assert!(matches!(
            decode_buffer(&buf).unwrap_err(),
            StatPartyError::Truncated { .. }
        ));
    }

    #[test]
    fn test_short_buffer() {
        let buf = build_replay("Bob", "Alice", 0, 2_646_981_470, [0, 0, 0]);
        assert!(matches!(
            decode_buffer(&buf[..60]).unwrap_err(),
            StatPartyError::Truncated { .. }
        ));
    }

    #[test]
    fn test_decode_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let buf = build_replay("Bob", "Alice", 2, 1_870_767_448, [0xFF, 0b11, 0b10]);
        file.write_all(&buf).unwrap();

        let record = decode(file.path()).unwrap();
        assert_eq!(record.result, MatchResult::SpyShot);
        assert_eq!(record.map, Map::Veranda);
        assert_eq!(record.missions.selected.len(), 8);
    }

    #[test]
    fn test_decode_short_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"RPLY").unwrap();

        match decode(file.path()).unwrap_err() {
            StatPartyError::Truncated { needed, actual } => {
                assert_eq!(needed, PREFIX_LEN);
                assert_eq!(actual, 4);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_bitmask_roundtrip(mask in 0u32..256) {
            let buf = build_replay("Bob", "Alice", 0, 2_646_981_470, [0, mask, 0]);
            let record = decode_buffer(&buf).unwrap();

            let expected: BTreeSet<_> = Mission::ALL
                .iter()
                .copied()
                .filter(|m| mask & (1 << m.bit()) != 0)
                .collect();
            prop_assert_eq!(record.missions.stage(Stage::Picked), &expected);
        }

        #[test]
        fn prop_high_mask_bits_ignored(mask in proptest::num::u32::ANY) {
            let full = build_replay("Bob", "Alice", 0, 2_646_981_470, [mask, 0, 0]);
            let low = build_replay("Bob", "Alice", 0, 2_646_981_470, [mask & 0xFF, 0, 0]);
            prop_assert_eq!(
                decode_buffer(&full).unwrap().missions,
                decode_buffer(&low).unwrap().missions
            );
        }
    }
}
