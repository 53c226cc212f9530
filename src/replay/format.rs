//! Replay file layout and lookup tables

use std::collections::BTreeSet;
use std::fmt;

/// File magic bytes: "RPLY"
pub const FILE_MAGIC: [u8; 4] = *b"RPLY";

/// The single replay format version this decoder accepts
pub const FILE_VERSION: u32 = 4;

/// Fixed header length preceding the name region
pub const HEADER_LEN: usize = 80;

/// Maximum on-disk allowance per player name field
pub const NAME_FIELD_MAX: usize = 33;

/// Length of the file prefix the decoder reads; nothing past it is touched
pub const PREFIX_LEN: usize = HEADER_LEN + 2 * NAME_FIELD_MAX;

static_assertions::const_assert_eq!(PREFIX_LEN, 146);
static_assertions::const_assert!(NAMES_OFFSET < PREFIX_LEN);

/// Offset of the u32 format version
pub const VERSION_OFFSET: usize = 0x04;

/// Offset of the f32 match duration in seconds
pub const DURATION_OFFSET: usize = 0x14;

/// Offset of the u32 match start Unix timestamp
pub const START_TIME_OFFSET: usize = 0x28;

/// Offset of the u8 spy name length
pub const SPY_NAME_LEN_OFFSET: usize = 0x2E;

/// Offset of the u8 sniper name length
pub const SNIPER_NAME_LEN_OFFSET: usize = 0x2F;

/// Offset of the u32 result code
pub const RESULT_OFFSET: usize = 0x34;

/// Offset of the u32 map ID
pub const MAP_OFFSET: usize = 0x3C;

/// Offset of the spy name bytes; the sniper name follows immediately
pub const NAMES_OFFSET: usize = 0x54;

/// Match outcome, keyed by the u32 result code at [`RESULT_OFFSET`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    /// Spy completed the required missions
    MissionsWin,
    /// Spy ran out of time
    SpyTimeout,
    /// Sniper shot the spy
    SpyShot,
    /// Sniper shot a civilian
    CivilianShot,
    /// Match had not finished when the replay was written
    InProgress,
}

impl MatchResult {
    /// Resolve a raw result code, or `None` if the code is not in the table
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::MissionsWin),
            1 => Some(Self::SpyTimeout),
            2 => Some(Self::SpyShot),
            3 => Some(Self::CivilianShot),
            4 => Some(Self::InProgress),
            _ => None,
        }
    }

    /// Human-readable outcome name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MissionsWin => "Missions Win",
            Self::SpyTimeout => "Spy Timeout",
            Self::SpyShot => "Spy Shot",
            Self::CivilianShot => "Civilian Shot",
            Self::InProgress => "In Progress",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Venue, keyed by the u32 map ID at [`MAP_OFFSET`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Map {
    Courtyard,
    Moderne,
    Library,
    Veranda,
    Gallery,
    Ballroom,
    Pub,
    HighRise,
    Terrace,
    Balcony,
}

impl Map {
    /// Resolve a raw map ID, or `None` if the ID is not in the table
    #[must_use]
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            2_646_981_470 => Some(Self::Courtyard),
            775_418_203 => Some(Self::Moderne),
            378_490_722 => Some(Self::Library),
            1_870_767_448 => Some(Self::Veranda),
            1_903_409_343 => Some(Self::Gallery),
            1_527_912_741 => Some(Self::Ballroom),
            998_637_555 => Some(Self::Pub),
            441_894_305 => Some(Self::HighRise),
            2_419_248_674 => Some(Self::Terrace),
            498_961_985 => Some(Self::Balcony),
            _ => None,
        }
    }

    /// Human-readable map name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Courtyard => "Courtyard",
            Self::Moderne => "Moderne",
            Self::Library => "Library",
            Self::Veranda => "Veranda",
            Self::Gallery => "Gallery",
            Self::Ballroom => "Ballroom",
            Self::Pub => "Pub",
            Self::HighRise => "High-rise",
            Self::Terrace => "Terrace",
            Self::Balcony => "Balcony",
        }
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spy mission, keyed by bit position within a stage bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Mission {
    BugAmbassador,
    ContactDoubleAgent,
    TransferMicrofilm,
    SwapStatue,
    InspectTarget,
    SeduceTarget,
    PurloinGuestList,
    FingerprintAmbassador,
}

impl Mission {
    /// Every defined mission, in bit-position order
    pub const ALL: [Self; 8] = [
        Self::BugAmbassador,
        Self::ContactDoubleAgent,
        Self::TransferMicrofilm,
        Self::SwapStatue,
        Self::InspectTarget,
        Self::SeduceTarget,
        Self::PurloinGuestList,
        Self::FingerprintAmbassador,
    ];

    /// Bit position of this mission within a stage bitmask
    #[must_use]
    pub fn bit(self) -> u32 {
        match self {
            Self::BugAmbassador => 0,
            Self::ContactDoubleAgent => 1,
            Self::TransferMicrofilm => 2,
            Self::SwapStatue => 3,
            Self::InspectTarget => 4,
            Self::SeduceTarget => 5,
            Self::PurloinGuestList => 6,
            Self::FingerprintAmbassador => 7,
        }
    }

    /// Human-readable mission name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BugAmbassador => "Bug Ambassador",
            Self::ContactDoubleAgent => "Contact Double Agent",
            Self::TransferMicrofilm => "Transfer Microfilm",
            Self::SwapStatue => "Swap Statue",
            Self::InspectTarget => "Inspect Target",
            Self::SeduceTarget => "Seduce Target",
            Self::PurloinGuestList => "Purloin Guest List",
            Self::FingerprintAmbassador => "Fingerprint Ambassador",
        }
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point in a mission's lifecycle, each with its own bitmask field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Missions available at match start
    Selected,
    /// Missions the spy chose to attempt
    Picked,
    /// Missions the spy completed
    Completed,
}

impl Stage {
    /// All three stages, in file-layout order
    pub const ALL: [Self; 3] = [Self::Selected, Self::Picked, Self::Completed];

    /// Offset of this stage's u32 bitmask within the replay prefix
    #[must_use]
    pub fn mask_offset(self) -> usize {
        match self {
            Self::Selected => 0x40,
            Self::Picked => 0x44,
            Self::Completed => 0x48,
        }
    }

    /// Stage name as presented to users
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Selected => "Selected",
            Self::Picked => "Picked",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode a stage bitmask into the set of missions whose bits are set.
///
/// Only the 8 defined mission bits are tested; higher bits are accepted
/// and ignored, matching the permissiveness of the on-disk format.
#[must_use]
pub fn mission_set(mask: u32) -> BTreeSet<Mission> {
    Mission::ALL
        .iter()
        .copied()
        .filter(|m| mask & (1 << m.bit()) != 0)
        .collect()
}
