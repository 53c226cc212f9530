//! Binary replay decoding

mod decoder;
mod field;
mod format;

pub use decoder::{decode, decode_buffer, MatchRecord, MissionSets};
pub use field::{read_bytes, read_f32, read_u16, read_u32, read_u8};
pub use format::{
    mission_set, Map, MatchResult, Mission, Stage, FILE_MAGIC, FILE_VERSION, PREFIX_LEN,
};
