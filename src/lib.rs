//! StatParty - SpyParty replay decoder and incremental match-statistics ingester
//!
//! Decodes version-4 `.replay` files into typed match records and
//! incrementally discovers new replays since the last run.

#![deny(unsafe_code)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::multiple_crate_versions
)]

pub mod error;
pub mod ingest;
pub mod replay;
pub mod scan;
pub mod sink;
pub mod watermark;

pub use error::{Result, StatPartyError};
