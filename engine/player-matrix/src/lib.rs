//! Player Matrix - Merges mock-draft ADP data into one record per player
//!
//! Each source publishes average-draft-position data per scoring format and
//! league size, with its own naming and field conventions. This crate folds
//! those payloads into a single [`PlayerMatrix`] keyed by normalized player
//! name, attaches ESPN ids, ranks every format key by best ADP and produces
//! the final [`MatrixDocument`].
//!
//! The engine is synchronous and never fails on malformed player data.
//! Fetching and caching belong to the caller.

pub mod document;
pub mod error;
pub mod extract;
pub mod ids;
pub mod matrix;
pub mod normalize;
pub mod ranking;
pub mod types;

#[cfg(test)]
mod integration_tests;

pub use document::MatrixDocument;
pub use error::{MatrixError, Result};
pub use extract::{extract_fields, is_present};
pub use ids::{join_espn_ids, EspnIdIndex, PlayerIdRecord};
pub use matrix::{format_key, Dataset, IngestStats, PlayerMatrix};
pub use normalize::normalize_name;
pub use ranking::{compute_rankings, format_keys, FormatRanking, RankedPlayer};
pub use types::{
    FormatEntry, FormatSpec, PlayerPayload, PlayerRecord, RawPlayer, SourceConfig, SourceSpec,
    SourceStats, DEFAULT_TEAM_SIZES,
};
