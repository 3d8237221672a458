//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! into them via `#[from]` or keep them separate.  Both patterns appear in
//! this workspace; prefer whichever keeps error sites clean.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// The top-level error type for `fleet-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid time window: start {start} is not before end {end}")]
    InvalidWindow {
        start: NaiveDateTime,
        end:   NaiveDateTime,
    },

    #[error("calendar overflow stepping past {date}")]
    DateOverflow { date: NaiveDate },
}

/// Shorthand result type for all `fleet-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
