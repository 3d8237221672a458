//! Service time model.
//!
//! # Design
//!
//! All scheduling arithmetic operates on naive local datetimes (`chrono`
//! without a timezone): bus timetables are published in local time and the
//! conflict rules below are timezone-agnostic.
//!
//! The central primitive is the half-open [`TimeWindow`] `[start, end)`.
//! Two windows conflict iff
//!
//!   a.start < b.end  &&  b.start < a.end
//!
//! so windows that merely touch (`[10:00, 12:00)` then `[12:00, 14:00)`)
//! never conflict.  Every overlap question in the workspace reduces to this
//! one predicate.
//!
//! Templates store departure/arrival as bare times of day.  When the arrival
//! time is not after the departure time the service runs past midnight and
//! arrives on the following calendar day; [`TimeWindow::from_departure`]
//! performs that rollover so no caller hand-rolls date math.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::{CoreError, CoreResult};

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// A half-open interval of service time: `[start, end)`.
///
/// The `start < end` invariant is enforced at construction, so fields are
/// private; use [`TimeWindow::start`] / [`TimeWindow::end`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    start: NaiveDateTime,
    end:   NaiveDateTime,
}

impl TimeWindow {
    /// Build a window, rejecting empty and inverted intervals.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build the window of a dated service from its time-of-day bounds.
    ///
    /// The departure instant is `date + departure`.  When `arrival <=
    /// departure` the run crosses midnight and the arrival instant falls on
    /// the next calendar day (an arrival time equal to the departure time is
    /// read as a next-day arrival, never as a zero-length run).
    pub fn from_departure(
        date: NaiveDate,
        departure: NaiveTime,
        arrival: NaiveTime,
    ) -> CoreResult<Self> {
        let start = date.and_time(departure);
        let end_date = if arrival <= departure {
            date.succ_opt().ok_or(CoreError::DateOverflow { date })?
        } else {
            date
        };
        Self::new(start, end_date.and_time(arrival))
    }

    #[inline(always)]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Half-open overlap test.  Touching endpoints do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Does `instant` fall inside the window?  (`start` does, `end` does not.)
    #[inline]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Length of the window.  Positive by construction.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {})", self.start, self.end)
    }
}
