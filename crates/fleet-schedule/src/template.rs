//! Recurring route-schedule templates.
//!
//! A template is the recurrence rule for one departure of one route: "route
//! 12 leaves at 08:00 and arrives at 14:00 on Mondays and Wednesdays from
//! 2024-01-01 through 2024-06-30".  Templates are the durable configuration
//! objects of the system; dated [`crate::trip::TripInstance`]s are stamped
//! out of them by [`crate::expand`].
//!
//! Templates are never hard-deleted.  Retiring a departure means
//! [`RouteScheduleTemplate::deactivate`]: expansion stops producing new
//! trips, while trips already materialized (and any vehicle assignments on
//! them) are untouched.

use chrono::{Datelike, NaiveDate, NaiveTime};

use fleet_core::{RouteId, TemplateId};

use crate::error::{ScheduleError, ScheduleResult};
use crate::mask::WeekdayMask;

/// The recurrence rule for one scheduled departure.
///
/// Invariants, enforced at construction and by every setter:
/// * `season_start <= season_end` (single-day seasons are legal);
/// * `days` is non-empty.
///
/// Seasons spanning a calendar year boundary need no special casing: the
/// bounds are full dates, so `2024-11-01 ..= 2025-02-28` compares correctly.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteScheduleTemplate {
    id:           TemplateId,
    route:        RouteId,
    departure:    NaiveTime,
    arrival:      NaiveTime,
    days:         WeekdayMask,
    season_start: NaiveDate,
    season_end:   NaiveDate,
    active:       bool,
}

impl RouteScheduleTemplate {
    /// Build an active template, validating the season order and the mask.
    ///
    /// `arrival <= departure` is legal and means the run crosses midnight
    /// (see [`fleet_core::TimeWindow::from_departure`]).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TemplateId,
        route: RouteId,
        departure: NaiveTime,
        arrival: NaiveTime,
        days: WeekdayMask,
        season_start: NaiveDate,
        season_end: NaiveDate,
    ) -> ScheduleResult<Self> {
        if season_start > season_end {
            return Err(ScheduleError::SeasonOrder {
                template: id,
                start:    season_start,
                end:      season_end,
            });
        }
        if days.is_empty() {
            return Err(ScheduleError::EmptyDays { template: id });
        }
        Ok(Self {
            id,
            route,
            departure,
            arrival,
            days,
            season_start,
            season_end,
            active: true,
        })
    }

    #[inline(always)]
    pub fn id(&self) -> TemplateId {
        self.id
    }

    #[inline(always)]
    pub fn route(&self) -> RouteId {
        self.route
    }

    #[inline(always)]
    pub fn departure(&self) -> NaiveTime {
        self.departure
    }

    #[inline(always)]
    pub fn arrival(&self) -> NaiveTime {
        self.arrival
    }

    #[inline(always)]
    pub fn days(&self) -> WeekdayMask {
        self.days
    }

    #[inline(always)]
    pub fn season_start(&self) -> NaiveDate {
        self.season_start
    }

    #[inline(always)]
    pub fn season_end(&self) -> NaiveDate {
        self.season_end
    }

    #[inline(always)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    // ── Validated mutation ────────────────────────────────────────────────

    /// Replace the season bounds.  Rejects inverted ranges.
    pub fn set_season(&mut self, start: NaiveDate, end: NaiveDate) -> ScheduleResult<()> {
        if start > end {
            return Err(ScheduleError::SeasonOrder {
                template: self.id,
                start,
                end,
            });
        }
        self.season_start = start;
        self.season_end = end;
        Ok(())
    }

    /// Replace the weekday mask.  Rejects the empty mask.
    pub fn set_days(&mut self, days: WeekdayMask) -> ScheduleResult<()> {
        if days.is_empty() {
            return Err(ScheduleError::EmptyDays { template: self.id });
        }
        self.days = days;
        Ok(())
    }

    /// Stop producing trips from this template.  Existing trips are kept.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Resume producing trips from this template.
    pub fn activate(&mut self) {
        self.active = true;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Does this template produce a departure on `date`?
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.active
            && self.season_start <= date
            && date <= self.season_end
            && self.days.contains(date.weekday())
    }
}
