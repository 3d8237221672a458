//! Calendar expansion: template × date range → dated departures.
//!
//! # Algorithm
//!
//! The template's season is intersected with the query range:
//!
//! ```text
//! lo = max(range_start, season_start)
//! hi = min(range_end,   season_end)
//! ```
//!
//! then every date in `lo ..= hi` whose weekday is in the template's mask
//! yields one [`TripSkeleton`] with its service window derived via
//! [`TimeWindow::from_departure`] (midnight rollover included).  An inactive
//! template, or an empty intersection, yields nothing.
//!
//! Expansion is pure: it touches no shared state, and the same inputs always
//! produce the same sequence.  Skipping dates that were already materialized
//! in an earlier run is not this module's concern; the
//! [`crate::trip::TripRegistry`] deduplicates on admission by
//! `(template, departure_date)`.

use chrono::{Datelike, NaiveDate, NaiveTime};

use fleet_core::{RouteId, TemplateId, TimeWindow};

use crate::mask::WeekdayMask;
use crate::template::RouteScheduleTemplate;
use crate::trip::TripSkeleton;

/// Expand `template` over the inclusive date range `[range_start, range_end]`.
///
/// The returned iterator is lazy, finite, and strictly ascending by date.  An
/// inverted query range is not an error; it simply yields nothing.
pub fn expand(
    template: &RouteScheduleTemplate,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Departures {
    let lo = range_start.max(template.season_start());
    let hi = range_end.min(template.season_end());
    let cursor = (template.is_active() && lo <= hi).then_some(lo);
    Departures {
        template:  template.id(),
        route:     template.route(),
        departure: template.departure(),
        arrival:   template.arrival(),
        days:      template.days(),
        cursor,
        last: hi,
    }
}

/// Lazy iterator over the dated departures of one template.
///
/// `Clone` the iterator (or call [`expand`] again) to restart from the top;
/// both yield the identical sequence.
#[derive(Clone, Debug)]
pub struct Departures {
    template:  TemplateId,
    route:     RouteId,
    departure: NaiveTime,
    arrival:   NaiveTime,
    days:      WeekdayMask,
    /// Next date to examine; `None` once exhausted.
    cursor: Option<NaiveDate>,
    /// Inclusive upper bound of the clamped range.
    last: NaiveDate,
}

impl Iterator for Departures {
    type Item = TripSkeleton;

    fn next(&mut self) -> Option<TripSkeleton> {
        loop {
            let date = self.cursor?;
            self.cursor = if date < self.last {
                date.succ_opt()
            } else {
                None
            };
            if !self.days.contains(date.weekday()) {
                continue;
            }
            // `from_departure` only fails past the calendar horizon
            // (NaiveDate::MAX); end the iteration there.
            let window = match TimeWindow::from_departure(date, self.departure, self.arrival) {
                Ok(w) => w,
                Err(_) => return None,
            };
            return Some(TripSkeleton {
                template: self.template,
                route: self.route,
                departure_date: date,
                window,
            });
        }
    }
}

impl std::iter::FusedIterator for Departures {}
