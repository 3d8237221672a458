//! `fleet-schedule` — recurring templates, calendar expansion, and the trip
//! registry.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`mask`]     | `WeekdayMask` (one bit per weekday)                       |
//! | [`template`] | `RouteScheduleTemplate` (validated recurrence rule)       |
//! | [`expand`]   | `expand()` → `Departures` lazy iterator                   |
//! | [`trip`]     | `TripSkeleton`, `TripInstance`, `TripStatus`, `TripRegistry` |
//! | [`loader`]   | `load_templates_csv`, `load_templates_reader`             |
//! | [`error`]    | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Materialization model (summary)
//!
//! A template is a recurrence rule (departure/arrival times, weekday mask,
//! season date range).  Expansion intersects the season with a query range
//! and stamps one [`trip::TripSkeleton`] per matching date:
//!
//! ```text
//! lo = max(range_start, season_start)
//! hi = min(range_end,   season_end)
//! for d in lo ..= hi where weekday(d) ∈ days: yield skeleton(d)
//! ```
//!
//! The [`trip::TripRegistry`] turns skeletons into [`trip::TripInstance`]s,
//! deduplicating by `(template, departure_date)` so re-expansion over an
//! overlapping range is idempotent.

pub mod error;
pub mod expand;
pub mod loader;
pub mod mask;
pub mod template;
pub mod trip;


pub use error::{ScheduleError, ScheduleResult};
pub use expand::{expand, Departures};
pub use loader::{load_templates_csv, load_templates_reader};
pub use mask::WeekdayMask;
pub use template::RouteScheduleTemplate;
pub use trip::{Admitted, TripInstance, TripRegistry, TripSkeleton, TripStatus};
