//! CSV template loader.
//!
//! # CSV format
//!
//! One row per route-schedule template, with GTFS-calendar-style weekday
//! columns:
//!
//! ```csv
//! template_id,route_id,departure,arrival,monday,tuesday,wednesday,thursday,friday,saturday,sunday,season_start,season_end,active
//! 0,12,08:00:00,14:00:00,1,0,1,0,0,0,0,2024-01-01,2024-06-30,1
//! 1,12,22:30,05:15,0,0,0,0,1,1,0,2024-01-01,2024-12-31,1
//! ```
//!
//! | Field                | Format                                          |
//! |----------------------|-------------------------------------------------|
//! | `departure`/`arrival`| `HH:MM:SS`, or `HH:MM`                          |
//! | weekday columns      | `1` = runs, `0` = does not run                  |
//! | season bounds        | ISO-8601 dates (`YYYY-MM-DD`), inclusive        |
//! | `active`             | `1` = producing trips, `0` = deactivated        |
//!
//! Every row must select at least one weekday; an all-zero row is rejected
//! even when `active` is `0`.

use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::Deserialize;

use fleet_core::{RouteId, TemplateId};

use crate::mask::WeekdayMask;
use crate::template::RouteScheduleTemplate;
use crate::ScheduleError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TemplateRecord {
    template_id:  u32,
    route_id:     u32,
    departure:    String,
    arrival:      String,
    monday:       u8,
    tuesday:      u8,
    wednesday:    u8,
    thursday:     u8,
    friday:       u8,
    saturday:     u8,
    sunday:       u8,
    season_start: String,
    season_end:   String,
    active:       u8,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load route-schedule templates from a CSV file.
///
/// Rows keep their file order; duplicate template ids are left for the
/// planner builder to reject, since only it sees the full configuration.
pub fn load_templates_csv(path: &Path) -> Result<Vec<RouteScheduleTemplate>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_templates_reader(file)
}

/// Like [`load_templates_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_templates_reader<R: Read>(
    reader: R,
) -> Result<Vec<RouteScheduleTemplate>, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut templates = Vec::new();

    for result in csv_reader.deserialize::<TemplateRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;

        let mut days = WeekdayMask::EMPTY;
        for (flag, day) in [
            (row.monday, Weekday::Mon),
            (row.tuesday, Weekday::Tue),
            (row.wednesday, Weekday::Wed),
            (row.thursday, Weekday::Thu),
            (row.friday, Weekday::Fri),
            (row.saturday, Weekday::Sat),
            (row.sunday, Weekday::Sun),
        ] {
            if flag != 0 {
                days.insert(day);
            }
        }

        let mut template = RouteScheduleTemplate::new(
            TemplateId(row.template_id),
            RouteId(row.route_id),
            parse_time(&row.departure)?,
            parse_time(&row.arrival)?,
            days,
            parse_date(&row.season_start)?,
            parse_date(&row.season_end)?,
        )?;
        if row.active == 0 {
            template.deactivate();
        }
        templates.push(template);
    }

    Ok(templates)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_time(s: &str) -> Result<NaiveTime, ScheduleError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| {
            ScheduleError::Parse(format!("invalid time {s:?}: expected HH:MM:SS or HH:MM"))
        })
}

fn parse_date(s: &str) -> Result<NaiveDate, ScheduleError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ScheduleError::Parse(format!("invalid date {s:?}: expected YYYY-MM-DD")))
}
