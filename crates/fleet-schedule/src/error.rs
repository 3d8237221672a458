use chrono::NaiveDate;
use thiserror::Error;

use fleet_core::{TemplateId, TripId};

use crate::trip::TripStatus;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("template {template}: season start {start} is after season end {end}")]
    SeasonOrder {
        template: TemplateId,
        start:    NaiveDate,
        end:      NaiveDate,
    },

    #[error("template {template}: weekday mask is empty")]
    EmptyDays { template: TemplateId },

    #[error("trip {0} not found")]
    TripNotFound(TripId),

    #[error("trip {trip}: illegal status transition {from} -> {to}")]
    InvalidTransition {
        trip: TripId,
        from: TripStatus,
        to:   TripStatus,
    },

    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
