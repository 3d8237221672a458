use thiserror::Error;

use fleet_core::{AssignmentId, CoreError, TimeWindow, TripId, VehicleId};
use fleet_schedule::{ScheduleError, TripStatus};

use crate::assignment::VehicleAssignment;
use crate::store::StoreFault;

#[derive(Debug, Error)]
pub enum AllocError {
    #[error("invalid window: {0}")]
    Window(#[from] CoreError),

    /// The candidate window collides with an existing active assignment.
    /// Carries the colliding record (id and window) for the caller's report.
    #[error("vehicle {vehicle}: {requested} overlaps assignment {} at {}", .existing.id, .existing.window)]
    Conflict {
        vehicle:   VehicleId,
        requested: TimeWindow,
        existing:  VehicleAssignment,
    },

    /// The store kept losing write races; the commit was retried the full
    /// budget and never got a definitive answer.
    #[error("vehicle {vehicle}: commit abandoned after {retries} serialization retries")]
    Contention { vehicle: VehicleId, retries: u32 },

    #[error("trip {0} not found")]
    TripNotFound(TripId),

    #[error("trip {trip} is already assigned")]
    TripAlreadyAssigned {
        trip:   TripId,
        holder: Option<VehicleId>,
    },

    /// The trip has departed (or finished); its assignment can no longer be
    /// cancelled.
    #[error("trip {trip} is {status}, assignment can no longer be cancelled")]
    TripUnderway { trip: TripId, status: TripStatus },

    #[error("assignment {0} not found")]
    UnknownAssignment(AssignmentId),

    #[error("trip registry lock poisoned by a panicked writer")]
    Poisoned,

    #[error(transparent)]
    Trip(#[from] ScheduleError),

    #[error(transparent)]
    Store(#[from] StoreFault),
}

pub type AllocResult<T> = Result<T, AllocError>;
