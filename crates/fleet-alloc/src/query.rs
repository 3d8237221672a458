//! Read-only availability queries in timetable terms.
//!
//! Booking and dispatch screens ask "is bus 7 free on the 3rd of March for
//! the 08:00–14:00 run?"  This facade turns that phrasing (date plus
//! times of day, midnight rollover included) into a window probe.  It never
//! mutates anything.

use chrono::{NaiveDate, NaiveTime};

use fleet_core::{TimeWindow, VehicleId};

use crate::allocator::Allocator;
use crate::error::AllocResult;
use crate::store::AssignmentStore;

/// Borrowing facade over an [`Allocator`] for availability reads.
pub struct AvailabilityQuery<'a, S: AssignmentStore> {
    allocator: &'a Allocator<S>,
}

impl<'a, S: AssignmentStore> AvailabilityQuery<'a, S> {
    pub fn new(allocator: &'a Allocator<S>) -> Self {
        Self { allocator }
    }

    /// Is `vehicle` free for a run departing `date` at `departure` and
    /// arriving at `arrival` (next day when `arrival <= departure`)?
    pub fn vehicle_free_on(
        &self,
        vehicle: VehicleId,
        date: NaiveDate,
        departure: NaiveTime,
        arrival: NaiveTime,
    ) -> AllocResult<bool> {
        let window = TimeWindow::from_departure(date, departure, arrival)?;
        self.allocator.check_availability(vehicle, &window)
    }

    /// Is `vehicle` free over an already-built window?
    pub fn vehicle_free_for(&self, vehicle: VehicleId, window: &TimeWindow) -> AllocResult<bool> {
        self.allocator.check_availability(vehicle, window)
    }
}
