//! Plain data row types written by roster backends, plus the flatteners
//! that build them from live domain state.

use fleet_alloc::{AllocError, Allocator, AssignmentStore};
use fleet_core::VehicleId;
use fleet_seating::SeatingPlan;

use crate::ExportResult;

/// One vehicle-to-trip assignment, flattened for export.
///
/// Datetimes are ISO-8601 text so every backend renders them identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub assignment_id: u32,
    pub vehicle_id:    u32,
    pub trip_id:       u32,
    /// Route of the trip.  `u32::MAX` when the trip registry no longer holds
    /// the trip (e.g. assignments reloaded from a SQLite store).
    pub route_id:       u32,
    pub departure_date: String,
    pub window_start:   String,
    pub window_end:     String,
    pub status:         String,
}

/// One compiled seat, flattened for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRow {
    pub vehicle_id: u32,
    pub seat_id:    u32,
    pub label:      String,
    pub tier_id:    u16,
    pub status:     String,
}

/// Flatten every assignment the allocator knows about, any status, sorted by
/// `(vehicle, window start, id)` (the store's snapshot order).
pub fn assignment_rows<S: AssignmentStore>(
    allocator: &Allocator<S>,
) -> ExportResult<Vec<AssignmentRow>> {
    let snapshot = allocator.store().snapshot().map_err(AllocError::from)?;
    let mut rows = Vec::with_capacity(snapshot.len());
    for a in snapshot {
        let route_id = match allocator.trip(a.trip)? {
            Some(t) => t.route.0,
            None => u32::MAX,
        };
        rows.push(AssignmentRow {
            assignment_id:  a.id.0,
            vehicle_id:     a.vehicle.0,
            trip_id:        a.trip.0,
            route_id,
            departure_date: a.window.start().date().to_string(),
            window_start:   a.window.start().to_string(),
            window_end:     a.window.end().to_string(),
            status:         a.status.to_string(),
        });
    }
    Ok(rows)
}

/// Flatten every compiled seat, sorted by `(vehicle, label)`.  Seat lists are
/// already in label order per vehicle; only the vehicles need sorting.
pub fn seat_rows(plan: &SeatingPlan) -> Vec<SeatRow> {
    let mut vehicles: Vec<VehicleId> = plan.vehicles().collect();
    vehicles.sort();

    let mut rows = Vec::new();
    for vehicle in vehicles {
        let Some(seats) = plan.seats(vehicle) else {
            continue;
        };
        for seat in seats {
            rows.push(SeatRow {
                vehicle_id: vehicle.0,
                seat_id:    seat.id.0,
                label:      seat.label.to_string(),
                tier_id:    seat.tier.0,
                status:     seat.status.to_string(),
            });
        }
    }
    rows
}
