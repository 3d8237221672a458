//! The `DispatchPolicy` trait — the planner's vehicle-preference seam.

use chrono::NaiveDateTime;
use rustc_hash::FxHashMap;

use fleet_core::VehicleId;
use fleet_schedule::TripInstance;

/// Read-only view the planner hands to a policy for one ranking call.
///
/// Recency is seeded from the store's active assignments when a plan run
/// starts and updated after every commit the run makes, so policies see a
/// consistent picture without touching the store themselves.
pub struct DispatchContext<'a> {
    last_end: &'a FxHashMap<VehicleId, NaiveDateTime>,
}

impl<'a> DispatchContext<'a> {
    pub(crate) fn new(last_end: &'a FxHashMap<VehicleId, NaiveDateTime>) -> Self {
        Self { last_end }
    }

    /// End of the vehicle's latest known assignment, if it has any.
    pub fn last_busy_until(&self, vehicle: VehicleId) -> Option<NaiveDateTime> {
        self.last_end.get(&vehicle).copied()
    }
}

/// Pluggable vehicle-preference ranking.
///
/// Implement this trait to decide which vehicles the planner should try
/// first for each trip.  Policies receive a read-only [`DispatchContext`]
/// and must not hold per-run mutable state; anything that varies during a
/// plan run is supplied through the context.
///
/// The planner filters the returned ranking through availability and commits
/// the first free candidate, so a policy only orders, it never reserves.
pub trait DispatchPolicy: Send + Sync + 'static {
    /// Order `fleet` into dispatch preference for `trip`, most preferred
    /// first.  Omitting a vehicle excludes it for this trip.
    fn rank(
        &self,
        trip: &TripInstance,
        fleet: &[VehicleId],
        ctx: &DispatchContext<'_>,
    ) -> Vec<VehicleId>;
}

/// Try vehicles in the fleet's input order.  The roster order thus doubles
/// as the dispatcher's standing preference list.
#[derive(Debug)]
pub struct InInputOrder;

impl DispatchPolicy for InInputOrder {
    fn rank(
        &self,
        _trip: &TripInstance,
        fleet: &[VehicleId],
        _ctx: &DispatchContext<'_>,
    ) -> Vec<VehicleId> {
        fleet.to_vec()
    }
}

/// Prefer the vehicle whose last assignment ended longest ago, spreading
/// wear across the fleet.  Vehicles with no assignments at all rank first;
/// ties keep the fleet's input order.
pub struct LeastRecentlyUsed;

impl DispatchPolicy for LeastRecentlyUsed {
    fn rank(
        &self,
        _trip: &TripInstance,
        fleet: &[VehicleId],
        ctx: &DispatchContext<'_>,
    ) -> Vec<VehicleId> {
        let mut ranked = fleet.to_vec();
        // `None < Some(_)`, so never-used vehicles sort to the front; the
        // stable sort keeps input order for equal recency.
        ranked.sort_by_key(|&v| ctx.last_busy_until(v));
        ranked
    }
}
