//! The `Planner` struct and its plan run.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rustc_hash::FxHashMap;

use fleet_alloc::{
    AllocError, Allocator, AssignmentStatus, AssignmentStore, AvailabilityQuery,
};
use fleet_core::VehicleId;
use fleet_schedule::{expand, RouteScheduleTemplate, TripSkeleton, TripStatus};

use crate::error::{PlanError, PlanResult};
use crate::policy::{DispatchContext, DispatchPolicy};

// ── Options and report ────────────────────────────────────────────────────────

/// Knobs for a plan run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanOptions {
    /// Write-race retry budget handed to the allocator's commit path.
    pub commit_retries: u32,

    /// Upper bound on calendar days a single [`Planner::plan`] call may
    /// cover.  Guards against a fat-fingered year-10000 horizon turning one
    /// call into millions of trips.
    pub max_horizon_days: u32,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            commit_retries:   fleet_alloc::DEFAULT_COMMIT_RETRIES,
            max_horizon_days: 366,
        }
    }
}

/// What one plan run did.
///
/// `assigned` counts trips that held a vehicle when the run finished,
/// including the rare trip a concurrent caller assigned mid-run.
/// `conflicts` counts commit-level rejections (the advisory availability
/// check passed but the commit lost a race), not trips.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanReport {
    /// Skeletons produced by calendar expansion.
    pub expanded:   usize,
    /// Skeletons that were new to the trip registry.
    pub admitted:   usize,
    /// Trips holding a vehicle at the end of the run.
    pub assigned:   usize,
    /// Trips no fleet vehicle was free for.
    pub unassigned: usize,
    /// Commits rejected by a racing assignment.
    pub conflicts:  usize,
}

// ── Planner ───────────────────────────────────────────────────────────────────

/// The materialization planner.
///
/// `Planner<S, P>` owns the allocator and drives the three-phase plan run:
///
/// 1. **Expand**: every template is expanded over the requested date range
///    (in parallel with the `parallel` feature; expansion is pure).
/// 2. **Admit**: skeletons are admitted in `(departure, template)` order.
///    Admission deduplicates, so re-planning an overlapping horizon is safe.
/// 3. **Dispatch**: for each unscheduled trip, the policy ranks the fleet,
///    availability filters the ranking, and the first free candidate is
///    committed.  A commit lost to a concurrent race falls through to the
///    next candidate; a trip with no free vehicle is left unscheduled and
///    counted, never force-assigned.
///
/// Create via [`PlannerBuilder`][crate::PlannerBuilder].
#[derive(Debug)]
pub struct Planner<S: AssignmentStore, P: DispatchPolicy> {
    /// The allocator the run commits through.  Shared access is fine: all
    /// conflict enforcement lives inside it.
    pub allocator: Allocator<S>,

    /// Vehicle-preference policy consulted once per trip.
    pub policy: P,

    /// Templates to materialize, as validated by the builder.
    pub templates: Vec<RouteScheduleTemplate>,

    /// The fleet in the caller's preference order.
    pub fleet: Vec<VehicleId>,

    /// Run configuration.
    pub options: PlanOptions,
}

impl<S: AssignmentStore, P: DispatchPolicy> Planner<S, P> {
    /// Materialize and dispatch every template over `[range_start, range_end]`
    /// (inclusive dates).  An inverted range is an empty plan, not an error.
    pub fn plan(&self, range_start: NaiveDate, range_end: NaiveDate) -> PlanResult<PlanReport> {
        let days = (range_end - range_start).num_days() + 1;
        if days > i64::from(self.options.max_horizon_days) {
            return Err(PlanError::HorizonTooLong {
                days,
                max: self.options.max_horizon_days,
            });
        }

        // ── Phase 1: expand ───────────────────────────────────────────────
        #[cfg(not(feature = "parallel"))]
        let mut skeletons: Vec<TripSkeleton> = self
            .templates
            .iter()
            .flat_map(|t| expand(t, range_start, range_end))
            .collect();

        #[cfg(feature = "parallel")]
        let mut skeletons: Vec<TripSkeleton> = {
            use rayon::prelude::*;
            self.templates
                .par_iter()
                .flat_map_iter(|t| expand(t, range_start, range_end))
                .collect()
        };

        // Deterministic dispatch order regardless of expansion order.
        skeletons.sort_by_key(|s| (s.window.start(), s.template));

        // ── Phase 2: admit ────────────────────────────────────────────────
        let mut report = PlanReport {
            expanded: skeletons.len(),
            ..PlanReport::default()
        };
        let mut work = Vec::with_capacity(skeletons.len());
        for skeleton in skeletons {
            let admitted = self.allocator.admit_trip(skeleton)?;
            if admitted.is_new() {
                report.admitted += 1;
            }
            if let Some(trip) = self.allocator.trip(admitted.id())? {
                if trip.status == TripStatus::Unscheduled {
                    work.push(trip);
                }
            }
        }

        // ── Phase 3: dispatch ─────────────────────────────────────────────
        let mut last_end = self.seed_recency()?;

        for trip in work {
            let ranked = {
                let ctx = DispatchContext::new(&last_end);
                self.policy.rank(&trip, &self.fleet, &ctx)
            };
            let candidates = self.allocator.available_vehicles(&ranked, &trip.window)?;

            let mut assigned = false;
            for vehicle in candidates {
                match self.allocator.commit(vehicle, trip.id, trip.window) {
                    Ok(_) => {
                        bump_recency(&mut last_end, vehicle, trip.window.end());
                        assigned = true;
                        break;
                    }
                    // The advisory check said free but the commit lost a
                    // race; try the next candidate.
                    Err(AllocError::Conflict { .. }) => report.conflicts += 1,
                    // A concurrent caller assigned this trip mid-run.
                    Err(AllocError::TripAlreadyAssigned { .. }) => {
                        assigned = true;
                        break;
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            if assigned {
                report.assigned += 1;
            } else {
                report.unassigned += 1;
                log::debug!("trip {}: no free vehicle over {}", trip.id, trip.window);
            }
        }

        log::info!(
            "plan {range_start}..={range_end}: expanded {}, admitted {} new, \
             assigned {}, unassigned {}, conflicts {}",
            report.expanded,
            report.admitted,
            report.assigned,
            report.unassigned,
            report.conflicts
        );
        Ok(report)
    }

    /// Is `vehicle` free for a service departing `date` at `departure` and
    /// arriving at `arrival` (next day when `arrival <= departure`)?
    ///
    /// Unlike the raw [`AvailabilityQuery`], this checks the vehicle against
    /// the planner's roster first.
    pub fn vehicle_free_for(
        &self,
        vehicle: VehicleId,
        date: NaiveDate,
        departure: NaiveTime,
        arrival: NaiveTime,
    ) -> PlanResult<bool> {
        if !self.fleet.contains(&vehicle) {
            return Err(PlanError::UnknownVehicle(vehicle));
        }
        let query = AvailabilityQuery::new(&self.allocator);
        Ok(query.vehicle_free_on(vehicle, date, departure, arrival)?)
    }

    /// Latest active-assignment end per vehicle, from the store.
    fn seed_recency(&self) -> PlanResult<FxHashMap<VehicleId, NaiveDateTime>> {
        let mut last_end = FxHashMap::default();
        let snapshot = self
            .allocator
            .store()
            .snapshot()
            .map_err(AllocError::from)?;
        for a in snapshot {
            if a.status == AssignmentStatus::Active {
                bump_recency(&mut last_end, a.vehicle, a.window.end());
            }
        }
        Ok(last_end)
    }
}

fn bump_recency(
    last_end: &mut FxHashMap<VehicleId, NaiveDateTime>,
    vehicle: VehicleId,
    end: NaiveDateTime,
) {
    last_end
        .entry(vehicle)
        .and_modify(|t| *t = (*t).max(end))
        .or_insert(end);
}
