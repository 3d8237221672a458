//! The allocator: conflict-checked commits coupled to trip state.
//!
//! # What is atomic where
//!
//! The overlap check and the insert are one critical section inside the
//! store, scoped to a single vehicle ([`AssignmentStore::try_commit`]).  The
//! allocator adds the trip-side bookkeeping around it:
//!
//! 1. reject commits for unknown or already-assigned trips;
//! 2. run `try_commit`, retrying a bounded number of times when the backend
//!    reports a lost write race ([`StoreFault::Serialization`]);
//! 3. flip the trip to `Assigned`.  If another thread assigned the same
//!    trip between steps 1 and 3, the freshly inserted record is cancelled
//!    again (compensation) and the commit reports
//!    [`AllocError::TripAlreadyAssigned`].
//!
//! A conflict is never resolved by silently picking another vehicle; callers
//! get the colliding assignment and decide themselves (see
//! `fleet-plan`'s candidate fallback).
//!
//! The trip registry sits behind one `RwLock`.  That lock is held only for
//! status flips, never across the overlap check or the store insert, so
//! commits on different vehicles still proceed in parallel.

use std::sync::RwLock;

use fleet_core::{AssignmentId, TimeWindow, TripId, VehicleId};
use fleet_schedule::{Admitted, TripInstance, TripRegistry, TripSkeleton, TripStatus};

use crate::assignment::{AssignmentStatus, VehicleAssignment};
use crate::error::{AllocError, AllocResult};
use crate::store::{AssignmentStore, CancelOutcome, StoreFault};

/// Default bound for serialization retries inside one commit.
pub const DEFAULT_COMMIT_RETRIES: u32 = 3;

/// Conflict-checked vehicle allocation over a pluggable store.
#[derive(Debug)]
pub struct Allocator<S: AssignmentStore> {
    store:          S,
    trips:          RwLock<TripRegistry>,
    commit_retries: u32,
}

impl<S: AssignmentStore> Allocator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            trips: RwLock::new(TripRegistry::new()),
            commit_retries: DEFAULT_COMMIT_RETRIES,
        }
    }

    /// Override the serialization retry budget (see [`AllocError::Contention`]).
    pub fn with_commit_retries(mut self, retries: u32) -> Self {
        self.commit_retries = retries;
        self
    }

    /// Direct access to the underlying store (read-side reporting).
    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Trip registry access ──────────────────────────────────────────────

    /// Admit an expanded skeleton; idempotent per `(template, date)`.
    pub fn admit_trip(&self, skeleton: TripSkeleton) -> AllocResult<Admitted> {
        Ok(self.trips_mut()?.admit(skeleton))
    }

    pub fn trip(&self, id: TripId) -> AllocResult<Option<TripInstance>> {
        Ok(self.trips()?.get(id).copied())
    }

    pub fn trip_count(&self) -> AllocResult<usize> {
        Ok(self.trips()?.len())
    }

    /// Trips with no vehicle yet, in admission order.
    pub fn unscheduled_trips(&self) -> AllocResult<Vec<TripInstance>> {
        Ok(self.trips()?.unscheduled().copied().collect())
    }

    /// All trips in admission order.
    pub fn trips_snapshot(&self) -> AllocResult<Vec<TripInstance>> {
        Ok(self.trips()?.iter().copied().collect())
    }

    /// `Assigned → InProgress` (departure).
    pub fn start_trip(&self, id: TripId) -> AllocResult<()> {
        Ok(self.trips_mut()?.mark_in_progress(id)?)
    }

    /// `InProgress → Completed` (arrival).
    pub fn complete_trip(&self, id: TripId) -> AllocResult<()> {
        Ok(self.trips_mut()?.mark_completed(id)?)
    }

    /// Cancel a trip outright: frees its assignment (if any) and marks the
    /// trip `Cancelled`.
    pub fn cancel_trip(&self, id: TripId) -> AllocResult<()> {
        let trip = self.trip(id)?.ok_or(AllocError::TripNotFound(id))?;
        if let (TripStatus::Assigned, Some(vehicle)) = (trip.status, trip.vehicle) {
            if let Some(assignment) = self
                .store
                .active_for(vehicle)?
                .into_iter()
                .find(|a| a.trip == id)
            {
                self.store.cancel(assignment.id)?;
            }
        }
        self.trips_mut()?.mark_cancelled(id)?;
        log::debug!("trip {id} cancelled");
        Ok(())
    }

    // ── Availability ──────────────────────────────────────────────────────

    /// Is `vehicle` free over `window`?  Pure probe, runs concurrently with
    /// anything.  A vehicle with no assignments is free; whether the vehicle
    /// exists at all is the roster holder's question, not the store's.
    pub fn check_availability(&self, vehicle: VehicleId, window: &TimeWindow) -> AllocResult<bool> {
        Ok(self.store.find_overlap(vehicle, window)?.is_none())
    }

    /// Filter `candidates` down to the ones free over `window`, preserving
    /// the caller's order (the caller's order is its preference ranking).
    pub fn available_vehicles(
        &self,
        candidates: &[VehicleId],
        window: &TimeWindow,
    ) -> AllocResult<Vec<VehicleId>> {
        let mut free = Vec::with_capacity(candidates.len());
        for &vehicle in candidates {
            if self.check_availability(vehicle, window)? {
                free.push(vehicle);
            }
        }
        Ok(free)
    }

    // ── Commit / cancel ───────────────────────────────────────────────────

    /// Commit `vehicle` to `trip` over `window`.
    ///
    /// On success the trip is `Assigned` and the returned record is `Active`.
    /// On overlap the colliding assignment comes back in
    /// [`AllocError::Conflict`]; nothing is mutated.
    pub fn commit(
        &self,
        vehicle: VehicleId,
        trip: TripId,
        window: TimeWindow,
    ) -> AllocResult<VehicleAssignment> {
        {
            let trips = self.trips()?;
            let t = trips.get(trip).ok_or(AllocError::TripNotFound(trip))?;
            if t.status != TripStatus::Unscheduled {
                return Err(AllocError::TripAlreadyAssigned {
                    trip,
                    holder: t.vehicle,
                });
            }
        }

        let assignment = self.commit_with_retries(vehicle, trip, window)?;

        // Couple trip state.  Losing a same-trip race here means another
        // thread assigned this trip while our insert was in flight; undo the
        // insert and report the trip as taken.
        let mark = self.trips_mut()?.mark_assigned(trip, vehicle);
        if mark.is_err() {
            if let Err(cleanup) = self.store.cancel(assignment.id) {
                log::warn!(
                    "assignment {} orphaned after losing trip {trip} race: {cleanup}",
                    assignment.id
                );
            }
            let holder = self.trip(trip)?.and_then(|t| t.vehicle);
            return Err(AllocError::TripAlreadyAssigned { trip, holder });
        }
        Ok(assignment)
    }

    fn commit_with_retries(
        &self,
        vehicle: VehicleId,
        trip: TripId,
        window: TimeWindow,
    ) -> AllocResult<VehicleAssignment> {
        let mut attempts = 0;
        loop {
            match self.store.try_commit(vehicle, trip, window) {
                Ok(a) => return Ok(a),
                Err(StoreFault::Overlap { existing }) => {
                    log::debug!(
                        "vehicle {vehicle}: commit rejected, {window} overlaps assignment {}",
                        existing.id
                    );
                    return Err(AllocError::Conflict {
                        vehicle,
                        requested: window,
                        existing,
                    });
                }
                Err(StoreFault::Serialization) if attempts < self.commit_retries => {
                    attempts += 1;
                    log::warn!(
                        "vehicle {vehicle}: commit lost a write race, retry {attempts}/{}",
                        self.commit_retries
                    );
                }
                Err(StoreFault::Serialization) => {
                    return Err(AllocError::Contention {
                        vehicle,
                        retries: self.commit_retries,
                    });
                }
                Err(fault) => return Err(fault.into()),
            }
        }
    }

    /// Cancel an assignment, reverting its trip to `Unscheduled`.
    ///
    /// Idempotent: cancelling twice reports
    /// [`CancelOutcome::AlreadyCancelled`] and changes nothing.  Rejected
    /// once the trip has departed ([`AllocError::TripUnderway`]).
    pub fn cancel(&self, id: AssignmentId) -> AllocResult<CancelOutcome> {
        let existing = self
            .store
            .get(id)?
            .ok_or(AllocError::UnknownAssignment(id))?;
        if existing.status == AssignmentStatus::Cancelled {
            return Ok(CancelOutcome::AlreadyCancelled(existing));
        }
        {
            let trips = self.trips()?;
            let t = trips
                .get(existing.trip)
                .ok_or(AllocError::TripNotFound(existing.trip))?;
            if t.status != TripStatus::Assigned {
                return Err(AllocError::TripUnderway {
                    trip:   existing.trip,
                    status: t.status,
                });
            }
        }

        match self.store.cancel(id)? {
            CancelOutcome::Cancelled(a) => {
                let mut trips = self.trips_mut()?;
                // Revert the trip only if it still points at this vehicle;
                // a concurrent cancel-and-recommit may have moved it on.
                let still_ours = trips
                    .get(a.trip)
                    .is_some_and(|t| t.status == TripStatus::Assigned && t.vehicle == Some(a.vehicle));
                if still_ours {
                    trips.mark_unscheduled(a.trip)?;
                }
                drop(trips);
                log::debug!("assignment {id} cancelled, trip {} released", a.trip);
                Ok(CancelOutcome::Cancelled(a))
            }
            // Raced with another cancel of the same id; it did the trip
            // bookkeeping.
            already => Ok(already),
        }
    }

    /// Active assignments of one vehicle, ascending by window start.
    pub fn assignments_for(&self, vehicle: VehicleId) -> AllocResult<Vec<VehicleAssignment>> {
        Ok(self.store.active_for(vehicle)?)
    }

    /// One assignment record by id, any status.
    pub fn assignment(&self, id: AssignmentId) -> AllocResult<Option<VehicleAssignment>> {
        Ok(self.store.get(id)?)
    }

    // ── Lock plumbing ─────────────────────────────────────────────────────

    fn trips(&self) -> AllocResult<std::sync::RwLockReadGuard<'_, TripRegistry>> {
        self.trips.read().map_err(|_| AllocError::Poisoned)
    }

    fn trips_mut(&self) -> AllocResult<std::sync::RwLockWriteGuard<'_, TripRegistry>> {
        self.trips.write().map_err(|_| AllocError::Poisoned)
    }
}
