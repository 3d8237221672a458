//! The storage seam: `AssignmentStore` and the in-memory implementation.
//!
//! # Concurrency contract
//!
//! * [`AssignmentStore::find_overlap`] is a probe: any number may run
//!   concurrently with each other and with commits (shared read locks only).
//! * [`AssignmentStore::try_commit`] is the one mutual-exclusion point, and
//!   its scope is a single vehicle.  Commits against different vehicles
//!   never contend; there is no store-wide write lock around the
//!   check-then-insert.
//! * A backend that detects it lost a write race (e.g. SQLite returning
//!   busy) reports [`StoreFault::Serialization`]; the allocator retries a
//!   bounded number of times.  [`MemoryStore`] never emits it — its
//!   per-vehicle lock queues writers instead.

use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

use fleet_core::{AssignmentId, TimeWindow, TripId, VehicleId};

use crate::assignment::{AssignmentStatus, VehicleAssignment};

// ── Faults ────────────────────────────────────────────────────────────────────

/// Failures at the storage seam.
#[derive(Debug, Error)]
pub enum StoreFault {
    /// The candidate window overlaps an active assignment.  Carries the
    /// colliding record so callers can report what is in the way.
    #[error("window overlaps active assignment {}", .existing.id)]
    Overlap { existing: VehicleAssignment },

    /// The backend lost a write race and the commit should be retried.
    #[error("serialization failure, commit lost the write race")]
    Serialization,

    #[error("assignment {0} not found")]
    UnknownAssignment(AssignmentId),

    #[error("storage lock poisoned by a panicked writer")]
    Poisoned,

    #[error("storage backend: {0}")]
    Backend(String),
}

/// Outcome of a cancel: either this call flipped the record, or an earlier
/// one already had.  Both are success — cancellation is idempotent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled(VehicleAssignment),
    AlreadyCancelled(VehicleAssignment),
}

impl CancelOutcome {
    #[inline]
    pub fn record(self) -> VehicleAssignment {
        match self {
            CancelOutcome::Cancelled(a) | CancelOutcome::AlreadyCancelled(a) => a,
        }
    }

    #[inline]
    pub fn was_active(self) -> bool {
        matches!(self, CancelOutcome::Cancelled(_))
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Persistence abstraction for assignment records.
///
/// Implementations take `&self` and must be safe to share across threads;
/// the allocator is generic over this trait so deployments choose memory or
/// SQLite (feature `sqlite`) without touching scheduling logic.
pub trait AssignmentStore: Send + Sync {
    /// First active assignment of `vehicle` overlapping `window`, if any.
    fn find_overlap(
        &self,
        vehicle: VehicleId,
        window: &TimeWindow,
    ) -> Result<Option<VehicleAssignment>, StoreFault>;

    /// Atomically check `window` against `vehicle`'s active assignments and
    /// insert a new `Active` record if clear.
    fn try_commit(
        &self,
        vehicle: VehicleId,
        trip: TripId,
        window: TimeWindow,
    ) -> Result<VehicleAssignment, StoreFault>;

    /// Flip an assignment to `Cancelled`, freeing its window.  Idempotent.
    fn cancel(&self, id: AssignmentId) -> Result<CancelOutcome, StoreFault>;

    /// Look up one record by id, any status.
    fn get(&self, id: AssignmentId) -> Result<Option<VehicleAssignment>, StoreFault>;

    /// Active assignments of `vehicle`, ascending by window start.
    fn active_for(&self, vehicle: VehicleId) -> Result<Vec<VehicleAssignment>, StoreFault>;

    /// Every record, any status, sorted by `(vehicle, window start, id)`.
    fn snapshot(&self) -> Result<Vec<VehicleAssignment>, StoreFault>;
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// One vehicle's assignments, sorted ascending by window start.  Cancelled
/// records stay in place (status flipped) so every id stays resolvable.
#[derive(Debug, Default)]
struct Lane {
    slots: Vec<VehicleAssignment>,
}

impl Lane {
    fn find_overlap(&self, window: &TimeWindow) -> Option<VehicleAssignment> {
        self.slots
            .iter()
            .filter(|a| a.status == AssignmentStatus::Active)
            .find(|a| a.window.overlaps(window))
            .copied()
    }

    fn insert_sorted(&mut self, a: VehicleAssignment) {
        let at = self
            .slots
            .partition_point(|x| x.window.start() <= a.window.start());
        self.slots.insert(at, a);
    }
}

/// In-memory assignment store.
///
/// Layout: an outer map from vehicle to its lane, each lane behind its own
/// `RwLock`.  The outer lock is only written when a vehicle's first
/// assignment creates the lane; commits lock one lane exclusively, probes
/// lock it shared.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lanes:   RwLock<FxHashMap<VehicleId, Arc<RwLock<Lane>>>>,
    /// AssignmentId → owning vehicle, for O(1) cancel and get.
    index:   RwLock<FxHashMap<AssignmentId, VehicleId>>,
    next_id: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lane for `vehicle`, created on first use.
    fn lane(&self, vehicle: VehicleId) -> Result<Arc<RwLock<Lane>>, StoreFault> {
        if let Some(lane) = self
            .lanes
            .read()
            .map_err(|_| StoreFault::Poisoned)?
            .get(&vehicle)
        {
            return Ok(Arc::clone(lane));
        }
        let mut lanes = self.lanes.write().map_err(|_| StoreFault::Poisoned)?;
        Ok(Arc::clone(lanes.entry(vehicle).or_default()))
    }

    /// The lane for `vehicle` if it already exists (probes never allocate).
    fn existing_lane(&self, vehicle: VehicleId) -> Result<Option<Arc<RwLock<Lane>>>, StoreFault> {
        Ok(self
            .lanes
            .read()
            .map_err(|_| StoreFault::Poisoned)?
            .get(&vehicle)
            .map(Arc::clone))
    }
}

impl AssignmentStore for MemoryStore {
    fn find_overlap(
        &self,
        vehicle: VehicleId,
        window: &TimeWindow,
    ) -> Result<Option<VehicleAssignment>, StoreFault> {
        match self.existing_lane(vehicle)? {
            None => Ok(None),
            Some(lane) => {
                let lane = lane.read().map_err(|_| StoreFault::Poisoned)?;
                Ok(lane.find_overlap(window))
            }
        }
    }

    fn try_commit(
        &self,
        vehicle: VehicleId,
        trip: TripId,
        window: TimeWindow,
    ) -> Result<VehicleAssignment, StoreFault> {
        let lane = self.lane(vehicle)?;
        // Per-vehicle critical section: the overlap check and the insert
        // happen under one exclusive lane lock.
        let mut lane = lane.write().map_err(|_| StoreFault::Poisoned)?;
        if let Some(existing) = lane.find_overlap(&window) {
            return Err(StoreFault::Overlap { existing });
        }
        let id = AssignmentId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let assignment = VehicleAssignment {
            id,
            vehicle,
            trip,
            window,
            status: AssignmentStatus::Active,
        };
        lane.insert_sorted(assignment);
        drop(lane);

        self.index
            .write()
            .map_err(|_| StoreFault::Poisoned)?
            .insert(id, vehicle);
        Ok(assignment)
    }

    fn cancel(&self, id: AssignmentId) -> Result<CancelOutcome, StoreFault> {
        let vehicle = self
            .index
            .read()
            .map_err(|_| StoreFault::Poisoned)?
            .get(&id)
            .copied()
            .ok_or(StoreFault::UnknownAssignment(id))?;
        let lane = self.lane(vehicle)?;
        let mut lane = lane.write().map_err(|_| StoreFault::Poisoned)?;
        let slot = lane
            .slots
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreFault::UnknownAssignment(id))?;
        match slot.status {
            AssignmentStatus::Active => {
                slot.status = AssignmentStatus::Cancelled;
                Ok(CancelOutcome::Cancelled(*slot))
            }
            AssignmentStatus::Cancelled => Ok(CancelOutcome::AlreadyCancelled(*slot)),
        }
    }

    fn get(&self, id: AssignmentId) -> Result<Option<VehicleAssignment>, StoreFault> {
        let vehicle = match self
            .index
            .read()
            .map_err(|_| StoreFault::Poisoned)?
            .get(&id)
            .copied()
        {
            None => return Ok(None),
            Some(v) => v,
        };
        match self.existing_lane(vehicle)? {
            None => Ok(None),
            Some(lane) => {
                let lane = lane.read().map_err(|_| StoreFault::Poisoned)?;
                Ok(lane.slots.iter().find(|a| a.id == id).copied())
            }
        }
    }

    fn active_for(&self, vehicle: VehicleId) -> Result<Vec<VehicleAssignment>, StoreFault> {
        match self.existing_lane(vehicle)? {
            None => Ok(Vec::new()),
            Some(lane) => {
                let lane = lane.read().map_err(|_| StoreFault::Poisoned)?;
                Ok(lane
                    .slots
                    .iter()
                    .filter(|a| a.status == AssignmentStatus::Active)
                    .copied()
                    .collect())
            }
        }
    }

    fn snapshot(&self) -> Result<Vec<VehicleAssignment>, StoreFault> {
        let lanes: Vec<Arc<RwLock<Lane>>> = self
            .lanes
            .read()
            .map_err(|_| StoreFault::Poisoned)?
            .values()
            .map(Arc::clone)
            .collect();
        let mut all = Vec::new();
        for lane in lanes {
            let lane = lane.read().map_err(|_| StoreFault::Poisoned)?;
            all.extend_from_slice(&lane.slots);
        }
        all.sort_unstable_by_key(|a| (a.vehicle, a.window.start(), a.id));
        Ok(all)
    }
}
