//! Dated trip instances and the registry that owns them.
//!
//! # Identity model
//!
//! [`crate::expand`] produces id-less [`TripSkeleton`]s.  A skeleton becomes
//! a [`TripInstance`] when the [`TripRegistry`] admits it: the registry mints
//! a dense [`TripId`] and deduplicates by `(template, departure_date)`, so
//! re-expanding an overlapping date range is idempotent — the same service
//! day never materializes twice.
//!
//! Trips are never removed.  Cancellation is a status transition, which
//! keeps every historical `TripId` resolvable for reporting.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::fmt;

use fleet_core::{RouteId, TemplateId, TimeWindow, TripId, VehicleId};

use crate::error::{ScheduleError, ScheduleResult};

// ── TripSkeleton ──────────────────────────────────────────────────────────────

/// One dated departure produced by expansion, before registry admission.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripSkeleton {
    pub template:       TemplateId,
    pub route:          RouteId,
    pub departure_date: NaiveDate,
    pub window:         TimeWindow,
}

// ── TripStatus ────────────────────────────────────────────────────────────────

/// Lifecycle of a trip instance.
///
/// `Completed` and `Cancelled` are terminal.  `Assigned` can fall back to
/// `Unscheduled` when its vehicle assignment is cancelled.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TripStatus {
    #[default]
    Unscheduled,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TripStatus::Unscheduled => "unscheduled",
            TripStatus::Assigned => "assigned",
            TripStatus::InProgress => "in_progress",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// ── TripInstance ──────────────────────────────────────────────────────────────

/// A concrete dated departure.  `vehicle` is `Some` exactly while the status
/// is `Assigned` or later in the operating lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripInstance {
    pub id:             TripId,
    pub template:       TemplateId,
    pub route:          RouteId,
    pub departure_date: NaiveDate,
    pub window:         TimeWindow,
    pub vehicle:        Option<VehicleId>,
    pub status:         TripStatus,
}

// ── Admission outcome ─────────────────────────────────────────────────────────

/// Result of [`TripRegistry::admit`]: either a freshly minted trip or the
/// id of the trip that already covered this `(template, date)` key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Admitted {
    New(TripId),
    Existing(TripId),
}

impl Admitted {
    #[inline]
    pub fn id(self) -> TripId {
        match self {
            Admitted::New(id) | Admitted::Existing(id) => id,
        }
    }

    #[inline]
    pub fn is_new(self) -> bool {
        matches!(self, Admitted::New(_))
    }
}

// ── TripRegistry ──────────────────────────────────────────────────────────────

/// Dense, append-only store of all materialized trips.
///
/// `TripId`s are indices into the backing `Vec`, minted in admission order,
/// so iteration order is deterministic across runs with the same inputs.
#[derive(Debug, Default)]
pub struct TripRegistry {
    trips:  Vec<TripInstance>,
    by_key: FxHashMap<(TemplateId, NaiveDate), TripId>,
}

impl TripRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Admit a skeleton, deduplicating by `(template, departure_date)`.
    pub fn admit(&mut self, skeleton: TripSkeleton) -> Admitted {
        let key = (skeleton.template, skeleton.departure_date);
        if let Some(&id) = self.by_key.get(&key) {
            return Admitted::Existing(id);
        }
        debug_assert!(self.trips.len() < u32::MAX as usize);
        let id = TripId(self.trips.len() as u32);
        self.trips.push(TripInstance {
            id,
            template: skeleton.template,
            route: skeleton.route,
            departure_date: skeleton.departure_date,
            window: skeleton.window,
            vehicle: None,
            status: TripStatus::Unscheduled,
        });
        self.by_key.insert(key, id);
        Admitted::New(id)
    }

    pub fn get(&self, id: TripId) -> Option<&TripInstance> {
        self.trips.get(id.index())
    }

    /// Look up the trip covering one service day of one template.
    pub fn find(&self, template: TemplateId, date: NaiveDate) -> Option<TripId> {
        self.by_key.get(&(template, date)).copied()
    }

    /// All trips in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &TripInstance> {
        self.trips.iter()
    }

    /// Trips still waiting for a vehicle, in admission order.
    pub fn unscheduled(&self) -> impl Iterator<Item = &TripInstance> {
        self.trips
            .iter()
            .filter(|t| t.status == TripStatus::Unscheduled)
    }

    // ── Status transitions ────────────────────────────────────────────────
    //
    // Each transition validates the source status, so an illegal jump (e.g.
    // cancelling a completed trip) surfaces as a typed error instead of
    // silently corrupting the roster.

    /// `Unscheduled → Assigned(vehicle)`.
    pub fn mark_assigned(&mut self, id: TripId, vehicle: VehicleId) -> ScheduleResult<()> {
        let trip = self.trip_mut(id)?;
        if trip.status != TripStatus::Unscheduled {
            return Err(ScheduleError::InvalidTransition {
                trip: id,
                from: trip.status,
                to:   TripStatus::Assigned,
            });
        }
        trip.status = TripStatus::Assigned;
        trip.vehicle = Some(vehicle);
        Ok(())
    }

    /// `Assigned → Unscheduled`, clearing the vehicle.  Used when the
    /// vehicle assignment is cancelled before departure.
    pub fn mark_unscheduled(&mut self, id: TripId) -> ScheduleResult<()> {
        let trip = self.trip_mut(id)?;
        if trip.status != TripStatus::Assigned {
            return Err(ScheduleError::InvalidTransition {
                trip: id,
                from: trip.status,
                to:   TripStatus::Unscheduled,
            });
        }
        trip.status = TripStatus::Unscheduled;
        trip.vehicle = None;
        Ok(())
    }

    /// `Assigned → InProgress`.
    pub fn mark_in_progress(&mut self, id: TripId) -> ScheduleResult<()> {
        let trip = self.trip_mut(id)?;
        if trip.status != TripStatus::Assigned {
            return Err(ScheduleError::InvalidTransition {
                trip: id,
                from: trip.status,
                to:   TripStatus::InProgress,
            });
        }
        trip.status = TripStatus::InProgress;
        Ok(())
    }

    /// `InProgress → Completed`.
    pub fn mark_completed(&mut self, id: TripId) -> ScheduleResult<()> {
        let trip = self.trip_mut(id)?;
        if trip.status != TripStatus::InProgress {
            return Err(ScheduleError::InvalidTransition {
                trip: id,
                from: trip.status,
                to:   TripStatus::Completed,
            });
        }
        trip.status = TripStatus::Completed;
        Ok(())
    }

    /// Any non-terminal status → `Cancelled`.  The vehicle link is kept for
    /// reporting; the slot it occupied is freed at the assignment layer.
    pub fn mark_cancelled(&mut self, id: TripId) -> ScheduleResult<()> {
        let trip = self.trip_mut(id)?;
        match trip.status {
            TripStatus::Completed | TripStatus::Cancelled => {
                Err(ScheduleError::InvalidTransition {
                    trip: id,
                    from: trip.status,
                    to:   TripStatus::Cancelled,
                })
            }
            _ => {
                trip.status = TripStatus::Cancelled;
                Ok(())
            }
        }
    }

    fn trip_mut(&mut self, id: TripId) -> ScheduleResult<&mut TripInstance> {
        self.trips
            .get_mut(id.index())
            .ok_or(ScheduleError::TripNotFound(id))
    }
}
