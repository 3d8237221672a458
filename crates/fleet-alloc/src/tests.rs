//! Unit tests for fleet-alloc.

use std::thread;

use chrono::{NaiveDate, NaiveTime};

use fleet_core::{AssignmentId, RouteId, TemplateId, TimeWindow, TripId, VehicleId};
use fleet_schedule::{TripSkeleton, TripStatus};

use crate::{
    AllocError, Allocator, AssignmentStatus, AssignmentStore, AvailabilityQuery, CancelOutcome,
    MemoryStore, StoreFault, VehicleAssignment, DEFAULT_COMMIT_RETRIES,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// `[start_h .. end_h)` on 2024-03-`day`, whole hours.
fn win(day: u32, start_h: u32, end_h: u32) -> TimeWindow {
    TimeWindow::new(
        march(day).and_time(t(start_h, 0)),
        march(day).and_time(t(end_h, 0)),
    )
    .unwrap()
}

/// Skeleton for template `n` departing on `window`'s start date.
fn skel(n: u32, window: TimeWindow) -> TripSkeleton {
    TripSkeleton {
        template:       TemplateId(n),
        route:          RouteId(7),
        departure_date: window.start().date(),
        window,
    }
}

fn allocator() -> Allocator<MemoryStore> {
    Allocator::new(MemoryStore::new())
}

/// Admit template `n` over `window` and return the trip id.
fn admit<S: AssignmentStore>(alloc: &Allocator<S>, n: u32, window: TimeWindow) -> TripId {
    alloc.admit_trip(skel(n, window)).unwrap().id()
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod memory_store {
    use super::*;

    #[test]
    fn overlap_rejected_with_colliding_record() {
        let store = MemoryStore::new();
        let a = store
            .try_commit(VehicleId(1), TripId(1), win(1, 8, 14))
            .unwrap();
        let err = store
            .try_commit(VehicleId(1), TripId(2), win(1, 13, 16))
            .unwrap_err();
        match err {
            StoreFault::Overlap { existing } => assert_eq!(existing.id, a.id),
            other => panic!("expected Overlap, got {other:?}"),
        }
    }

    #[test]
    fn touching_windows_both_commit() {
        let store = MemoryStore::new();
        store
            .try_commit(VehicleId(1), TripId(1), win(1, 8, 14))
            .unwrap();
        store
            .try_commit(VehicleId(1), TripId(2), win(1, 14, 16))
            .unwrap();
        assert_eq!(store.active_for(VehicleId(1)).unwrap().len(), 2);
    }

    #[test]
    fn other_vehicles_unaffected() {
        let store = MemoryStore::new();
        store
            .try_commit(VehicleId(1), TripId(1), win(1, 8, 14))
            .unwrap();
        store
            .try_commit(VehicleId(2), TripId(2), win(1, 8, 14))
            .unwrap();
    }

    #[test]
    fn cancel_frees_the_window() {
        let store = MemoryStore::new();
        let a = store
            .try_commit(VehicleId(1), TripId(1), win(1, 8, 14))
            .unwrap();
        let outcome = store.cancel(a.id).unwrap();
        assert!(outcome.was_active());
        assert_eq!(outcome.record().status, AssignmentStatus::Cancelled);

        assert!(store
            .find_overlap(VehicleId(1), &win(1, 9, 11))
            .unwrap()
            .is_none());
        store
            .try_commit(VehicleId(1), TripId(2), win(1, 8, 14))
            .unwrap();
    }

    #[test]
    fn cancel_is_idempotent() {
        let store = MemoryStore::new();
        let a = store
            .try_commit(VehicleId(1), TripId(1), win(1, 8, 14))
            .unwrap();
        assert!(store.cancel(a.id).unwrap().was_active());
        let again = store.cancel(a.id).unwrap();
        assert!(matches!(again, CancelOutcome::AlreadyCancelled(_)));
        assert_eq!(again.record().status, AssignmentStatus::Cancelled);
    }

    #[test]
    fn cancel_unknown_id() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.cancel(AssignmentId(404)),
            Err(StoreFault::UnknownAssignment(AssignmentId(404)))
        ));
    }

    #[test]
    fn active_for_ascends_by_start() {
        let store = MemoryStore::new();
        store
            .try_commit(VehicleId(1), TripId(1), win(1, 12, 14))
            .unwrap();
        store
            .try_commit(VehicleId(1), TripId(2), win(1, 6, 9))
            .unwrap();
        store
            .try_commit(VehicleId(1), TripId(3), win(1, 9, 12))
            .unwrap();
        let starts: Vec<_> = store
            .active_for(VehicleId(1))
            .unwrap()
            .iter()
            .map(|a| a.window.start())
            .collect();
        assert_eq!(
            starts,
            vec![
                march(1).and_time(t(6, 0)),
                march(1).and_time(t(9, 0)),
                march(1).and_time(t(12, 0)),
            ]
        );
    }

    #[test]
    fn snapshot_keeps_cancelled_rows_and_sorts_by_vehicle() {
        let store = MemoryStore::new();
        let a = store
            .try_commit(VehicleId(2), TripId(1), win(1, 8, 10))
            .unwrap();
        store
            .try_commit(VehicleId(1), TripId(2), win(1, 8, 10))
            .unwrap();
        store.cancel(a.id).unwrap();

        let snap = store.snapshot().unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].vehicle, VehicleId(1));
        assert_eq!(snap[1].vehicle, VehicleId(2));
        assert_eq!(snap[1].status, AssignmentStatus::Cancelled);
    }

    #[test]
    fn ids_unique_across_vehicles() {
        let store = MemoryStore::new();
        let a = store
            .try_commit(VehicleId(1), TripId(1), win(1, 8, 10))
            .unwrap();
        let b = store
            .try_commit(VehicleId(2), TripId(2), win(1, 8, 10))
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.get(a.id).unwrap().unwrap().vehicle, VehicleId(1));
        assert_eq!(store.get(b.id).unwrap().unwrap().vehicle, VehicleId(2));
    }
}

// ── Allocator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod allocator {
    use super::*;

    #[test]
    fn fresh_vehicle_is_available() {
        let alloc = allocator();
        assert!(alloc
            .check_availability(VehicleId(1), &win(1, 8, 14))
            .unwrap());
    }

    #[test]
    fn blocked_vehicle_frees_after_cancel() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 14));
        let a = alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap();

        assert!(!alloc
            .check_availability(VehicleId(1), &win(1, 13, 16))
            .unwrap());
        // Touching the end of the block is fine.
        assert!(alloc
            .check_availability(VehicleId(1), &win(1, 14, 16))
            .unwrap());

        alloc.cancel(a.id).unwrap();
        assert!(alloc
            .check_availability(VehicleId(1), &win(1, 13, 16))
            .unwrap());
    }

    #[test]
    fn conflict_reports_what_is_in_the_way() {
        let alloc = allocator();
        let first = admit(&alloc, 1, win(1, 8, 14));
        let second = admit(&alloc, 2, win(1, 13, 16));
        let held = alloc.commit(VehicleId(1), first, win(1, 8, 14)).unwrap();

        let err = alloc
            .commit(VehicleId(1), second, win(1, 13, 16))
            .unwrap_err();
        match err {
            AllocError::Conflict {
                vehicle,
                requested,
                existing,
            } => {
                assert_eq!(vehicle, VehicleId(1));
                assert_eq!(requested, win(1, 13, 16));
                assert_eq!(existing.id, held.id);
                assert_eq!(existing.trip, first);
            }
            other => panic!("expected Conflict, got {other:?}"),
        }

        // Nothing was mutated by the rejected commit.
        let t = alloc.trip(second).unwrap().unwrap();
        assert_eq!(t.status, TripStatus::Unscheduled);
        assert_eq!(alloc.assignments_for(VehicleId(1)).unwrap().len(), 1);
    }

    #[test]
    fn back_to_back_runs_share_a_vehicle() {
        let alloc = allocator();
        let morning = admit(&alloc, 1, win(1, 8, 14));
        let evening = admit(&alloc, 2, win(1, 14, 16));
        alloc.commit(VehicleId(1), morning, win(1, 8, 14)).unwrap();
        alloc.commit(VehicleId(1), evening, win(1, 14, 16)).unwrap();
    }

    #[test]
    fn commit_couples_trip_state() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 14));
        let a = alloc.commit(VehicleId(4), trip, win(1, 8, 14)).unwrap();

        let t = alloc.trip(trip).unwrap().unwrap();
        assert_eq!(t.status, TripStatus::Assigned);
        assert_eq!(t.vehicle, Some(VehicleId(4)));

        alloc.cancel(a.id).unwrap();
        let t = alloc.trip(trip).unwrap().unwrap();
        assert_eq!(t.status, TripStatus::Unscheduled);
        assert_eq!(t.vehicle, None);
    }

    #[test]
    fn commit_unknown_trip() {
        let alloc = allocator();
        assert!(matches!(
            alloc.commit(VehicleId(1), TripId(404), win(1, 8, 14)),
            Err(AllocError::TripNotFound(TripId(404)))
        ));
    }

    #[test]
    fn assigned_trip_cannot_be_committed_twice() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 14));
        alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap();

        let err = alloc
            .commit(VehicleId(2), trip, win(1, 8, 14))
            .unwrap_err();
        match err {
            AllocError::TripAlreadyAssigned { trip: id, holder } => {
                assert_eq!(id, trip);
                assert_eq!(holder, Some(VehicleId(1)));
            }
            other => panic!("expected TripAlreadyAssigned, got {other:?}"),
        }
    }

    #[test]
    fn cancel_is_idempotent() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 14));
        let a = alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap();

        assert!(alloc.cancel(a.id).unwrap().was_active());
        assert!(matches!(
            alloc.cancel(a.id).unwrap(),
            CancelOutcome::AlreadyCancelled(_)
        ));
    }

    #[test]
    fn cancel_unknown_assignment() {
        let alloc = allocator();
        assert!(matches!(
            alloc.cancel(AssignmentId(9)),
            Err(AllocError::UnknownAssignment(AssignmentId(9)))
        ));
    }

    #[test]
    fn departed_trip_cannot_be_cancelled() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 14));
        let a = alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap();
        alloc.start_trip(trip).unwrap();

        match alloc.cancel(a.id).unwrap_err() {
            AllocError::TripUnderway { trip: id, status } => {
                assert_eq!(id, trip);
                assert_eq!(status, TripStatus::InProgress);
            }
            other => panic!("expected TripUnderway, got {other:?}"),
        }
    }

    #[test]
    fn lifecycle_runs_to_completed() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 14));
        alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap();
        alloc.start_trip(trip).unwrap();
        alloc.complete_trip(trip).unwrap();

        let t = alloc.trip(trip).unwrap().unwrap();
        assert_eq!(t.status, TripStatus::Completed);
        assert_eq!(t.vehicle, Some(VehicleId(1)));
    }

    #[test]
    fn cancel_trip_releases_its_assignment() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 14));
        let a = alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap();

        alloc.cancel_trip(trip).unwrap();
        let t = alloc.trip(trip).unwrap().unwrap();
        assert_eq!(t.status, TripStatus::Cancelled);
        assert_eq!(
            alloc.assignment(a.id).unwrap().unwrap().status,
            AssignmentStatus::Cancelled
        );
        assert!(alloc
            .check_availability(VehicleId(1), &win(1, 8, 14))
            .unwrap());
    }

    #[test]
    fn available_vehicles_preserves_caller_order() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 14));
        alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap();

        let free = alloc
            .available_vehicles(
                &[VehicleId(5), VehicleId(1), VehicleId(3)],
                &win(1, 9, 12),
            )
            .unwrap();
        assert_eq!(free, vec![VehicleId(5), VehicleId(3)]);
    }

    #[test]
    fn admission_is_idempotent() {
        let alloc = allocator();
        let first = alloc.admit_trip(skel(1, win(1, 8, 14))).unwrap();
        let second = alloc.admit_trip(skel(1, win(1, 8, 14))).unwrap();
        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(first.id(), second.id());
        assert_eq!(alloc.trip_count().unwrap(), 1);
    }

    #[test]
    fn released_trip_rejoins_unscheduled_pool_in_order() {
        let alloc = allocator();
        let t1 = admit(&alloc, 1, win(1, 6, 8));
        let t2 = admit(&alloc, 2, win(1, 9, 11));
        let t3 = admit(&alloc, 3, win(1, 12, 14));
        let a = alloc.commit(VehicleId(1), t2, win(1, 9, 11)).unwrap();

        let pool: Vec<_> = alloc
            .unscheduled_trips()
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(pool, vec![t1, t3]);

        alloc.cancel(a.id).unwrap();
        let pool: Vec<_> = alloc
            .unscheduled_trips()
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(pool, vec![t1, t2, t3]);
    }

    #[test]
    fn overnight_block_reaches_into_next_morning() {
        let alloc = allocator();
        let w = TimeWindow::from_departure(march(1), t(22, 0), t(2, 0)).unwrap();
        let trip = admit(&alloc, 1, w);
        alloc.commit(VehicleId(1), trip, w).unwrap();

        assert!(!alloc
            .check_availability(VehicleId(1), &win(2, 1, 3))
            .unwrap());
        assert!(alloc
            .check_availability(VehicleId(1), &win(2, 2, 4))
            .unwrap());
    }
}

// ── Retry budget ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod retries {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};

    /// Store whose first `n` commits lose the write race.
    struct FlakyStore {
        inner:         MemoryStore,
        failures_left: AtomicU32,
    }

    impl FlakyStore {
        fn failing(n: u32) -> Self {
            Self {
                inner:         MemoryStore::new(),
                failures_left: AtomicU32::new(n),
            }
        }
    }

    impl AssignmentStore for FlakyStore {
        fn find_overlap(
            &self,
            vehicle: VehicleId,
            window: &TimeWindow,
        ) -> Result<Option<VehicleAssignment>, StoreFault> {
            self.inner.find_overlap(vehicle, window)
        }

        fn try_commit(
            &self,
            vehicle: VehicleId,
            trip: TripId,
            window: TimeWindow,
        ) -> Result<VehicleAssignment, StoreFault> {
            let injected = self
                .failures_left
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
                .is_ok();
            if injected {
                return Err(StoreFault::Serialization);
            }
            self.inner.try_commit(vehicle, trip, window)
        }

        fn cancel(&self, id: AssignmentId) -> Result<CancelOutcome, StoreFault> {
            self.inner.cancel(id)
        }

        fn get(&self, id: AssignmentId) -> Result<Option<VehicleAssignment>, StoreFault> {
            self.inner.get(id)
        }

        fn active_for(&self, vehicle: VehicleId) -> Result<Vec<VehicleAssignment>, StoreFault> {
            self.inner.active_for(vehicle)
        }

        fn snapshot(&self) -> Result<Vec<VehicleAssignment>, StoreFault> {
            self.inner.snapshot()
        }
    }

    #[test]
    fn lost_races_within_budget_still_commit() {
        let alloc = Allocator::new(FlakyStore::failing(DEFAULT_COMMIT_RETRIES));
        let trip = admit(&alloc, 1, win(1, 8, 14));
        alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap();
        assert_eq!(
            alloc.trip(trip).unwrap().unwrap().status,
            TripStatus::Assigned
        );
    }

    #[test]
    fn contention_surfaces_after_budget() {
        let alloc = Allocator::new(FlakyStore::failing(u32::MAX)).with_commit_retries(2);
        let trip = admit(&alloc, 1, win(1, 8, 14));

        match alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap_err() {
            AllocError::Contention { vehicle, retries } => {
                assert_eq!(vehicle, VehicleId(1));
                assert_eq!(retries, 2);
            }
            other => panic!("expected Contention, got {other:?}"),
        }
        // The trip is still schedulable elsewhere.
        assert_eq!(
            alloc.trip(trip).unwrap().unwrap().status,
            TripStatus::Unscheduled
        );
    }
}

// ── Availability queries ──────────────────────────────────────────────────────

#[cfg(test)]
mod query {
    use super::*;

    #[test]
    fn probe_for_explicit_window() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 10));
        alloc.commit(VehicleId(3), trip, win(1, 8, 10)).unwrap();

        let q = AvailabilityQuery::new(&alloc);
        assert!(!q.vehicle_free_for(VehicleId(3), &win(1, 9, 11)).unwrap());
        assert!(q.vehicle_free_for(VehicleId(3), &win(1, 10, 12)).unwrap());
    }

    #[test]
    fn probe_builds_rollover_window() {
        let alloc = allocator();
        // Overnight service occupying 2024-03-01 23:30 → 2024-03-02 05:00.
        let w = TimeWindow::from_departure(march(1), t(23, 30), t(5, 0)).unwrap();
        let trip = admit(&alloc, 1, w);
        alloc.commit(VehicleId(1), trip, w).unwrap();

        let q = AvailabilityQuery::new(&alloc);
        assert!(!q
            .vehicle_free_on(VehicleId(1), march(1), t(22, 0), t(2, 0))
            .unwrap());
        // The next evening's overnight run is clear.
        assert!(q
            .vehicle_free_on(VehicleId(1), march(2), t(22, 0), t(2, 0))
            .unwrap());
        // Departing exactly at the block's end is allowed.
        assert!(q
            .vehicle_free_on(VehicleId(1), march(2), t(5, 0), t(9, 0))
            .unwrap());
    }
}

// ── Concurrency ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod concurrency {
    use super::*;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn racing_commits_on_one_vehicle_pick_one_winner() {
        let alloc = allocator();
        let v = VehicleId(9);
        let t1 = admit(&alloc, 1, win(1, 8, 14));
        let t2 = admit(&alloc, 2, win(1, 13, 16));

        let (r1, r2) = thread::scope(|s| {
            let a = &alloc;
            let h1 = s.spawn(move || a.commit(v, t1, win(1, 8, 14)));
            let h2 = s.spawn(move || a.commit(v, t2, win(1, 13, 16)));
            (h1.join().unwrap(), h2.join().unwrap())
        });

        assert_eq!(r1.is_ok() as u8 + r2.is_ok() as u8, 1);
        let (winner, loser) = if r1.is_ok() {
            (r1.unwrap(), r2)
        } else {
            (r2.unwrap(), r1)
        };
        match loser {
            Err(AllocError::Conflict { existing, .. }) => assert_eq!(existing.id, winner.id),
            other => panic!("expected Conflict, got {other:?}"),
        }
        assert_eq!(alloc.assignments_for(v).unwrap().len(), 1);
    }

    #[test]
    fn same_trip_race_assigns_exactly_one_vehicle() {
        let alloc = allocator();
        let trip = admit(&alloc, 1, win(1, 8, 14));

        let (r1, r2) = thread::scope(|s| {
            let a = &alloc;
            let h1 = s.spawn(move || a.commit(VehicleId(1), trip, win(1, 8, 14)));
            let h2 = s.spawn(move || a.commit(VehicleId(2), trip, win(1, 8, 14)));
            (h1.join().unwrap(), h2.join().unwrap())
        });

        assert_eq!(r1.is_ok() as u8 + r2.is_ok() as u8, 1);
        let loser = if r1.is_ok() { r2 } else { r1 };
        assert!(matches!(
            loser,
            Err(AllocError::TripAlreadyAssigned { .. })
        ));

        // The losing insert was compensated away.
        let active: usize = [VehicleId(1), VehicleId(2)]
            .iter()
            .map(|&v| alloc.assignments_for(v).unwrap().len())
            .sum();
        assert_eq!(active, 1);
        assert_eq!(
            alloc.trip(trip).unwrap().unwrap().status,
            TripStatus::Assigned
        );
    }

    #[test]
    fn distinct_vehicles_commit_concurrently() {
        let alloc = allocator();
        let trips: Vec<TripId> = (0..8).map(|n| admit(&alloc, n, win(1, 8, 14))).collect();

        let results = thread::scope(|s| {
            let handles: Vec<_> = trips
                .iter()
                .enumerate()
                .map(|(i, &trip)| {
                    let a = &alloc;
                    s.spawn(move || a.commit(VehicleId(i as u32), trip, win(1, 8, 14)))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });

        assert!(results.iter().all(|r| r.is_ok()));
        assert!(alloc.unscheduled_trips().unwrap().is_empty());
    }

    #[test]
    fn seeded_commit_storm_never_overlaps() {
        let alloc = allocator();
        let mut rng = SmallRng::seed_from_u64(0x5EA7);
        let fleet = [VehicleId(1), VehicleId(2), VehicleId(3), VehicleId(4)];

        let mut committed = 0usize;
        for n in 0..200 {
            let day = rng.gen_range(1..=28);
            let start = rng.gen_range(0..20);
            let w = win(day, start, start + rng.gen_range(1..=4));
            let trip = admit(&alloc, n, w);
            let vehicle = fleet[rng.gen_range(0..fleet.len())];
            if alloc.commit(vehicle, trip, w).is_ok() {
                committed += 1;
            }
        }

        let mut active_total = 0;
        for &v in &fleet {
            let active = alloc.assignments_for(v).unwrap();
            active_total += active.len();
            for pair in active.windows(2) {
                assert!(
                    pair[0].window.end() <= pair[1].window.start(),
                    "vehicle {v}: {} overlaps {}",
                    pair[0].window,
                    pair[1].window
                );
            }
        }
        assert!(committed > 0);
        assert_eq!(committed, active_total);
    }
}

// ── SqliteStore ───────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_store {
    use super::*;

    use crate::sqlite::SqliteStore;

    fn open(dir: &tempfile::TempDir) -> SqliteStore {
        SqliteStore::open(dir.path()).unwrap()
    }

    #[test]
    fn overlap_rejected_and_freed_by_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        let a = store
            .try_commit(VehicleId(1), TripId(1), win(1, 8, 14))
            .unwrap();

        let err = store
            .try_commit(VehicleId(1), TripId(2), win(1, 13, 16))
            .unwrap_err();
        match err {
            StoreFault::Overlap { existing } => assert_eq!(existing.id, a.id),
            other => panic!("expected Overlap, got {other:?}"),
        }
        store
            .try_commit(VehicleId(1), TripId(3), win(1, 14, 16))
            .unwrap();
        store
            .try_commit(VehicleId(2), TripId(2), win(1, 13, 16))
            .unwrap();

        assert!(store.cancel(a.id).unwrap().was_active());
        assert!(!store.cancel(a.id).unwrap().was_active());
        store
            .try_commit(VehicleId(1), TripId(4), win(1, 8, 14))
            .unwrap();
    }

    #[test]
    fn rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = open(&dir);
            store
                .try_commit(VehicleId(5), TripId(9), win(1, 6, 9))
                .unwrap()
                .id
        };

        let store = open(&dir);
        let got = store.get(id).unwrap().unwrap();
        assert_eq!(got.vehicle, VehicleId(5));
        assert_eq!(got.trip, TripId(9));
        assert_eq!(got.window, win(1, 6, 9));
        assert_eq!(got.status, AssignmentStatus::Active);
    }

    #[test]
    fn listings_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store
            .try_commit(VehicleId(2), TripId(1), win(1, 12, 14))
            .unwrap();
        store
            .try_commit(VehicleId(2), TripId(2), win(1, 6, 9))
            .unwrap();
        store
            .try_commit(VehicleId(1), TripId(3), win(1, 10, 12))
            .unwrap();

        let active: Vec<_> = store
            .active_for(VehicleId(2))
            .unwrap()
            .iter()
            .map(|a| a.trip)
            .collect();
        assert_eq!(active, vec![TripId(2), TripId(1)]);

        let snap = store.snapshot().unwrap();
        assert_eq!(snap[0].vehicle, VehicleId(1));
        assert_eq!(snap[1].vehicle, VehicleId(2));
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn allocator_runs_on_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let alloc = Allocator::new(open(&dir));
        let trip = admit(&alloc, 1, win(1, 8, 14));
        let a = alloc.commit(VehicleId(1), trip, win(1, 8, 14)).unwrap();

        assert!(!alloc
            .check_availability(VehicleId(1), &win(1, 13, 16))
            .unwrap());
        alloc.cancel(a.id).unwrap();
        assert!(alloc
            .check_availability(VehicleId(1), &win(1, 13, 16))
            .unwrap());
    }
}
