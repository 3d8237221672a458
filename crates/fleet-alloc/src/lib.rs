//! `fleet-alloc` — vehicle-to-trip assignment with conflict detection.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`assignment`] | `VehicleAssignment`, `AssignmentStatus` — the committed record  |
//! | [`store`]      | `AssignmentStore` trait + in-memory `MemoryStore`               |
//! | [`sqlite`]     | `SqliteStore` — file-backed store (feature `sqlite`)            |
//! | [`allocator`]  | `Allocator<S>` — admit, check, commit, cancel                   |
//! | [`query`]      | `AvailabilityQuery` — read-only availability facade             |
//! | [`error`]      | `AllocError`, `AllocResult<T>`                                  |
//!
//! # Conflict model (per-vehicle window exclusivity)
//!
//! A vehicle can hold any number of assignments as long as their service
//! windows are pairwise non-overlapping under the half-open rule of
//! [`TimeWindow::overlaps`][fleet_core::TimeWindow::overlaps]: back-to-back
//! windows (`[.., 14:00)` then `[14:00, ..)`) never conflict.
//!
//! 1. `Allocator::check_availability` answers the advisory question against a
//!    shared read view; any number run concurrently.
//! 2. `Allocator::commit` is the only write path.  The store revalidates the
//!    window inside a per-vehicle critical section, so two racing commits on
//!    one vehicle serialize while commits on different vehicles proceed in
//!    parallel.  A lost write race is retried up to the configured budget
//!    ([`DEFAULT_COMMIT_RETRIES`]) before surfacing [`AllocError::Contention`].
//! 3. `Allocator::cancel` flips the record and returns the trip to the
//!    unscheduled pool.  Cancelling twice is a no-op, not an error.
//!
//! Rejected commits carry the colliding record
//! ([`AllocError::Conflict`]`::existing`) so dispatchers see exactly what is
//! in the way.

pub mod allocator;
pub mod assignment;
pub mod error;
pub mod query;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod store;

#[cfg(test)]
mod tests;

pub use allocator::{Allocator, DEFAULT_COMMIT_RETRIES};
pub use assignment::{AssignmentStatus, VehicleAssignment};
pub use error::{AllocError, AllocResult};
pub use query::AvailabilityQuery;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use store::{AssignmentStore, CancelOutcome, MemoryStore, StoreFault};
