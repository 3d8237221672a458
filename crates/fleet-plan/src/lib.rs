//! `fleet-plan` — the materialization planner for the rust_fleet framework.
//!
//! # Three-phase plan run
//!
//! ```text
//! plan(range_start, range_end):
//!   ① Expand   — every active template → dated trip skeletons
//!                (parallel with the `parallel` feature).
//!   ② Admit    — skeletons enter the trip registry in deterministic
//!                (departure, template) order; duplicates collapse, so
//!                re-planning an overlapping horizon is idempotent.
//!   ③ Dispatch — per trip: policy ranks the fleet → availability filters
//!                the ranking → commit the first free candidate.  A commit
//!                lost to a race falls through to the next candidate; a trip
//!                nothing is free for stays unscheduled and is counted.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                             |
//! |------------|----------------------------------------------------|
//! | `parallel` | Runs template expansion on Rayon's thread pool.    |
//! | `serde`    | Serde derives on [`PlanOptions`] / [`PlanReport`]. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_alloc::MemoryStore;
//! use fleet_plan::{LeastRecentlyUsed, PlannerBuilder};
//!
//! let planner = PlannerBuilder::new(MemoryStore::new(), LeastRecentlyUsed)
//!     .templates(templates)
//!     .fleet(fleet)
//!     .build()?;
//! let report = planner.plan(monday, sunday)?;
//! println!("{} assigned, {} unassigned", report.assigned, report.unassigned);
//! ```

pub mod builder;
pub mod error;
pub mod planner;
pub mod policy;


pub use builder::PlannerBuilder;
pub use error::{PlanError, PlanResult};
pub use planner::{PlanOptions, PlanReport, Planner};
pub use policy::{DispatchContext, DispatchPolicy, InInputOrder, LeastRecentlyUsed};
