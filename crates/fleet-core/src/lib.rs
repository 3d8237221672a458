//! `fleet-core` — foundational types for the `rust_fleet` scheduling framework.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It
//! intentionally has no `fleet-*` dependencies and minimal external ones
//! (only `chrono` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `RouteId`, `TemplateId`, `TripId`,       |
//! |                 | `AssignmentId`, `SeatId`, `TierId`, `MatrixId`        |
//! | [`time`]        | `TimeWindow` (half-open, midnight rollover)           |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{
    AssignmentId, MatrixId, RouteId, SeatId, TemplateId, TierId, TripId, VehicleId,
};
pub use time::TimeWindow;
