//! `fleet-seating` — seat-template matrices and the seat compiler.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`matrix`]  | `SeatCell`, `SeatLabel`, `SeatTemplateMatrix`              |
//! | [`compile`] | `compile`, `recompile`, `SeatInstance`, `SeatIds`          |
//! | [`layout`]  | `SeatingPlan` (per-vehicle copy-on-write layouts)          |
//! | [`loader`]  | `load_matrix_csv`, `load_matrix_reader`                    |
//! | [`error`]   | `SeatingError`, `SeatingResult<T>`                         |
//!
//! # Identity model (summary)
//!
//! A matrix describes a bus type's grid; compilation stamps row-major
//! [`compile::SeatInstance`]s whose labels come from grid position (row 2,
//! column 3 → `B3`).  Recompiling after an edit keeps the `SeatId` and
//! status of every surviving label and reports the labels that vanished.
//! Vehicles share their bus type's matrix by `Arc` until an edit gives one
//! vehicle a private copy.

pub mod compile;
pub mod error;
pub mod layout;
pub mod loader;
pub mod matrix;


pub use compile::{compile, recompile, Recompiled, SeatIds, SeatInstance, SeatStatus};
pub use error::{SeatingError, SeatingResult};
pub use layout::SeatingPlan;
pub use loader::{load_matrix_csv, load_matrix_reader};
pub use matrix::{SeatCell, SeatLabel, SeatTemplateMatrix, MAX_ROWS};
