//! `fleet-export` — roster export writers for the rust_fleet framework.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                          |
//! |-----------|---------|----------------------------------------|
//! | *(none)*  | CSV     | `assignments.csv`, `seats.csv`         |
//! | `sqlite`  | SQLite  | `roster.db`                            |
//! | `parquet` | Parquet | `assignments.parquet`, `seats.parquet` |
//!
//! All backends implement [`RosterWriter`].  The [`row`] module holds the
//! flatteners that turn live domain state into rows:
//!
//! ```rust,ignore
//! use fleet_export::{assignment_rows, seat_rows, CsvWriter, RosterWriter};
//!
//! let mut writer = CsvWriter::new(Path::new("./out"))?;
//! writer.write_assignments(&assignment_rows(&planner.allocator)?)?;
//! writer.write_seats(&seat_rows(&seating))?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{ExportError, ExportResult};
pub use row::{assignment_rows, seat_rows, AssignmentRow, SeatRow};
pub use writer::RosterWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
