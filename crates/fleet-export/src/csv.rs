//! CSV roster backend.
//!
//! Creates two files in the configured output directory:
//! - `assignments.csv`
//! - `seats.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::RosterWriter;
use crate::{AssignmentRow, ExportResult, SeatRow};

/// Writes the roster to two CSV files.
pub struct CsvWriter {
    assignments: Writer<File>,
    seats:       Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> ExportResult<Self> {
        let mut assignments = Writer::from_path(dir.join("assignments.csv"))?;
        assignments.write_record([
            "assignment_id",
            "vehicle_id",
            "trip_id",
            "route_id",
            "departure_date",
            "window_start",
            "window_end",
            "status",
        ])?;

        let mut seats = Writer::from_path(dir.join("seats.csv"))?;
        seats.write_record(["vehicle_id", "seat_id", "label", "tier_id", "status"])?;

        Ok(Self {
            assignments,
            seats,
            finished: false,
        })
    }
}

impl RosterWriter for CsvWriter {
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> ExportResult<()> {
        for row in rows {
            self.assignments.write_record(&[
                row.assignment_id.to_string(),
                row.vehicle_id.to_string(),
                row.trip_id.to_string(),
                row.route_id.to_string(),
                row.departure_date.clone(),
                row.window_start.clone(),
                row.window_end.clone(),
                row.status.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_seats(&mut self, rows: &[SeatRow]) -> ExportResult<()> {
        for row in rows {
            self.seats.write_record(&[
                row.vehicle_id.to_string(),
                row.seat_id.to_string(),
                row.label.clone(),
                row.tier_id.to_string(),
                row.status.clone(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.assignments.flush()?;
        self.seats.flush()?;
        Ok(())
    }
}
