//! Parquet roster backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `assignments.parquet`
//! - `seats.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{StringBuilder, UInt16Builder, UInt32Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::RosterWriter;
use crate::{AssignmentRow, ExportResult, SeatRow};

fn assignment_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("assignment_id",  DataType::UInt32, false),
        Field::new("vehicle_id",     DataType::UInt32, false),
        Field::new("trip_id",        DataType::UInt32, false),
        Field::new("route_id",       DataType::UInt32, false),
        Field::new("departure_date", DataType::Utf8,   false),
        Field::new("window_start",   DataType::Utf8,   false),
        Field::new("window_end",     DataType::Utf8,   false),
        Field::new("status",         DataType::Utf8,   false),
    ]))
}

fn seat_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("vehicle_id", DataType::UInt32, false),
        Field::new("seat_id",    DataType::UInt32, false),
        Field::new("label",      DataType::Utf8,   false),
        Field::new("tier_id",    DataType::UInt16, false),
        Field::new("status",     DataType::Utf8,   false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes the roster to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    assignments:       Option<ArrowWriter<File>>,
    seats:             Option<ArrowWriter<File>>,
    assignment_schema: Arc<Schema>,
    seat_schema:       Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> ExportResult<Self> {
        let assignment_schema = assignment_schema();
        let seat_schema = seat_schema();

        let assignment_file = File::create(dir.join("assignments.parquet"))?;
        let assignments = ArrowWriter::try_new(
            assignment_file,
            Arc::clone(&assignment_schema),
            Some(snappy_props()),
        )?;

        let seat_file = File::create(dir.join("seats.parquet"))?;
        let seats = ArrowWriter::try_new(
            seat_file,
            Arc::clone(&seat_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            assignments: Some(assignments),
            seats: Some(seats),
            assignment_schema,
            seat_schema,
        })
    }
}

impl RosterWriter for ParquetWriter {
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> ExportResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.assignments.as_mut() else {
            return Ok(());
        };

        let mut assignment_ids  = UInt32Builder::new();
        let mut vehicle_ids     = UInt32Builder::new();
        let mut trip_ids        = UInt32Builder::new();
        let mut route_ids       = UInt32Builder::new();
        let mut departure_dates = StringBuilder::new();
        let mut window_starts   = StringBuilder::new();
        let mut window_ends     = StringBuilder::new();
        let mut statuses        = StringBuilder::new();

        for row in rows {
            assignment_ids.append_value(row.assignment_id);
            vehicle_ids.append_value(row.vehicle_id);
            trip_ids.append_value(row.trip_id);
            route_ids.append_value(row.route_id);
            departure_dates.append_value(&row.departure_date);
            window_starts.append_value(&row.window_start);
            window_ends.append_value(&row.window_end);
            statuses.append_value(&row.status);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.assignment_schema),
            vec![
                Arc::new(assignment_ids.finish()),
                Arc::new(vehicle_ids.finish()),
                Arc::new(trip_ids.finish()),
                Arc::new(route_ids.finish()),
                Arc::new(departure_dates.finish()),
                Arc::new(window_starts.finish()),
                Arc::new(window_ends.finish()),
                Arc::new(statuses.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_seats(&mut self, rows: &[SeatRow]) -> ExportResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.seats.as_mut() else {
            return Ok(());
        };

        let mut vehicle_ids = UInt32Builder::new();
        let mut seat_ids    = UInt32Builder::new();
        let mut labels      = StringBuilder::new();
        let mut tier_ids    = UInt16Builder::new();
        let mut statuses    = StringBuilder::new();

        for row in rows {
            vehicle_ids.append_value(row.vehicle_id);
            seat_ids.append_value(row.seat_id);
            labels.append_value(&row.label);
            tier_ids.append_value(row.tier_id);
            statuses.append_value(&row.status);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.seat_schema),
            vec![
                Arc::new(vehicle_ids.finish()),
                Arc::new(seat_ids.finish()),
                Arc::new(labels.finish()),
                Arc::new(tier_ids.finish()),
                Arc::new(statuses.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        if let Some(w) = self.assignments.take() {
            w.close()?;
        }
        if let Some(w) = self.seats.take() {
            w.close()?;
        }
        Ok(())
    }
}
