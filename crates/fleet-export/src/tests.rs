//! Integration tests for fleet-export.

#[cfg(test)]
mod row_tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime};
    use fleet_alloc::{Allocator, MemoryStore};
    use fleet_core::{MatrixId, RouteId, TemplateId, TierId, TimeWindow, VehicleId};
    use fleet_schedule::TripSkeleton;
    use fleet_seating::{SeatCell, SeatLabel, SeatStatus, SeatTemplateMatrix, SeatingPlan};

    use crate::row::{assignment_rows, seat_rows};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn win(start_h: u32, end_h: u32) -> TimeWindow {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        TimeWindow::from_departure(d(1), t(start_h), t(end_h)).unwrap()
    }

    fn skel(n: u32, route: u32, window: TimeWindow) -> TripSkeleton {
        TripSkeleton {
            template:       TemplateId(n),
            route:          RouteId(route),
            departure_date: window.start().date(),
            window,
        }
    }

    /// Vehicle 2 holds an active assignment on route 7; vehicle 1 held one on
    /// route 8 that has since been cancelled.
    fn loaded_allocator() -> Allocator<MemoryStore> {
        let alloc = Allocator::new(MemoryStore::new());

        let kept = alloc.admit_trip(skel(1, 7, win(8, 10))).unwrap().id();
        alloc.commit(VehicleId(2), kept, win(8, 10)).unwrap();

        let released = alloc.admit_trip(skel(2, 8, win(9, 11))).unwrap().id();
        let held = alloc.commit(VehicleId(1), released, win(9, 11)).unwrap();
        alloc.cancel(held.id).unwrap();

        alloc
    }

    /// One vehicle with a 2×2 grid: two standard seats in row A, one premium
    /// seat at B1, a gap at (2, 2).
    fn seated_plan() -> SeatingPlan {
        let mut m = SeatTemplateMatrix::blank(MatrixId(1), 2, 2).unwrap();
        m.set_cell(1, 1, SeatCell::Seat { tier: TierId(1) }).unwrap();
        m.set_cell(1, 2, SeatCell::Seat { tier: TierId(1) }).unwrap();
        m.set_cell(2, 1, SeatCell::Seat { tier: TierId(2) }).unwrap();

        let mut plan = SeatingPlan::new();
        plan.install(VehicleId(1), Arc::new(m)).unwrap();
        plan
    }

    #[test]
    fn assignment_rows_follow_snapshot_order() {
        let rows = assignment_rows(&loaded_allocator()).unwrap();
        assert_eq!(rows.len(), 2, "cancelled assignments are exported too");

        // Snapshot order is (vehicle, window start, id).
        assert_eq!(rows[0].vehicle_id, 1);
        assert_eq!(rows[0].route_id, 8);
        assert_eq!(rows[0].status, "cancelled");
        assert_eq!(rows[1].vehicle_id, 2);
        assert_eq!(rows[1].route_id, 7);
        assert_eq!(rows[1].status, "active");
    }

    #[test]
    fn assignment_rows_render_iso_datetimes() {
        let rows = assignment_rows(&loaded_allocator()).unwrap();
        let active = &rows[1];
        assert_eq!(active.departure_date, "2024-03-01");
        assert_eq!(active.window_start, "2024-03-01 08:00:00");
        assert_eq!(active.window_end, "2024-03-01 10:00:00");
    }

    #[test]
    fn empty_allocator_yields_no_rows() {
        let alloc = Allocator::new(MemoryStore::new());
        assert!(assignment_rows(&alloc).unwrap().is_empty());
    }

    #[test]
    fn seat_rows_follow_label_order() {
        let rows = seat_rows(&seated_plan());
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["A1", "A2", "B1"]); // (2, 2) is a gap, so no B2
        assert_eq!(rows[2].tier_id, 2);
        assert!(rows.iter().all(|r| r.status == "available"));
    }

    #[test]
    fn seat_rows_sort_vehicles() {
        let mut m = SeatTemplateMatrix::blank(MatrixId(2), 1, 1).unwrap();
        m.set_cell(1, 1, SeatCell::Seat { tier: TierId(1) }).unwrap();
        let m = Arc::new(m);

        let mut plan = SeatingPlan::new();
        plan.install(VehicleId(9), Arc::clone(&m)).unwrap();
        plan.install(VehicleId(3), m).unwrap();

        let vehicles: Vec<_> = seat_rows(&plan).iter().map(|r| r.vehicle_id).collect();
        assert_eq!(vehicles, [3, 9]);
    }

    #[test]
    fn seat_rows_carry_maintenance_status() {
        let mut plan = seated_plan();
        plan.set_status(VehicleId(1), SeatLabel::new(1, 2).unwrap(), SeatStatus::Maintenance)
            .unwrap();

        let rows = seat_rows(&plan);
        assert_eq!(rows[1].label, "A2");
        assert_eq!(rows[1].status, "maintenance");
    }
}

// ── CSV tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{AssignmentRow, SeatRow};
    use crate::writer::RosterWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn a_row(assignment_id: u32, vehicle_id: u32) -> AssignmentRow {
        AssignmentRow {
            assignment_id,
            vehicle_id,
            trip_id:        assignment_id + 100,
            route_id:       7,
            departure_date: "2024-03-01".into(),
            window_start:   "2024-03-01 08:00:00".into(),
            window_end:     "2024-03-01 10:30:00".into(),
            status:         "active".into(),
        }
    }

    fn s_row(vehicle_id: u32, seat_id: u32, label: &str) -> SeatRow {
        SeatRow {
            vehicle_id,
            seat_id,
            label:   label.into(),
            tier_id: 1,
            status:  "available".into(),
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("assignments.csv").exists());
        assert!(dir.path().join("seats.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("assignments.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["assignment_id", "vehicle_id", "trip_id", "route_id",
             "departure_date", "window_start", "window_end", "status"]
        );

        let mut rdr2 = csv::Reader::from_path(dir.path().join("seats.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["vehicle_id", "seat_id", "label", "tier_id", "status"]);
    }

    #[test]
    fn csv_assignment_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_assignments(&[a_row(1, 4), a_row(2, 5), a_row(3, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("assignments.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "1");          // assignment_id
        assert_eq!(&rows[0][4], "2024-03-01"); // departure_date
        assert_eq!(&rows[2][1], "5");          // vehicle_id
        assert_eq!(&rows[2][7], "active");     // status
    }

    #[test]
    fn csv_seat_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_seats(&[s_row(1, 0, "A1"), s_row(1, 1, "A2")]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("seats.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "A1"); // label
        assert_eq!(&rows[1][2], "A2");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_assignments(&[]).unwrap(); // should return Ok(())
        w.write_seats(&[]).unwrap();
    }

    #[test]
    fn integration_csv() {
        use chrono::{NaiveDate, NaiveTime};
        use fleet_alloc::MemoryStore;
        use fleet_core::{RouteId, TemplateId, VehicleId};
        use fleet_plan::{InInputOrder, PlannerBuilder};
        use fleet_schedule::{RouteScheduleTemplate, WeekdayMask};

        use crate::row::assignment_rows;

        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();

        let template = RouteScheduleTemplate::new(
            TemplateId(1),
            RouteId(7),
            t(8),
            t(10),
            WeekdayMask::ALL,
            d(1),
            d(31),
        )
        .unwrap();

        let planner = PlannerBuilder::new(MemoryStore::new(), InInputOrder)
            .templates(vec![template])
            .fleet(vec![VehicleId(1)])
            .build()
            .unwrap();
        let report = planner.plan(d(1), d(7)).unwrap();
        assert_eq!(report.assigned, 7, "one run per day for a week");

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_assignments(&assignment_rows(&planner.allocator).unwrap()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("assignments.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 7, "expected 7 daily assignments, got {}", rows.len());
        assert!(rows.iter().all(|r| &r[3] == "7"), "every row runs on route 7");
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{AssignmentRow, SeatRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::RosterWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn a_row(assignment_id: u32, status: &str) -> AssignmentRow {
        AssignmentRow {
            assignment_id,
            vehicle_id:     1,
            trip_id:        assignment_id + 100,
            route_id:       7,
            departure_date: "2024-03-01".into(),
            window_start:   "2024-03-01 08:00:00".into(),
            window_end:     "2024-03-01 10:30:00".into(),
            status:         status.into(),
        }
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("roster.db").exists());
    }

    #[test]
    fn sqlite_assignment_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_assignments(&[a_row(1, "active"), a_row(2, "cancelled"), a_row(3, "active")])
            .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("roster.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM assignments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_status_stored_as_text() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_assignments(&[a_row(1, "cancelled")]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("roster.db")).unwrap();
        let status: String = conn
            .query_row("SELECT status FROM assignments WHERE assignment_id = 1", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(status, "cancelled");
    }

    #[test]
    fn sqlite_seat_fields() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_seats(&[SeatRow {
            vehicle_id: 4,
            seat_id:    9,
            label:      "B3".into(),
            tier_id:    2,
            status:     "maintenance".into(),
        }])
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("roster.db")).unwrap();
        let (label, tier, status): (String, i64, String) = conn
            .query_row(
                "SELECT label, tier_id, status FROM seats WHERE vehicle_id = 4 AND seat_id = 9",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(label, "B3");
        assert_eq!(tier, 2);
        assert_eq!(status, "maintenance");
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use crate::parquet::ParquetWriter;
    use crate::row::{AssignmentRow, SeatRow};
    use crate::writer::RosterWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn a_row(assignment_id: u32) -> AssignmentRow {
        AssignmentRow {
            assignment_id,
            vehicle_id:     1,
            trip_id:        assignment_id + 100,
            route_id:       7,
            departure_date: "2024-03-01".into(),
            window_start:   "2024-03-01 08:00:00".into(),
            window_end:     "2024-03-01 10:30:00".into(),
            status:         "active".into(),
        }
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("assignments.parquet").exists());
        assert!(dir.path().join("seats.parquet").exists());
    }

    #[test]
    fn parquet_assignment_round_trip() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_assignments(&[a_row(1), a_row(2)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("assignments.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let reader = builder.build().unwrap();

        let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
        let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total_rows, 2, "expected 2 rows");

        let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            field_names,
            ["assignment_id", "vehicle_id", "trip_id", "route_id",
             "departure_date", "window_start", "window_end", "status"]
        );
    }

    #[test]
    fn parquet_tier_column_type() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_seats(&[SeatRow {
            vehicle_id: 1,
            seat_id:    0,
            label:      "A1".into(),
            tier_id:    1,
            status:     "available".into(),
        }])
        .unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("seats.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();

        let tier_field = schema.field_with_name("tier_id").unwrap();
        assert_eq!(*tier_field.data_type(), DataType::UInt16);
    }

    #[test]
    fn parquet_finish_required() {
        // A Parquet file whose writer was never closed has no footer and is
        // invalid. Dropping the writer must not stand in for finish().
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_assignments(&[a_row(1)]).unwrap();
        }

        let file = std::fs::File::open(dir.path().join("assignments.parquet")).unwrap();
        let result = ParquetRecordBatchReaderBuilder::try_new(file);
        assert!(result.is_err(), "file without Parquet footer should fail to open");
    }
}
