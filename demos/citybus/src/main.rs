//! citybus — end-to-end demo of the rust_fleet scheduling core.
//!
//! Plans one service week for a 6-bus municipal fleet on three routes,
//! handles a mid-week breakdown by releasing and re-planning the broken
//! bus's duties, refits a coach, and exports the final roster to CSV.
//! Swap the embedded CSVs for real files to run a production timetable.
//!
//! `RUST_LOG=info cargo run -p citybus` surfaces the planner's phase logs.

mod fleet;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};

use fleet_alloc::MemoryStore;
use fleet_core::{TemplateId, VehicleId};
use fleet_export::{assignment_rows, seat_rows, CsvWriter, RosterWriter};
use fleet_plan::{LeastRecentlyUsed, PlanOptions, PlannerBuilder};
use fleet_schedule::load_templates_reader;

use fleet::{build_fleet, coach_refit};

// ── Constants ─────────────────────────────────────────────────────────────────

const FLEET_SIZE: u32 = 6;

// Service week: Monday 2024-06-03 through Sunday 2024-06-09.
const WEEK_START_DAY: u32 = 3;
const WEEK_END_DAY:   u32 = 9;

// ── Timetable CSV ─────────────────────────────────────────────────────────────

// Three routes over one summer week:
//   route 10 — daily morning, midday (winter season, expired), and evening runs
//   route 12 — weekday commuter run plus a summer weekend shuttle
//   route 7  — Friday/Saturday night line, arrives after midnight
const TIMETABLE_CSV: &str = "\
template_id,route_id,departure,arrival,monday,tuesday,wednesday,thursday,friday,saturday,sunday,season_start,season_end,active\n\
1,10,06:30,08:45,1,1,1,1,1,1,1,2024-01-01,2024-12-31,1\n\
2,10,17:15,19:30,1,1,1,1,1,1,1,2024-01-01,2024-12-31,1\n\
3,12,07:00,09:30,1,1,1,1,1,0,0,2024-01-01,2024-12-31,1\n\
4,12,09:00,11:00,0,0,0,0,0,1,1,2024-06-01,2024-09-30,1\n\
5,7,23:30,02:10,0,0,0,0,1,1,0,2024-01-01,2024-12-31,1\n\
6,10,12:00,14:00,1,1,1,1,1,1,1,2024-01-01,2024-03-31,1\n\
";

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== citybus — rust_fleet scheduling demo ===");
    println!("Fleet: {FLEET_SIZE} buses  |  Week: 2024-06-03 .. 2024-06-09");
    println!();

    // 1. Build the fleet and compile its seating.
    let (mut seating, fleet_vehicles) = build_fleet()?;
    let seat_total: usize = fleet_vehicles
        .iter()
        .map(|&v| seating.seats(v).map_or(0, |s| s.len()))
        .sum();
    println!("Seating: {} buses, {} seats compiled", seating.len(), seat_total);

    // 2. Load the timetable from the embedded CSV.
    let templates = load_templates_reader(Cursor::new(TIMETABLE_CSV))?;
    println!("Loaded {} route-schedule templates", templates.len());

    // 3. Build the planner.  Least-recently-used dispatch spreads duty hours
    //    across the fleet instead of hammering bus 1.
    let options = PlanOptions {
        max_horizon_days: 31,
        ..PlanOptions::default()
    };
    let mut planner = PlannerBuilder::new(MemoryStore::new(), LeastRecentlyUsed)
        .templates(templates)
        .fleet(fleet_vehicles.clone())
        .options(options)
        .build()?;

    // 4. Plan the service week.
    let t0 = Instant::now();
    let report = planner.plan(june(WEEK_START_DAY), june(WEEK_END_DAY))?;
    println!(
        "Planned in {:.3} ms: {} trips expanded, {} admitted, {} assigned, {} unassigned",
        t0.elapsed().as_secs_f64() * 1e3,
        report.expanded,
        report.admitted,
        report.assigned,
        report.unassigned,
    );
    println!();

    // 5. Tuesday night: the bus rostered for Wednesday's 06:30 run breaks
    //    down.  Release its remaining duties, pull it from the fleet, re-plan.
    let wednesday = june(5);
    let broken = planner
        .allocator
        .trips_snapshot()?
        .iter()
        .find(|t| t.departure_date == wednesday && t.template == TemplateId(1))
        .and_then(|t| t.vehicle)
        .unwrap();

    let mut released = 0;
    for duty in planner.allocator.assignments_for(broken)? {
        if duty.window.start().date() >= wednesday {
            planner.allocator.cancel(duty.id)?;
            released += 1;
        }
    }
    planner.fleet.retain(|&v| v != broken);

    let patched = planner.plan(june(WEEK_START_DAY), june(WEEK_END_DAY))?;
    println!("Breakdown: bus {} out from Wednesday", broken.0);
    println!(
        "  released {released} duties, re-plan reassigned {} ({} admitted anew)",
        patched.assigned, patched.admitted,
    );

    // 6. Can bus 2 take a Saturday afternoon charter?
    let saturday = june(8);
    let free = planner.vehicle_free_for(VehicleId(2), saturday, at(12, 0), at(15, 0))?;
    println!(
        "  bus 2 free for a Saturday 12:00-15:00 charter: {}",
        if free { "yes" } else { "no" }
    );
    println!();

    // 7. Refit coach 5: the rear row comes out, every surviving seat keeps
    //    its id (and with it any bookings keyed on seat identity).
    let coach = VehicleId(5);
    let a1_before = seating.seats(coach).and_then(|s| s.first().map(|seat| seat.id));
    let refit = seating.apply_matrix(coach, coach_refit()?)?;
    let retired: Vec<String> = refit.retired.iter().map(|s| s.label.to_string()).collect();
    println!(
        "Refit bus {}: {} seats now, retired {}",
        coach.0,
        refit.seats.len(),
        retired.join(", "),
    );
    let a1_after = refit.seats.first().map(|s| s.id);
    println!(
        "  seat A1 identity stable across the refit: {}",
        if a1_before == a1_after { "yes" } else { "no" }
    );
    println!();

    // 8. Export the roster.
    std::fs::create_dir_all("output/citybus")?;
    let mut writer = CsvWriter::new(Path::new("output/citybus"))?;
    let assignments = assignment_rows(&planner.allocator)?;
    let seats = seat_rows(&seating);
    writer.write_assignments(&assignments)?;
    writer.write_seats(&seats)?;
    writer.finish()?;
    println!("Exported output/citybus/assignments.csv ({} rows)", assignments.len());
    println!("Exported output/citybus/seats.csv ({} rows)", seats.len());
    println!();

    // 9. Weekly duty table.
    println!("{:<6} {:<6} {:<22} {:>6}", "Bus", "Runs", "First departure", "Hours");
    println!("{}", "-".repeat(44));
    for v in 1..=FLEET_SIZE {
        let v = VehicleId(v);
        let duties = planner.allocator.assignments_for(v)?;
        let first = duties
            .first()
            .map_or_else(|| "-".into(), |a| a.window.start().to_string());
        let minutes: i64 = duties.iter().map(|a| a.window.duration().num_minutes()).sum();
        println!(
            "{:<6} {:<6} {:<22} {:>6.1}",
            v.0,
            duties.len(),
            first,
            minutes as f64 / 60.0,
        );
    }

    Ok(())
}
