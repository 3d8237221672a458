//! Shared city fleet definition.
//!
//! Six buses in two body types: four 16-seat city runners and two 20-seat
//! coaches with a premium front row.  Each body type is one matrix shared
//! via `Arc`, so the fleet costs two compiled grids until a vehicle gets a
//! private refit.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Result;

use fleet_core::{MatrixId, VehicleId};
use fleet_seating::{load_matrix_reader, SeatTemplateMatrix, SeatingPlan};

// Headerless grids, one CSV row per seat row.  `.` is a gap (here: the
// aisle), numbers are fare tiers.

// 4 rows × 2+2 seats, all standard tier.
const CITY_RUNNER_CSV: &str = "\
1,1,.,1,1\n\
1,1,.,1,1\n\
1,1,.,1,1\n\
1,1,.,1,1\n\
";

// 5 rows × 2+2 seats, premium front row.
const COACH_CSV: &str = "\
2,2,.,2,2\n\
1,1,.,1,1\n\
1,1,.,1,1\n\
1,1,.,1,1\n\
1,1,.,1,1\n\
";

// Coach refit: rear row removed (E1/E2/E4/E5 retire), rows A–D survive.
const COACH_REFIT_CSV: &str = "\
2,2,.,2,2\n\
1,1,.,1,1\n\
1,1,.,1,1\n\
1,1,.,1,1\n\
";

/// Build the 6-bus fleet and compile its seating.
///
/// Returns `(seating, fleet)`: vehicles 1–4 are city runners, 5–6 coaches.
pub fn build_fleet() -> Result<(SeatingPlan, Vec<VehicleId>)> {
    let runner = Arc::new(load_matrix_reader(Cursor::new(CITY_RUNNER_CSV), MatrixId(1))?);
    let coach = Arc::new(load_matrix_reader(Cursor::new(COACH_CSV), MatrixId(2))?);

    let fleet: Vec<VehicleId> = (1..=6).map(VehicleId).collect();
    let mut seating = SeatingPlan::new();
    for &v in &fleet[..4] {
        seating.install(v, Arc::clone(&runner))?;
    }
    for &v in &fleet[4..] {
        seating.install(v, Arc::clone(&coach))?;
    }
    Ok((seating, fleet))
}

/// The edited coach grid used by the refit walkthrough in `main`.
pub fn coach_refit() -> Result<SeatTemplateMatrix> {
    Ok(load_matrix_reader(Cursor::new(COACH_REFIT_CSV), MatrixId(3))?)
}
