//! Per-vehicle layouts with copy-on-write matrix ownership.
//!
//! All vehicles of one bus type share a single `Arc` of the type's matrix;
//! installing a layout never clones the grid.  The first edit that targets a
//! single vehicle gives that vehicle a private matrix copy, leaving its
//! siblings on the shared one.  Seat *status* (maintenance flags) is
//! per-vehicle state from the start and never forces a matrix copy.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use fleet_core::{SeatId, VehicleId};

use crate::compile::{compile, recompile, Recompiled, SeatIds, SeatInstance, SeatStatus};
use crate::error::{SeatingError, SeatingResult};
use crate::matrix::{SeatLabel, SeatTemplateMatrix};

// ── VehicleLayout ─────────────────────────────────────────────────────────────

/// One vehicle's seating state: which matrix it follows and the compiled
/// seats.
#[derive(Debug)]
struct VehicleLayout {
    matrix: Arc<SeatTemplateMatrix>,
    seats:  Vec<SeatInstance>,
}

// ── SeatingPlan ───────────────────────────────────────────────────────────────

/// The fleet-wide seating store.
///
/// Owns the `SeatId` counter, so seat identity is unique and stable across
/// every vehicle and recompile managed by one plan.
#[derive(Debug, Default)]
pub struct SeatingPlan {
    layouts: FxHashMap<VehicleId, VehicleLayout>,
    ids:     SeatIds,
}

impl SeatingPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `matrix` to `vehicle` and (re)compile its seats.
    ///
    /// First installation compiles fresh seats.  Re-installation (a bus-type
    /// swap, or picking up an updated shared matrix) recompiles with
    /// label-preserved identity and reports retirements, exactly like
    /// [`apply_matrix`](Self::apply_matrix).
    pub fn install(
        &mut self,
        vehicle: VehicleId,
        matrix: Arc<SeatTemplateMatrix>,
    ) -> SeatingResult<Recompiled> {
        let result = match self.layouts.get(&vehicle) {
            None => Recompiled {
                seats: compile(&matrix, vehicle, &mut self.ids),
                retired: Vec::new(),
            },
            Some(layout) => recompile(&matrix, vehicle, &layout.seats, &mut self.ids),
        };
        if !result.retired.is_empty() {
            log::debug!(
                "vehicle {vehicle}: {} seat(s) retired by matrix {}",
                result.retired.len(),
                matrix.id()
            );
        }
        self.layouts.insert(
            vehicle,
            VehicleLayout {
                matrix,
                seats: result.seats.clone(),
            },
        );
        Ok(result)
    }

    /// Give `vehicle` a private, edited matrix and recompile.
    ///
    /// This is the copy-on-write point: the vehicle leaves whatever shared
    /// matrix it was on.  Seats whose labels survive keep their ids and
    /// maintenance flags; vanished labels are reported, never dropped
    /// silently.
    pub fn apply_matrix(
        &mut self,
        vehicle: VehicleId,
        matrix: SeatTemplateMatrix,
    ) -> SeatingResult<Recompiled> {
        if !self.layouts.contains_key(&vehicle) {
            return Err(SeatingError::UnknownLayout(vehicle));
        }
        self.install(vehicle, Arc::new(matrix))
    }

    /// The compiled seats of `vehicle`, row-major.
    pub fn seats(&self, vehicle: VehicleId) -> Option<&[SeatInstance]> {
        self.layouts.get(&vehicle).map(|l| l.seats.as_slice())
    }

    /// The matrix `vehicle` currently follows.
    pub fn matrix(&self, vehicle: VehicleId) -> Option<&SeatTemplateMatrix> {
        self.layouts.get(&vehicle).map(|l| l.matrix.as_ref())
    }

    /// Do two vehicles still share one physical matrix allocation?
    pub fn shares_matrix(&self, a: VehicleId, b: VehicleId) -> bool {
        match (self.layouts.get(&a), self.layouts.get(&b)) {
            (Some(la), Some(lb)) => Arc::ptr_eq(&la.matrix, &lb.matrix),
            _ => false,
        }
    }

    /// Flip the maintenance flag of one seat.  Never touches the matrix.
    pub fn set_status(
        &mut self,
        vehicle: VehicleId,
        label: SeatLabel,
        status: SeatStatus,
    ) -> SeatingResult<()> {
        let layout = self
            .layouts
            .get_mut(&vehicle)
            .ok_or(SeatingError::UnknownLayout(vehicle))?;
        let seat = layout
            .seats
            .iter_mut()
            .find(|s| s.label == label)
            .ok_or(SeatingError::UnknownSeat { vehicle, label })?;
        seat.status = status;
        Ok(())
    }

    /// Look up one seat by id.
    pub fn seat(&self, vehicle: VehicleId, id: SeatId) -> Option<&SeatInstance> {
        self.layouts
            .get(&vehicle)
            .and_then(|l| l.seats.iter().find(|s| s.id == id))
    }

    /// Vehicles with an installed layout, in no particular order.
    pub fn vehicles(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.layouts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
