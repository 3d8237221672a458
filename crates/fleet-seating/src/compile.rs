//! The seat compiler: matrix → per-vehicle seat records.
//!
//! # Identity rules
//!
//! Compilation is deterministic and identity-preserving:
//!
//! * [`compile`] stamps a fresh [`SeatInstance`] per seat cell, row-major,
//!   all `Available`.
//! * [`recompile`] re-runs compilation against an edited matrix while
//!   keeping the `SeatId` and status of every seat whose label survives.
//!   A tier-only edit therefore changes neither the seat's id nor its
//!   maintenance flag — sold tickets referencing the seat stay valid.
//! * Labels that disappeared are returned in [`Recompiled::retired`], never
//!   silently dropped; the caller decides what a retired seat means for
//!   open bookings.
//!
//! `SeatId`s are minted by the caller-owned [`SeatIds`] counter so ids stay
//! unique across every vehicle and every recompile in one plan.

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

use fleet_core::{SeatId, TierId, VehicleId};

use crate::matrix::{SeatLabel, SeatTemplateMatrix};

// ── SeatStatus ────────────────────────────────────────────────────────────────

/// Operational state of one physical seat.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeatStatus {
    #[default]
    Available,
    Maintenance,
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeatStatus::Available => "available",
            SeatStatus::Maintenance => "maintenance",
        };
        f.write_str(s)
    }
}

// ── SeatInstance ──────────────────────────────────────────────────────────────

/// One sellable seat on one vehicle.
///
/// Every instance has a tier: gaps in the grid compile to nothing, so a
/// "seat without a tier" cannot exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatInstance {
    pub id:      SeatId,
    pub vehicle: VehicleId,
    pub label:   SeatLabel,
    pub tier:    TierId,
    pub status:  SeatStatus,
}

// ── SeatIds ───────────────────────────────────────────────────────────────────

/// Monotonic `SeatId` source, owned by the seating plan.
#[derive(Debug, Default)]
pub struct SeatIds(u32);

impl SeatIds {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn mint(&mut self) -> SeatId {
        let id = SeatId(self.0);
        self.0 += 1;
        id
    }
}

// ── Compilation ───────────────────────────────────────────────────────────────

/// Output of [`recompile`]: the new seat list plus every seat whose label no
/// longer exists in the matrix.
#[derive(Debug, Default)]
pub struct Recompiled {
    /// Seats in row-major label order.
    pub seats: Vec<SeatInstance>,
    /// Previous seats whose labels vanished in the edit, original records
    /// intact (id, tier, and status as they were).
    pub retired: Vec<SeatInstance>,
}

/// Compile a matrix into fresh seats for `vehicle`.
pub fn compile(
    matrix: &SeatTemplateMatrix,
    vehicle: VehicleId,
    ids: &mut SeatIds,
) -> Vec<SeatInstance> {
    matrix
        .seats()
        .map(|(label, tier)| SeatInstance {
            id: ids.mint(),
            vehicle,
            label,
            tier,
            status: Default::default(),
        })
        .collect()
}

/// Recompile `matrix` for `vehicle`, preserving identity by label.
///
/// `existing` is the vehicle's current seat list (any order).  Surviving
/// labels keep their id and status while the tier is refreshed from the
/// cell; new labels get fresh ids.
pub fn recompile(
    matrix: &SeatTemplateMatrix,
    vehicle: VehicleId,
    existing: &[SeatInstance],
    ids: &mut SeatIds,
) -> Recompiled {
    let by_label: FxHashMap<SeatLabel, &SeatInstance> =
        existing.iter().map(|s| (s.label, s)).collect();

    let mut kept: FxHashSet<SeatLabel> = FxHashSet::default();
    let seats = matrix
        .seats()
        .map(|(label, tier)| match by_label.get(&label) {
            Some(old) => {
                kept.insert(label);
                SeatInstance {
                    id: old.id,
                    vehicle,
                    label,
                    tier,
                    status: old.status,
                }
            }
            None => SeatInstance {
                id: ids.mint(),
                vehicle,
                label,
                tier,
                status: Default::default(),
            },
        })
        .collect();

    let retired = existing
        .iter()
        .filter(|s| !kept.contains(&s.label))
        .copied()
        .collect();

    Recompiled { seats, retired }
}
