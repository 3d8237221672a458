//! Assignment records: one vehicle committed to one trip's service window.

use std::fmt;

use fleet_core::{AssignmentId, TimeWindow, TripId, VehicleId};

/// Lifecycle of an assignment record.
///
/// Records are never deleted; cancellation flips the status and frees the
/// window for new commits while the row stays resolvable for reporting.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentStatus {
    #[default]
    Active,
    Cancelled,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignmentStatus::Active => "active",
            AssignmentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One vehicle blocked out for one trip's window.
///
/// The workspace-wide invariant lives here: for a fixed vehicle, the windows
/// of all `Active` assignments are pairwise non-overlapping under the
/// half-open rule.  Only [`crate::store::AssignmentStore::try_commit`] may
/// create these records, which is what makes the invariant enforceable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleAssignment {
    pub id:      AssignmentId,
    pub vehicle: VehicleId,
    pub trip:    TripId,
    pub window:  TimeWindow,
    pub status:  AssignmentStatus,
}
