//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into dense `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the inner type's MAX.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identity of a physical vehicle in the fleet roster.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Identity of a service route (origin/destination line).
    pub struct RouteId(u32);
}

typed_id! {
    /// Identity of a recurring route-schedule template.
    pub struct TemplateId(u32);
}

typed_id! {
    /// Identity of a materialized, dated trip instance.
    pub struct TripId(u32);
}

typed_id! {
    /// Identity of a vehicle-to-trip assignment record.
    pub struct AssignmentId(u32);
}

typed_id! {
    /// Identity of a compiled seat.  Stable across layout recompiles for
    /// seats whose label survives the edit.
    pub struct SeatId(u32);
}

typed_id! {
    /// Index of a seat tier (fare class) in the application's tier registry.
    /// Using `u16` keeps seat-matrix cells compact (max 65,535 tiers).
    pub struct TierId(u16);
}

typed_id! {
    /// Identity of a seat-template matrix (one per bus type, plus private
    /// per-vehicle copies after an edit).
    pub struct MatrixId(u32);
}
