//! Seat-template matrices and grid-derived seat labels.
//!
//! A matrix is the declarative layout of one bus type: a row-major grid in
//! which every cell is either a seat (with a fare tier) or a structural gap
//! (aisle, door, wheelchair bay).  The grid is pure configuration — turning
//! it into per-vehicle seat records is [`crate::compile`]'s job.
//!
//! Labels are a function of grid position only: row letter (`'A' + row - 1`)
//! followed by the 1-based column number, so the cell at row 2, column 3 is
//! seat `B3`.  That rule caps `rows` at 26; real coaches top out far below.

use std::fmt;

use fleet_core::{MatrixId, TierId};

use crate::error::{SeatingError, SeatingResult};

/// Highest addressable row: labels run `A` through `Z`.
pub const MAX_ROWS: usize = 26;

// ── SeatCell ──────────────────────────────────────────────────────────────────

/// One cell of the layout grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeatCell {
    /// Structural gap.  Compiles to nothing.
    #[default]
    Empty,
    /// A sellable seat in the given fare tier.
    Seat { tier: TierId },
}

impl SeatCell {
    #[inline]
    pub fn is_seat(self) -> bool {
        matches!(self, SeatCell::Seat { .. })
    }

    #[inline]
    pub fn tier(self) -> Option<TierId> {
        match self {
            SeatCell::Seat { tier } => Some(tier),
            SeatCell::Empty => None,
        }
    }
}

// ── SeatLabel ─────────────────────────────────────────────────────────────────

/// A grid-derived seat name such as `B3`.
///
/// Ordering is row-major (row, then column), matching compilation order.
/// Labels are minted by [`SeatTemplateMatrix`] iteration, so `row` is always
/// in `1..=26` and `col` is at least 1.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatLabel {
    row: u8,
    col: u8,
}

impl SeatLabel {
    /// Build a label from 1-based grid coordinates.
    pub fn new(row: u8, col: u8) -> SeatingResult<Self> {
        if row == 0 || row as usize > MAX_ROWS || col == 0 {
            return Err(SeatingError::BadLabel { row, col });
        }
        Ok(Self { row, col })
    }

    #[inline(always)]
    pub fn row(self) -> u8 {
        self.row
    }

    #[inline(always)]
    pub fn col(self) -> u8 {
        self.col
    }

    /// The row letter: row 1 → `A`, row 2 → `B`, …
    #[inline]
    pub fn row_letter(self) -> char {
        (b'A' + self.row - 1) as char
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.col)
    }
}

// ── SeatTemplateMatrix ────────────────────────────────────────────────────────

/// A validated row-major seat grid.
///
/// Invariants, enforced at construction:
/// * `1 <= rows <= 26` and `cols >= 1`;
/// * `cells.len() == rows * cols`.
///
/// The grid is plain data.  One instance is typically shared (`Arc`) by all
/// vehicles of a bus type; see [`crate::layout::SeatingPlan`] for the
/// copy-on-write ownership rules.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatTemplateMatrix {
    id:    MatrixId,
    rows:  u8,
    cols:  u8,
    cells: Vec<SeatCell>,
}

impl SeatTemplateMatrix {
    pub fn new(id: MatrixId, rows: u8, cols: u8, cells: Vec<SeatCell>) -> SeatingResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(SeatingError::Dimensions {
                matrix: id,
                rows:   rows as usize,
                cols:   cols as usize,
            });
        }
        if rows as usize > MAX_ROWS {
            return Err(SeatingError::RowLimit {
                matrix: id,
                rows:   rows as usize,
            });
        }
        let expected = rows as usize * cols as usize;
        if cells.len() != expected {
            return Err(SeatingError::CellCount {
                matrix: id,
                expected,
                got: cells.len(),
            });
        }
        Ok(Self { id, rows, cols, cells })
    }

    /// An all-empty grid, ready for `set_cell`.
    pub fn blank(id: MatrixId, rows: u8, cols: u8) -> SeatingResult<Self> {
        let len = rows as usize * cols as usize;
        Self::new(id, rows, cols, vec![SeatCell::Empty; len])
    }

    #[inline(always)]
    pub fn id(&self) -> MatrixId {
        self.id
    }

    #[inline(always)]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Read-only row-major cell slice.
    pub fn cells(&self) -> &[SeatCell] {
        &self.cells
    }

    fn idx(&self, row: u8, col: u8) -> Option<usize> {
        if row == 0 || col == 0 || row > self.rows || col > self.cols {
            return None;
        }
        Some((row as usize - 1) * self.cols as usize + (col as usize - 1))
    }

    /// Cell at 1-based `(row, col)`, or `None` out of bounds.
    pub fn cell(&self, row: u8, col: u8) -> Option<SeatCell> {
        self.idx(row, col).map(|i| self.cells[i])
    }

    /// Overwrite the cell at 1-based `(row, col)`.
    pub fn set_cell(&mut self, row: u8, col: u8, cell: SeatCell) -> SeatingResult<()> {
        match self.idx(row, col) {
            Some(i) => {
                self.cells[i] = cell;
                Ok(())
            }
            None => Err(SeatingError::CellOutOfBounds {
                matrix: self.id,
                row,
                col,
            }),
        }
    }

    /// Number of seat cells (the size of the compiled output).
    pub fn seat_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_seat()).count()
    }

    /// Iterate seat cells in row-major order as `(label, tier)` pairs.
    ///
    /// This is the canonical compilation order: row 1 left to right, then
    /// row 2, and so on.  Empty cells are skipped, so the column numbers in
    /// consecutive labels may jump (a gap at `(1, 2)` yields `A1, A3, …` and
    /// never an `A2`).
    pub fn seats(&self) -> impl Iterator<Item = (SeatLabel, TierId)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let tier = cell.tier()?;
            let row = (i / self.cols as usize) as u8 + 1;
            let col = (i % self.cols as usize) as u8 + 1;
            Some((SeatLabel { row, col }, tier))
        })
    }
}
