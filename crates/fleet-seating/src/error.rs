use thiserror::Error;

use fleet_core::{MatrixId, VehicleId};

use crate::matrix::SeatLabel;

#[derive(Debug, Error)]
pub enum SeatingError {
    #[error("matrix {matrix}: grid dimensions {rows}x{cols} are invalid")]
    Dimensions {
        matrix: MatrixId,
        rows:   usize,
        cols:   usize,
    },

    #[error("matrix {matrix}: {rows} rows exceed the 26-row label limit")]
    RowLimit { matrix: MatrixId, rows: usize },

    #[error("matrix {matrix}: expected {expected} cells, got {got}")]
    CellCount {
        matrix:   MatrixId,
        expected: usize,
        got:      usize,
    },

    #[error("matrix {matrix}: cell ({row}, {col}) is out of bounds")]
    CellOutOfBounds { matrix: MatrixId, row: u8, col: u8 },

    #[error("seat label ({row}, {col}) is outside the addressable grid")]
    BadLabel { row: u8, col: u8 },

    #[error("vehicle {0} has no installed layout")]
    UnknownLayout(VehicleId),

    #[error("vehicle {vehicle} has no seat {label}")]
    UnknownSeat {
        vehicle: VehicleId,
        label:   SeatLabel,
    },

    #[error("matrix parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SeatingResult<T> = Result<T, SeatingError>;
