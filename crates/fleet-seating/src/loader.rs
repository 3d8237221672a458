//! CSV matrix loader.
//!
//! # CSV format
//!
//! A headerless grid, one CSV row per seat row, top to bottom.  Each field
//! is either a fare-tier number or a gap marker (`.`, `-`, or an empty
//! field):
//!
//! ```csv
//! 1,1,.,2,2
//! 1,1,.,2,2
//! .,.,.,.,.
//! 3,3,3,3,3
//! ```
//!
//! The example compiles to rows `A`, `B`, and `D` of seats with an aisle
//! column and a gap row; row letters follow grid position, so the gap row
//! still consumes the letter `C`.

use std::io::Read;
use std::path::Path;

use fleet_core::{MatrixId, TierId};

use crate::matrix::{SeatCell, SeatTemplateMatrix, MAX_ROWS};
use crate::SeatingError;

/// Load a seat-template matrix from a headerless CSV grid file.
pub fn load_matrix_csv(path: &Path, id: MatrixId) -> Result<SeatTemplateMatrix, SeatingError> {
    let file = std::fs::File::open(path).map_err(SeatingError::Io)?;
    load_matrix_reader(file, id)
}

/// Like [`load_matrix_csv`] but accepts any `Read` source.
pub fn load_matrix_reader<R: Read>(
    reader: R,
    id: MatrixId,
) -> Result<SeatTemplateMatrix, SeatingError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut cells: Vec<SeatCell> = Vec::new();
    let mut rows: usize = 0;
    let mut cols: usize = 0;

    for result in csv_reader.records() {
        let record = result.map_err(|e| SeatingError::Parse(e.to_string()))?;
        if rows == 0 {
            cols = record.len();
        }
        // The csv crate rejects ragged rows by default; this only guards
        // a first row of width zero.
        if record.len() != cols || cols == 0 {
            return Err(SeatingError::Parse(format!(
                "row {} has {} fields, expected {}",
                rows + 1,
                record.len(),
                cols
            )));
        }
        for field in record.iter() {
            cells.push(parse_cell(field)?);
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(SeatingError::Parse("matrix file contains no rows".into()));
    }
    if rows > MAX_ROWS {
        return Err(SeatingError::RowLimit { matrix: id, rows });
    }
    if cols > u8::MAX as usize {
        return Err(SeatingError::Parse(format!(
            "matrix has {cols} columns, the maximum is {}",
            u8::MAX
        )));
    }

    SeatTemplateMatrix::new(id, rows as u8, cols as u8, cells)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_cell(s: &str) -> Result<SeatCell, SeatingError> {
    match s.trim() {
        "" | "." | "-" => Ok(SeatCell::Empty),
        n => n
            .parse::<u16>()
            .map(|tier| SeatCell::Seat { tier: TierId(tier) })
            .map_err(|_| {
                SeatingError::Parse(format!(
                    "invalid cell {n:?}: expected a tier number or \".\"/\"-\"/empty"
                ))
            }),
    }
}
