use thiserror::Error;

use crate::config::{LevelDef, FLOOR_ROWS, TILE_SIZE};
use crate::entities::{Cell, Rect};

/// Fixed-size grid of cells for one level. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TilemapError {
    #[error("level has no cells ({cols}x{rows})")]
    Empty { cols: usize, rows: usize },
    #[error("row count mismatch: expected {expected}, got {actual}")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("row {row} has {actual} cells, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl Tilemap {
    /// Builds the authored grid, or generates one when the level has none.
    pub fn from_def(def: &LevelDef) -> Result<Self, TilemapError> {
        if def.data.is_empty() {
            if def.cols == 0 || def.rows == 0 {
                return Err(TilemapError::Empty {
                    cols: def.cols,
                    rows: def.rows,
                });
            }
            Ok(Self::generate(def.cols, def.rows))
        } else {
            Self::from_rows(def.cols, def.rows, &def.data)
        }
    }

    pub fn from_rows(cols: usize, rows: usize, data: &[Vec<u8>]) -> Result<Self, TilemapError> {
        if cols == 0 || rows == 0 {
            return Err(TilemapError::Empty { cols, rows });
        }
        if data.len() != rows {
            return Err(TilemapError::RowCountMismatch {
                expected: rows,
                actual: data.len(),
            });
        }
        let mut cells = Vec::with_capacity(cols * rows);
        for (row, codes) in data.iter().enumerate() {
            if codes.len() != cols {
                return Err(TilemapError::ColumnCountMismatch {
                    row,
                    expected: cols,
                    actual: codes.len(),
                });
            }
            cells.extend(codes.iter().copied().map(Cell::from_code));
        }
        Ok(Self { cols, rows, cells })
    }

    /// Deterministic layout: solid floor strip, three short platforms when
    /// the level is wide enough, and one goal cell near the bottom-right.
    pub fn generate(cols: usize, rows: usize) -> Self {
        let mut map = Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
        };
        let (c, r) = (cols as i64, rows as i64);

        for row in (r - FLOOR_ROWS as i64)..r {
            map.fill_run(row, 0, c, Cell::Solid);
        }
        if cols > 10 {
            map.fill_run(r - 6, 6, 10, Cell::Solid);
            map.fill_run(r - 8, 14, 18, Cell::Solid);
            map.fill_run(r - 5, c / 2, c / 2 + 4, Cell::Solid);
        }
        map.set(c - 2, r - 4, Cell::Goal);
        map
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width_px(&self) -> f32 {
        self.cols as f32 * TILE_SIZE
    }

    pub fn height_px(&self) -> f32 {
        self.rows as f32 * TILE_SIZE
    }

    /// Out-of-range coordinates read as `Cell::Empty`.
    pub fn cell_at(&self, col: i64, row: i64) -> Cell {
        self.index_of(col, row)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Cell::Empty)
    }

    pub fn cell_rect(col: i64, row: i64) -> Rect {
        Rect {
            x: col as f32 * TILE_SIZE,
            y: row as f32 * TILE_SIZE,
            w: TILE_SIZE,
            h: TILE_SIZE,
        }
    }

    /// Inclusive range of tile indices touched by the pixel span `start..=start+len`.
    pub fn tile_span(start: f32, len: f32) -> (i64, i64) {
        (
            (start / TILE_SIZE).floor() as i64,
            ((start + len) / TILE_SIZE).floor() as i64,
        )
    }

    fn index_of(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    fn set(&mut self, col: i64, row: i64, cell: Cell) {
        if let Some(index) = self.index_of(col, row) {
            self.cells[index] = cell;
        }
    }

    fn fill_run(&mut self, row: i64, from_col: i64, to_col: i64, cell: Cell) {
        for col in from_col..to_col {
            self.set(col, row, cell);
        }
    }
}
