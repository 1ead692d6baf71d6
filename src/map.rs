use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::fixed::TILE;

/// Raw code returned for coordinates outside the map.
pub const OUT_OF_BOUNDS: i8 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(i8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Solid = 1,
    Striped = 2,
    Door = 3,
}

impl Cell {
    #[inline]
    pub fn code(self) -> i8 {
        self as i8
    }

    pub fn from_code(code: i8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Solid),
            2 => Some(Cell::Striped),
            3 => Some(Cell::Door),
            _ => None,
        }
    }

    /// Kinds above zero stop rays and block movement.
    #[inline]
    pub fn is_wall(self) -> bool {
        self.code() > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    WrongCellCount { expected: usize, found: usize },
    UnknownCode { index: usize, code: i8 },
    TooLarge(usize),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::WrongCellCount { expected, found } => {
                write!(f, "map needs {expected} cells, got {found}")
            }
            MapError::UnknownCode { index, code } => {
                write!(f, "cell {index} has unknown code {code}")
            }
            MapError::TooLarge(size) => write!(f, "map size {size} is too large"),
        }
    }
}

impl std::error::Error for MapError {}

/// Square tile grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    size: usize,
    cells: Vec<Cell>,
}

impl Map {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, MapError> {
        let expected = size.checked_mul(size).ok_or(MapError::TooLarge(size))?;
        if cells.len() != expected {
            return Err(MapError::WrongCellCount {
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Builds a map from raw codes, e.g. a `Uint8Array`/`Int8Array` from the host.
    pub fn from_codes(size: usize, codes: &[i8]) -> Result<Self, MapError> {
        let cells = codes
            .iter()
            .enumerate()
            .map(|(index, &code)| Cell::from_code(code).ok_or(MapError::UnknownCode { index, code }))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(size, cells)
    }

    /// Random map: a third of the cells become walls, a quarter of those get
    /// stripes, then a quarter of the remaining plain walls become doors.
    pub fn generate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut cells: Vec<Cell> = (0..size * size)
            .map(|_| {
                if rng.random_ratio(1, 3) {
                    Cell::Solid
                } else {
                    Cell::Empty
                }
            })
            .collect();

        for cell in cells.iter_mut() {
            if *cell == Cell::Solid && rng.random_ratio(1, 4) {
                *cell = Cell::Striped;
            }
        }
        for cell in cells.iter_mut() {
            if *cell == Cell::Solid && rng.random_ratio(1, 4) {
                *cell = Cell::Door;
            }
        }

        Self { size, cells }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Scaled extent of one side, `size * TILE`.
    #[inline]
    pub fn extent(&self) -> i64 {
        self.size as i64 * TILE as i64
    }

    /// Cell under a scaled world coordinate, `None` outside `[0, size*TILE)`.
    pub fn lookup(&self, x: i32, y: i32) -> Option<Cell> {
        let extent = self.extent();
        if x < 0 || y < 0 || x as i64 >= extent || y as i64 >= extent {
            return None;
        }
        let col = (x / TILE) as usize;
        let row = (y / TILE) as usize;
        self.cells.get(row * self.size + col).copied()
    }

    /// Like `lookup` but returns the raw code, `OUT_OF_BOUNDS` outside the map.
    pub fn code_at(&self, x: i32, y: i32) -> i8 {
        self.lookup(x, y).map_or(OUT_OF_BOUNDS, Cell::code)
    }

    /// Walkable kinds and anything off the map.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.lookup(x, y).map_or(true, |cell| !cell.is_wall())
    }

    /// Sets a cell by tile coordinates. Out of range is ignored.
    pub fn set(&mut self, col: usize, row: usize, cell: Cell) {
        if col < self.size && row < self.size {
            self.cells[row * self.size + col] = cell;
        }
    }
}
