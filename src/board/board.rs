//! Square grid of cells with a configurable win length

use std::fmt;

use super::placement::Placement;
use super::{Cell, Player, Pos, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::{EngineError, Result};

/// Game board: an N x N grid where K marks in a row win.
///
/// The shape is fixed at construction. Cells are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    win_length: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty `size` x `size` board where `win_length` in a row wins.
    pub fn new(size: usize, win_length: usize) -> Result<Self> {
        Self::check_shape(size, win_length)?;
        Ok(Self {
            size,
            win_length,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Classic 3x3 tic-tac-toe
    pub fn tic_tac_toe() -> Self {
        Self {
            size: 3,
            win_length: 3,
            cells: vec![Cell::Empty; 9],
        }
    }

    /// Five-in-a-row on a `size` x `size` board
    pub fn gomoku(size: usize) -> Result<Self> {
        Self::new(size, 5)
    }

    /// Build a board from caller-owned rows.
    ///
    /// Rejects empty, ragged and non-square grids with `InvalidBoard`.
    pub fn from_rows(rows: &[Vec<Cell>], win_length: usize) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::InvalidBoard("grid has no rows".into()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(EngineError::InvalidBoard(format!(
                    "row {} has {} cells, expected {} for a square grid",
                    i,
                    row.len(),
                    size
                )));
            }
        }
        Self::check_shape(size, win_length)?;
        Ok(Self {
            size,
            win_length,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Parse a board drawn one row per line with `X`, `O` and `.`/`_`/`-`.
    ///
    /// Blank lines and whitespace inside a line are ignored.
    pub fn parse(text: &str, win_length: usize) -> Result<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| {
                        Cell::from_symbol(c).ok_or_else(|| {
                            EngineError::InvalidBoard(format!("unknown cell symbol {c:?}"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(&rows, win_length)
    }

    fn check_shape(size: usize, win_length: usize) -> Result<()> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(EngineError::InvalidBoard(format!(
                "side {} outside [{}, {}]",
                size, MIN_BOARD_SIZE, MAX_BOARD_SIZE
            )));
        }
        if !(3..=size).contains(&win_length) {
            return Err(EngineError::InvalidBoard(format!(
                "win length {} outside [3, {}]",
                win_length, size
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of marks in a row needed to win
    #[inline]
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// True for the 3x3, three-in-a-row game
    #[inline]
    pub fn is_classic(&self) -> bool {
        self.size == 3 && self.win_length == 3
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    /// Bounds-checked conversion from signed coordinates
    #[inline]
    pub fn pos_at(&self, row: i32, col: i32) -> Option<Pos> {
        if self.in_bounds(row, col) {
            Some(Pos::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Cell at signed coordinates, `None` when off the board.
    /// Used when walking lines outward from a cell.
    #[inline]
    pub fn cell_at(&self, row: i32, col: i32) -> Option<Cell> {
        if self.in_bounds(row, col) {
            Some(self.cells[row as usize * self.size + col as usize])
        } else {
            None
        }
    }

    fn check(&self, pos: Pos) -> Result<usize> {
        let (row, col) = (pos.row as usize, pos.col as usize);
        if row < self.size && col < self.size {
            Ok(pos.to_index(self.size))
        } else {
            Err(EngineError::OutOfBounds {
                row,
                col,
                size: self.size,
            })
        }
    }

    /// Get the cell at `pos`
    pub fn get(&self, pos: Pos) -> Result<Cell> {
        Ok(self.cells[self.check(pos)?])
    }

    /// Overwrite the cell at `pos`
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<()> {
        let idx = self.check(pos)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Check if position is empty
    pub fn is_empty(&self, pos: Pos) -> Result<bool> {
        Ok(self.get(pos)? == Cell::Empty)
    }

    /// Unchecked read for positions produced by this board
    #[inline]
    pub(crate) fn cell(&self, pos: Pos) -> Cell {
        self.cells[pos.to_index(self.size)]
    }

    #[inline]
    pub(crate) fn write(&mut self, pos: Pos, cell: Cell) {
        let idx = pos.to_index(self.size);
        self.cells[idx] = cell;
    }

    /// Place `player`'s mark on an empty cell for the lifetime of the
    /// returned guard. The cell is reset to `Empty` when the guard drops.
    pub fn try_place(&mut self, pos: Pos, player: Player) -> Result<Placement<'_>> {
        if !self.is_empty(pos)? {
            return Err(EngineError::Occupied {
                row: pos.row as usize,
                col: pos.col as usize,
            });
        }
        Ok(Placement::new(self, pos, player))
    }

    /// Scoped placement for positions already known to be empty
    #[inline]
    pub(crate) fn place(&mut self, pos: Pos, player: Player) -> Placement<'_> {
        debug_assert_eq!(self.cell(pos), Cell::Empty, "placing on occupied {pos}");
        Placement::new(self, pos, player)
    }

    /// Center cell (upper-left of the middle four on even sides)
    #[inline]
    pub fn center(&self) -> Pos {
        let mid = ((self.size - 1) / 2) as u8;
        Pos::new(mid, mid)
    }

    /// Total marks on board
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Check if board has no marks at all
    pub fn is_board_empty(&self) -> bool {
        self.cells.iter().all(|c| *c == Cell::Empty)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Empty positions in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Empty)
            .map(move |(i, _)| Pos::from_index(i, size))
    }

    /// Occupied positions with their owner, row-major
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Pos, Player)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.player().map(|p| (Pos::from_index(i, size), p)))
    }

    /// In-bounds positions within Chebyshev `radius` of `pos`, excluding `pos`
    pub fn neighbors(&self, pos: Pos, radius: usize) -> impl Iterator<Item = Pos> + '_ {
        // Anything wider than the board reaches every cell
        let r = i32::try_from(radius).unwrap_or(i32::MAX).min(self.size as i32);
        let (row, col) = (i32::from(pos.row), i32::from(pos.col));
        (-r..=r)
            .flat_map(move |dr| (-r..=r).map(move |dc| (dr, dc)))
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .filter_map(move |(dr, dc)| self.pos_at(row + dr, col + dc))
    }

    /// Copy of the board with X and O swapped
    pub fn mirrored(&self) -> Board {
        Board {
            size: self.size,
            win_length: self.win_length,
            cells: self.cells.iter().map(|c| c.mirrored()).collect(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::tic_tac_toe()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
