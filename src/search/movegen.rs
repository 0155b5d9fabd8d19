//! Candidate move generation with proximity filtering
//!
//! On large boards meaningful moves cluster around existing marks, so only
//! empty cells within a small Chebyshev radius of a mark are considered.

use crate::board::{Board, Cell, Pos};

/// Radius used unless configured otherwise
pub const DEFAULT_RADIUS: usize = 2;

/// Empty cells within `radius` of at least one occupied cell.
///
/// Each cell appears once, in discovery order (marks row-major, then the
/// window around each mark row-major). An empty board yields nothing; use
/// [`candidates`] when the first move of the game must be covered.
#[must_use]
pub fn near_occupied(board: &Board, radius: usize) -> Vec<Pos> {
    let size = board.size();
    let mut seen = vec![false; size * size];
    let mut moves = Vec::with_capacity(64);

    for (stone, _) in board.occupied_cells() {
        for pos in board.neighbors(stone, radius) {
            let idx = pos.to_index(size);
            if seen[idx] {
                continue;
            }
            seen[idx] = true;

            if board.cell(pos) == Cell::Empty {
                moves.push(pos);
            }
        }
    }

    moves
}

/// Candidate moves for the search: [`near_occupied`], seeded with the
/// center cell when the board is empty.
///
/// Empty only when the board is full: on a non-empty board every empty
/// region borders some mark.
#[must_use]
pub fn candidates(board: &Board, radius: usize) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![board.center()];
    }
    near_occupied(board, radius)
}
