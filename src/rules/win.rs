//! Win condition checking for connect-K
//!
//! A side wins with `win_length` or more of its marks in an unbroken line
//! along any of the four directions. Overlines count.

use crate::board::{Board, Cell, Player, Pos, DIRECTIONS};

/// Outcome of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Draw,
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Length of the run of `cell` through `pos` along `(dr, dc)`, counting
/// `pos` itself whatever it holds.
#[inline]
fn run_through(board: &Board, pos: Pos, dr: i32, dc: i32, cell: Cell) -> usize {
    let mut count = 1;
    for sign in [1, -1] {
        let mut r = i32::from(pos.row) + dr * sign;
        let mut c = i32::from(pos.col) + dc * sign;
        while board.cell_at(r, c) == Some(cell) {
            count += 1;
            r += dr * sign;
            c += dc * sign;
        }
    }
    count
}

/// Fast K-in-a-row check through a single cell.
///
/// Only looks along the 4 directions from `pos`. No allocation.
#[inline]
pub fn has_line_at(board: &Board, pos: Pos, player: Player) -> bool {
    let cell = player.cell();
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| run_through(board, pos, dr, dc, cell) >= board.win_length())
}

/// Find a winning line, if any.
///
/// Returns the owner and the positions of the full run (at least
/// `win_length` cells, ordered along the line).
pub fn winning_line(board: &Board) -> Option<(Player, Vec<Pos>)> {
    for (pos, player) in board.occupied_cells() {
        let cell = player.cell();
        for &(dr, dc) in &DIRECTIONS {
            // Only start from the first cell of a run
            let prev = board.cell_at(i32::from(pos.row) - dr, i32::from(pos.col) - dc);
            if prev == Some(cell) {
                continue;
            }

            let mut line = vec![pos];
            let mut r = i32::from(pos.row) + dr;
            let mut c = i32::from(pos.col) + dc;
            while board.cell_at(r, c) == Some(cell) {
                if let Some(next) = board.pos_at(r, c) {
                    line.push(next);
                }
                r += dr;
                c += dc;
            }

            if line.len() >= board.win_length() {
                return Some((player, line));
            }
        }
    }
    None
}

/// Check for a winner
pub fn winner(board: &Board) -> Option<Player> {
    winning_line(board).map(|(player, _)| player)
}

/// Won, drawn (full board, no line) or still in progress
pub fn game_status(board: &Board) -> GameStatus {
    match winner(board) {
        Some(player) => GameStatus::Won(player),
        None if board.is_full() => GameStatus::Draw,
        None => GameStatus::InProgress,
    }
}

/// Empty cells where `player` would complete a line immediately
pub fn winning_moves(board: &mut Board, player: Player) -> Vec<Pos> {
    let empties: Vec<Pos> = board.empty_cells().collect();
    empties
        .into_iter()
        .filter(|&pos| {
            let placed = board.place(pos, player);
            has_line_at(&placed, pos, player)
        })
        .collect()
}
