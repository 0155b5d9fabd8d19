//! Heuristic evaluation function for connect-K positions
//!
//! Scores a position by finding every maximal run of same-mark cells along
//! the four directions and summing the signed pattern score of each run.

use crate::board::{Board, Cell, Player, Pos, DIRECTIONS};

use super::patterns::{PatternTable, WIN_SCORE, WIN_THRESHOLD};

/// A maximal run of one side's marks along one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub owner: Player,
    /// First cell of the run (the end facing `-direction`)
    pub start: Pos,
    pub direction: (i32, i32),
    pub length: usize,
    /// 0, 1 or 2: ends whose next cell is on the board and empty
    pub open_ends: u8,
}

/// Measure the run starting at `pos` along `(dr, dc)`.
///
/// Returns `None` when `pos` is empty or is not the start of its run (the
/// previous cell holds the same mark), so each run is reported once.
#[inline]
fn run_from(board: &Board, pos: Pos, dr: i32, dc: i32) -> Option<Run> {
    let cell = board.cell(pos);
    let owner = cell.player()?;

    let prev_r = i32::from(pos.row) - dr;
    let prev_c = i32::from(pos.col) - dc;
    let before = board.cell_at(prev_r, prev_c);
    if before == Some(cell) {
        return None; // Not the start of this run
    }

    let mut open_ends = u8::from(before == Some(Cell::Empty));

    let mut length = 1;
    let mut r = i32::from(pos.row) + dr;
    let mut c = i32::from(pos.col) + dc;
    loop {
        match board.cell_at(r, c) {
            Some(next) if next == cell => {
                length += 1;
                r += dr;
                c += dc;
            }
            Some(Cell::Empty) => {
                open_ends += 1;
                break;
            }
            _ => break, // Opponent mark or board edge
        }
    }

    Some(Run {
        owner,
        start: pos,
        direction: (dr, dc),
        length,
        open_ends,
    })
}

/// Visit every maximal run on the board exactly once.
pub fn for_each_run(board: &Board, mut visit: impl FnMut(Run)) {
    for (pos, _) in board.occupied_cells() {
        for &(dr, dc) in &DIRECTIONS {
            if let Some(run) = run_from(board, pos, dr, dc) {
                visit(run);
            }
        }
    }
}

/// All maximal runs, row-major by start cell
#[must_use]
pub fn runs(board: &Board) -> Vec<Run> {
    let mut out = Vec::new();
    for_each_run(board, |run| out.push(run));
    out
}

/// Evaluate the board from the perspective of `me`.
///
/// Returns a score where:
/// - Positive values favour `me`, negative values favour the opponent
/// - A completed line contributes `WIN_SCORE`, so any decided position is
///   at or beyond `WIN_THRESHOLD` in magnitude
/// - Non-winning runs together stay strictly inside `WIN_THRESHOLD`,
///   whatever the table
/// - An empty board, or one with no run of two or more that can still
///   grow, scores 0
///
/// The opponent's non-winning runs are scaled by
/// `table.opponent_weight_percent`; the same function feeds both move
/// ordering and leaf evaluation so the two never disagree on style.
#[must_use]
pub fn evaluate(board: &Board, me: Player, table: &PatternTable) -> i32 {
    let win_length = board.win_length();
    let mut decided: i64 = 0;
    let mut positional: i64 = 0;

    for_each_run(board, |run| {
        let magnitude = table.score(run.length, run.open_ends, win_length);
        if magnitude == 0 {
            return;
        }
        let signed = if run.owner == me {
            i64::from(magnitude)
        } else {
            -i64::from(table.weigh_opponent(magnitude))
        };
        if magnitude >= WIN_SCORE {
            decided += signed;
        } else {
            positional += signed;
        }
    });

    // Patterns alone never reach a decided score, and never cancel a real win
    let open_bound = i64::from(WIN_THRESHOLD) - 1;
    let positional = positional.clamp(-open_bound, open_bound);

    // Several completed lines can only appear on hand-built boards
    let bound = i64::from(WIN_SCORE) * 2;
    (decided + positional).clamp(-bound, bound) as i32
}
