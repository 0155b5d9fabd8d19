//! Exact rule-based play for the classic 3x3 board
//!
//! On 3x3 with three in a row the game is small enough that a fixed rule
//! ladder plays perfectly and instantly:
//!
//! 1. Win: complete our own line
//! 2. Block: take the cell that would complete the opponent's line
//! 3. Fork: make two winning threats at once
//! 4. Block a fork: force the opponent with a threat whose forced reply
//!    does not hand them a fork, or else take their fork cell
//! 5. Center
//! 6. The corner opposite an opponent corner
//! 7. Any corner
//! 8. Any edge

use crate::board::{Board, Cell, Player, Pos};
use crate::rules::winning_moves;

const CENTER: Pos = Pos { row: 1, col: 1 };

const CORNERS: [Pos; 4] = [
    Pos { row: 0, col: 0 },
    Pos { row: 0, col: 2 },
    Pos { row: 2, col: 0 },
    Pos { row: 2, col: 2 },
];

const EDGES: [Pos; 4] = [
    Pos { row: 0, col: 1 },
    Pos { row: 1, col: 0 },
    Pos { row: 1, col: 2 },
    Pos { row: 2, col: 1 },
];

#[inline]
fn opposite(pos: Pos) -> Pos {
    Pos::new(2 - pos.row, 2 - pos.col)
}

/// Empty cells where `player` would create two winning threats at once
fn forks(board: &mut Board, player: Player) -> Vec<Pos> {
    let empties: Vec<Pos> = board.empty_cells().collect();
    empties
        .into_iter()
        .filter(|&pos| {
            let mut placed = board.place(pos, player);
            winning_moves(&mut placed, player).len() >= 2
        })
        .collect()
}

/// Empty cells in positional preference: center, corners opposite the
/// opponent, remaining corners, edges.
fn positional_order(board: &Board, me: Player) -> Vec<Pos> {
    let theirs = me.opponent().cell();
    let mut order = vec![CENTER];
    order.extend(
        CORNERS
            .iter()
            .filter(|&&corner| board.cell(corner) == theirs)
            .map(|&corner| opposite(corner)),
    );
    order.extend(CORNERS);
    order.extend(EDGES);

    let mut seen = [false; 9];
    order
        .into_iter()
        .filter(|&pos| {
            let idx = pos.to_index(3);
            let fresh = !seen[idx];
            seen[idx] = true;
            fresh && board.cell(pos) == Cell::Empty
        })
        .collect()
}

/// A move that defuses the opponent's fork chances, if one exists.
fn block_fork(board: &mut Board, me: Player) -> Option<Pos> {
    let opp = me.opponent();
    let mut quiet = None;

    for pos in positional_order(board, me) {
        let mut placed = board.place(pos, me);
        let threats = winning_moves(&mut placed, me);

        match threats.as_slice() {
            [] => {
                if quiet.is_none() && forks(&mut placed, opp).is_empty() {
                    quiet = Some(pos);
                }
            }
            [reply] => {
                // The opponent must answer on `reply`
                let mut answered = placed.place(*reply, opp);
                if winning_moves(&mut answered, opp).len() < 2 {
                    return Some(pos);
                }
            }
            _ => return Some(pos),
        }
    }

    quiet
}

/// Best move for `me` on a classic 3x3 board.
///
/// Returns `None` on any other board shape, or when the board is full.
/// The board is left unchanged.
pub fn classic_move(board: &mut Board, me: Player) -> Option<Pos> {
    if !board.is_classic() || board.is_full() {
        return None;
    }
    let opp = me.opponent();

    if let Some(&pos) = winning_moves(board, me).first() {
        log::trace!("classic: win at {}", pos);
        return Some(pos);
    }
    if let Some(&pos) = winning_moves(board, opp).first() {
        log::trace!("classic: block at {}", pos);
        return Some(pos);
    }
    if let Some(&pos) = forks(board, me).first() {
        log::trace!("classic: fork at {}", pos);
        return Some(pos);
    }

    let opponent_forks = forks(board, opp);
    if let Some(&their_fork) = opponent_forks.first() {
        let pos = block_fork(board, me).unwrap_or(their_fork);
        log::trace!("classic: block fork with {}", pos);
        return Some(pos);
    }

    positional_order(board, me).first().copied()
}
