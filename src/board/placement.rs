//! Scoped mark placement with undo on drop

use std::ops::{Deref, DerefMut};

use super::{Board, Cell, Player, Pos};

/// A mark placed on a board for as long as this guard lives.
///
/// Dropping the guard resets the cell to `Empty`, so a speculative
/// placement is undone on every exit path of the code holding it:
/// normal return, `?`, early `break` on a cutoff, or a deadline bail-out.
/// The guard derefs to the board, so recursion can keep working on it.
pub struct Placement<'a> {
    board: &'a mut Board,
    pos: Pos,
}

impl<'a> Placement<'a> {
    pub(crate) fn new(board: &'a mut Board, pos: Pos, player: Player) -> Self {
        board.write(pos, player.cell());
        Self { board, pos }
    }
}

impl Deref for Placement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Placement<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.board.write(self.pos, Cell::Empty);
    }
}
