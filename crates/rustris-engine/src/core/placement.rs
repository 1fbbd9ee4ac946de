//! Collision checks and piece placement against a [`Board`].
//!
//! All functions are pure: they never mutate the board, and a rejected move
//! returns `None` so the caller keeps its previous piece untouched.

use crate::SpawnBlockedError;

use super::{
    board::Board,
    piece::{Piece, PieceKind, RotationDirection},
};

/// Result of one gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SoftTick {
    /// The piece moved down by one row.
    Moved(Piece),
    /// The piece cannot move down and must be locked into the board.
    Lock,
}

/// Returns `true` iff every cell of `piece` is inside the board and empty.
#[must_use]
pub fn can_place(board: &Board, piece: &Piece) -> bool {
    piece
        .cells()
        .iter()
        .all(|p| board.is_occupied(p.col, p.row) == Ok(false))
}

/// Creates `kind` at the top-center of the board in spawn rotation.
///
/// Fails if the spawn cells are already occupied, which ends the game.
pub fn spawn(board: &Board, kind: PieceKind) -> Result<Piece, SpawnBlockedError> {
    let piece = Piece::new(kind, kind.spawn_anchor(board.columns()));
    if can_place(board, &piece) {
        Ok(piece)
    } else {
        Err(SpawnBlockedError { piece })
    }
}

/// Translates the piece by `(dx, dy)` if the result is a legal placement.
#[must_use]
pub fn try_move(board: &Board, piece: &Piece, dx: i32, dy: i32) -> Option<Piece> {
    let moved = piece.shifted(dx, dy);
    can_place(board, &moved).then_some(moved)
}

/// Rotates the piece, trying each wall kick in order.
///
/// The first kicked placement that fits wins. Returns `None` if none fits.
#[must_use]
pub fn rotate(board: &Board, piece: &Piece, direction: RotationDirection) -> Option<Piece> {
    let rotated = piece.rotated(direction);
    piece
        .kicks(direction)
        .iter()
        .map(|&(dx, dy)| rotated.shifted(i32::from(dx), i32::from(dy)))
        .find(|candidate| can_place(board, candidate))
}

/// Moves the piece down until the next step would be rejected.
///
/// Always terminates because the board is bounded below.
#[must_use]
pub fn hard_drop(board: &Board, piece: &Piece) -> Piece {
    let mut dropped = *piece;
    while let Some(next) = try_move(board, &dropped, 0, 1) {
        dropped = next;
    }
    dropped
}

/// Number of rows `piece` would fall on a hard drop.
#[must_use]
pub fn drop_distance(board: &Board, piece: &Piece) -> i32 {
    hard_drop(board, piece).anchor().row - piece.anchor().row
}

/// Attempts to move the piece down by one row.
///
/// A rejected move signals lock-in instead of changing the piece.
#[must_use]
pub fn soft_tick(board: &Board, piece: &Piece) -> SoftTick {
    try_move(board, piece, 0, 1).map_or(SoftTick::Lock, SoftTick::Moved)
}

#[cfg(test)]
mod tests {
    use crate::{Cell, ColorId, Position, Rotation};

    use super::*;

    fn occupied() -> Cell {
        Cell::Occupied(ColorId::new(9).unwrap())
    }

    fn fill_row_except(board: &mut Board, row: i32, holes: &[i32]) {
        for col in 0..i32::try_from(board.columns()).unwrap() {
            if !holes.contains(&col) {
                board.set_cell(col, row, occupied()).unwrap();
            }
        }
    }

    #[test]
    fn test_can_place_rejects_out_of_bounds_and_overlap() {
        let mut board = Board::new(10, 20);
        let piece = Piece::new(PieceKind::O, Position::new(4, 0));
        assert!(can_place(&board, &piece));

        assert!(!can_place(&board, &piece.shifted(-5, 0)));
        assert!(!can_place(&board, &piece.shifted(5, 0)));
        assert!(!can_place(&board, &piece.shifted(0, -1)));
        assert!(!can_place(&board, &piece.shifted(0, 19)));

        board.set_cell(5, 1, occupied()).unwrap();
        assert!(!can_place(&board, &piece));
        assert!(can_place(&board, &piece.shifted(-2, 0)));
    }

    #[test]
    fn test_can_place_matches_cell_checks_everywhere() {
        let mut board = Board::new(6, 8);
        board.set_cell(2, 5, occupied()).unwrap();
        board.set_cell(4, 7, occupied()).unwrap();

        for kind in PieceKind::ALL {
            for state in 0..4 {
                for col in -4..8 {
                    for row in -4..10 {
                        let piece = Piece::new(kind, Position::new(col, row))
                            .with_rotation(Rotation::new(state).unwrap());
                        let expected = piece.cells().iter().all(|p| {
                            board.is_inside(p.col, p.row)
                                && board.cell(p.col, p.row) == Ok(Cell::Empty)
                        });
                        assert_eq!(can_place(&board, &piece), expected, "{piece}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_spawn_on_empty_board() {
        let board = Board::new(10, 20);
        let piece = spawn(&board, PieceKind::I).unwrap();
        let mut cols: Vec<_> = piece.cells().iter().map(|p| p.col).collect();
        cols.sort_unstable();
        assert_eq!(cols, vec![3, 4, 5, 6]);
        assert!(piece.cells().iter().all(|p| p.row == 0));
    }

    #[test]
    fn test_spawn_blocked() {
        let mut board = Board::new(10, 20);
        board.set_cell(4, 0, occupied()).unwrap();
        let err = spawn(&board, PieceKind::T).unwrap_err();
        assert_eq!(err.piece.kind(), PieceKind::T);
    }

    #[test]
    fn test_try_move_rejection_keeps_piece() {
        let board = Board::new(10, 20);
        let piece = spawn(&board, PieceKind::O).unwrap();
        assert_eq!(try_move(&board, &piece, 0, -1), None);

        let moved = try_move(&board, &piece, -1, 0).unwrap();
        assert_eq!(moved.anchor(), Position::new(3, 0));
        assert_eq!(piece.anchor(), Position::new(4, 0));
    }

    #[test]
    fn test_hard_drop_i_piece_rests_on_floor() {
        let board = Board::new(10, 20);
        let piece = spawn(&board, PieceKind::I).unwrap();
        let dropped = hard_drop(&board, &piece);

        let mut cells: Vec<_> = dropped.cells().iter().map(|p| (p.col, p.row)).collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![(3, 19), (4, 19), (5, 19), (6, 19)]);
        assert_eq!(drop_distance(&board, &piece), 19);
    }

    #[test]
    fn test_hard_drop_twice_is_rejected_immediately() {
        let mut board = Board::new(10, 20);
        fill_row_except(&mut board, 12, &[]);
        for kind in PieceKind::ALL {
            let piece = spawn(&board, kind).unwrap();
            let dropped = hard_drop(&board, &piece);
            assert_eq!(try_move(&board, &dropped, 0, 1), None);
            assert_eq!(hard_drop(&board, &dropped), dropped);
            assert_eq!(soft_tick(&board, &dropped), SoftTick::Lock);
        }
    }

    #[test]
    fn test_soft_tick_moves_then_locks() {
        let board = Board::new(4, 4);
        let piece = Piece::new(PieceKind::O, Position::new(1, 1));
        let SoftTick::Moved(moved) = soft_tick(&board, &piece) else {
            panic!("piece should fall");
        };
        assert_eq!(moved.anchor(), Position::new(1, 2));
        assert!(soft_tick(&board, &moved).is_lock());
    }

    #[test]
    fn test_four_rotations_return_to_start() {
        let board = Board::new(10, 20);
        for kind in PieceKind::ALL {
            let start = Piece::new(kind, Position::new(3, 8));
            for direction in [
                RotationDirection::Clockwise,
                RotationDirection::CounterClockwise,
            ] {
                let mut piece = start;
                for _ in 0..4 {
                    piece = rotate(&board, &piece, direction).unwrap();
                }
                assert_eq!(piece, start, "{kind} {direction:?}");
            }
        }
    }

    #[test]
    fn test_rotate_against_wall_uses_kick() {
        let board = Board::new(10, 20);
        // Vertical I hugging the left wall: rotating in place would leave the board.
        let piece = Piece::new(PieceKind::I, Position::new(-2, 5))
            .with_rotation(Rotation::new(1).unwrap());
        assert!(can_place(&board, &piece));
        assert!(!can_place(
            &board,
            &piece.rotated(RotationDirection::Clockwise)
        ));

        let rotated = rotate(&board, &piece, RotationDirection::Clockwise).unwrap();
        assert_eq!(rotated.rotation().index(), 2);
        assert!(can_place(&board, &rotated));
        assert!(rotated.cells().iter().all(|p| p.col >= 0));
    }

    #[test]
    fn test_rotate_rejected_when_no_kick_fits() {
        let mut board = Board::new(10, 20);
        // Enclose a horizontal I in a one-row tunnel on row 10.
        for row in 0..10 {
            fill_row_except(&mut board, row, &[]);
        }
        fill_row_except(&mut board, 11, &[]);
        let piece = Piece::new(PieceKind::I, Position::new(3, 9));
        assert!(can_place(&board, &piece));
        assert_eq!(rotate(&board, &piece, RotationDirection::Clockwise), None);
        assert_eq!(
            rotate(&board, &piece, RotationDirection::CounterClockwise),
            None
        );
    }

    #[test]
    fn test_o_piece_rotation_never_moves() {
        let board = Board::new(10, 20);
        let piece = spawn(&board, PieceKind::O).unwrap();
        let rotated = rotate(&board, &piece, RotationDirection::Clockwise).unwrap();
        assert_eq!(rotated.anchor(), piece.anchor());
        assert_eq!(rotated.cells(), piece.cells());
    }
}
