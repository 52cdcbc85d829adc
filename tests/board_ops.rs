use pretty_assertions::assert_eq;
use uciboard::board::{BoardState, EVAL_SLOT, SIZE};
use uciboard::{BoardError, Player};

#[test]
fn add_piece_touches_only_its_cell() {
    for row in 0..SIZE {
        for col in 0..SIZE {
            let mut b = BoardState::startpos();
            let before = b.snapshot();
            b.add_piece(row, col, -5).unwrap();
            let after = b.snapshot();
            for r in 0..SIZE {
                for c in 0..SIZE {
                    let expected = if (r, c) == (row, col) { -5 } else { before[r][c] };
                    assert_eq!(after[r][c], expected, "cell ({r},{c}) after add at ({row},{col})");
                }
            }
        }
    }
}

#[test]
fn out_of_range_coordinates_leave_grid_untouched() {
    let mut b = BoardState::startpos();
    let before = b.snapshot();
    let bad = [(8, 0), (0, 8), (8, 8), (100, 3), (usize::MAX, 0)];
    for &(r, c) in &bad {
        assert_eq!(b.add_piece(r, c, 1), Err(BoardError::InvalidCoordinates { row: r, col: c }));
        assert_eq!(b.remove_piece(r, c), Err(BoardError::InvalidCoordinates { row: r, col: c }));
        assert!(matches!(b.move_piece(r, c, 4, 4), Err(BoardError::InvalidCoordinates { .. })));
        assert!(matches!(b.move_piece(6, 4, r, c), Err(BoardError::InvalidCoordinates { .. })));
    }
    assert_eq!(b.snapshot(), before);
}

#[test]
fn moving_from_empty_square_is_rejected() {
    let mut b = BoardState::startpos();
    let before = b.snapshot();
    assert_eq!(b.move_piece(4, 4, 3, 4), Err(BoardError::EmptySquare { row: 4, col: 4 }));
    assert_eq!(b.snapshot(), before);
}

#[test]
fn add_piece_rejects_codes_outside_range() {
    let mut b = BoardState::empty();
    assert_eq!(b.add_piece(3, 3, 7), Err(BoardError::InvalidPiece(7)));
    assert_eq!(b.add_piece(3, 3, -7), Err(BoardError::InvalidPiece(-7)));
    assert_eq!(b.snapshot(), BoardState::empty().snapshot());
}

#[test]
fn plain_move_overwrites_destination() {
    let mut b = BoardState::startpos();
    // knight takes the a7 pawn, no questions asked
    b.move_piece(7, 1, 1, 0).unwrap();
    assert_eq!(b.piece_at(7, 1), Ok(0));
    assert_eq!(b.piece_at(1, 0), Ok(3));
}

#[test]
fn remove_returns_previous_code() {
    let mut b = BoardState::startpos();
    assert_eq!(b.remove_piece(0, 4), Ok(-6));
    assert_eq!(b.remove_piece(0, 4), Ok(0));
}

#[test]
fn snapshot_is_a_copy() {
    let b = BoardState::startpos();
    let mut grid = b.snapshot();
    grid[0][0] = 0;
    grid[7][4] = -1;
    assert_eq!(b.snapshot()[0][0], -2);
    assert_eq!(b.snapshot()[7][4], 6);
}

#[test]
fn flat_snapshot_is_row_major_with_empty_eval_slot() {
    let b = BoardState::startpos();
    let flat = b.snapshot_flat();
    let grid = b.snapshot();
    assert_eq!(flat.len(), 65);
    for i in 0..64 {
        assert_eq!(flat[i], grid[i / 8][i % 8] as i32);
    }
    assert_eq!(flat[EVAL_SLOT], 0);
}

#[test]
fn turn_toggles() {
    let mut b = BoardState::startpos();
    assert_eq!(b.current_turn(), Player::White);
    b.advance_turn();
    assert_eq!(b.current_turn(), Player::Black);
    b.advance_turn();
    assert_eq!(b.current_turn(), Player::White);
}

#[test]
fn turn_is_not_inferred_from_moves() {
    let mut b = BoardState::startpos();
    b.move_piece(6, 4, 4, 4).unwrap();
    assert_eq!(b.current_turn(), Player::White);
}

#[test]
fn render_startpos() {
    let expected = "rnbqkbnr\npppppppp\n********\n********\n********\n********\nPPPPPPPP\nRNBQKBNR\n";
    assert_eq!(BoardState::startpos().render(), expected);
    assert_eq!(BoardState::startpos().to_string(), expected);
}
