use super::*;
use crate::fixtures::{blanks, fixed, seed, SOLUTION};

#[test]
fn fixed_cells_never_change_in_either_mode() {
    let mut board = Board::new(seed());
    for (row, col) in fixed() {
        for note_mode in [false, true] {
            assert!(!board.set_cell(row, col, 1, note_mode));
            assert!(!board.set_cell(row, col, 0, note_mode));
            assert!(!board.delete_cell(row, col, note_mode));
        }
        assert_eq!(board.cells()[row][col], SOLUTION[row][col]);
        assert!(board.notes().get(row, col).is_empty());
    }
}

#[test]
fn setting_same_value_twice_is_idempotent() {
    let mut board = Board::new(seed());
    let (row, col) = blanks()[0];

    assert!(board.set_cell(row, col, 4, false));
    let after_first = board.clone();
    assert!(!board.set_cell(row, col, 4, false));
    assert_eq!(board, after_first);
}

#[test]
fn committing_a_value_clears_candidates() {
    let mut board = Board::new(seed());
    let (row, col) = blanks()[1];

    board.set_cell(row, col, 2, true);
    board.set_cell(row, col, 7, true);
    assert_eq!(board.notes().get(row, col), &[2, 7]);

    assert!(board.set_cell(row, col, 5, false));
    assert!(board.notes().get(row, col).is_empty());
    assert_eq!(board.value(row, col), Some(5));
}

#[test]
fn note_toggle_twice_restores_membership() {
    let mut board = Board::new(seed());
    let (row, col) = blanks()[2];

    board.set_cell(row, col, 3, true);
    assert!(board.notes().get(row, col).contains(&3));
    board.set_cell(row, col, 3, true);
    assert!(!board.notes().get(row, col).contains(&3));
    board.set_cell(row, col, 3, true);
    assert!(board.notes().get(row, col).contains(&3));
}

#[test]
fn zero_digit_is_a_no_op_in_note_mode() {
    let mut board = Board::new(seed());
    let (row, col) = blanks()[0];
    board.set_cell(row, col, 6, true);

    assert!(!board.set_cell(row, col, 0, true));
    assert_eq!(board.notes().get(row, col), &[6]);
}

#[test]
fn note_mode_delete_removes_most_recent_candidate() {
    let mut board = Board::new(seed());
    let (row, col) = blanks()[3];
    for digit in [9, 1, 4] {
        board.set_cell(row, col, digit, true);
    }

    assert!(board.delete_cell(row, col, true));
    assert_eq!(board.notes().get(row, col), &[9, 1]);
    assert!(board.delete_cell(row, col, true));
    assert!(board.delete_cell(row, col, true));
    assert!(!board.delete_cell(row, col, true));
}

#[test]
fn normal_delete_clears_value_and_reports_change_once() {
    let mut board = Board::new(seed());
    let (row, col) = blanks()[4];
    board.set_cell(row, col, 8, false);

    assert!(board.delete_cell(row, col, false));
    assert_eq!(board.value(row, col), Some(0));
    assert!(!board.delete_cell(row, col, false));
}

#[test]
fn out_of_range_input_is_ignored() {
    let mut board = Board::new(seed());
    let (row, col) = blanks()[0];

    assert!(!board.set_cell(9, 0, 1, false));
    assert!(!board.set_cell(0, 9, 1, false));
    assert!(!board.set_cell(row, col, 10, false));
    assert!(!board.delete_cell(12, 12, false));
    assert_eq!(board.value(9, 9), None);
}

#[test]
fn digit_usage_counts_fixed_and_user_cells_and_saturates() {
    let mut board = Board::new(seed());
    let fixed_fives = fixed()
        .into_iter()
        .filter(|(row, col)| SOLUTION[*row][*col] == 5)
        .count();
    assert_eq!(board.count_digit_usage(5), fixed_fives);

    for (row, col) in blanks() {
        board.set_cell(row, col, 5, false);
    }
    assert_eq!(board.count_digit_usage(5), 9);
    assert_eq!(board.count_digit_usage(0), 0);
    assert_eq!(board.count_digit_usage(11), 0);
}

#[test]
fn full_board_has_no_blank() {
    let mut board = Board::new(seed());
    assert_eq!(board.first_blank(), blanks().first().copied());

    for (row, col) in blanks() {
        board.set_cell(row, col, SOLUTION[row][col], false);
    }
    assert!(board.is_full());
    assert_eq!(board.cells(), &SOLUTION);
}

#[test]
fn restore_reforces_fixed_cells_and_drops_notes_on_filled_cells() {
    let (blank_row, blank_col) = blanks()[0];
    let (other_row, other_col) = blanks()[1];
    let (fixed_row, fixed_col) = fixed()[0];

    let mut saved = seed();
    saved[blank_row][blank_col] = 7;
    saved[fixed_row][fixed_col] = 0;

    let mut notes: NotesPayload = vec![vec![Vec::new(); 9]; 9];
    notes[blank_row][blank_col] = vec![1, 2];
    notes[other_row][other_col] = vec![3, 3, 0, 12, 4];

    let board = Board::restore(seed(), Some(saved), Some(&notes));

    assert_eq!(board.value(blank_row, blank_col), Some(7));
    assert_eq!(
        board.value(fixed_row, fixed_col),
        Some(SOLUTION[fixed_row][fixed_col])
    );
    assert!(board.notes().get(blank_row, blank_col).is_empty());
    assert_eq!(board.notes().get(other_row, other_col), &[3, 4]);
}

#[test]
fn notes_payload_is_full_nine_by_nine() {
    let mut board = Board::new(seed());
    let (row, col) = blanks()[0];
    board.set_cell(row, col, 2, true);

    let payload = board.notes().to_payload();
    assert_eq!(payload.len(), 9);
    assert!(payload.iter().all(|r| r.len() == 9));
    assert_eq!(payload[row][col], vec![2]);
    assert_eq!(NotesGrid::from_payload(&payload), *board.notes());
}
