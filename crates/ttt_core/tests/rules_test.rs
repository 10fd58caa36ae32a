//! Tests for board rules against the wire-format boards.

use ttt_core::{Board, Cell, Mark, MoveHistory, Outcome, Side, evaluate, has_winner, is_draw};

fn parse(json: &str) -> Board {
    serde_json::from_str(json).expect("valid board json")
}

#[test]
fn test_draw_board() {
    let board = parse(r#"["X","O","X","X","O","O","O","X","X"]"#);
    assert_eq!(has_winner(&board, Mark::X), None);
    assert_eq!(has_winner(&board, Mark::O), None);
    assert!(is_draw(&board));
    assert_eq!(evaluate(&board, Mark::X), Some(Outcome::Draw));
}

#[test]
fn test_win_board() {
    let board = parse(r#"["X","X","X"," ","O"," "," ","O"," "]"#);
    assert_eq!(has_winner(&board, Mark::X), Some([0, 1, 2]));
    assert_eq!(has_winner(&board, Mark::O), None);
    assert!(!is_draw(&board));
}

#[test]
fn test_rejected_moves_never_mutate() {
    let mut board = parse(r#"["X","O"," "," "," "," "," "," "," "]"#);
    let before = board;
    for index in [0, 1, 9, 42] {
        assert!(board.place_mark(index, Mark::X).is_err());
    }
    assert_eq!(board, before);
}

#[test]
fn test_alternating_game_keeps_counts_balanced() {
    let mut board = Board::new();
    let mut history = MoveHistory::new();
    let mut mark = Mark::X;
    for index in [4, 0, 8, 2, 1, 7, 6, 3, 5] {
        board.place_mark(index, mark).unwrap();
        let side = if mark == Mark::X { Side::Player } else { Side::Ai };
        history.record(mark, side, index);
        let diff = board.count(Mark::X) as isize - board.count(Mark::O) as isize;
        assert!(diff.abs() <= 1);
        mark = mark.opponent();
    }
    assert_eq!(history.len(), 9);
    assert!(board.is_full());
    assert!(board.cells().iter().all(|c| *c != Cell::Empty));
}
