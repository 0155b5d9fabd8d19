//! Behavioural properties of the engine seen through its public API.

use std::thread;
use std::time::{Duration, Instant};

use connectk::{
    game_status, Board, Difficulty, Engine, EngineConfig, EngineError, GameStatus, Player, Pos, SearchType,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use test_case::test_case;

/// Seeded engine with budgets generous enough that depth, not time, decides
fn engine(seed: u64) -> Engine {
    let mut config = EngineConfig::seeded(seed);
    config.normal.time_budget_ms = 20_000;
    config.hard.time_budget_ms = 20_000;
    Engine::with_config(config).unwrap()
}

/// Engine that always searches, even on 3x3
fn searching_engine(seed: u64, hard_depth: u8) -> Engine {
    let mut config = EngineConfig::seeded(seed);
    config.classic_fast_path = false;
    config.hard.depth = hard_depth;
    config.hard.time_budget_ms = 60_000;
    config.normal.time_budget_ms = 20_000;
    Engine::with_config(config).unwrap()
}

fn gomoku_with(stones: &[(u8, u8, Player)]) -> Board {
    let mut board = Board::gomoku(15).unwrap();
    for &(r, c, p) in stones {
        board.set(Pos::new(r, c), p.cell()).unwrap();
    }
    board
}

fn midgame() -> Board {
    gomoku_with(&[
        (7, 7, Player::X),
        (7, 8, Player::O),
        (8, 8, Player::X),
        (6, 6, Player::O),
        (8, 6, Player::X),
        (9, 9, Player::O),
    ])
}

/// Alternate moves until the game ends, returning the final status
fn self_play(engine: &mut Engine, board: &mut Board, difficulty: Difficulty) -> GameStatus {
    let mut to_move = Player::X;
    while !game_status(board).is_over() {
        let pos = engine
            .find_best_move(board, to_move, difficulty)
            .expect("board is not full");
        board.set(pos, to_move.cell()).unwrap();
        to_move = to_move.opponent();
    }
    game_status(board)
}

// ---------------------------------------------------------------------------
// Board restoration, progress and legality
// ---------------------------------------------------------------------------

#[test_case(Difficulty::Easy ; "easy")]
#[test_case(Difficulty::Normal ; "normal")]
#[test_case(Difficulty::Hard ; "hard")]
fn board_is_restored_after_search(difficulty: Difficulty) {
    let mut engine = engine(1);
    let mut board = midgame();
    let before = board.clone();

    let result = engine.find_best_move_with_stats(&mut board, Player::X, difficulty);
    assert!(result.best_move.is_some());
    assert_eq!(board, before);
}

#[test_case(Difficulty::Easy ; "easy")]
#[test_case(Difficulty::Normal ; "normal")]
#[test_case(Difficulty::Hard ; "hard")]
fn full_board_yields_none(difficulty: Difficulty) {
    let mut engine = engine(2);
    let mut board = Board::parse("XOX\nXOO\nOXX", 3).unwrap();
    assert_eq!(engine.find_best_move(&mut board, Player::O, difficulty), None);
}

#[test]
fn every_returned_move_is_an_empty_cell() {
    let mut engine = engine(3);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..5 {
        let mut board = Board::new(7, 4).unwrap();
        let mut to_move = Player::X;
        while !game_status(&board).is_over() {
            // Random opponent, engine on the other side
            let pos = if to_move == Player::X {
                let empties: Vec<Pos> = board.empty_cells().collect();
                *empties.choose(&mut rng).unwrap()
            } else {
                engine.find_best_move(&mut board, to_move, Difficulty::Normal).unwrap()
            };
            assert_eq!(board.is_empty(pos), Ok(true), "illegal move {pos}");
            board.set(pos, to_move.cell()).unwrap();
            to_move = to_move.opponent();
        }
    }
    assert_eq!(engine.fallback_count(), 0);
}

#[test]
fn zero_budget_still_returns_a_legal_move() {
    let mut config = EngineConfig::seeded(4);
    config.hard.time_budget_ms = 0;
    let mut engine = Engine::with_config(config).unwrap();

    let mut board = midgame();
    let start = Instant::now();
    let result = engine.find_best_move_with_stats(&mut board, Player::O, Difficulty::Hard);
    assert!(start.elapsed() < Duration::from_secs(1), "took {:?}", start.elapsed());
    let pos = result.best_move.unwrap();
    assert_eq!(board.is_empty(pos), Ok(true));
    assert_eq!(result.search_type, SearchType::AlphaBeta);
    assert_eq!(result.depth, 0);
}

#[test]
fn stop_handle_cuts_a_deep_search_short() {
    let mut config = EngineConfig::seeded(5);
    config.hard.depth = 10;
    config.hard.time_budget_ms = 600_000;
    let mut engine = Engine::with_config(config).unwrap();
    let handle = engine.stop_handle();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        handle.stop();
    });

    let mut board = midgame();
    let start = Instant::now();
    let result = engine.find_best_move_with_stats(&mut board, Player::X, Difficulty::Hard);
    stopper.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(60));
    assert!(result.depth < 10);
    assert_eq!(board.is_empty(result.best_move.unwrap()), Ok(true));
}

// ---------------------------------------------------------------------------
// 3x3 optimality
// ---------------------------------------------------------------------------

#[test]
fn empty_classic_board_opens_in_the_center() {
    let mut engine = engine(6);
    let mut board = Board::tic_tac_toe();
    assert_eq!(
        engine.find_best_move(&mut board, Player::X, Difficulty::Normal),
        Some(Pos::new(1, 1))
    );
}

#[test_case(Difficulty::Normal ; "normal")]
#[test_case(Difficulty::Hard ; "hard")]
fn classic_self_play_is_a_draw(difficulty: Difficulty) {
    for seed in 0..4 {
        let mut engine = engine(seed);
        let mut board = Board::tic_tac_toe();
        assert_eq!(self_play(&mut engine, &mut board, difficulty), GameStatus::Draw);
    }
}

#[test]
fn full_depth_search_self_play_is_a_draw() {
    let mut engine = searching_engine(7, 9);
    let mut board = Board::tic_tac_toe();
    assert_eq!(self_play(&mut engine, &mut board, Difficulty::Hard), GameStatus::Draw);
    assert_eq!(engine.fallback_count(), 0);
}

/// Engine plays `me`; every legal reply is tried for the other side.
fn engine_never_loses(engine: &mut Engine, board: &mut Board, me: Player, to_move: Player) {
    match game_status(board) {
        GameStatus::Won(winner) => {
            assert_eq!(winner, me, "engine lost as {me}:\n{board}");
            return;
        }
        GameStatus::Draw => return,
        GameStatus::InProgress => {}
    }

    if to_move == me {
        let pos = engine.find_best_move(board, me, Difficulty::Normal).unwrap();
        let mut next = board.clone();
        next.set(pos, me.cell()).unwrap();
        engine_never_loses(engine, &mut next, me, me.opponent());
    } else {
        let empties: Vec<Pos> = board.empty_cells().collect();
        for pos in empties {
            let mut next = board.clone();
            next.set(pos, to_move.cell()).unwrap();
            engine_never_loses(engine, &mut next, me, me);
        }
    }
}

#[test_case(Player::X ; "moving first")]
#[test_case(Player::O ; "moving second")]
fn classic_engine_never_loses(me: Player) {
    let mut engine = engine(8);
    engine_never_loses(&mut engine, &mut Board::tic_tac_toe(), me, Player::X);
}

// ---------------------------------------------------------------------------
// Tactics
// ---------------------------------------------------------------------------

#[test_case("XX.\nOO.\n...", Player::O, Pos::new(1, 2) ; "completes own row before blocking")]
#[test_case("XX.\nOO.\n...", Player::X, Pos::new(0, 2) ; "first player completes top row")]
#[test_case("X.O\n.X.\nO..", Player::X, Pos::new(2, 2) ; "diagonal")]
fn classic_takes_immediate_win(text: &str, me: Player, expected: Pos) {
    let mut board = Board::parse(text, 3).unwrap();
    for mut engine in [engine(9), searching_engine(9, 5)] {
        assert_eq!(engine.find_best_move(&mut board, me, Difficulty::Hard), Some(expected));
    }
}

#[test]
fn classic_blocks_two_in_a_row() {
    let mut board = Board::parse("X..\n.X.\nO..", 3).unwrap();
    for mut engine in [engine(10), searching_engine(10, 5)] {
        assert_eq!(
            engine.find_best_move(&mut board, Player::O, Difficulty::Hard),
            Some(Pos::new(2, 2))
        );
    }
}

#[test_case(Difficulty::Normal ; "normal")]
#[test_case(Difficulty::Hard ; "hard")]
fn gomoku_takes_immediate_win(difficulty: Difficulty) {
    let mut engine = engine(11);
    let mut board = gomoku_with(&[
        (3, 3, Player::X),
        (4, 4, Player::X),
        (5, 5, Player::X),
        (6, 6, Player::X),
        (2, 2, Player::O),
        (8, 3, Player::O),
        (8, 4, Player::O),
        (8, 5, Player::O),
    ]);
    // Both sides threaten; taking the win comes first
    let result = engine.find_best_move_with_stats(&mut board, Player::X, difficulty);
    assert_eq!(result.best_move, Some(Pos::new(7, 7)));
    assert!(result.score > 0);
}

#[test]
fn gomoku_blocks_closed_four() {
    let mut engine = engine(12);
    let mut board = gomoku_with(&[
        (7, 3, Player::O),
        (7, 4, Player::O),
        (7, 5, Player::O),
        (7, 6, Player::O),
        (7, 2, Player::X),
        (8, 4, Player::X),
        (6, 5, Player::X),
    ]);
    assert_eq!(
        engine.find_best_move(&mut board, Player::X, Difficulty::Normal),
        Some(Pos::new(7, 7))
    );
}

#[test_case(Difficulty::Normal ; "normal")]
#[test_case(Difficulty::Hard ; "hard")]
fn gomoku_blocks_open_three_at_an_end(difficulty: Difficulty) {
    let mut engine = engine(13);
    let mut board = gomoku_with(&[
        (7, 5, Player::O),
        (7, 6, Player::O),
        (7, 7, Player::O),
        (3, 3, Player::X),
        (11, 11, Player::X),
        (3, 11, Player::X),
    ]);
    let pos = engine.find_best_move(&mut board, Player::X, difficulty).unwrap();
    assert!(
        pos == Pos::new(7, 4) || pos == Pos::new(7, 8),
        "expected an adjacent block, got {pos}"
    );
}

// ---------------------------------------------------------------------------
// Difficulty policy
// ---------------------------------------------------------------------------

#[test]
fn easy_mixes_random_and_searched_moves() {
    let mut board = midgame();
    let mut kinds = Vec::new();

    for seed in 0..40 {
        let mut engine = engine(seed);
        let result = engine.find_best_move_with_stats(&mut board, Player::X, Difficulty::Easy);
        assert_eq!(board.is_empty(result.best_move.unwrap()), Ok(true));
        kinds.push(result.search_type);
    }

    assert!(kinds.contains(&SearchType::Random));
    assert!(kinds.contains(&SearchType::AlphaBeta));
    assert!(!kinds.contains(&SearchType::Classic));
}

#[test]
fn seeded_engines_agree() {
    let mut a = engine(99);
    let mut b = engine(99);
    let mut board = midgame();
    for difficulty in [Difficulty::Easy, Difficulty::Normal] {
        assert_eq!(
            a.find_best_move(&mut board, Player::O, difficulty),
            b.find_best_move(&mut board, Player::O, difficulty)
        );
    }
}

#[test_case(Difficulty::Easy ; "easy")]
#[test_case(Difficulty::Normal ; "normal")]
fn swapping_sides_mirrors_the_choice(difficulty: Difficulty) {
    let mut board = midgame();
    let mut mirrored = board.mirrored();
    let as_o = engine(31).find_best_move(&mut board, Player::O, difficulty);
    let as_x = engine(31).find_best_move(&mut mirrored, Player::X, difficulty);
    assert!(as_o.is_some());
    assert_eq!(as_o, as_x);
    assert_eq!(mirrored, midgame().mirrored());
}

#[test]
fn swapping_sides_mirrors_the_3x3_rules() {
    let mut board = Board::parse("X..\n.O.\n..X", 3).unwrap();
    let mut mirrored = board.mirrored();
    let as_o = engine(8).find_best_move(&mut board, Player::O, Difficulty::Hard);
    let as_x = engine(8).find_best_move(&mut mirrored, Player::X, Difficulty::Hard);
    assert_eq!(as_o, as_x);
}

// ---------------------------------------------------------------------------
// Input validation and configuration documents
// ---------------------------------------------------------------------------

#[test_case("XX\nO", 3 ; "ragged rows")]
#[test_case("XO.\nO..", 3 ; "not square")]
#[test_case("XO\n.X", 2 ; "too small")]
#[test_case("...\n...\n...", 4 ; "win length above side")]
#[test_case("X#.\n...\n...", 3 ; "unknown symbol")]
#[test_case("", 3 ; "empty text")]
fn malformed_boards_are_rejected(text: &str, win_length: usize) {
    assert!(matches!(Board::parse(text, win_length), Err(EngineError::InvalidBoard(_))));
}

#[test]
fn occupied_and_out_of_range_cells_are_errors() {
    let mut board = Board::tic_tac_toe();
    board.set(Pos::new(1, 1), Player::X.cell()).unwrap();
    assert!(matches!(board.try_place(Pos::new(1, 1), Player::O), Err(EngineError::Occupied { .. })));
    assert!(matches!(board.get(Pos::new(3, 0)), Err(EngineError::OutOfBounds { .. })));
}

#[test]
fn oversized_candidate_radius_is_rejected() {
    let mut config = EngineConfig::seeded(2);
    config.candidate_radius = usize::MAX;
    assert!(matches!(Engine::with_config(config), Err(EngineError::InvalidConfig(_))));

    let parsed: EngineConfig = serde_json::from_str(r#"{ "candidate_radius": 65 }"#).unwrap();
    assert!(Engine::with_config(parsed).is_err());
}

#[test]
fn config_document_round_trips() {
    let mut config = EngineConfig::seeded(21);
    config.max_candidates = Some(16);
    config.patterns.opponent_weight_percent = 120;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
    assert!(Engine::with_config(parsed).is_ok());
}
