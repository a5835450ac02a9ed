//! Property-based invariant tests for the move engine and snapshots.
//!
//! 1. Every occupied cell holds exactly one unit, at its own position
//! 2. Score never decreases under moves
//! 3. Undo history stays within its depth
//! 4. A merge doubles; merged units are never merged again in the same move
//! 5. `moves_available` is false iff the board is full with no equal neighbours
//! 6. Board snapshots round trip through bincode and JSON
//! 7. Determinism: same seed and moves yield the same session

use proptest::prelude::*;
use tile_merge::core::{Board, Direction, GameConfig, Position, SessionSnapshot};
use tile_merge::session::{IntentHandler, SessionController};
use tile_merge::sinks::{MemoryStorage, RecordingActuator};

type Session = SessionController<RecordingActuator, MemoryStorage>;

// ── Strategies ──────────────────────────────────────────────────────────

fn direction_strategy() -> impl Strategy<Value = Direction> {
    (0u8..4).prop_map(|index| Direction::from_index(index).unwrap())
}

/// A 4×4 grid of `rows[y][x]`, with small exponents so merges are common.
fn rows_strategy() -> impl Strategy<Value = Vec<Vec<u32>>> {
    let cell = prop_oneof![
        2 => Just(0u32),
        3 => (1u32..5).prop_map(|exp| 1 << exp),
    ];
    prop::collection::vec(prop::collection::vec(cell, 4), 4)
}

fn session_from_rows(rows: &[Vec<u32>], seed: u64) -> Session {
    let board = Board::from_rows(rows).unwrap();
    let storage = MemoryStorage::new()
        .with_game_state(&SessionSnapshot::new(board.snapshot()))
        .unwrap();
    SessionController::new(
        GameConfig::default().with_seed(seed),
        RecordingActuator::new(),
        storage,
    )
    .unwrap()
}

fn assert_board_consistent(board: &Board) {
    let mut occupied = 0;
    board.each_cell(|position, unit| {
        if let Some(unit) = unit {
            occupied += 1;
            assert_eq!(unit.position, position);
            assert!(unit.value >= 2 && unit.value.is_power_of_two());
        }
    });
    assert_eq!(occupied, board.occupied_count());
    assert_eq!(board.units().count(), occupied);
}

fn has_equal_neighbours(rows: &[Vec<u32>]) -> bool {
    let n = rows.len();
    (0..n).any(|y| {
        (0..n).any(|x| {
            let v = rows[y][x];
            v != 0 && ((x + 1 < n && rows[y][x + 1] == v) || (y + 1 < n && rows[y + 1][x] == v))
        })
    })
}

// ═══════════════════════════════════════════════════════════════════════
// 1–3. Invariants along random games
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn random_games_keep_invariants(
        seed in any::<u64>(),
        moves in prop::collection::vec(direction_strategy(), 1..80),
    ) {
        let mut session = Session::new(
            GameConfig::default().with_seed(seed),
            RecordingActuator::new(),
            MemoryStorage::new(),
        )
        .unwrap();

        for direction in moves {
            let score_before = session.score();
            let tiles_before = session.board().occupied_count();

            let accepted = session.move_tiles(direction);

            assert_board_consistent(session.board());
            prop_assert!(session.score() >= score_before);
            prop_assert!(session.history().len() <= 10);
            if accepted {
                prop_assert!(session.board().occupied_count() <= tiles_before + 1);
            } else {
                prop_assert_eq!(session.board().occupied_count(), tiles_before);
            }
        }
    }

    #[test]
    fn undo_after_accepted_move_restores_previous(
        rows in rows_strategy(),
        direction in direction_strategy(),
    ) {
        let mut session = session_from_rows(&rows, 9);
        let before = session.snapshot();

        if session.move_tiles(direction) {
            prop_assert!(session.undo());
        }
        prop_assert_eq!(session.snapshot(), before);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Merges
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn merges_double_and_do_not_chain(
        rows in rows_strategy(),
        direction in direction_strategy(),
    ) {
        let mut session = session_from_rows(&rows, 1);
        let score_before = session.score();

        if session.move_tiles(direction) {
            let (frame, _) = session.actuator().last_render().unwrap();
            let mut gained = 0u64;
            for tile in &frame.tiles {
                if let Some([a, b]) = tile.merged_from {
                    prop_assert_eq!(a.value, b.value);
                    prop_assert_eq!(tile.value, a.value * 2);
                    prop_assert_eq!(a.position, tile.position);
                    prop_assert_eq!(b.position, tile.position);
                    prop_assert_ne!(a.id, b.id);
                    gained += u64::from(tile.value);
                }
            }
            prop_assert_eq!(session.score() - score_before, gained);

            let merged = frame.tiles.iter().filter(|t| t.merged_from.is_some()).count();
            let original = rows.iter().flatten().filter(|&&v| v != 0).count();
            prop_assert_eq!(frame.tiles.len(), original - merged + 1);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Termination
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn moves_available_characterisation(rows in rows_strategy()) {
        let session = session_from_rows(&rows, 0);
        let full = rows.iter().flatten().all(|&v| v != 0);

        prop_assert_eq!(
            session.moves_available(),
            !full || has_equal_neighbours(&rows)
        );
    }

    #[test]
    fn blocked_board_accepts_no_move(
        rows in rows_strategy(),
        direction in direction_strategy(),
    ) {
        let mut session = session_from_rows(&rows, 0);
        if !session.moves_available() {
            let before = session.snapshot();
            prop_assert!(!session.move_tiles(direction));
            prop_assert_eq!(session.snapshot(), before);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Round trip
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn snapshot_round_trips(rows in rows_strategy(), score in 0u64..1_000_000) {
        let board = Board::from_rows(&rows).unwrap();
        let snapshot = SessionSnapshot::new(board.snapshot()).with_score(score);

        let from_bytes = SessionSnapshot::from_bytes(&snapshot.to_bytes().unwrap(), 4).unwrap();
        let from_json = SessionSnapshot::from_json(&snapshot.to_json().unwrap(), 4).unwrap();
        prop_assert_eq!(&from_bytes, &snapshot);
        prop_assert_eq!(&from_json, &snapshot);

        let rebuilt = Board::from_snapshot(&from_json.grid).unwrap();
        prop_assert_eq!(&rebuilt, &board);
        prop_assert_eq!(rebuilt.to_rows(), rows.clone());
        for y in 0..4 {
            for x in 0..4 {
                let position = Position::new(x, y);
                prop_assert_eq!(rebuilt.cell_available(position), rows[y][x] == 0);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 7. Determinism
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_seed_same_game(
        seed in any::<u64>(),
        moves in prop::collection::vec(direction_strategy(), 0..40),
    ) {
        let play = || {
            let mut session = Session::new(
                GameConfig::default().with_seed(seed),
                RecordingActuator::new(),
                MemoryStorage::new(),
            )
            .unwrap();
            for &direction in &moves {
                session.move_tiles(direction);
            }
            session.snapshot()
        };

        prop_assert_eq!(play(), play());
    }
}
