use crate::board::{Board, GridPoint, MoveVector};
use crate::game::{AvailableMove, GameCore, GameError, Progress};
use crate::regulation::Regulation;
use std::collections::BTreeSet;
use tracing::debug;

/// Manual redraws the auto-player may spend in a row without moving
const MAX_STUCK_REDRAWS: u32 = 8;

/// Neighbourhood used to estimate how reachable a tile still is
const LOOKAHEAD_OFFSETS: [MoveVector; 16] = [
    MoveVector { dx: 0, dy: 1 },
    MoveVector { dx: 1, dy: 1 },
    MoveVector { dx: 1, dy: 0 },
    MoveVector { dx: 1, dy: -1 },
    MoveVector { dx: 0, dy: -1 },
    MoveVector { dx: -1, dy: -1 },
    MoveVector { dx: -1, dy: 0 },
    MoveVector { dx: -1, dy: 1 },
    MoveVector { dx: 1, dy: 2 },
    MoveVector { dx: -1, dy: 2 },
    MoveVector { dx: 2, dy: 1 },
    MoveVector { dx: -2, dy: 1 },
    MoveVector { dx: 1, dy: -2 },
    MoveVector { dx: -1, dy: -2 },
    MoveVector { dx: 2, dy: -1 },
    MoveVector { dx: -2, dy: -1 },
];

/// Result of a single auto-played session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub seed: u64,
    pub cleared: bool,
    pub move_count: u32,
    pub penalty_count: u32,
    pub total_move_count: u32,
    pub remaining_tiles: usize,
    pub score: u64,
}

/// Greedy player: take the move that visits the most new tiles, and among
/// equals head for the tile with the fewest unvisited neighbours
pub struct AutoPlayer;

impl AutoPlayer {
    pub fn choose_move(core: &GameCore) -> Option<AvailableMove> {
        let board = core.board();
        core.available_moves()
            .into_iter()
            .enumerate()
            .max_by_key(|(index, mv)| {
                let fresh = fresh_tiles(board, mv);
                let onward = open_neighbours(board, mv.destination);
                // Earlier moves win exact ties
                (fresh, std::cmp::Reverse(onward), std::cmp::Reverse(*index))
            })
            .map(|(_, mv)| mv)
    }

    /// Spawn where the opening hand has the most moves
    pub fn choose_spawn(core: &GameCore) -> Option<GridPoint> {
        let board = core.board();
        let mut best: Option<(usize, GridPoint)> = None;
        for point in board.traversable_points() {
            let usable = core
                .hand()
                .stacks()
                .iter()
                .filter(|stack| stack.top_card().can_use(point, board))
                .count();
            if best.map_or(true, |(count, _)| usable > count) {
                best = Some((usable, point));
            }
        }
        best.map(|(_, point)| point)
    }
}

fn fresh_tiles(board: &Board, mv: &AvailableMove) -> usize {
    mv.path
        .iter()
        .filter(|point| !board.is_visited(**point))
        .collect::<BTreeSet<_>>()
        .len()
}

fn open_neighbours(board: &Board, point: GridPoint) -> usize {
    LOOKAHEAD_OFFSETS
        .iter()
        .map(|offset| point.offset(*offset))
        .filter(|target| board.is_traversable(*target) && !board.is_visited(*target))
        .count()
}

/// Play one session to completion or until `max_moves` moves were made
pub fn run_game(
    regulation: &Regulation,
    seed: u64,
    max_moves: u32,
    verbose: bool,
) -> Result<GameResult, GameError> {
    let mut core = GameCore::new(regulation.clone().with_seed(seed))?;

    if verbose {
        println!("=== Game Start (seed: {}) ===", seed);
        println!(
            "Board {}x{}, {} tiles to visit",
            core.board().size(),
            core.board().size(),
            core.board().remaining_count()
        );
    }

    if core.progress() == Progress::AwaitingSpawn {
        if let Some(spawn) = AutoPlayer::choose_spawn(&core) {
            core.select_spawn(spawn);
            if verbose {
                println!("Spawn at {}", spawn);
            }
        }
    }

    let mut stuck_redraws = 0;
    while core.progress() == Progress::Playing && core.move_count() < max_moves {
        let Some(mv) = AutoPlayer::choose_move(&core) else {
            if stuck_redraws == MAX_STUCK_REDRAWS {
                debug!(seed, "auto-player gave up with no playable card");
                break;
            }
            stuck_redraws += 1;
            core.apply_manual_penalty_redraw();
            if verbose {
                println!("[Redraw] no playable card, penalty {}", core.penalty_count());
            }
            continue;
        };
        stuck_redraws = 0;

        let before = core.penalty_count();
        core.play_move(&mv);
        if verbose {
            println!(
                "Move {:3}: {:<28} -> {} (remaining {}, penalties {})",
                core.move_count(),
                mv.card.to_string(),
                mv.destination,
                core.board().remaining_count(),
                core.penalty_count()
            );
            if core.penalty_count() > before {
                println!("  [Penalty] +{}", core.penalty_count() - before);
            }
        }
    }

    let result = GameResult {
        seed,
        cleared: core.progress() == Progress::Cleared,
        move_count: core.move_count(),
        penalty_count: core.penalty_count(),
        total_move_count: core.total_move_count(),
        remaining_tiles: core.board().remaining_count(),
        score: core.score(),
    };

    if verbose {
        println!(
            "=== {} after {} moves, {} penalties, score {} ===",
            if result.cleared { "Cleared" } else { "Stopped" },
            result.move_count,
            result.penalty_count,
            result.score
        );
    }
    Ok(result)
}
