use crate::board::{Board, BoardGeometry, GridPoint, MoveVector, TileEffect};
use crate::card::{sanitize_warp_targets, DealtCard};
use crate::game::deck::{Deck, DeckError};
use crate::game::hand::{HandManager, HandStack, StackId};
use crate::game::scoring;
use crate::game::timer::GameSessionTimer;
use crate::regulation::{Regulation, RegulationError, SpawnRule};
use crate::rng::RngState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Forced redraws attempted in one deadlock resolution pass
const MAX_DEADLOCK_REDRAWS: usize = 16;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),
    #[error("Regulation error: {0}")]
    Regulation(#[from] RegulationError),
}

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    AwaitingSpawn,
    Playing,
    Cleared,
}

/// A playable move: the top card of one hand stack along one candidate path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableMove {
    pub stack_id: StackId,
    pub stack_index: usize,
    pub card: DealtCard,
    pub destination: GridPoint,
    pub path: Vec<GridPoint>,
    pub vector: MoveVector,
    /// How many candidates the card's pattern offers
    pub candidate_count: usize,
}

/// Read-only view of a session for presentation layers
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub progress: Progress,
    pub current: Option<GridPoint>,
    pub board_size: usize,
    pub remaining_tiles: usize,
    pub visited: Vec<GridPoint>,
    pub hand: Vec<HandStack>,
    pub next_cards: Vec<DealtCard>,
    pub available_moves: Vec<AvailableMove>,
    pub move_count: u32,
    pub penalty_count: u32,
    pub total_move_count: u32,
    pub elapsed_seconds: u64,
    pub score: u64,
    pub has_revisited_tile: bool,
    pub awaiting_manual_discard: bool,
    pub seed: u64,
    pub rng_state: RngState,
}

/// One play session: board, deck, hand and the rules tying them together
#[derive(Debug, Clone)]
pub struct GameCore {
    regulation: Regulation,
    board: Board,
    deck: Deck,
    hand: HandManager,
    current: Option<GridPoint>,
    progress: Progress,
    move_count: u32,
    penalty_count: u32,
    has_revisited_tile: bool,
    awaiting_manual_discard: bool,
    timer: GameSessionTimer,
}

impl GameCore {
    pub fn new(regulation: Regulation) -> Result<Self, GameError> {
        Self::with_card_sequence(regulation, Vec::new())
    }

    /// Session whose deck deals `cards` verbatim before sampling
    pub fn with_card_sequence(
        regulation: Regulation,
        cards: Vec<DealtCard>,
    ) -> Result<Self, GameError> {
        regulation.validate()?;
        let board = Board::with_layout(regulation.board_size, &regulation.board_layout());
        let deck = build_deck(&regulation, &board)?.with_preset_sequence(cards);
        let hand = HandManager::new(
            regulation.hand_size,
            regulation.preview_count,
            regulation.stacking_enabled,
        );

        let mut core = GameCore {
            regulation,
            board,
            deck,
            hand,
            current: None,
            progress: Progress::AwaitingSpawn,
            move_count: 0,
            penalty_count: 0,
            has_revisited_tile: false,
            awaiting_manual_discard: false,
            timer: GameSessionTimer::new(Utc::now()),
        };
        core.start_session();
        Ok(core)
    }

    /// Start over. `false` replays the same seed and card sequence exactly;
    /// `true` draws from a fresh seed.
    pub fn reset(&mut self, start_new_game: bool) {
        if start_new_game {
            self.deck.reseed(None);
        } else {
            self.deck.reset();
        }
        self.board = Board::with_layout(self.regulation.board_size, &self.regulation.board_layout());
        self.hand = HandManager::new(
            self.regulation.hand_size,
            self.regulation.preview_count,
            self.regulation.stacking_enabled,
        );
        self.start_session();
        info!(seed = self.deck.seed(), start_new_game, "session reset");
    }

    fn start_session(&mut self) {
        self.current = None;
        self.progress = Progress::AwaitingSpawn;
        self.move_count = 0;
        self.penalty_count = 0;
        self.has_revisited_tile = false;
        self.awaiting_manual_discard = false;
        self.timer = GameSessionTimer::new(Utc::now());
        self.hand.deal(&mut self.deck);

        if self.check_cleared() {
            return;
        }
        if let SpawnRule::Fixed { point } = self.regulation.spawn_rule {
            if let Some(spawn) = self.fixed_spawn(point) {
                self.place_at_spawn(spawn);
            }
        }
    }

    fn fixed_spawn(&self, requested: GridPoint) -> Option<GridPoint> {
        if self.board.is_traversable(requested) {
            return Some(requested);
        }
        let fallback = BoardGeometry::default_spawn(self.board.size());
        if self.board.is_traversable(fallback) {
            debug!(%requested, %fallback, "spawn point not traversable, using board center");
            return Some(fallback);
        }
        self.board.traversable_points().first().copied()
    }

    fn place_at_spawn(&mut self, point: GridPoint) {
        self.board.mark_visited(point);
        self.current = Some(point);
        self.progress = Progress::Playing;
        if !self.check_cleared() {
            self.resolve_deadlock();
        }
    }

    /// Pick the starting tile under `ChooseAnyAfterPreview`
    pub fn select_spawn(&mut self, point: GridPoint) -> bool {
        if self.progress != Progress::AwaitingSpawn || !self.board.is_traversable(point) {
            return false;
        }
        self.place_at_spawn(point);
        true
    }

    /// Every legal move, sorted by destination row-major and then by hand
    /// order
    pub fn available_moves(&self) -> Vec<AvailableMove> {
        let origin = match (self.progress, self.current) {
            (Progress::Playing, Some(origin)) => origin,
            _ => return Vec::new(),
        };

        let mut moves = Vec::new();
        for (stack_index, stack) in self.hand.stacks().iter().enumerate() {
            let card = *stack.top_card();
            let candidate_count = card.card.candidate_count();
            for candidate in card.resolve_paths(origin, &self.board) {
                let Some(destination) = candidate.destination() else {
                    continue;
                };
                if !self.board.is_traversable(destination) {
                    continue;
                }
                if card.card.is_fixed_warp() && self.board.is_visited(destination) {
                    continue;
                }
                moves.push(AvailableMove {
                    stack_id: stack.id(),
                    stack_index,
                    card,
                    destination,
                    path: candidate.path,
                    vector: candidate.vector,
                    candidate_count,
                });
            }
        }
        moves.sort_by_key(|mv| mv.destination.row_major_key());
        moves
    }

    /// The move a tap on `destination` plays: single-candidate cards win
    /// over choice cards reaching the same tile
    pub fn resolve_tap(&self, destination: GridPoint) -> Option<AvailableMove> {
        let mut matching = self
            .available_moves()
            .into_iter()
            .filter(|mv| mv.destination == destination);
        let first = matching.next()?;
        if first.candidate_count == 1 {
            return Some(first);
        }
        Some(matching.find(|mv| mv.candidate_count == 1).unwrap_or(first))
    }

    pub fn play_move(&mut self, mv: &AvailableMove) -> bool {
        if self.awaiting_manual_discard || !self.available_moves().contains(mv) {
            return false;
        }

        let revisit = self.board.is_visited(mv.destination);
        for point in &mv.path {
            self.board.mark_visited(*point);
        }
        self.current = Some(mv.destination);
        self.move_count += 1;
        if revisit {
            self.has_revisited_tile = true;
            self.penalty_count += self.regulation.penalties.revisit;
        }

        self.hand.play_card(mv.stack_id, &mut self.deck);
        self.apply_tile_effect(mv.destination);

        if !self.check_cleared() {
            self.resolve_deadlock();
        }
        true
    }

    fn apply_tile_effect(&mut self, point: GridPoint) {
        match self.board.effect(point).cloned() {
            Some(TileEffect::Warp {
                pair_id,
                destination,
            }) => {
                debug!(%pair_id, from = %point, to = %destination, "warp tile");
                self.board.mark_visited(destination);
                self.current = Some(destination);
            }
            Some(TileEffect::ShuffleHand) => {
                debug!(at = %point, "shuffle tile, redrawing hand");
                self.hand.redraw_all(&mut self.deck);
            }
            None => {}
        }
    }

    fn check_cleared(&mut self) -> bool {
        if !self.board.is_cleared() {
            return false;
        }
        self.progress = Progress::Cleared;
        self.awaiting_manual_discard = false;
        let seconds = self.timer.finalize(Utc::now());
        info!(
            moves = self.move_count,
            penalties = self.penalty_count,
            seconds,
            "board cleared"
        );
        true
    }

    /// Charge the deadlock penalty once, then redraw until some card can
    /// move or the redraw budget runs out. Stuck hands stay out of the
    /// discard pile until the pass ends.
    fn resolve_deadlock(&mut self) {
        if self.progress != Progress::Playing || !self.available_moves().is_empty() {
            return;
        }
        self.penalty_count += self.regulation.penalties.deadlock;

        let mut withheld = Vec::new();
        let mut resolved = false;
        for attempt in 1..=MAX_DEADLOCK_REDRAWS {
            debug!(attempt, "no card can move, redrawing hand");
            withheld.extend(self.hand.replace_all(&mut self.deck));
            if !self.available_moves().is_empty() {
                resolved = true;
                break;
            }
        }
        for card in withheld {
            self.deck.discard(card);
        }

        if !resolved {
            warn!(
                position = ?self.current,
                "hand still stuck after {MAX_DEADLOCK_REDRAWS} redraws"
            );
        }
    }

    /// Throw away the whole hand for a penalty
    pub fn apply_manual_penalty_redraw(&mut self) -> bool {
        if self.progress != Progress::Playing {
            return false;
        }
        self.awaiting_manual_discard = false;
        self.penalty_count += self.regulation.penalties.manual_redraw;
        self.hand.redraw_all(&mut self.deck);
        self.resolve_deadlock();
        true
    }

    pub fn begin_manual_discard_selection(&mut self) -> bool {
        if self.progress != Progress::Playing || self.hand.stacks().is_empty() {
            return false;
        }
        self.awaiting_manual_discard = true;
        true
    }

    pub fn cancel_manual_discard_selection(&mut self) -> bool {
        std::mem::replace(&mut self.awaiting_manual_discard, false)
    }

    /// Discard one stack; only valid while a discard selection is open
    pub fn discard_hand_stack(&mut self, id: StackId) -> bool {
        if self.progress != Progress::Playing || !self.awaiting_manual_discard {
            return false;
        }
        if !self.hand.discard_stack(id, &mut self.deck) {
            return false;
        }
        self.awaiting_manual_discard = false;
        self.penalty_count += self.regulation.penalties.manual_discard;
        self.resolve_deadlock();
        true
    }

    pub fn begin_pause(&mut self) {
        self.timer.begin_pause(Utc::now());
    }

    pub fn end_pause(&mut self) {
        self.timer.end_pause(Utc::now());
    }

    pub fn regulation(&self) -> &Regulation {
        &self.regulation
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn hand(&self) -> &HandManager {
        &self.hand
    }

    pub fn timer(&self) -> &GameSessionTimer {
        &self.timer
    }

    pub fn current_position(&self) -> Option<GridPoint> {
        self.current
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn penalty_count(&self) -> u32 {
        self.penalty_count
    }

    pub fn has_revisited_tile(&self) -> bool {
        self.has_revisited_tile
    }

    pub fn is_awaiting_manual_discard(&self) -> bool {
        self.awaiting_manual_discard
    }

    pub fn total_move_count(&self) -> u32 {
        scoring::total_move_count(self.move_count, self.penalty_count)
    }

    /// Whole seconds played; frozen once the board is cleared
    pub fn elapsed_seconds_as_of(&self, now: DateTime<Utc>) -> u64 {
        self.timer
            .finalized_seconds()
            .unwrap_or_else(|| self.timer.live_elapsed_seconds(now).floor() as u64)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds_as_of(Utc::now())
    }

    pub fn score_as_of(&self, now: DateTime<Utc>) -> u64 {
        scoring::score(
            self.move_count,
            self.penalty_count,
            self.elapsed_seconds_as_of(now),
        )
    }

    pub fn score(&self) -> u64 {
        self.score_as_of(Utc::now())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let now = Utc::now();
        SessionSnapshot {
            progress: self.progress,
            current: self.current,
            board_size: self.board.size(),
            remaining_tiles: self.board.remaining_count(),
            visited: self.board.visited_points(),
            hand: self.hand.stacks().to_vec(),
            next_cards: self.hand.next_cards().copied().collect(),
            available_moves: self.available_moves(),
            move_count: self.move_count,
            penalty_count: self.penalty_count,
            total_move_count: self.total_move_count(),
            elapsed_seconds: self.elapsed_seconds_as_of(now),
            score: self.score_as_of(now),
            has_revisited_tile: self.has_revisited_tile,
            awaiting_manual_discard: self.awaiting_manual_discard,
            seed: self.deck.seed(),
            rng_state: self.deck.rng_state(),
        }
    }
}

/// Deck for a regulation, with fixed-warp pools sanitized against the board
fn build_deck(regulation: &Regulation, board: &Board) -> Result<Deck, DeckError> {
    let configuration = regulation.deck_preset.configuration();
    let warp_targets = configuration
        .allowed
        .iter()
        .filter(|card| card.is_fixed_warp())
        .map(|card| {
            (
                *card,
                sanitize_warp_targets(regulation.warp_targets_for(*card), board),
            )
        })
        .collect();
    Deck::new(configuration, warp_targets, regulation.seed)
}
