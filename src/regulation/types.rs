use crate::board::{BoardGeometry, BoardLayout, GridPoint, TileEffect};
use crate::card::MoveCard;
use crate::game::deck::DeckPreset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest board side a regulation may ask for
pub const MAX_BOARD_SIZE: usize = 64;

#[derive(Error, Debug)]
pub enum RegulationError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid board size: {0}")]
    InvalidBoardSize(usize),
    #[error("Invalid hand size: {0}")]
    InvalidHandSize(usize),
}

/// Where the piece starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnRule {
    Fixed { point: GridPoint },
    ChooseAnyAfterPreview,
}

/// Penalty points charged by each kind of event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltySettings {
    pub deadlock: u32,
    pub manual_redraw: u32,
    pub manual_discard: u32,
    pub revisit: u32,
}

impl Default for PenaltySettings {
    fn default() -> Self {
        PenaltySettings {
            deadlock: 5,
            manual_redraw: 5,
            manual_discard: 1,
            revisit: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRequirement {
    pub point: GridPoint,
    pub required_visits: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpTargets {
    pub card: MoveCard,
    pub targets: Vec<GridPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedEffect {
    pub point: GridPoint,
    pub effect: TileEffect,
}

/// Rules of one session, supplied by whatever picks the stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Regulation {
    pub board_size: usize,
    pub hand_size: usize,
    pub preview_count: usize,
    pub stacking_enabled: bool,
    pub deck_preset: DeckPreset,
    pub spawn_rule: SpawnRule,
    pub penalties: PenaltySettings,
    pub impassable_tiles: Vec<GridPoint>,
    pub visit_requirements: Vec<VisitRequirement>,
    pub toggle_tiles: Vec<GridPoint>,
    pub warp_targets: Vec<WarpTargets>,
    pub tile_effects: Vec<PlacedEffect>,
    pub seed: Option<u64>,
}

impl Default for Regulation {
    fn default() -> Self {
        Self::standard()
    }
}

impl Regulation {
    /// 5x5 board, king/knight/diagonal deck, spawn in the center
    pub fn standard() -> Self {
        Regulation {
            board_size: BoardGeometry::STANDARD_SIZE,
            hand_size: 5,
            preview_count: 3,
            stacking_enabled: true,
            deck_preset: DeckPreset::Standard,
            spawn_rule: SpawnRule::Fixed {
                point: BoardGeometry::default_spawn(BoardGeometry::STANDARD_SIZE),
            },
            penalties: PenaltySettings::default(),
            impassable_tiles: Vec::new(),
            visit_requirements: Vec::new(),
            toggle_tiles: Vec::new(),
            warp_targets: Vec::new(),
            tile_effects: Vec::new(),
            seed: None,
        }
    }

    /// 8x8 knight tour with a free spawn choice and a revisit cost
    pub fn classical_challenge() -> Self {
        Regulation {
            board_size: 8,
            deck_preset: DeckPreset::ClassicalKnight,
            spawn_rule: SpawnRule::ChooseAnyAfterPreview,
            penalties: PenaltySettings {
                deadlock: 2,
                manual_redraw: 2,
                manual_discard: 1,
                revisit: 1,
            },
            ..Self::standard()
        }
    }

    /// Parse a regulation from JSON; missing fields take standard values
    pub fn from_json(content: &str) -> Result<Self, RegulationError> {
        let regulation: Regulation = serde_json::from_str(content)?;
        regulation.validate()?;
        Ok(regulation)
    }

    /// Load a regulation from a JSON file
    pub fn from_file(path: &str) -> Result<Self, RegulationError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), RegulationError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(RegulationError::InvalidBoardSize(self.board_size));
        }
        if self.hand_size == 0 {
            return Err(RegulationError::InvalidHandSize(self.hand_size));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Board layout described by this regulation
    pub fn board_layout(&self) -> BoardLayout {
        BoardLayout {
            initial_visited: Vec::new(),
            required_visits: self
                .visit_requirements
                .iter()
                .map(|req| (req.point, req.required_visits))
                .collect(),
            toggles: self.toggle_tiles.iter().copied().collect(),
            impassable: self.impassable_tiles.iter().copied().collect(),
            effects: self
                .tile_effects
                .iter()
                .map(|placed| (placed.point, placed.effect.clone()))
                .collect(),
        }
    }

    /// Raw destination proposal for a fixed-warp identity, if any
    pub fn warp_targets_for(&self, card: MoveCard) -> Option<&[GridPoint]> {
        self.warp_targets
            .iter()
            .find(|entry| entry.card == card)
            .map(|entry| entry.targets.as_slice())
    }
}
