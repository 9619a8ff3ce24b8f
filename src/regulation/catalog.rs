use crate::board::{GridPoint, TileEffect};
use crate::card::MoveCard;
use crate::game::deck::DeckPreset;
use crate::regulation::types::{
    PenaltySettings, PlacedEffect, Regulation, SpawnRule, VisitRequirement, WarpTargets,
};
use std::sync::OnceLock;

/// A named, built-in regulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub id: &'static str,
    pub title: &'static str,
    pub regulation: Regulation,
}

/// Read-only table of the built-in stages, built on first use
#[derive(Debug)]
pub struct StageCatalog {
    stages: Vec<Stage>,
}

static SHARED: OnceLock<StageCatalog> = OnceLock::new();

impl StageCatalog {
    pub fn shared() -> &'static StageCatalog {
        SHARED.get_or_init(StageCatalog::build)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.id == id)
    }

    fn build() -> Self {
        StageCatalog {
            stages: vec![
                Stage {
                    id: "standard",
                    title: "Standard 5x5",
                    regulation: Regulation::standard(),
                },
                Stage {
                    id: "classical",
                    title: "Classical Knight's Tour",
                    regulation: Regulation::classical_challenge(),
                },
                Stage {
                    id: "ray-gallery",
                    title: "Ray Gallery",
                    regulation: ray_gallery(),
                },
                Stage {
                    id: "warp-garden",
                    title: "Warp Garden",
                    regulation: warp_garden(),
                },
                Stage {
                    id: "choice-drill",
                    title: "Choice Drill",
                    regulation: choice_drill(),
                },
            ],
        }
    }
}

fn ray_gallery() -> Regulation {
    Regulation {
        board_size: 6,
        deck_preset: DeckPreset::DirectionalRays,
        spawn_rule: SpawnRule::ChooseAnyAfterPreview,
        impassable_tiles: vec![GridPoint::new(2, 2), GridPoint::new(3, 3)],
        toggle_tiles: vec![GridPoint::new(0, 5), GridPoint::new(5, 0)],
        ..Regulation::standard()
    }
}

fn warp_garden() -> Regulation {
    let a = GridPoint::new(0, 0);
    let b = GridPoint::new(4, 4);
    Regulation {
        deck_preset: DeckPreset::WarpMix,
        visit_requirements: vec![VisitRequirement {
            point: GridPoint::new(2, 4),
            required_visits: 2,
        }],
        warp_targets: vec![WarpTargets {
            card: MoveCard::FixedWarp,
            targets: vec![
                GridPoint::new(0, 4),
                GridPoint::new(4, 0),
                GridPoint::new(2, 0),
            ],
        }],
        tile_effects: vec![
            PlacedEffect {
                point: a,
                effect: TileEffect::Warp {
                    pair_id: "corner".to_string(),
                    destination: b,
                },
            },
            PlacedEffect {
                point: b,
                effect: TileEffect::Warp {
                    pair_id: "corner".to_string(),
                    destination: a,
                },
            },
            PlacedEffect {
                point: GridPoint::new(1, 3),
                effect: TileEffect::ShuffleHand,
            },
        ],
        ..Regulation::standard()
    }
}

fn choice_drill() -> Regulation {
    Regulation {
        board_size: 4,
        hand_size: 4,
        preview_count: 2,
        deck_preset: DeckPreset::ChoiceMix,
        spawn_rule: SpawnRule::Fixed {
            point: GridPoint::new(0, 0),
        },
        penalties: PenaltySettings {
            revisit: 1,
            ..PenaltySettings::default()
        },
        ..Regulation::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn test_shared_catalog_is_built_once() {
        let first = StageCatalog::shared() as *const StageCatalog;
        let second = StageCatalog::shared() as *const StageCatalog;
        assert_eq!(first, second);
    }

    #[test]
    fn test_stage_lookup() {
        let catalog = StageCatalog::shared();
        assert_eq!(catalog.stages().len(), 5);
        assert_eq!(
            catalog.stage("classical").map(|stage| stage.regulation.board_size),
            Some(8)
        );
        assert!(catalog.stage("missing").is_none());
    }

    #[test]
    fn test_stage_ids_are_unique_and_valid() {
        let catalog = StageCatalog::shared();
        for (i, stage) in catalog.stages().iter().enumerate() {
            assert!(stage.regulation.validate().is_ok(), "{} invalid", stage.id);
            assert!(catalog.stages()[i + 1..].iter().all(|other| other.id != stage.id));
        }
    }

    #[test]
    fn test_warp_garden_keeps_both_warps() {
        let regulation = warp_garden();
        let board = Board::with_layout(regulation.board_size, &regulation.board_layout());
        assert_eq!(board.effects().len(), 3);
        assert!(matches!(
            board.effect(GridPoint::new(0, 0)),
            Some(TileEffect::Warp { .. })
        ));
    }
}
