use crate::board::geometry::{BoardGeometry, GridPoint};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Special behaviour triggered when the piece lands on a tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TileEffect {
    /// One half of a warp pair; both halves share `pair_id`
    Warp { pair_id: String, destination: GridPoint },
    /// Throw the whole hand away and deal a fresh one, free of charge
    ShuffleHand,
}

/// How a tile accumulates visits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitProgress {
    MultiVisit { required: u32, count: u32 },
    Toggle { visited: bool },
    Impassable,
}

/// Result of registering one visit on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitTransition {
    BecameVisited,
    BecameUnvisited,
    Unchanged,
}

/// Per-tile state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileState {
    pub progress: VisitProgress,
    pub effect: Option<TileEffect>,
}

impl TileState {
    pub fn new(progress: VisitProgress) -> Self {
        TileState {
            progress,
            effect: None,
        }
    }

    pub fn required_visits(&self) -> u32 {
        match self.progress {
            VisitProgress::MultiVisit { required, .. } => required,
            VisitProgress::Toggle { .. } | VisitProgress::Impassable => 1,
        }
    }

    pub fn visit_count(&self) -> u32 {
        match self.progress {
            VisitProgress::MultiVisit { count, .. } => count,
            VisitProgress::Toggle { visited } => u32::from(visited),
            VisitProgress::Impassable => 0,
        }
    }

    pub fn is_impassable(&self) -> bool {
        matches!(self.progress, VisitProgress::Impassable)
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self.progress, VisitProgress::Toggle { .. })
    }

    pub fn is_visited(&self) -> bool {
        match self.progress {
            VisitProgress::MultiVisit { required, count } => count >= required,
            VisitProgress::Toggle { visited } => visited,
            VisitProgress::Impassable => false,
        }
    }

    /// Apply one visit and report whether the visited flag changed
    pub fn register_visit(&mut self) -> VisitTransition {
        match &mut self.progress {
            VisitProgress::MultiVisit { required, count } => {
                if *count >= *required {
                    return VisitTransition::Unchanged;
                }
                *count += 1;
                if *count == *required {
                    VisitTransition::BecameVisited
                } else {
                    VisitTransition::Unchanged
                }
            }
            VisitProgress::Toggle { visited } => {
                *visited = !*visited;
                if *visited {
                    VisitTransition::BecameVisited
                } else {
                    VisitTransition::BecameUnvisited
                }
            }
            VisitProgress::Impassable => VisitTransition::Unchanged,
        }
    }

    /// Mark the tile as already completed (used for initial layouts)
    pub fn complete(&mut self) {
        match &mut self.progress {
            VisitProgress::MultiVisit { required, count } => *count = *required,
            VisitProgress::Toggle { visited } => *visited = true,
            VisitProgress::Impassable => {}
        }
    }
}

/// Keep only effects that sit on traversable tiles and, for warps, whose
/// partner tile carries the same pair id pointing straight back.
pub fn validate_effects(
    size: usize,
    impassable: &BTreeSet<GridPoint>,
    raw: &BTreeMap<GridPoint, TileEffect>,
) -> BTreeMap<GridPoint, TileEffect> {
    let usable = |point: &GridPoint| BoardGeometry::contains(size, *point) && !impassable.contains(point);

    let mut valid = BTreeMap::new();
    for (point, effect) in raw {
        if !usable(point) {
            debug!(%point, "dropping tile effect on unusable tile");
            continue;
        }
        match effect {
            TileEffect::ShuffleHand => {
                valid.insert(*point, effect.clone());
            }
            TileEffect::Warp {
                pair_id,
                destination,
            } => {
                let partner_matches = matches!(
                    raw.get(destination),
                    Some(TileEffect::Warp { pair_id: other_id, destination: back })
                        if other_id == pair_id && back == point
                );
                if destination != point && usable(destination) && partner_matches {
                    valid.insert(*point, effect.clone());
                } else {
                    debug!(%point, pair_id = %pair_id, "dropping one-sided warp");
                }
            }
        }
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warp(pair_id: &str, x: i32, y: i32) -> TileEffect {
        TileEffect::Warp {
            pair_id: pair_id.to_string(),
            destination: GridPoint::new(x, y),
        }
    }

    #[test]
    fn test_multi_visit_crosses_once() {
        let mut tile = TileState::new(VisitProgress::MultiVisit { required: 3, count: 0 });
        assert_eq!(tile.register_visit(), VisitTransition::Unchanged);
        assert_eq!(tile.register_visit(), VisitTransition::Unchanged);
        assert!(!tile.is_visited());
        assert_eq!(tile.register_visit(), VisitTransition::BecameVisited);
        assert!(tile.is_visited());
        assert_eq!(tile.register_visit(), VisitTransition::Unchanged);
        assert_eq!(tile.visit_count(), 3);
    }

    #[test]
    fn test_toggle_alternates() {
        let mut tile = TileState::new(VisitProgress::Toggle { visited: false });
        assert_eq!(tile.register_visit(), VisitTransition::BecameVisited);
        assert_eq!(tile.register_visit(), VisitTransition::BecameUnvisited);
        assert_eq!(tile.register_visit(), VisitTransition::BecameVisited);
        assert!(tile.is_toggle());
    }

    #[test]
    fn test_impassable_ignores_visits() {
        let mut tile = TileState::new(VisitProgress::Impassable);
        assert_eq!(tile.register_visit(), VisitTransition::Unchanged);
        tile.complete();
        assert!(!tile.is_visited());
        assert!(tile.is_impassable());
    }

    #[test]
    fn test_validate_effects_keeps_mutual_pairs() {
        let mut raw = BTreeMap::new();
        raw.insert(GridPoint::new(0, 0), warp("a", 4, 4));
        raw.insert(GridPoint::new(4, 4), warp("a", 0, 0));
        raw.insert(GridPoint::new(2, 2), TileEffect::ShuffleHand);

        let valid = validate_effects(5, &BTreeSet::new(), &raw);
        assert_eq!(valid.len(), 3);
    }

    #[test]
    fn test_validate_effects_drops_one_sided_and_mismatched() {
        let mut raw = BTreeMap::new();
        raw.insert(GridPoint::new(0, 0), warp("a", 4, 4));
        raw.insert(GridPoint::new(1, 1), warp("b", 3, 3));
        raw.insert(GridPoint::new(3, 3), warp("c", 1, 1));
        raw.insert(GridPoint::new(2, 0), warp("d", 2, 0));

        let valid = validate_effects(5, &BTreeSet::new(), &raw);
        assert!(valid.is_empty());
    }

    #[test]
    fn test_validate_effects_drops_warps_touching_impassable_tiles() {
        let mut raw = BTreeMap::new();
        raw.insert(GridPoint::new(0, 0), warp("a", 4, 4));
        raw.insert(GridPoint::new(4, 4), warp("a", 0, 0));
        let impassable: BTreeSet<_> = [GridPoint::new(4, 4)].into_iter().collect();

        let valid = validate_effects(5, &impassable, &raw);
        assert!(valid.is_empty());
    }
}
