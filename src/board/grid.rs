use crate::board::geometry::{BoardGeometry, GridPoint};
use crate::board::tiles::{validate_effects, TileEffect, TileState, VisitProgress, VisitTransition};
use std::collections::{BTreeMap, BTreeSet};

/// Everything needed to lay out a fresh board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub initial_visited: Vec<GridPoint>,
    pub required_visits: BTreeMap<GridPoint, u32>,
    pub toggles: BTreeSet<GridPoint>,
    pub impassable: BTreeSet<GridPoint>,
    pub effects: BTreeMap<GridPoint, TileEffect>,
}

/// Square board of tiles with an incrementally maintained count of
/// traversable tiles still to visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    tiles: Vec<TileState>,
    remaining: usize,
}

impl Board {
    /// Plain board: every tile needs one visit
    pub fn new(size: usize) -> Self {
        Self::with_layout(size, &BoardLayout::default())
    }

    pub fn with_layout(size: usize, layout: &BoardLayout) -> Self {
        let mut tiles: Vec<TileState> = BoardGeometry::all_points(size)
            .into_iter()
            .map(|point| {
                let progress = if layout.impassable.contains(&point) {
                    VisitProgress::Impassable
                } else if layout.toggles.contains(&point) {
                    VisitProgress::Toggle { visited: false }
                } else {
                    let required = layout
                        .required_visits
                        .get(&point)
                        .copied()
                        .filter(|&required| required >= 1)
                        .unwrap_or(1);
                    VisitProgress::MultiVisit { required, count: 0 }
                };
                TileState::new(progress)
            })
            .collect();

        for (point, effect) in validate_effects(size, &layout.impassable, &layout.effects) {
            if let Some(index) = BoardGeometry::index_of(size, point) {
                tiles[index].effect = Some(effect);
            }
        }

        for point in &layout.initial_visited {
            if let Some(index) = BoardGeometry::index_of(size, *point) {
                tiles[index].complete();
            }
        }

        let remaining = tiles
            .iter()
            .filter(|tile| !tile.is_impassable() && !tile.is_visited())
            .count();

        Board {
            size,
            tiles,
            remaining,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, point: GridPoint) -> bool {
        BoardGeometry::contains(self.size, point)
    }

    pub fn state(&self, point: GridPoint) -> Option<&TileState> {
        BoardGeometry::index_of(self.size, point).map(|index| &self.tiles[index])
    }

    pub fn effect(&self, point: GridPoint) -> Option<&TileEffect> {
        self.state(point).and_then(|tile| tile.effect.as_ref())
    }

    /// All registered effects in row-major order
    pub fn effects(&self) -> Vec<(GridPoint, &TileEffect)> {
        BoardGeometry::all_points(self.size)
            .into_iter()
            .zip(self.tiles.iter())
            .filter_map(|(point, tile)| tile.effect.as_ref().map(|effect| (point, effect)))
            .collect()
    }

    pub fn is_visited(&self, point: GridPoint) -> bool {
        self.state(point).is_some_and(TileState::is_visited)
    }

    pub fn is_impassable(&self, point: GridPoint) -> bool {
        self.state(point).is_some_and(TileState::is_impassable)
    }

    pub fn is_traversable(&self, point: GridPoint) -> bool {
        self.state(point).is_some_and(|tile| !tile.is_impassable())
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining == 0
    }

    /// Register one visit; impassable and out-of-bounds points are ignored
    pub fn mark_visited(&mut self, point: GridPoint) {
        let Some(index) = BoardGeometry::index_of(self.size, point) else {
            return;
        };
        match self.tiles[index].register_visit() {
            VisitTransition::BecameVisited => self.remaining -= 1,
            VisitTransition::BecameUnvisited => self.remaining += 1,
            VisitTransition::Unchanged => {}
        }
    }

    pub fn traversable_points(&self) -> Vec<GridPoint> {
        BoardGeometry::all_points(self.size)
            .into_iter()
            .filter(|point| self.is_traversable(*point))
            .collect()
    }

    pub fn visited_points(&self) -> Vec<GridPoint> {
        BoardGeometry::all_points(self.size)
            .into_iter()
            .filter(|point| self.is_visited(*point))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    #[test]
    fn test_plain_board_counts_every_tile() {
        let board = Board::new(5);
        assert_eq!(board.remaining_count(), 25);
        assert!(!board.is_cleared());
        assert!(board.state(p(5, 5)).is_none());
        assert!(board.effect(p(-1, 0)).is_none());
    }

    #[test]
    fn test_mark_visited_decrements_once() {
        let mut board = Board::new(3);
        board.mark_visited(p(1, 1));
        board.mark_visited(p(1, 1));
        assert_eq!(board.remaining_count(), 8);
        assert!(board.is_visited(p(1, 1)));
    }

    #[test]
    fn test_multi_visit_tile_needs_n_visits() {
        let layout = BoardLayout {
            required_visits: [(p(0, 0), 3)].into_iter().collect(),
            ..BoardLayout::default()
        };
        let mut board = Board::with_layout(2, &layout);
        assert_eq!(board.remaining_count(), 4);

        board.mark_visited(p(0, 0));
        board.mark_visited(p(0, 0));
        assert!(!board.is_visited(p(0, 0)));
        assert_eq!(board.remaining_count(), 4);

        board.mark_visited(p(0, 0));
        assert!(board.is_visited(p(0, 0)));
        assert_eq!(board.remaining_count(), 3);
        assert_eq!(board.state(p(0, 0)).unwrap().visit_count(), 3);
    }

    #[test]
    fn test_invalid_required_visit_override_falls_back_to_one() {
        let layout = BoardLayout {
            required_visits: [(p(0, 0), 0), (p(9, 9), 4)].into_iter().collect(),
            ..BoardLayout::default()
        };
        let board = Board::with_layout(2, &layout);
        assert_eq!(board.state(p(0, 0)).unwrap().required_visits(), 1);
    }

    #[test]
    fn test_toggle_tile_moves_remaining_both_ways() {
        let layout = BoardLayout {
            toggles: [p(1, 0)].into_iter().collect(),
            ..BoardLayout::default()
        };
        let mut board = Board::with_layout(2, &layout);
        board.mark_visited(p(1, 0));
        assert!(board.is_visited(p(1, 0)));
        assert_eq!(board.remaining_count(), 3);

        board.mark_visited(p(1, 0));
        assert!(!board.is_visited(p(1, 0)));
        assert_eq!(board.remaining_count(), 4);
    }

    #[test]
    fn test_impassable_tiles_are_excluded() {
        let layout = BoardLayout {
            impassable: [p(0, 0)].into_iter().collect(),
            initial_visited: vec![p(0, 0), p(1, 1)],
            ..BoardLayout::default()
        };
        let mut board = Board::with_layout(2, &layout);
        assert_eq!(board.remaining_count(), 2);
        assert!(!board.is_traversable(p(0, 0)));
        assert!(board.is_impassable(p(0, 0)));

        board.mark_visited(p(0, 0));
        assert_eq!(board.remaining_count(), 2);
        assert!(!board.is_visited(p(0, 0)));
        assert_eq!(board.traversable_points().len(), 3);
        assert_eq!(board.visited_points(), vec![p(1, 1)]);
    }

    #[test]
    fn test_one_sided_warp_is_absent_after_construction() {
        let mut effects = BTreeMap::new();
        effects.insert(
            p(0, 0),
            TileEffect::Warp {
                pair_id: "solo".to_string(),
                destination: p(2, 2),
            },
        );
        let layout = BoardLayout {
            effects,
            ..BoardLayout::default()
        };
        let board = Board::with_layout(3, &layout);
        assert!(board.effect(p(0, 0)).is_none());
        assert!(board.state(p(0, 0)).unwrap().effect.is_none());
        assert!(board.effects().is_empty());
    }

    #[test]
    fn test_clearing_board() {
        let mut board = Board::new(2);
        for point in BoardGeometry::all_points(2) {
            board.mark_visited(point);
        }
        assert!(board.is_cleared());
        assert_eq!(board.remaining_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_remaining_zero_iff_cleared(
            visits in prop::collection::vec((0i32..4, 0i32..4), 0..60),
            toggles in prop::collection::btree_set((0i32..4, 0i32..4), 0..4),
            walls in prop::collection::btree_set((0i32..4, 0i32..4), 0..3),
        ) {
            let layout = BoardLayout {
                toggles: toggles.into_iter().map(|(x, y)| p(x, y)).collect(),
                impassable: walls.into_iter().map(|(x, y)| p(x, y)).collect(),
                required_visits: [(p(3, 3), 2)].into_iter().collect(),
                ..BoardLayout::default()
            };
            let mut board = Board::with_layout(4, &layout);
            for (x, y) in visits {
                board.mark_visited(p(x, y));
                let unvisited = board
                    .traversable_points()
                    .into_iter()
                    .filter(|point| !board.is_visited(*point))
                    .count();
                prop_assert_eq!(board.remaining_count(), unvisited);
                prop_assert_eq!(board.remaining_count() == 0, board.is_cleared());
            }
        }
    }
}
