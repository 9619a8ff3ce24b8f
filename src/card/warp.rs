use crate::board::{Board, GridPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Deduplicated, in-bounds, non-impassable subset of the proposed
/// destinations, in first-seen order. Without a proposal every
/// traversable tile is a destination.
pub fn sanitize_warp_targets(raw: Option<&[GridPoint]>, board: &Board) -> Vec<GridPoint> {
    let Some(raw) = raw else {
        return board.traversable_points();
    };

    let mut seen = HashSet::new();
    raw.iter()
        .copied()
        .filter(|point| board.is_traversable(*point) && seen.insert(*point))
        .collect()
}

/// Hands out fixed-warp destinations by cycling through a sanitized pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpTargetPool {
    targets: Vec<GridPoint>,
    cursor: usize,
    last: Option<GridPoint>,
}

impl WarpTargetPool {
    pub fn new(targets: Vec<GridPoint>) -> Self {
        WarpTargetPool {
            targets,
            cursor: 0,
            last: None,
        }
    }

    pub fn targets(&self) -> &[GridPoint] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Next destination; never the previous one when two or more exist
    pub fn next_target(&mut self) -> Option<GridPoint> {
        if self.targets.is_empty() {
            return None;
        }
        let mut target = self.targets[self.cursor % self.targets.len()];
        self.cursor += 1;
        if self.targets.len() >= 2 && self.last == Some(target) {
            target = self.targets[self.cursor % self.targets.len()];
            self.cursor += 1;
        }
        self.last = Some(target);
        Some(target)
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardLayout;

    fn p(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    #[test]
    fn test_sanitize_filters_and_dedups_in_order() {
        let layout = BoardLayout {
            impassable: [p(1, 1)].into_iter().collect(),
            ..BoardLayout::default()
        };
        let board = Board::with_layout(3, &layout);
        let raw = [p(2, 2), p(5, 0), p(1, 1), p(0, 1), p(2, 2), p(-1, 0), p(0, 0)];

        assert_eq!(
            sanitize_warp_targets(Some(&raw), &board),
            vec![p(2, 2), p(0, 1), p(0, 0)]
        );
    }

    #[test]
    fn test_missing_list_uses_every_traversable_tile() {
        let layout = BoardLayout {
            impassable: [p(0, 0)].into_iter().collect(),
            ..BoardLayout::default()
        };
        let board = Board::with_layout(2, &layout);
        assert_eq!(
            sanitize_warp_targets(None, &board),
            vec![p(1, 0), p(0, 1), p(1, 1)]
        );
    }

    #[test]
    fn test_empty_list_stays_empty() {
        let board = Board::new(3);
        assert!(sanitize_warp_targets(Some(&[]), &board).is_empty());
    }

    #[test]
    fn test_pool_cycles_without_immediate_repeats() {
        let mut pool = WarpTargetPool::new(vec![p(0, 0), p(1, 1), p(2, 2)]);
        let drawn: Vec<_> = (0..7).filter_map(|_| pool.next_target()).collect();
        assert_eq!(
            drawn,
            vec![p(0, 0), p(1, 1), p(2, 2), p(0, 0), p(1, 1), p(2, 2), p(0, 0)]
        );
        for pair in drawn.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }

        pool.rewind();
        assert_eq!(pool.next_target(), Some(p(0, 0)));
    }

    #[test]
    fn test_single_target_pool_repeats() {
        let mut pool = WarpTargetPool::new(vec![p(3, 3)]);
        assert_eq!(pool.next_target(), Some(p(3, 3)));
        assert_eq!(pool.next_target(), Some(p(3, 3)));
        assert!(WarpTargetPool::new(Vec::new()).next_target().is_none());
    }
}
