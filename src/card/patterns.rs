use crate::board::{Board, GridPoint, MoveVector};
use crate::card::types::{DealtCard, MoveCard};

/// Bounds and traversability queries needed to resolve a card
pub trait ResolutionContext {
    fn contains(&self, point: GridPoint) -> bool;
    fn is_traversable(&self, point: GridPoint) -> bool;
}

impl ResolutionContext for Board {
    fn contains(&self, point: GridPoint) -> bool {
        Board::contains(self, point)
    }

    fn is_traversable(&self, point: GridPoint) -> bool {
        Board::is_traversable(self, point)
    }
}

/// Shape of a movement identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePattern {
    /// Independent jumps, listed by priority
    Steps(&'static [MoveVector]),
    /// Slide in one direction until blocked
    Ray(MoveVector),
    /// Jump straight to the destination bound on the card
    FixedWarp,
}

/// One way a card can be played: the full route and the displacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    pub vector: MoveVector,
    pub path: Vec<GridPoint>,
}

impl CandidatePath {
    pub fn destination(&self) -> Option<GridPoint> {
        self.path.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

mod vectors {
    use crate::board::MoveVector;

    pub const UP: MoveVector = MoveVector { dx: 0, dy: 1 };
    pub const UP_RIGHT: MoveVector = MoveVector { dx: 1, dy: 1 };
    pub const RIGHT: MoveVector = MoveVector { dx: 1, dy: 0 };
    pub const DOWN_RIGHT: MoveVector = MoveVector { dx: 1, dy: -1 };
    pub const DOWN: MoveVector = MoveVector { dx: 0, dy: -1 };
    pub const DOWN_LEFT: MoveVector = MoveVector { dx: -1, dy: -1 };
    pub const LEFT: MoveVector = MoveVector { dx: -1, dy: 0 };
    pub const UP_LEFT: MoveVector = MoveVector { dx: -1, dy: 1 };

    pub const KNIGHT_UP2_RIGHT1: MoveVector = MoveVector { dx: 1, dy: 2 };
    pub const KNIGHT_UP2_LEFT1: MoveVector = MoveVector { dx: -1, dy: 2 };
    pub const KNIGHT_UP1_RIGHT2: MoveVector = MoveVector { dx: 2, dy: 1 };
    pub const KNIGHT_UP1_LEFT2: MoveVector = MoveVector { dx: -2, dy: 1 };
    pub const KNIGHT_DOWN2_RIGHT1: MoveVector = MoveVector { dx: 1, dy: -2 };
    pub const KNIGHT_DOWN2_LEFT1: MoveVector = MoveVector { dx: -1, dy: -2 };
    pub const KNIGHT_DOWN1_RIGHT2: MoveVector = MoveVector { dx: 2, dy: -1 };
    pub const KNIGHT_DOWN1_LEFT2: MoveVector = MoveVector { dx: -2, dy: -1 };

    pub const UP2: MoveVector = MoveVector { dx: 0, dy: 2 };
    pub const DOWN2: MoveVector = MoveVector { dx: 0, dy: -2 };
    pub const RIGHT2: MoveVector = MoveVector { dx: 2, dy: 0 };
    pub const LEFT2: MoveVector = MoveVector { dx: -2, dy: 0 };

    pub const UP_RIGHT2: MoveVector = MoveVector { dx: 2, dy: 2 };
    pub const UP_LEFT2: MoveVector = MoveVector { dx: -2, dy: 2 };
    pub const DOWN_RIGHT2: MoveVector = MoveVector { dx: 2, dy: -2 };
    pub const DOWN_LEFT2: MoveVector = MoveVector { dx: -2, dy: -2 };
}

impl MoveCard {
    pub fn pattern(&self) -> MovePattern {
        use vectors::*;
        use MoveCard::*;
        use MovePattern::{Ray, Steps};
        match self {
            KingUp => Steps(&[UP]),
            KingUpRight => Steps(&[UP_RIGHT]),
            KingRight => Steps(&[RIGHT]),
            KingDownRight => Steps(&[DOWN_RIGHT]),
            KingDown => Steps(&[DOWN]),
            KingDownLeft => Steps(&[DOWN_LEFT]),
            KingLeft => Steps(&[LEFT]),
            KingUpLeft => Steps(&[UP_LEFT]),

            KnightUp2Right1 => Steps(&[KNIGHT_UP2_RIGHT1]),
            KnightUp2Left1 => Steps(&[KNIGHT_UP2_LEFT1]),
            KnightUp1Right2 => Steps(&[KNIGHT_UP1_RIGHT2]),
            KnightUp1Left2 => Steps(&[KNIGHT_UP1_LEFT2]),
            KnightDown2Right1 => Steps(&[KNIGHT_DOWN2_RIGHT1]),
            KnightDown2Left1 => Steps(&[KNIGHT_DOWN2_LEFT1]),
            KnightDown1Right2 => Steps(&[KNIGHT_DOWN1_RIGHT2]),
            KnightDown1Left2 => Steps(&[KNIGHT_DOWN1_LEFT2]),

            StraightUp2 => Steps(&[UP2]),
            StraightDown2 => Steps(&[DOWN2]),
            StraightRight2 => Steps(&[RIGHT2]),
            StraightLeft2 => Steps(&[LEFT2]),

            DiagonalUpRight2 => Steps(&[UP_RIGHT2]),
            DiagonalUpLeft2 => Steps(&[UP_LEFT2]),
            DiagonalDownRight2 => Steps(&[DOWN_RIGHT2]),
            DiagonalDownLeft2 => Steps(&[DOWN_LEFT2]),

            KingUpOrDown => Steps(&[UP, DOWN]),
            KingLeftOrRight => Steps(&[RIGHT, LEFT]),
            KingUpwardDiagonalChoice => Steps(&[UP_RIGHT, UP_LEFT]),
            KingDownwardDiagonalChoice => Steps(&[DOWN_RIGHT, DOWN_LEFT]),
            KnightUpwardChoice => Steps(&[
                KNIGHT_UP2_RIGHT1,
                KNIGHT_UP2_LEFT1,
                KNIGHT_UP1_RIGHT2,
                KNIGHT_UP1_LEFT2,
            ]),
            KnightDownwardChoice => Steps(&[
                KNIGHT_DOWN2_RIGHT1,
                KNIGHT_DOWN2_LEFT1,
                KNIGHT_DOWN1_RIGHT2,
                KNIGHT_DOWN1_LEFT2,
            ]),

            RayUp => Ray(UP),
            RayUpRight => Ray(UP_RIGHT),
            RayRight => Ray(RIGHT),
            RayDownRight => Ray(DOWN_RIGHT),
            RayDown => Ray(DOWN),
            RayDownLeft => Ray(DOWN_LEFT),
            RayLeft => Ray(LEFT),
            RayUpLeft => Ray(UP_LEFT),

            FixedWarp => MovePattern::FixedWarp,
        }
    }

    /// Number of alternatives the card offers before any filtering
    pub fn candidate_count(&self) -> usize {
        match self.pattern() {
            MovePattern::Steps(steps) => steps.len(),
            MovePattern::Ray(_) | MovePattern::FixedWarp => 1,
        }
    }
}

impl MovePattern {
    /// Candidate paths from `origin`, in priority order.
    ///
    /// Steps drop out-of-bounds targets. A ray always yields exactly one
    /// candidate, empty when its first step is blocked. A fixed warp yields
    /// its bound destination regardless of visit state, or nothing when no
    /// destination is bound.
    pub fn resolve_paths<C>(
        &self,
        origin: GridPoint,
        destination: Option<GridPoint>,
        ctx: &C,
    ) -> Vec<CandidatePath>
    where
        C: ResolutionContext + ?Sized,
    {
        match *self {
            MovePattern::Steps(steps) => steps
                .iter()
                .filter_map(|&vector| {
                    let target = origin.offset(vector);
                    ctx.contains(target).then(|| CandidatePath {
                        vector,
                        path: vec![target],
                    })
                })
                .collect(),
            MovePattern::Ray(direction) => {
                let mut path = Vec::new();
                let mut cursor = origin;
                loop {
                    let next = cursor.offset(direction);
                    if !ctx.contains(next) || !ctx.is_traversable(next) {
                        break;
                    }
                    path.push(next);
                    cursor = next;
                }
                let vector = if path.is_empty() {
                    direction
                } else {
                    MoveVector::between(origin, cursor)
                };
                vec![CandidatePath { vector, path }]
            }
            MovePattern::FixedWarp => destination
                .map(|target| CandidatePath {
                    vector: MoveVector::between(origin, target),
                    path: vec![target],
                })
                .into_iter()
                .collect(),
        }
    }
}

impl DealtCard {
    pub fn resolve_paths<C>(&self, origin: GridPoint, ctx: &C) -> Vec<CandidatePath>
    where
        C: ResolutionContext + ?Sized,
    {
        self.card
            .pattern()
            .resolve_paths(origin, self.destination, ctx)
    }

    pub fn primary_vector<C>(&self, origin: GridPoint, ctx: &C) -> Option<MoveVector>
    where
        C: ResolutionContext + ?Sized,
    {
        self.resolve_paths(origin, ctx)
            .first()
            .map(|candidate| candidate.vector)
    }

    pub fn can_use<C>(&self, origin: GridPoint, ctx: &C) -> bool
    where
        C: ResolutionContext + ?Sized,
    {
        self.resolve_paths(origin, ctx)
            .iter()
            .any(|candidate| !candidate.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardLayout;

    fn p(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    fn board_with_walls(size: usize, walls: &[GridPoint]) -> Board {
        let layout = BoardLayout {
            impassable: walls.iter().copied().collect(),
            ..BoardLayout::default()
        };
        Board::with_layout(size, &layout)
    }

    #[test]
    fn test_every_identity_has_a_pattern() {
        for card in MoveCard::ALL {
            assert!(card.candidate_count() >= 1, "{card} has no candidates");
        }
    }

    #[test]
    fn test_single_step_filters_out_of_bounds() {
        let board = Board::new(5);
        let card = DealtCard::new(MoveCard::KingUp);
        assert_eq!(
            card.resolve_paths(p(2, 2), &board),
            vec![CandidatePath {
                vector: MoveVector::new(0, 1),
                path: vec![p(2, 3)],
            }]
        );
        assert!(card.resolve_paths(p(2, 4), &board).is_empty());
        assert!(!card.can_use(p(2, 4), &board));
    }

    #[test]
    fn test_choice_card_keeps_priority_order() {
        let board = Board::new(5);
        let card = DealtCard::new(MoveCard::KingUpOrDown);

        let both = card.resolve_paths(p(2, 2), &board);
        assert_eq!(both.len(), 2);
        assert_eq!(both[0].destination(), Some(p(2, 3)));
        assert_eq!(both[1].destination(), Some(p(2, 1)));
        assert_eq!(card.primary_vector(p(2, 2), &board), Some(MoveVector::new(0, 1)));

        let bottom_edge = card.resolve_paths(p(2, 0), &board);
        assert_eq!(bottom_edge.len(), 1);
        assert_eq!(bottom_edge[0].destination(), Some(p(2, 1)));
    }

    #[test]
    fn test_steps_keep_impassable_targets_for_later_filtering() {
        let board = board_with_walls(5, &[p(2, 3)]);
        let card = DealtCard::new(MoveCard::KingUp);
        assert_eq!(card.resolve_paths(p(2, 2), &board).len(), 1);
    }

    #[test]
    fn test_ray_stops_before_wall() {
        let board = board_with_walls(5, &[p(2, 4)]);
        let card = DealtCard::new(MoveCard::RayUp);
        let candidates = card.resolve_paths(p(2, 0), &board);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, vec![p(2, 1), p(2, 2), p(2, 3)]);
        assert_eq!(candidates[0].vector, MoveVector::new(0, 3));
    }

    #[test]
    fn test_ray_stops_at_edge() {
        let board = Board::new(5);
        let card = DealtCard::new(MoveCard::RayDownLeft);
        let candidates = card.resolve_paths(p(3, 2), &board);
        assert_eq!(candidates[0].path, vec![p(2, 1), p(1, 0)]);
    }

    #[test]
    fn test_blocked_ray_yields_one_empty_candidate() {
        let board = board_with_walls(5, &[p(3, 2)]);
        let card = DealtCard::new(MoveCard::RayRight);
        let candidates = card.resolve_paths(p(2, 2), &board);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].is_empty());
        assert_eq!(candidates[0].destination(), None);
        assert!(!card.can_use(p(2, 2), &board));
    }

    #[test]
    fn test_fixed_warp_resolves_bound_point_even_if_visited() {
        let mut board = Board::new(5);
        board.mark_visited(p(4, 4));
        let card = DealtCard::warp_to(p(4, 4));
        let candidates = card.resolve_paths(p(0, 0), &board);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, vec![p(4, 4)]);
        assert_eq!(candidates[0].vector, MoveVector::new(4, 4));
    }

    #[test]
    fn test_unbound_fixed_warp_has_no_candidates() {
        let board = Board::new(5);
        let card = DealtCard::new(MoveCard::FixedWarp);
        assert!(card.resolve_paths(p(0, 0), &board).is_empty());
    }
}
