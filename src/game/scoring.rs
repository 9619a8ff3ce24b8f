/// Points charged per move or penalty
pub const POINTS_PER_MOVE: u64 = 10;

/// Moves and penalties count alike
pub fn total_move_count(move_count: u32, penalty_count: u32) -> u32 {
    move_count + penalty_count
}

/// Lower is better
pub fn score(move_count: u32, penalty_count: u32, elapsed_seconds: u64) -> u64 {
    u64::from(total_move_count(move_count, penalty_count)) * POINTS_PER_MOVE + elapsed_seconds
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_score_example() {
        assert_eq!(score(24, 5, 93), 383);
        assert_eq!(score(0, 0, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_score_formula(moves in 0u32..100_000, penalties in 0u32..100_000, elapsed in 0u64..10_000_000) {
            prop_assert_eq!(
                score(moves, penalties, elapsed),
                (u64::from(moves) + u64::from(penalties)) * 10 + elapsed
            );
            prop_assert_eq!(total_move_count(moves, penalties), moves + penalties);
        }
    }
}
