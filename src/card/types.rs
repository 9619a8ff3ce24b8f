use crate::board::GridPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight class of a movement identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCategory {
    King,
    Knight,
    Straight,
    LongDiagonal,
    Choice,
    Ray,
    Warp,
}

/// Movement identities that can appear on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCard {
    KingUp,
    KingUpRight,
    KingRight,
    KingDownRight,
    KingDown,
    KingDownLeft,
    KingLeft,
    KingUpLeft,

    KnightUp2Right1,
    KnightUp2Left1,
    KnightUp1Right2,
    KnightUp1Left2,
    KnightDown2Right1,
    KnightDown2Left1,
    KnightDown1Right2,
    KnightDown1Left2,

    StraightUp2,
    StraightDown2,
    StraightRight2,
    StraightLeft2,

    DiagonalUpRight2,
    DiagonalUpLeft2,
    DiagonalDownRight2,
    DiagonalDownLeft2,

    KingUpOrDown,
    KingLeftOrRight,
    KingUpwardDiagonalChoice,
    KingDownwardDiagonalChoice,
    KnightUpwardChoice,
    KnightDownwardChoice,

    RayUp,
    RayUpRight,
    RayRight,
    RayDownRight,
    RayDown,
    RayDownLeft,
    RayLeft,
    RayUpLeft,

    FixedWarp,
}

impl MoveCard {
    pub const ALL: [MoveCard; 39] = [
        MoveCard::KingUp,
        MoveCard::KingUpRight,
        MoveCard::KingRight,
        MoveCard::KingDownRight,
        MoveCard::KingDown,
        MoveCard::KingDownLeft,
        MoveCard::KingLeft,
        MoveCard::KingUpLeft,
        MoveCard::KnightUp2Right1,
        MoveCard::KnightUp2Left1,
        MoveCard::KnightUp1Right2,
        MoveCard::KnightUp1Left2,
        MoveCard::KnightDown2Right1,
        MoveCard::KnightDown2Left1,
        MoveCard::KnightDown1Right2,
        MoveCard::KnightDown1Left2,
        MoveCard::StraightUp2,
        MoveCard::StraightDown2,
        MoveCard::StraightRight2,
        MoveCard::StraightLeft2,
        MoveCard::DiagonalUpRight2,
        MoveCard::DiagonalUpLeft2,
        MoveCard::DiagonalDownRight2,
        MoveCard::DiagonalDownLeft2,
        MoveCard::KingUpOrDown,
        MoveCard::KingLeftOrRight,
        MoveCard::KingUpwardDiagonalChoice,
        MoveCard::KingDownwardDiagonalChoice,
        MoveCard::KnightUpwardChoice,
        MoveCard::KnightDownwardChoice,
        MoveCard::RayUp,
        MoveCard::RayUpRight,
        MoveCard::RayRight,
        MoveCard::RayDownRight,
        MoveCard::RayDown,
        MoveCard::RayDownLeft,
        MoveCard::RayLeft,
        MoveCard::RayUpLeft,
        MoveCard::FixedWarp,
    ];

    pub fn category(&self) -> MoveCategory {
        use MoveCard::*;
        match self {
            KingUp | KingUpRight | KingRight | KingDownRight | KingDown | KingDownLeft
            | KingLeft | KingUpLeft => MoveCategory::King,
            KnightUp2Right1 | KnightUp2Left1 | KnightUp1Right2 | KnightUp1Left2
            | KnightDown2Right1 | KnightDown2Left1 | KnightDown1Right2 | KnightDown1Left2 => {
                MoveCategory::Knight
            }
            StraightUp2 | StraightDown2 | StraightRight2 | StraightLeft2 => MoveCategory::Straight,
            DiagonalUpRight2 | DiagonalUpLeft2 | DiagonalDownRight2 | DiagonalDownLeft2 => {
                MoveCategory::LongDiagonal
            }
            KingUpOrDown
            | KingLeftOrRight
            | KingUpwardDiagonalChoice
            | KingDownwardDiagonalChoice
            | KnightUpwardChoice
            | KnightDownwardChoice => MoveCategory::Choice,
            RayUp | RayUpRight | RayRight | RayDownRight | RayDown | RayDownLeft | RayLeft
            | RayUpLeft => MoveCategory::Ray,
            FixedWarp => MoveCategory::Warp,
        }
    }

    /// Every identity in the given category, in catalog order
    pub fn in_category(category: MoveCategory) -> Vec<MoveCard> {
        Self::ALL
            .iter()
            .copied()
            .filter(|card| card.category() == category)
            .collect()
    }

    pub fn is_fixed_warp(&self) -> bool {
        self.category() == MoveCategory::Warp
    }

    pub fn name(&self) -> &'static str {
        use MoveCard::*;
        match self {
            KingUp => "King Up",
            KingUpRight => "King Up-Right",
            KingRight => "King Right",
            KingDownRight => "King Down-Right",
            KingDown => "King Down",
            KingDownLeft => "King Down-Left",
            KingLeft => "King Left",
            KingUpLeft => "King Up-Left",
            KnightUp2Right1 => "Knight Up 2 Right 1",
            KnightUp2Left1 => "Knight Up 2 Left 1",
            KnightUp1Right2 => "Knight Up 1 Right 2",
            KnightUp1Left2 => "Knight Up 1 Left 2",
            KnightDown2Right1 => "Knight Down 2 Right 1",
            KnightDown2Left1 => "Knight Down 2 Left 1",
            KnightDown1Right2 => "Knight Down 1 Right 2",
            KnightDown1Left2 => "Knight Down 1 Left 2",
            StraightUp2 => "Straight Up 2",
            StraightDown2 => "Straight Down 2",
            StraightRight2 => "Straight Right 2",
            StraightLeft2 => "Straight Left 2",
            DiagonalUpRight2 => "Diagonal Up-Right 2",
            DiagonalUpLeft2 => "Diagonal Up-Left 2",
            DiagonalDownRight2 => "Diagonal Down-Right 2",
            DiagonalDownLeft2 => "Diagonal Down-Left 2",
            KingUpOrDown => "King Up or Down",
            KingLeftOrRight => "King Left or Right",
            KingUpwardDiagonalChoice => "King Upward Diagonal",
            KingDownwardDiagonalChoice => "King Downward Diagonal",
            KnightUpwardChoice => "Knight Upward",
            KnightDownwardChoice => "Knight Downward",
            RayUp => "Ray Up",
            RayUpRight => "Ray Up-Right",
            RayRight => "Ray Right",
            RayDownRight => "Ray Down-Right",
            RayDown => "Ray Down",
            RayDownLeft => "Ray Down-Left",
            RayLeft => "Ray Left",
            RayUpLeft => "Ray Up-Left",
            FixedWarp => "Fixed Warp",
        }
    }
}

impl fmt::Display for MoveCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stacking key: identity plus, for fixed warps, the bound destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveSignature {
    pub card: MoveCard,
    pub destination: Option<GridPoint>,
}

/// A concrete card instance as dealt from the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealtCard {
    pub card: MoveCard,
    pub destination: Option<GridPoint>,
}

impl DealtCard {
    pub fn new(card: MoveCard) -> Self {
        DealtCard {
            card,
            destination: None,
        }
    }

    pub fn warp_to(destination: GridPoint) -> Self {
        DealtCard {
            card: MoveCard::FixedWarp,
            destination: Some(destination),
        }
    }

    pub fn signature(&self) -> MoveSignature {
        MoveSignature {
            card: self.card,
            destination: if self.card.is_fixed_warp() {
                self.destination
            } else {
                None
            },
        }
    }
}

impl From<MoveCard> for DealtCard {
    fn from(card: MoveCard) -> Self {
        DealtCard::new(card)
    }
}

impl fmt::Display for DealtCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.destination {
            Some(destination) => write!(f, "{} -> {}", self.card, destination),
            None => write!(f, "{}", self.card),
        }
    }
}
