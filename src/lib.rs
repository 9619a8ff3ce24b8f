pub mod board;
pub mod card;
pub mod game;
pub mod regulation;
pub mod rng;
pub mod simulation;
