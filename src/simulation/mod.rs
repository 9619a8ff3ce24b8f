pub mod autoplay;

pub use autoplay::{run_game, AutoPlayer, GameResult};
