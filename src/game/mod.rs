pub mod deck;
pub mod hand;
pub mod scoring;
pub mod state;
pub mod timer;
pub mod zones;

pub use deck::{Deck, DeckConfiguration, DeckError, DeckPreset, WeightReduction};
pub use hand::{HandManager, HandStack, StackId};
pub use state::{AvailableMove, GameCore, GameError, Progress, SessionSnapshot};
pub use timer::GameSessionTimer;
pub use zones::{DiscardPile, DrawPile};
