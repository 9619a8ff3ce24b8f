pub mod patterns;
pub mod types;
pub mod warp;

pub use patterns::{CandidatePath, MovePattern, ResolutionContext};
pub use types::{DealtCard, MoveCard, MoveCategory, MoveSignature};
pub use warp::{sanitize_warp_targets, WarpTargetPool};
