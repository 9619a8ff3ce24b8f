pub mod catalog;
pub mod types;

pub use catalog::{Stage, StageCatalog};
pub use types::{
    PenaltySettings, PlacedEffect, Regulation, RegulationError, SpawnRule, VisitRequirement,
    WarpTargets,
};
