pub mod geometry;
pub mod grid;
pub mod tiles;

pub use geometry::{BoardGeometry, GridPoint, MoveVector};
pub use grid::{Board, BoardLayout};
pub use tiles::{TileEffect, TileState, VisitProgress};
