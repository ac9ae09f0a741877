// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]
// Clippy
#![warn(clippy::all)]

#[macro_use]
extern crate log;

pub mod config;
pub mod data;
pub mod moves;
pub mod state;
pub mod tree;
pub mod vec2d;

pub use crate::config::NeighborOrder;
pub use crate::data::Pos;
pub use crate::moves::{Move, Moves};
pub use crate::state::{BoardErr, BoardState};
pub use crate::tree::{NodeId, SearchTree};
pub use crate::vec2d::Vec2d;
