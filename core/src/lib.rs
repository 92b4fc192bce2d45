//! Headless game-state engine for a single-player minesweeper board.
//!
//! Generation, hints, marks, flood-fill and chord reveals, and win/lose tracking, with no rendering dependency.
#![no_std]

extern crate alloc;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use hints::*;
pub use layout::*;
pub use mark::*;
pub use types::*;

mod config;
mod engine;
mod error;
mod generator;
mod hints;
mod layout;
mod mark;
mod types;
