//! Move search and automated play on top of `match3-core`
//!
//! - [`search`]: legal swap enumeration and hints
//! - [`autoplay`]: a seeded player that drives a board through full cycles

pub mod autoplay;
pub mod search;

pub use autoplay::{Autoplayer, MoveError};
pub use search::{find_hint, legal_swaps, Swap};
