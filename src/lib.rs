//! Match-3 board engine (workspace facade crate).
//!
//! Re-exports `match3_board::{core,engine,types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use match3_core as core;
pub use match3_engine as engine;
pub use match3_types as types;
