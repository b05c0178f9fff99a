//! Domain types for the candle feed

pub mod candle;
pub mod pattern;

pub use candle::{Candle, Direction, Tick, Tint};
pub use pattern::{PatternHit, PatternKind};
