//! Platform abstraction layer
//!
//! Translates browser input events into simulation intents.

pub mod input;

pub use input::{InputState, KeyAction, key_action};
