//! Terminal UI: rendering and keyboard input handling.

pub mod input;
pub mod posts;
pub mod render;
pub mod styles;
