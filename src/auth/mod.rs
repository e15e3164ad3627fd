//! Token persistence.
//!
//! Credentials themselves are never stored - they are read from the
//! login form, sent once, and discarded. Only the returned token pair
//! is persisted, and always as a unit.

pub mod tokens;

pub use tokens::{TokenPair, TokenStore};
