//! Data models for blog entities.
//!
//! - `Post`: a published post as returned by the posts endpoint
//! - `parse_post_list`: payload normalization for the two list shapes
//!   the endpoint produces (bare array or paginated envelope)

pub mod post;

pub use post::{parse_post_list, Post};
