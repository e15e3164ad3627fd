//! REST API client module for the blog service.
//!
//! This module provides the `ApiClient` for talking to the blog's
//! token and posts endpoints.
//!
//! Authentication is a JWT pair obtained from `api/token/`; the posts
//! list itself is readable without a token, but like toggling sends
//! the stored access token as a bearer credential.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
