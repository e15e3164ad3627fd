//! API client for the blog REST API.
//!
//! This module provides the `ApiClient` struct for exchanging
//! credentials for a token pair and fetching the post list.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::TokenPair;
use crate::models::{parse_post_list, Post};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Response from the like toggle endpoint.
/// The server spells the key with a space: `{"likes count": 4}`
#[derive(Debug, Deserialize)]
struct LikesCountResponse {
    #[serde(rename = "likes count")]
    likes_count: u64,
}

/// API client for the blog service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        // Normalize to a trailing slash so Url::join keeps any base path
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url =
            Url::parse(&base).with_context(|| format!("Invalid base URL: {}", base_url))?;

        Ok(Self { client, base_url })
    }

    fn token_url(&self) -> Result<Url> {
        self.base_url
            .join("api/token/")
            .context("Failed to build token endpoint URL")
    }

    /// Build the posts list URL, appending a URL-encoded `search` query
    /// pair only when a term is given.
    fn posts_url(&self, search: Option<&str>) -> Result<Url> {
        let mut url = self
            .base_url
            .join("api/posts/")
            .context("Failed to build posts endpoint URL")?;
        if let Some(term) = search {
            url.query_pairs_mut().append_pair("search", term);
        }
        Ok(url)
    }

    fn toggle_like_url(&self, post_id: i64) -> Result<Url> {
        self.base_url
            .join(&format!("api/posts/{}/toggle_like/", post_id))
            .context("Failed to build like endpoint URL")
    }

    /// Check if a response is successful, returning an error with the body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Exchange credentials for a token pair.
    ///
    /// On a non-success status the server's `detail` message (when present)
    /// becomes the error's display text, so it can be surfaced verbatim.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let url = self.token_url()?;

        let response = self
            .client
            .post(url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .context("Failed to send login request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::login_rejection(status, &body).into());
        }

        let tokens: TokenPair = response
            .json()
            .await
            .context("Failed to parse token response")?;
        Ok(tokens)
    }

    /// Fetch the post list, optionally filtered by a search term.
    /// Accepts both payload shapes the endpoint produces.
    pub async fn fetch_posts(&self, search: Option<&str>) -> Result<Vec<Post>> {
        let url = self.posts_url(search)?;
        debug!(url = %url, "Fetching posts");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        let text = response
            .text()
            .await
            .context("Failed to read posts response body")?;
        parse_post_list(&text)
    }

    /// Toggle the caller's like on a post, returning the new count.
    pub async fn toggle_like(&self, post_id: i64, access_token: &str) -> Result<u64> {
        let url = self.toggle_like_url(post_id)?;
        debug!(post_id, "Toggling like");

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .send()
            .await
            .context("Failed to send like request")?;

        let response = Self::check_response(response).await?;

        let parsed: LikesCountResponse = response
            .json()
            .await
            .context("Failed to parse like count response")?;
        Ok(parsed.likes_count)
    }
}
