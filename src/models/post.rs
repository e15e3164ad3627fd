use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::format_post_date;

/// A published blog post. Rendering-only: the client never mutates a post
/// locally except to apply a server-returned like count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: String,
    #[serde(default)]
    pub likes_count: u64,
}

impl Post {
    /// Creation date for display: "5 March 2024"
    pub fn formatted_date(&self) -> String {
        format_post_date(&self.created_at)
    }
}

/// Paginated envelope shape: `{ "count": ..., "results": [...] }`
#[derive(Debug, Deserialize)]
struct PaginatedPosts {
    results: Vec<Post>,
}

/// Parse a post-list payload, accepting either a bare array of posts or a
/// paginated envelope with a `results` field. Post order is preserved.
pub fn parse_post_list(text: &str) -> Result<Vec<Post>> {
    // Try parsing as a direct array first, then as the envelope
    if let Ok(posts) = serde_json::from_str::<Vec<Post>>(text) {
        return Ok(posts);
    }

    let page: PaginatedPosts =
        serde_json::from_str(text).context("Failed to parse post list response")?;
    Ok(page.results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_JSON: &str = r#"{"id": 7, "title": "A", "content": "B", "author": "C",
        "created_at": "2024-03-05T00:00:00Z", "likes_count": 3}"#;

    #[test]
    fn test_parse_single_post() {
        let post: Post = serde_json::from_str(POST_JSON).expect("Failed to parse post JSON");
        assert_eq!(post.id, Some(7));
        assert_eq!(post.title, "A");
        assert_eq!(post.content, "B");
        assert_eq!(post.author, "C");
        assert_eq!(post.likes_count, 3);
        assert_eq!(post.formatted_date(), "5 March 2024");
    }

    #[test]
    fn test_parse_bare_array() {
        let json = format!("[{}, {}]", POST_JSON, POST_JSON);
        let posts = parse_post_list(&json).expect("Failed to parse bare array");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "A");
    }

    #[test]
    fn test_parse_paginated_envelope() {
        let json = format!(
            r#"{{"count": 1, "next": null, "previous": null, "results": [{}]}}"#,
            POST_JSON
        );
        let posts = parse_post_list(&json).expect("Failed to parse envelope");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].author, "C");
    }

    #[test]
    fn test_parse_preserves_order() {
        let json = r#"[
            {"title": "first", "content": "", "author": "a", "created_at": "2024-01-01T00:00:00Z"},
            {"title": "second", "content": "", "author": "b", "created_at": "2024-01-02T00:00:00Z"},
            {"title": "third", "content": "", "author": "c", "created_at": "2024-01-03T00:00:00Z"}
        ]"#;
        let posts = parse_post_list(json).expect("Failed to parse");
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_parse_empty_both_shapes() {
        assert!(parse_post_list("[]").expect("bare").is_empty());
        assert!(parse_post_list(r#"{"results": []}"#).expect("envelope").is_empty());
    }

    #[test]
    fn test_missing_likes_count_defaults_to_zero() {
        let json = r#"[{"title": "t", "content": "c", "author": "a",
            "created_at": "2024-01-01T00:00:00Z"}]"#;
        let posts = parse_post_list(json).expect("Failed to parse");
        assert_eq!(posts[0].likes_count, 0);
    }
}
