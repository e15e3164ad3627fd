//! Application state management for Postdeck.
//!
//! This module contains the core `App` struct that manages all application
//! state: the login form, the fetched post list, search input, and the
//! background fetch channel.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::auth::TokenStore;
use crate::config::Config;
use crate::models::Post;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background fetch message channel.
/// Fetches are issued one at a time, so a small buffer is plenty.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Fixed message shown when a posts fetch fails, whatever the failure kind.
/// HTTP-level failures and network/parse errors are not distinguished to
/// the user; the distinction goes to the log.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch posts. Please try again later.";

pub fn can_add_username_char(s: &str) -> bool {
    s.chars().count() < MAX_USERNAME_LENGTH
}

pub fn can_add_password_char(s: &str) -> bool {
    s.chars().count() < MAX_PASSWORD_LENGTH
}

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    LoggingIn,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

// ============================================================================
// Background Fetch Results
// ============================================================================

/// Result types from background fetch tasks.
///
/// Each posts fetch is tagged with the sequence number it was issued under,
/// so a completion that has been superseded by a newer fetch can be
/// recognized and discarded.
enum FetchResult {
    /// Post list fetched successfully
    Posts(u64, Vec<Post>),
    /// Fetch failed (HTTP status, network, or parse); carries diagnostic text
    Failed(u64, String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub tokens: TokenStore,
    pub api: ApiClient,

    // UI state
    pub state: AppState,
    pub posts: Vec<Post>,
    pub selection: usize,
    pub search_input: String,
    /// Term the displayed list was fetched with (None = unfiltered)
    pub active_search: Option<String>,
    pub status_message: Option<String>,
    pub loading: bool,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Background fetch channel and sequencing
    fetch_seq: u64,
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
    initial_fetch_done: bool,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        // The base endpoint is injected configuration; the env var wins
        // over the config file for one-off runs against another deployment.
        let base_url = std::env::var("POSTDECK_BASE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| config.base_url.clone());
        debug!(base_url = %base_url, "API endpoint configured");

        let store_dir = Config::config_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut tokens = TokenStore::new(store_dir);
        if let Err(e) = tokens.load() {
            warn!(error = %e, "Failed to load stored tokens");
        }

        let api = ApiClient::new(&base_url)?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = config.last_username.clone().unwrap_or_default();

        // Show the login form first unless a token pair is already stored
        let state = if tokens.has_tokens() {
            AppState::Normal
        } else {
            AppState::LoggingIn
        };

        Ok(Self {
            config,
            tokens,
            api,

            state,
            posts: Vec::new(),
            selection: 0,
            search_input: String::new(),
            active_search: None,
            status_message: None,
            loading: false,

            login_username,
            login_password: String::new(),
            login_focus: LoginFocus::Username,
            login_error: None,

            fetch_seq: 0,
            fetch_rx: rx,
            fetch_tx: tx,
            initial_fetch_done: false,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Show the login overlay
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form.
    ///
    /// The fields are submitted as-is (the server is the validator). On
    /// success the token pair is persisted before the dashboard transition;
    /// on any failure - rejection or network error alike - the outcome is
    /// surfaced on the login form and nothing is stored.
    pub async fn attempt_login(&mut self) {
        let username = self.login_username.clone();
        let password = self.login_password.clone();

        self.login_error = None;

        match self.api.login(&username, &password).await {
            Ok(pair) => {
                if let Err(e) = self.tokens.save(pair) {
                    error!(error = %e, "Failed to persist tokens");
                    self.login_error = Some(format!("Could not save login: {}", e));
                    return;
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                info!("Login successful");
                self.enter_dashboard();
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(e.to_string());
            }
        }
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Enter the dashboard view, issuing the one-time initial fetch
    pub fn enter_dashboard(&mut self) {
        self.state = AppState::Normal;
        if !self.initial_fetch_done {
            self.initial_fetch_done = true;
            self.start_fetch(None);
        }
    }

    /// Spawn a background posts fetch.
    ///
    /// Each fetch carries a fresh sequence number. In-flight requests are
    /// not cancelled; a completion whose sequence is no longer current is
    /// dropped on arrival, so the display always reflects the most recently
    /// triggered fetch.
    pub fn start_fetch(&mut self, search: Option<String>) {
        self.fetch_seq += 1;
        let seq = self.fetch_seq;
        self.loading = true;
        self.active_search = search.clone();

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = match api.fetch_posts(search.as_deref()).await {
                Ok(posts) => FetchResult::Posts(seq, posts),
                Err(e) => FetchResult::Failed(seq, format!("{:#}", e)),
            };
            if tx.send(result).await.is_err() {
                error!("Failed to send fetch result - channel closed");
            }
        });
    }

    /// Normalized search term from form input: None when empty after trimming
    fn normalized_search(input: &str) -> Option<String> {
        let term = input.trim();
        (!term.is_empty()).then(|| term.to_string())
    }

    /// Submit the search form. Whitespace-only input triggers no fetch.
    pub fn submit_search(&mut self) {
        self.state = AppState::Normal;
        if let Some(term) = Self::normalized_search(&self.search_input) {
            self.start_fetch(Some(term));
        }
    }

    /// Re-run the fetch the displayed list came from
    pub fn refresh(&mut self) {
        self.start_fetch(self.active_search.clone());
    }

    /// Toggle the like on the selected post. Requires a stored access token.
    pub async fn toggle_selected_like(&mut self) {
        let Some(post) = self.posts.get(self.selection) else {
            return;
        };
        let Some(post_id) = post.id else {
            warn!("Selected post has no id, cannot toggle like");
            return;
        };

        let access = match self.tokens.access() {
            Some(token) => token.to_string(),
            None => {
                self.status_message = Some("Log in to like posts - press [l]".to_string());
                return;
            }
        };

        match self.api.toggle_like(post_id, &access).await {
            Ok(count) => {
                if let Some(post) = self.posts.get_mut(self.selection) {
                    post.likes_count = count;
                }
            }
            Err(e) => {
                error!(error = %e, post_id, "Like toggle failed");
                self.status_message = Some(format!("Could not update like: {}", e));
            }
        }
    }

    // =========================================================================
    // Background Task Processing
    // =========================================================================

    /// Drain completed background fetches and apply their results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.process_fetch_result(result);
        }
    }

    /// Apply a single fetch result, discarding superseded completions
    fn process_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Posts(seq, posts) => {
                if seq != self.fetch_seq {
                    debug!(seq, current = self.fetch_seq, "Discarding stale fetch result");
                    return;
                }
                self.loading = false;
                self.status_message = None;
                // The rendered list reflects exactly this fetch
                self.posts = posts;
                self.selection = 0;
            }
            FetchResult::Failed(seq, err) => {
                error!(error = %err, "Error fetching posts");
                if seq != self.fetch_seq {
                    return;
                }
                self.loading = false;
                self.status_message = Some(FETCH_FAILED_MESSAGE.to_string());
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select_next(&mut self) {
        if !self.posts.is_empty() {
            self.selection = (self.selection + 1).min(self.posts.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        if !self.posts.is_empty() {
            self.selection = (self.selection + PAGE_SCROLL_SIZE).min(self.posts.len() - 1);
        }
    }

    pub fn page_up(&mut self) {
        self.selection = self.selection.saturating_sub(PAGE_SCROLL_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(title: &str) -> Post {
        Post {
            id: Some(1),
            title: title.to_string(),
            content: "content".to_string(),
            author: "author".to_string(),
            created_at: "2024-03-05T00:00:00Z".to_string(),
            likes_count: 0,
        }
    }

    fn test_app() -> App {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        App {
            config: Config::default(),
            tokens: TokenStore::new(std::env::temp_dir()),
            api: ApiClient::new("http://example.com").expect("Failed to build client"),
            state: AppState::Normal,
            posts: Vec::new(),
            selection: 0,
            search_input: String::new(),
            active_search: None,
            status_message: None,
            loading: false,
            login_username: String::new(),
            login_password: String::new(),
            login_focus: LoginFocus::Username,
            login_error: None,
            fetch_seq: 0,
            fetch_rx: rx,
            fetch_tx: tx,
            initial_fetch_done: false,
        }
    }

    #[test]
    fn test_normalized_search() {
        assert_eq!(App::normalized_search("rust"), Some("rust".to_string()));
        assert_eq!(App::normalized_search("  rust  "), Some("rust".to_string()));
        assert_eq!(App::normalized_search(""), None);
        assert_eq!(App::normalized_search("   "), None);
    }

    #[test]
    fn test_current_fetch_result_is_applied() {
        let mut app = test_app();
        app.fetch_seq = 1;
        app.loading = true;

        app.process_fetch_result(FetchResult::Posts(1, vec![sample_post("A")]));
        assert_eq!(app.posts.len(), 1);
        assert_eq!(app.posts[0].title, "A");
        assert!(!app.loading);
    }

    #[test]
    fn test_stale_fetch_result_is_discarded() {
        let mut app = test_app();
        app.fetch_seq = 2;
        app.posts = vec![sample_post("current")];

        // A completion from fetch #1 arrives after fetch #2 was triggered
        app.process_fetch_result(FetchResult::Posts(1, vec![sample_post("stale")]));
        assert_eq!(app.posts.len(), 1);
        assert_eq!(app.posts[0].title, "current");

        // Same for a stale failure: it must not clobber the status line
        app.process_fetch_result(FetchResult::Failed(1, "late error".to_string()));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_fetch_failure_sets_fixed_message() {
        let mut app = test_app();
        app.fetch_seq = 1;
        app.loading = true;

        app.process_fetch_result(FetchResult::Failed(1, "connection refused".to_string()));
        assert_eq!(app.status_message.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert!(!app.loading);
    }

    #[test]
    fn test_results_replace_prior_list_wholesale() {
        let mut app = test_app();
        app.fetch_seq = 1;
        app.process_fetch_result(FetchResult::Posts(
            1,
            vec![sample_post("a"), sample_post("b")],
        ));
        app.selection = 1;

        app.fetch_seq = 2;
        app.process_fetch_result(FetchResult::Posts(2, vec![sample_post("c")]));
        assert_eq!(app.posts.len(), 1);
        assert_eq!(app.posts[0].title, "c");
        assert_eq!(app.selection, 0);
    }

    #[test]
    fn test_selection_bounds() {
        let mut app = test_app();
        app.posts = vec![sample_post("a"), sample_post("b")];

        app.select_next();
        app.select_next();
        assert_eq!(app.selection, 1);

        app.select_prev();
        app.select_prev();
        assert_eq!(app.selection, 0);

        app.page_down();
        assert_eq!(app.selection, 1);
        app.page_up();
        assert_eq!(app.selection, 0);
    }
}
