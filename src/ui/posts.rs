//! Dashboard posts view.
//!
//! Renders one block per post, in the order the server returned them:
//! title, content, author, creation date, like count. Every frame redraws
//! the whole list from the current post state.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::Post;
use crate::ui::styles;
use crate::utils::truncate;

/// Fixed message for an empty result list
pub const NO_POSTS_MESSAGE: &str = "No posts to display";

/// Longest search term echoed in the block title
const TITLE_SEARCH_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.active_search {
        Some(term) => format!(
            " Posts ({}) - search: \"{}\" ",
            app.posts.len(),
            truncate(term, TITLE_SEARCH_WIDTH)
        ),
        None => format!(" Posts ({}) ", app.posts.len()),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.posts.is_empty() {
        let message = if app.loading {
            "Fetching posts..."
        } else {
            NO_POSTS_MESSAGE
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .posts
        .iter()
        .map(|post| ListItem::new(post_lines(post)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Lines for a single post block
fn post_lines(post: &Post) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(Span::styled(
        post.title.as_str(),
        styles::title_style(),
    ))];

    for row in post.content.lines() {
        lines.push(Line::from(Span::raw(row)));
    }

    lines.push(Line::from(vec![
        Span::styled("Author: ", styles::muted_style()),
        Span::raw(post.author.as_str()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Created: ", styles::muted_style()),
        Span::raw(post.formatted_date()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Likes: ", styles::muted_style()),
        Span::raw(post.likes_count.to_string()),
    ]));
    lines.push(Line::from(""));

    lines
}
