use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus};

use super::posts;
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let searching = matches!(app.state, AppState::Searching);

    let constraints = if searching {
        vec![
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Search input
            Constraint::Min(5),    // Main content
            Constraint::Length(2), // Status bar
        ]
    } else {
        vec![
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Main content
            Constraint::Length(2), // Status bar
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);

    if searching {
        render_search_bar(frame, app, chunks[1]);
        posts::render(frame, app, chunks[2]);
        render_status_bar(frame, app, chunks[3]);
    } else {
        posts::render(frame, app, chunks[1]);
        render_status_bar(frame, app, chunks[2]);
    }

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, _app: &App, area: Rect) {
    let title = "  Postdeck";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let input_line = Line::from(vec![
        Span::styled("Search: ", styles::muted_style()),
        Span::styled(app.search_input.as_str(), styles::search_style()),
        Span::styled("_", styles::search_style()),
    ]);

    let block = Block::default()
        .title(" Search posts - [Enter] go, [Esc] cancel ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(input_line).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[/] search | [r]efresh | [L]ike | [l]ogin | [q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if app.loading {
        " Fetching posts... ".to_string()
    } else {
        format!(" {} posts ", app.posts.len())
    };

    let left_style = if app.status_message.is_some() {
        styles::error_style()
    } else {
        styles::muted_style()
    };

    let padding = area
        .width
        .saturating_sub(left_text.len() as u16 + shortcuts.len() as u16 + 2) as usize;

    let line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(shortcuts, styles::muted_style()),
        Span::raw(" "),
    ]);

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(44, 11, frame.area());

    frame.render_widget(Clear, area);

    let field = |label: &'static str, value: String, focused: bool| {
        Line::from(vec![
            Span::styled(
                label,
                if focused {
                    styles::highlight_style()
                } else {
                    styles::muted_style()
                },
            ),
            Span::raw(value),
            Span::raw(if focused { "_" } else { "" }),
        ])
    };

    let masked = "*".repeat(app.login_password.chars().count());

    let mut lines = vec![
        Line::from(""),
        field(
            "  Username: ",
            app.login_username.clone(),
            app.login_focus == LoginFocus::Username,
        ),
        field(
            "  Password: ",
            masked,
            app.login_focus == LoginFocus::Password,
        ),
        Line::from(""),
        Line::from(Span::styled(
            if app.login_focus == LoginFocus::Button {
                "  > [ Log in ]"
            } else {
                "    [ Log in ]"
            },
            if app.login_focus == LoginFocus::Button {
                styles::highlight_style()
            } else {
                styles::muted_style()
            },
        )),
        Line::from(""),
    ];

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  [Tab] switch | [Enter] submit | [Esc] skip",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(" Log in ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(46, 13, frame.area());

    frame.render_widget(Clear, area);

    let entries = [
        ("j / Down", "next post"),
        ("k / Up", "previous post"),
        ("PgUp / PgDn", "scroll by page"),
        ("/", "search posts"),
        ("r", "refresh current view"),
        ("L", "toggle like on selected post"),
        ("l", "log in"),
        ("q / Ctrl+C", "quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, desc) in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .title(" Help - [Esc] close ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// A fixed-size rect centered in `area`, clamped to its bounds
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
