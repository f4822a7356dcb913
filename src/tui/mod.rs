// TUI module for rendering the terminal interface
pub mod colors;
pub mod host;
pub mod input;

// Re-exports
pub use colors::*;
pub use host::{popup_area, PopupWidget, TerminalHost, TerminalWorkspace, View};
pub use input::{handle_key_event, handle_popup_key, pressed_key, KeyAction, PopupAction};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::path::Path;

/// Renders the workspace and, when open, the picker popup on top
pub fn render(frame: &mut Frame, host: &mut TerminalHost, root: &Path) {
    host.set_screen(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Views
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], root);
    render_views(frame, chunks[1], host);
    render_footer(frame, chunks[2], host.status.as_deref());

    if let (Some(popup), Some(area)) = (host.popup.as_ref(), host.popup_area()) {
        render_popup(frame, area, popup);
    }
}

fn render_header(frame: &mut Frame, area: Rect, root: &Path) {
    let line = Line::from(vec![
        Span::styled(
            " Fpick ",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            root.display().to_string(),
            Style::default().fg(TEXT_SECONDARY),
        ),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );

    frame.render_widget(header, area);
}

fn render_views(frame: &mut Frame, area: Rect, host: &TerminalHost) {
    let workspace = &host.workspace;
    let mut items = vec![ListItem::new(Line::from(Span::styled(
        "[scratch]",
        Style::default().fg(TEXT_SECONDARY),
    )))];
    items.extend(workspace.views().iter().map(|view| {
        let mut spans = vec![Span::styled(
            view.path.display().to_string(),
            Style::default().fg(TEXT_PRIMARY),
        )];
        if view.is_modified() {
            spans.push(Span::styled(
                "  [modified]",
                Style::default().fg(ACCENT_PRIMARY),
            ));
        }
        ListItem::new(Line::from(spans))
    }));

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Views ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .highlight_style(
            Style::default()
                .fg(ACCENT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(workspace.current_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect, status: Option<&str>) {
    let line = match status {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(ACCENT_PRIMARY),
        )),
        None => Line::from(vec![
            Span::styled("^P ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled("Files", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("↑↓ ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Views", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("Enter ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Open", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
        ]),
    };

    let footer = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

fn render_popup(frame: &mut Frame, area: Rect, popup: &PopupWidget) {
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = popup
        .lines
        .iter()
        .map(|line| ListItem::new(line.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ", popup.title))
                .title_alignment(Alignment::Left)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .style(Style::default().fg(TEXT_PRIMARY))
        .highlight_style(
            Style::default()
                .bg(BG_SELECTED)
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        );

    let selected = (!popup.lines.is_empty()).then_some(popup.highlight);
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}
