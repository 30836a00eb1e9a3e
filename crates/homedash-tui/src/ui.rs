//! UI rendering for the Homedash widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use homedash_core::{ConnectionState, Item, Status};

use crate::app::{App, Mode};
use crate::editor::{EditorState, Field, TestState};

const TILE_HEIGHT: u16 = 4;

/// Main UI rendering function.
pub fn draw(frame: &mut Frame, app: &App) {
    let mut constraints = vec![Constraint::Length(3)];
    if app.config.show_search {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut next = 0;
    draw_header(frame, app, chunks[next]);
    next += 1;
    if app.config.show_search {
        draw_search_bar(frame, app, chunks[next]);
        next += 1;
    }
    draw_content(frame, app, chunks[next]);
    draw_footer(frame, app, chunks[next + 1]);

    if let Some(editor) = &app.editor {
        draw_editor(frame, editor, frame.area());
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let badge_color = match app.connection {
        ConnectionState::Loading => Color::Yellow,
        ConnectionState::Connected => Color::Green,
        ConnectionState::Disconnected => Color::Red,
    };
    let dot = match app.connection {
        ConnectionState::Connected => "●",
        _ => "○",
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", app.config.title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{dot} {}", app.connection.label()),
            Style::default().fg(badge_color),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.mode == Mode::Search;
    let border_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let content = if active {
        format!("{}█", app.view.search_term)
    } else if app.view.search_term.is_empty() {
        "Press / to search".to_string()
    } else {
        app.view.search_term.clone()
    };

    let search = Paragraph::new(content)
        .style(if active || !app.view.search_term.is_empty() {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .border_style(border_style),
        );

    frame.render_widget(search, area);
}

fn draw_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.show_loading_screen() {
        draw_notice(frame, area, "Connecting...", Color::Yellow);
        return;
    }
    if app.show_error_screen() {
        let message = app.error.as_deref().unwrap_or("Connection failed");
        let lines = vec![
            Line::from(Span::styled(message, Style::default().fg(Color::Red))),
            Line::from(""),
            Line::from(Span::styled(
                "Press r to retry.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Error "));
        frame.render_widget(paragraph, area);
        return;
    }

    let arrangement = app.arrangement();
    if arrangement.is_empty() {
        let message = if app.config.selected_items.is_empty() {
            "No items selected. Press e to choose which items to show."
        } else if app.view.search_term.is_empty() {
            "None of the selected items are present on the server."
        } else {
            "No items match the search."
        };
        draw_notice(frame, area, message, Color::DarkGray);
        return;
    }

    let columns = app.config.effective_columns();
    let mut y = area.y;
    let mut index = 0;

    match arrangement {
        homedash_core::Arrangement::Flat(items) => {
            draw_tile_rows(frame, app, &items, area, &mut y, columns, &mut index);
        }
        homedash_core::Arrangement::Grouped(groups) => {
            for (name, items) in &groups {
                if y >= area.bottom() {
                    break;
                }
                let collapsed = app.view.is_collapsed(name);
                draw_section_header(frame, name, items.len(), collapsed, area, y);
                y += 1;
                if !collapsed {
                    draw_tile_rows(frame, app, items, area, &mut y, columns, &mut index);
                }
            }
        }
    }
}

fn draw_section_header(
    frame: &mut Frame,
    name: &str,
    count: usize,
    collapsed: bool,
    area: Rect,
    y: u16,
) {
    let marker = if collapsed { "▸" } else { "▾" };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{marker} {name}"),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({count})"), Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(header, Rect::new(area.x, y, area.width, 1));
}

fn draw_tile_rows(
    frame: &mut Frame,
    app: &App,
    items: &[&Item],
    area: Rect,
    y: &mut u16,
    columns: u16,
    index: &mut usize,
) {
    let tile_width = area.width / columns.max(1);
    for row in items.chunks(columns as usize) {
        if *y + TILE_HEIGHT > area.bottom() {
            // Clipped rows still advance the cursor index so highlight
            // positions stay stable.
            *index += row.len();
            continue;
        }
        for (col, item) in row.iter().enumerate() {
            let x = area.x + tile_width * u16::try_from(col).unwrap_or(0);
            let tile_area = Rect::new(x, *y, tile_width, TILE_HEIGHT);
            let selected = app.mode != Mode::Editor && *index == app.view.cursor;
            draw_tile(frame, app, item, selected, tile_area);
            *index += 1;
        }
        *y += TILE_HEIGHT;
    }
}

fn draw_tile(frame: &mut Frame, app: &App, item: &Item, selected: bool, area: Rect) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines = Vec::new();
    if app.config.show_status {
        let status = app.catalog.status_of(&item.id);
        let (dot, color, label) = match status {
            Status::Online => ("●", Color::Green, "online"),
            Status::Offline => ("●", Color::Red, "offline"),
            Status::Unknown => ("○", Color::DarkGray, "unknown"),
        };
        lines.push(Line::from(vec![
            Span::styled(dot, Style::default().fg(color)),
            Span::styled(format!(" {label}"), Style::default().fg(Color::DarkGray)),
        ]));
    }
    if let Some(desc) = &item.description {
        lines.push(Line::from(Span::styled(
            desc.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(url) = &item.url {
        lines.push(Line::from(Span::styled(
            url.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let tile = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", item.display_name()))
            .border_style(border_style),
    );
    frame.render_widget(tile, area);
}

fn draw_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(color),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.mode {
        Mode::Browse => {
            "  [↑↓] Move  [Enter] Open  [/] Search  [c] Collapse  [r] Refresh  [e] Edit  [q] Quit  "
        }
        Mode::Search => "  [Esc] Clear search  [Enter] Done  ",
        Mode::Editor => {
            "  [Tab] Next field  [Enter/Space] Edit or toggle  [t] Test  [f] Fetch  [s] Save  [Esc] Cancel  "
        }
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        help,
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn draw_editor(frame: &mut Frame, editor: &EditorState, area: Rect) {
    let popup = centered_rect(80, 90, area);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(popup);

    draw_editor_fields(frame, editor, chunks[0]);
    draw_editor_picker(frame, editor, chunks[1]);
    draw_editor_status(frame, editor, chunks[2]);
}

fn draw_editor_fields(frame: &mut Frame, editor: &EditorState, area: Rect) {
    let draft = editor.draft();
    let masked_key = draft
        .api_key
        .as_ref()
        .map_or_else(|| "(none)".to_string(), |k| "•".repeat(k.len()));

    let rows: [(Field, String, String); 9] = [
        (Field::Title, "Title".into(), draft.title.clone()),
        (Field::ServerUrl, "Server URL".into(), draft.server_url.clone()),
        (Field::ApiKey, "API key".into(), masked_key),
        (Field::Columns, "Columns".into(), draft.columns.to_string()),
        (
            Field::PollInterval,
            "Poll interval".into(),
            format!("{}s", draft.poll_interval),
        ),
        (
            Field::ShowSearch,
            "Search bar".into(),
            checkbox(draft.show_search),
        ),
        (
            Field::ShowCategories,
            "Categories".into(),
            checkbox(draft.show_categories),
        ),
        (
            Field::ShowStatus,
            "Status dots".into(),
            checkbox(draft.show_status),
        ),
        (
            Field::OpenInNewTab,
            "Open in new tab".into(),
            checkbox(draft.open_in_new_tab),
        ),
    ];

    let lines: Vec<Line> = rows
        .iter()
        .map(|(field, label, value)| {
            let focused = editor.focus() == *field;
            let label_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let mut value = value.clone();
            if focused && editor.is_editing() {
                value.push('█');
            }
            Line::from(vec![
                Span::styled(format!(" {label:<16}"), label_style),
                Span::styled(value, Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let fields = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Configure ")
            .title_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(fields, area);
}

fn draw_editor_picker(frame: &mut Frame, editor: &EditorState, area: Rect) {
    let focused = editor.focus() == Field::Items;
    let selected = editor.draft().selected_items.len();

    let items: Vec<ListItem> = if editor.items().is_empty() {
        vec![ListItem::new(Span::styled(
            " Press f to fetch the item list.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        editor
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let picked = editor.draft().selected_items.contains(&item.id);
                let cursor_here = focused && i == editor.item_cursor();
                let style = if cursor_here {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", checkbox(picked)), style),
                    Span::styled(item.label().to_string(), style),
                    Span::styled(
                        item.category
                            .as_deref()
                            .map(|c| format!("  ({c})"))
                            .unwrap_or_default(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Items ({selected} selected) "))
            .border_style(if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            }),
    );
    frame.render_widget(list, area);
}

fn draw_editor_status(frame: &mut Frame, editor: &EditorState, area: Rect) {
    let (text, color) = match editor.test() {
        TestState::Idle => (
            editor.message().unwrap_or("").to_string(),
            Color::DarkGray,
        ),
        TestState::Testing => ("Testing connection...".to_string(), Color::Yellow),
        TestState::Success => ("Connection OK".to_string(), Color::Green),
        TestState::Failed(reason) => (format!("Connection failed: {reason}"), Color::Red),
    };
    let status = Paragraph::new(Span::styled(text, Style::default().fg(color)))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn checkbox(on: bool) -> String {
    if on { "[x]".to_string() } else { "[ ]".to_string() }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
