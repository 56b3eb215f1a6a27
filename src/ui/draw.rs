// ui/draw.rs
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::message::MessageType;

use super::item_list::draw_item_list;
use super::item_sheet::draw_item_sheet;
use super::keymap::{APP_HINTS, HELP};
use super::utils::centered_rect;

pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 24;

const MESSAGE_ROWS: u16 = 7;

// Title, main panes, message log, key hints.
fn screen_layout(size: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(MESSAGE_ROWS),
            Constraint::Length(1),
        ])
        .split(size);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

fn main_panes(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);
    (chunks[0], chunks[1])
}

// Where the item sheet lands for a terminal of `size`.
pub fn sheet_area(size: Rect) -> Rect {
    let [_, main, _, _] = screen_layout(size);
    main_panes(main).1
}

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        let warning = Paragraph::new("Terminal too small. Please resize.")
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        f.render_widget(warning, size);
        return;
    }

    let [title_area, main_area, message_area, hint_area] = screen_layout(size);
    let (list_area, sheet_area) = main_panes(main_area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "CP2020 item sheets",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | {}", app.localizer().language())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(title, title_area);

    let mut list_state = app.list_state.clone();
    draw_item_list(
        f.buffer_mut(),
        app.store(),
        app.item_ids(),
        list_area,
        &mut list_state,
    );

    draw_sheet(f, app, sheet_area);
    draw_messages(f, app, message_area);

    let hints = Paragraph::new(APP_HINTS)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hints, hint_area);

    if app.show_help() {
        let help_area = centered_rect(60, 60, size);
        f.render_widget(Clear, help_area); // Clear the area behind the popup
        let help = Paragraph::new(HELP).block(
            Block::default()
                .border_type(BorderType::Rounded)
                .borders(Borders::ALL)
                .title(" Help "),
        );
        f.render_widget(help, help_area);
    }
}

fn draw_sheet(f: &mut Frame, app: &App, area: Rect) {
    let Some(sheet) = app.sheet() else {
        let empty = Paragraph::new("No items in the store.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .border_type(BorderType::Rounded)
                    .borders(Borders::ALL),
            );
        f.render_widget(empty, area);
        return;
    };

    match app.current_view() {
        Ok(view) => {
            let body_height = u16::try_from(sheet.body_height()).unwrap_or(u16::MAX);
            draw_item_sheet(
                f.buffer_mut(),
                &view,
                area,
                body_height,
                &sheet.activate_listeners(),
                app.localizer(),
            );
        }
        Err(e) => {
            let error = Paragraph::new(e.to_string())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .border_type(BorderType::Rounded)
                        .borders(Borders::ALL),
                );
            f.render_widget(error, area);
        }
    }
}

fn draw_messages(f: &mut Frame, app: &App, area: Rect) {
    let rows = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = app
        .messages()
        .recent(rows)
        .iter()
        .map(|message| {
            let color = match message.message_type {
                MessageType::Roll => Color::Green,
                MessageType::Update => Color::Cyan,
                MessageType::System => Color::White,
                MessageType::Error => Color::Red,
            };
            Line::from(vec![
                Span::styled(
                    message.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(message.content.clone(), Style::default().fg(color)),
            ])
        })
        .collect();

    let log = Paragraph::new(lines).block(
        Block::default()
            .border_type(BorderType::Rounded)
            .borders(Borders::ALL)
            .title(" Log "),
    );
    f.render_widget(log, area);
}
