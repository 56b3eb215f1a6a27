// ui/item_sheet.rs
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs, Widget, Wrap},
};
use strum::IntoEnumIterator;

use crate::item::ItemData;
use crate::localization::Localizer;
use crate::sheet::{ItemView, SheetAction, SheetTab};

use super::keymap::sheet_hint;

// Rows the sheet spends outside its body: outer border, header, tab bar, footer.
pub const SHEET_CHROME_ROWS: u16 = 8;

pub fn draw_item_sheet(
    buffer: &mut Buffer,
    view: &ItemView,
    area: Rect,
    body_height: u16,
    bindings: &[SheetAction],
    localizer: &Localizer,
) {
    let outer = Block::default()
        .border_type(BorderType::Rounded)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if view.editable {
            Color::Yellow
        } else {
            Color::DarkGray
        }))
        .title(format!(" {} ", view.item.name));
    let inner = outer.inner(area);
    outer.render(area, buffer);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(body_height),
            Constraint::Min(2),
        ])
        .split(inner);

    draw_header(buffer, view, chunks[0]);
    draw_tabs(buffer, view, chunks[1], localizer);
    match view.active_tab {
        SheetTab::Description => draw_description(buffer, view, chunks[2]),
        SheetTab::Details => draw_details(buffer, view, chunks[2]),
    }
    draw_footer(buffer, view, chunks[3], bindings, localizer);
}

fn label_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn draw_header(buffer: &mut Buffer, view: &ItemView, area: Rect) {
    let mut info = vec![
        Span::styled("Type: ", label_style()),
        Span::raw(view.item.type_tag()),
    ];
    if let Some(actor) = &view.actor {
        info.extend([
            Span::raw(" | "),
            Span::styled("Owner: ", label_style()),
            Span::raw(actor.clone()),
        ]);
    }

    Paragraph::new(Line::from(info))
        .block(
            Block::default()
                .border_type(BorderType::Rounded)
                .borders(Borders::ALL),
        )
        .alignment(Alignment::Center)
        .render(area, buffer);
}

fn draw_tabs(buffer: &mut Buffer, view: &ItemView, area: Rect, localizer: &Localizer) {
    let titles: Vec<String> = SheetTab::iter()
        .map(|tab| localizer.localize(tab.label_key()))
        .collect();
    let selected = SheetTab::iter()
        .position(|tab| tab == view.active_tab)
        .unwrap_or(0);
    Tabs::new(titles)
        .select(selected)
        .highlight_style(label_style())
        .render(area, buffer);
}

fn draw_description(buffer: &mut Buffer, view: &ItemView, area: Rect) {
    let text = if view.item.description.is_empty() {
        Line::from(Span::styled(
            "No description.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(view.item.description.clone())
    };
    Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .render(area, buffer);
}

fn draw_details(buffer: &mut Buffer, view: &ItemView, area: Rect) {
    let mut lines = detail_lines(view);
    lines.extend(option_lines(view));
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(area, buffer);
}

fn field(label: &str, value: impl ToString) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), label_style()),
        Span::raw(value.to_string()),
    ])
}

pub fn detail_lines(view: &ItemView) -> Vec<Line<'static>> {
    let item = &view.item;
    let mut lines = vec![field("Cost", item.cost), field("Weight", item.weight)];
    match &item.data {
        ItemData::Weapon(w) => lines.extend([
            field("Weapon type", w.weapon_type),
            field("Attack type", w.attack_type),
            field("WA", w.accuracy),
            field("Concealability", w.concealability),
            field("Availability", w.availability),
            field("Damage", &w.damage),
            field("Shots", format!("{}/{}", w.shots_left, w.shots)),
            field("ROF", w.rof),
            field("Reliability", w.reliability),
            field("Range", w.range),
            field("Attack skill", &w.attack_skill),
        ]),
        ItemData::Armor(a) => {
            for (location, sp) in &a.coverage {
                lines.push(field(location, format!("SP {sp}")));
            }
            lines.push(field("Encumbrance", a.encumbrance));
        }
        ItemData::Skill(s) => lines.extend([
            field("Stat", s.stat),
            field("Level", s.level),
            field("Role skill", if s.is_role_skill { "yes" } else { "no" }),
            field("Martial art", if s.martial { "yes" } else { "no" }),
        ]),
        ItemData::Cyberware(c) => lines.extend([
            field("Humanity cost", &c.humanity_cost),
            field("Humanity loss", c.humanity_loss),
            field("Surgery", &c.surgery),
            field("Cyberware type", &c.cyberware_type),
        ]),
        ItemData::Cyberdeck(d) => lines.extend([
            field("Deck type", d.deck_type),
            field("Memory", d.memory),
            field("Speed", d.speed),
            field("Data walls", d.data_walls),
        ]),
        ItemData::Program(p) => lines.extend([
            field("Class", p.program_class),
            field("Strength", p.strength),
            field("MU", p.mu),
        ]),
        ItemData::Vehicle(v) => lines.extend([
            field("Speed", format!("{}/{}", v.speed.value, v.speed.max)),
            field("Acceleration", v.speed.acceleration),
            field("Deceleration", v.speed.deceleration),
            field("SDP", v.sdp),
            field("SP", v.sp),
        ]),
        ItemData::Misc | ItemData::Unknown => {}
    }
    if let Some(focused) = view.focused_field {
        mark_focused(&mut lines, focused.label());
    }
    lines
}

fn mark_focused(lines: &mut [Line<'static>], label: &str) {
    let prefix = format!("{label}: ");
    let Some(line) = lines.iter_mut().find(|line| {
        line.spans
            .first()
            .is_some_and(|span| span.content.as_ref() == prefix)
    }) else {
        return;
    };
    for span in line.spans.iter_mut().skip(1) {
        span.style = span.style.add_modifier(Modifier::REVERSED);
    }
    line.spans
        .insert(0, Span::styled("> ", Style::default().fg(Color::Cyan)));
}

// One line per option list the view carries, with the record's current value highlighted.
fn option_lines(view: &ItemView) -> Vec<Line<'static>> {
    let current: Vec<String> = match &view.item.data {
        ItemData::Weapon(w) => vec![
            w.weapon_type.to_string(),
            w.attack_type.to_string(),
            w.concealability.to_string(),
            w.availability.to_string(),
            w.reliability.to_string(),
            w.attack_skill.clone(),
        ],
        ItemData::Skill(s) => vec![s.stat.to_string()],
        ItemData::Cyberdeck(d) => vec![d.deck_type.to_string()],
        ItemData::Program(p) => vec![p.program_class.to_string()],
        _ => Vec::new(),
    };

    let lists = [
        ("Weapon types", &view.weapon_types),
        ("Attack types", &view.attack_types),
        ("Concealability", &view.concealabilities),
        ("Availability", &view.availabilities),
        ("Reliability", &view.reliabilities),
        ("Attack skills", &view.attack_skills),
        ("Stats", &view.stats),
        ("Deck types", &view.cyberdeck_types),
        ("Program classes", &view.program_classes),
    ];

    let mut lines = Vec::new();
    if view.has_options() {
        lines.push(Line::from(""));
    }
    for (label, options) in lists {
        let Some(options) = options else { continue };
        let mut spans = vec![Span::styled(
            format!("{label}: "),
            Style::default().fg(Color::Green),
        )];
        if options.is_empty() {
            spans.push(Span::styled("none", Style::default().fg(Color::DarkGray)));
        }
        for (i, option) in options.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if current.contains(option) {
                label_style()
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(option.clone(), style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn draw_footer(
    buffer: &mut Buffer,
    view: &ItemView,
    area: Rect,
    bindings: &[SheetAction],
    localizer: &Localizer,
) {
    let hints = if view.editable {
        bindings
            .iter()
            .map(|action| sheet_hint(*action))
            .collect::<Vec<_>>()
            .join(" | ")
    } else {
        localizer.localize("SheetReadOnly")
    };
    Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center)
        .render(area, buffer);
}
