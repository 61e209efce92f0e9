use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::state::{ChatRole, SUGGESTIONS};

const TITLE: &str = " TravelTour Chatbot ";
const SUBTITLE: &str = "RAG + Llama3 answers from the tour API";
const SEND_LABEL: &str = "Send";
const SEND_WIDTH: u16 = 10;
const MAX_BANNER_ROWS: usize = 3;

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c != '*' || chars.peek() != Some(&'*') {
            current_text.push(c);
            continue;
        }
        chars.next(); // second *

        // Find closing **
        let mut bold_text = String::new();
        let mut found_close = false;
        while let Some(c) = chars.next() {
            if c == '*' && chars.peek() == Some(&'*') {
                chars.next();
                found_close = true;
                break;
            }
            bold_text.push(c);
        }

        if found_close && !bold_text.is_empty() {
            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }
            spans.push(Span::styled(bold_text, Style::default().add_modifier(Modifier::BOLD)));
        } else {
            // No closing **, treat as literal
            current_text.push_str("**");
            current_text.push_str(&bold_text);
            if found_close {
                current_text.push_str("**");
            }
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let banner = app.last_error.as_deref().map(error_banner);
    let banner_height = banner
        .as_ref()
        .map_or(0, |b| b.line_count(area.width).min(MAX_BANNER_ROWS));
    let banner_height = u16::try_from(banner_height).unwrap_or(0);

    let [header_area, chat_area, banner_area, input_area, chips_area, footer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

    render_header(frame, header_area);
    render_thread(app, frame, chat_area);
    if let Some(banner) = banner {
        frame.render_widget(banner, banner_area);
    }
    render_input(app, frame, input_area);
    render_suggestions(app, frame, chips_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(Color::Cyan).bold()),
        Span::styled(SUBTITLE, Style::default().fg(Color::Gray)),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_thread(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store areas for mouse hit-testing and the inner size for scroll math
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let mut lines: Vec<Line> = Vec::new();
    for msg in &app.messages {
        lines.extend(bubble(msg.role, &msg.content));
    }
    if app.is_loading {
        lines.extend(typing_indicator(app.animation_frame));
    }

    // Measure with the same wrapping that renders, so following the tail lands on the last row
    let thread = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    let rows = thread.line_count(area.width.saturating_sub(2));
    app.thread_rows = u16::try_from(rows).unwrap_or(u16::MAX);
    app.scroll_to_bottom();

    let chat = thread.block(block).scroll((app.scroll, 0));

    frame.render_widget(chat, area);
}

/// One message: a role label, the content, and a blank separator line.
/// User messages sit on the right, assistant messages on the left.
fn bubble(role: ChatRole, content: &str) -> Vec<Line<'static>> {
    let (alignment, label_style, body_style) = match role {
        ChatRole::User => (
            Alignment::Right,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Cyan),
        ),
        ChatRole::Assistant => (
            Alignment::Left,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Style::default(),
        ),
    };

    let mut lines = vec![Line::from(Span::styled(format!("{}:", role.label()), label_style))
        .alignment(alignment)];
    for line in content.lines() {
        let parsed = match role {
            ChatRole::User => Line::from(line.to_string()),
            ChatRole::Assistant => parse_markdown_line(line),
        };
        lines.push(parsed.style(body_style).alignment(alignment));
    }
    lines.push(Line::default());
    lines
}

/// Three dots with one lit, cycling on each tick.
fn typing_indicator(frame: u8) -> Vec<Line<'static>> {
    let dots: Vec<Span> = (0..3u8)
        .flat_map(|i| {
            let style = if i == frame {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled("●", style), Span::raw(" ")]
        })
        .collect();

    vec![
        Line::from(Span::styled(
            format!("{}:", ChatRole::Assistant.label()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(dots),
    ]
}

fn error_banner(error: &str) -> Paragraph<'static> {
    Paragraph::new(format!("Error: {error}"))
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true })
}

/// The part of the draft that fits in `width` columns with the cursor in view,
/// plus the cursor's column inside it. Columns are display widths, so wide
/// glyphs take two and combining marks take none.
fn input_window(draft: &str, cursor: usize, width: usize) -> (String, u16) {
    let chars: Vec<char> = draft.chars().collect();
    let cursor = cursor.min(chars.len());
    let columns = |from: usize, to: usize| -> usize {
        chars[from..to].iter().map(|c| c.width().unwrap_or(0)).sum()
    };

    // Keep one column free for the cursor itself
    let mut start = 0;
    while start < cursor && columns(start, cursor) >= width {
        start += 1;
    }

    let mut used = 0;
    let visible: String = chars[start..]
        .iter()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect();

    (visible, u16::try_from(columns(start, cursor)).unwrap_or(u16::MAX))
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let [field_area, send_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(SEND_WIDTH)]).areas(area);
    app.send_area = Some(send_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Ask a question ");

    // Inner width = total width - 2 (for borders)
    let inner_width = field_area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = input_window(&app.draft_input, app.cursor, inner_width);

    let field = if app.draft_input.is_empty() {
        Paragraph::new("Type your question...").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };
    frame.render_widget(field.block(input_block), field_area);
    frame.set_cursor_position((field_area.x + cursor_x + 1, field_area.y + 1));

    // Dimmed while there is nothing to send or a request is in flight
    let send_style = if app.can_send() {
        Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let send = Paragraph::new(SEND_LABEL)
        .alignment(Alignment::Center)
        .style(send_style)
        .block(Block::default().borders(Borders::ALL).border_style(send_style));
    frame.render_widget(send, send_area);
}

fn render_suggestions(app: &mut App, frame: &mut Frame, area: Rect) {
    app.suggestion_areas.clear();

    let right = area.x + area.width;
    let mut x = area.x;
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        if x >= right {
            break;
        }
        let label = format!(" {}. {} ", i + 1, suggestion);
        let wanted = u16::try_from(label.chars().count()).unwrap_or(u16::MAX);
        let chip_area = Rect::new(x, area.y, wanted.min(right - x), 1);

        let chip = Paragraph::new(label).style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(chip, chip_area);
        app.suggestion_areas.push(chip_area);

        x = x.saturating_add(chip_area.width + 1);
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let footer_content = Line::from(vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", label_style),
        Span::styled(" Alt+1-3 ", key_style),
        Span::styled(" suggest ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Ctrl+L ", key_style),
        Span::styled(" clear ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
        Span::styled(format!("  API: {}", app.client.endpoint()), Style::default().fg(Color::DarkGray)),
    ]);

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
