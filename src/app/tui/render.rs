use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Gauge, Padding, Paragraph, Row, Table, Wrap,
};

use crate::progress::{ProgressController, StorageBackend};

use super::super::format::{
    build_progress_gauge, format_chapter_dots, format_chapter_list, format_read_summary, truncate,
};
use super::TrackerState;

const ACCENT: Color = Color::Rgb(110, 170, 255);
const MUTED: Color = Color::Rgb(185, 195, 210);

pub(super) fn draw_tui<B: StorageBackend>(
    frame: &mut Frame,
    controller: &ProgressController<'_, B>,
    state: &mut TrackerState,
) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let total = state.total_chapters;
    let completed = controller.completed_chapters();
    let percentage = controller.progress_percentage(total);
    let is_complete = percentage == 100;

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "READTRACK",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            truncate(controller.book_id(), 32),
            Style::default().fg(Color::Rgb(230, 230, 230)),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format_read_summary(completed.len(), total),
            Style::default().fg(MUTED),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("{percentage}%"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Reading Progress"));
    frame.render_widget(header, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    let details_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(body_chunks[1]);

    let rows: Vec<Row> = (0..total)
        .map(|index| {
            let read = controller.is_chapter_completed(index);
            let status = if read { "✓ read" } else { "unread" };
            let style = if read {
                Style::default().fg(ACCENT)
            } else {
                Style::default().fg(MUTED)
            };
            Row::new(vec![
                Cell::from(format!("Chapter {}", index + 1)),
                Cell::from(status),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .header(
            Row::new(vec!["Chapter", "Status"])
                .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        )
        .block(panel_block("Chapters"))
        .row_highlight_style(
            Style::default()
                .bg(ACCENT)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, body_chunks[0], &mut state.table_state);

    let selected_text = state
        .selected_chapter()
        .map(|index| (index + 1).to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut details = format!(
        "Book\n{}\n\nSelected chapter\n{}\n\nRead chapters\n{}\n\n{}",
        truncate(controller.book_id(), 40),
        selected_text,
        truncate(&format_chapter_list(completed), 40),
        format_chapter_dots(completed, total),
    );
    if is_complete {
        details.push_str("\n\nCongratulations! You've completed this book!");
    }
    let selection = Paragraph::new(details)
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .wrap(Wrap { trim: true })
        .block(panel_block("Details"));
    frame.render_widget(selection, details_chunks[0]);

    if let Some((ratio, label)) = build_progress_gauge(completed.len(), total) {
        let gauge_color = if is_complete {
            Color::Rgb(120, 220, 150)
        } else {
            Color::Rgb(130, 190, 255)
        };
        let progress = Gauge::default()
            .block(panel_block("Progress"))
            .gauge_style(
                Style::default()
                    .fg(gauge_color)
                    .bg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .label(label)
            .ratio(ratio);
        frame.render_widget(progress, details_chunks[1]);
    }

    let controls = Paragraph::new(Line::from(Span::styled(
        "↑/↓ move  Enter/Space toggle  a mark all  r reset  q quit",
        Style::default().fg(MUTED),
    )))
    .alignment(Alignment::Center)
    .block(panel_block("Controls"));
    frame.render_widget(controls, chunks[2]);

    let status_widget = Paragraph::new(state.status.clone())
        .style(status_style(&state.status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[3]);

    if state.pending_reset {
        let popup_text = format!(
            "Reset reading progress?\n\n{}\n\n{} will be cleared.\n\n[y / Enter] Reset   [n / Esc] Cancel",
            truncate(controller.book_id(), 56),
            format_read_summary(completed.len(), total),
        );
        let popup_area = popup_rect_for_text(frame.area(), &popup_text);
        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(popup_text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(modal_block("Confirm Reset"));
        frame.render_widget(popup, popup_area);
    }
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(
            Style::default()
                .fg(Color::Rgb(160, 190, 235))
                .add_modifier(Modifier::BOLD),
        )
        .title(title)
        .padding(Padding::new(2, 2, 1, 1))
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(205, 165, 255))
    }
}

fn popup_rect_for_text(area: Rect, text: &str) -> Rect {
    let max_line_width = text
        .lines()
        .map(|line| line.chars().count() as u16)
        .max()
        .unwrap_or(0);
    let line_count = text.lines().count() as u16;

    let available_width = area.width.saturating_sub(2).max(1);
    let width = max_line_width
        .saturating_add(8)
        .clamp(40.min(available_width), 72.min(available_width));
    let available_height = area.height.saturating_sub(2).max(1);
    let height = line_count
        .saturating_add(4)
        .clamp(8.min(available_height), 16.min(available_height));

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
