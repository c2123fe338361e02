//! TUI rendering: orchestrates the header, the active view and toasts.

pub mod auth;
pub mod dashboard;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use wins_core::entry::Category;

use crate::app::{App, Screen, ToastKind};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match (app.screen(), &app.dashboard) {
    (Screen::Dashboard, Some(dashboard)) => dashboard::draw(f, rows[1], dashboard),
    _ => auth::draw(f, rows[1], &app.auth),
  }
  draw_status(f, rows[2], app);
  draw_toast(f, rows[1], app);
}

// ─── Shared styling ─────────────────────────────────────────────────────────

pub(crate) fn category_color(category: Category) -> Color {
  match category {
    Category::Work => Color::Blue,
    Category::Personal => Color::Magenta,
    Category::Growth => Color::Green,
  }
}

pub(crate) fn panel(title: &str) -> Block<'static> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

pub(crate) fn muted(text: impl Into<String>) -> Span<'static> {
  Span::styled(text.into(), Style::default().fg(Color::DarkGray))
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " ✨ Daily Wins",
    Style::default()
      .fg(Color::Yellow)
      .add_modifier(Modifier::BOLD),
  );

  let account = match app.signed_in() {
    Some(auth) => format!("{} ({})  ", auth.session.email, auth.initial()),
    None => String::new(),
  };
  let right = Span::styled(
    format!("{account}{date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.width() as u16;
  let right_width = right.width() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen() {
    Screen::Auth => (
      "AUTH",
      "Tab next field  F2/^T sign in ↔ sign up  Enter submit  Esc quit",
    ),
    Screen::Dashboard => (
      "TODAY",
      "Tab next field  Enter/^S save  ^R refresh  ^O sign out  Esc quit",
    ),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = muted(format!("  {hints}"));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Toast ────────────────────────────────────────────────────────────────────

fn draw_toast(f: &mut Frame, body: Rect, app: &App) {
  let Some(toast) = &app.toast else { return };

  let color = match toast.kind {
    ToastKind::Success => Color::Green,
    ToastKind::Error => Color::Red,
  };

  let mut lines = vec![Line::from(Span::styled(
    toast.title.clone(),
    Style::default().fg(color).add_modifier(Modifier::BOLD),
  ))];
  if let Some(detail) = &toast.detail {
    lines.push(Line::from(muted(detail.clone())));
  }

  let width = 44.min(body.width);
  let height = (lines.len() as u16 + 2).min(body.height);
  let area = Rect {
    x: body.x + body.width.saturating_sub(width + 1),
    y: body.y + body.height.saturating_sub(height + 1),
    width,
    height,
  };

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(color));
  f.render_widget(Clear, area);
  f.render_widget(
    Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
    area,
  );
}
