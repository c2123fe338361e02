//! Dashboard view: today's entry form, streak, stats and recent wins.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use wins_core::{entry::Category, streak::StreakView};

use super::{category_color, muted, panel};
use crate::{
  app::{Dashboard, Loadable},
  form::{CATEGORIES, EntryForm},
};

const LOADING: &str = "Loading…";

pub fn draw(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
  // Left: entry form. Right: streak, stats, recent wins.
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(area);

  let right = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(5), // streak
      Constraint::Length(5), // stats
      Constraint::Min(0),    // recent wins
    ])
    .split(cols[1]);

  draw_entry_form(f, cols[0], dashboard);
  draw_streak(f, right[0], &dashboard.streak);
  draw_stats(f, right[1], dashboard);
  draw_recent(f, right[2], dashboard);
}

// ─── Entry form ───────────────────────────────────────────────────────────────

fn placeholder(category: Category) -> &'static str {
  match category {
    Category::Work => "What did you accomplish at work today?",
    Category::Personal => "What made you smile today?",
    Category::Growth => "What did you learn today?",
  }
}

fn draw_entry_form(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
  let form = &dashboard.entry;
  let block = panel(&dashboard.today.format("%A, %B %-d").to_string());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut constraints = vec![Constraint::Length(2)];
  constraints.extend(CATEGORIES.iter().map(|_| Constraint::Min(4)));
  constraints.push(Constraint::Length(1));
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints)
    .split(inner);

  f.render_widget(Paragraph::new(Line::from(muted("What went well today?"))), rows[0]);

  for (idx, category) in CATEGORIES.into_iter().enumerate() {
    draw_win_field(f, rows[idx + 1], form, category);
  }

  let button_style = if form.can_save() {
    Style::default()
      .fg(Color::Black)
      .bg(Color::Yellow)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      format!("[ ✨ {} ]", form.button_label()),
      button_style,
    )))
    .centered(),
    rows[CATEGORIES.len() + 1],
  );
}

fn draw_win_field(f: &mut Frame, area: Rect, form: &EntryForm, category: Category) {
  let field = form.field(category);
  let focused = form.focused() == category;
  let color = category_color(category);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);

  let title = format!("{category} Win");
  let counter = field.counter().unwrap_or_default();
  let pad = rows[0]
    .width
    .saturating_sub(title.chars().count() as u16 + 2)
    .saturating_sub(counter.len() as u16);
  let label_style = if focused {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(color)
  };
  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::styled("● ", Style::default().fg(color)),
      Span::styled(title, label_style),
      Span::raw(" ".repeat(pad as usize)),
      muted(counter),
    ])),
    rows[0],
  );

  let mut spans = if field.is_empty() {
    vec![muted(placeholder(category))]
  } else {
    vec![Span::raw(field.value().to_owned())]
  };
  if focused {
    spans.push(Span::styled("▏", Style::default().fg(color)));
  }
  let border = if focused {
    Style::default().fg(color)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  f.render_widget(
    Paragraph::new(Line::from(spans))
      .wrap(Wrap { trim: false })
      .block(Block::default().borders(Borders::ALL).border_style(border)),
    rows[1],
  );
}

// ─── Streak ───────────────────────────────────────────────────────────────────

fn draw_streak(f: &mut Frame, area: Rect, streak: &Loadable<StreakView>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);

  let Some(view) = streak.ready() else {
    for (col, title) in cols.iter().zip(["🔥 Current Streak", "🏆 Best Streak"]) {
      f.render_widget(Paragraph::new(muted(LOADING)).block(panel(title)), *col);
    }
    return;
  };

  let card = |value: u32, caption: &str, color: Color| {
    vec![
      Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
      )),
      Line::from(muted(caption.to_owned())),
    ]
  };

  f.render_widget(
    Paragraph::new(card(view.current_streak, view.milestone.message(), Color::Green))
      .block(panel("🔥 Current Streak")),
    cols[0],
  );
  f.render_widget(
    Paragraph::new(card(view.longest_streak, &view.record_caption, Color::Yellow))
      .block(panel("🏆 Best Streak")),
    cols[1],
  );
}

// ─── Stats ────────────────────────────────────────────────────────────────────

fn draw_stats(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Ratio(1, 3),
      Constraint::Ratio(1, 3),
      Constraint::Ratio(1, 3),
    ])
    .split(area);

  let titles = ["Total Wins", "Top Category", "Status"];
  let values = match dashboard.stats.ready() {
    Some(stats) => [
      stats.total_entries.to_string(),
      stats.top_category_label(),
      stats.status.to_string(),
    ],
    None => [LOADING.to_owned(), LOADING.to_owned(), LOADING.to_owned()],
  };

  for ((col, title), value) in cols.iter().zip(titles).zip(values) {
    f.render_widget(
      Paragraph::new(Span::styled(value, Style::default().add_modifier(Modifier::BOLD)))
        .block(panel(title)),
      *col,
    );
  }
}

// ─── Recent wins ──────────────────────────────────────────────────────────────

fn draw_recent(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
  let block = panel("Recent Wins");

  let lines: Vec<Line> = match dashboard.recent.ready() {
    None => vec![Line::from(muted(LOADING))],
    Some(entries) if entries.is_empty() => vec![Line::from(muted(
      "No wins recorded yet. Start tracking your victories today!",
    ))],
    Some(entries) => {
      let mut lines = Vec::new();
      for entry in entries {
        lines.push(Line::from(Span::styled(
          entry.date.format("%A, %b %-d").to_string(),
          Style::default().add_modifier(Modifier::BOLD),
        )));
        for (category, win) in entry.wins() {
          lines.push(Line::from(vec![
            Span::styled(format!("  {category}: "), Style::default().fg(category_color(category))),
            Span::raw(win.to_owned()),
          ]));
        }
        lines.push(Line::from(""));
      }
      lines
    }
  };

  f.render_widget(
    Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
    area,
  );
}
