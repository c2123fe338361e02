//! Sign-in / sign-up view.

use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};
use wins_core::entry::Category;

use super::{category_color, muted, panel};
use crate::form::{AuthField, AuthForm, AuthMode};

pub fn draw(f: &mut Frame, area: Rect, form: &AuthForm) {
  let [card] = Layout::horizontal([Constraint::Length(52)])
    .flex(Flex::Center)
    .areas(area);
  let [card] = Layout::vertical([Constraint::Length(card_height(form))])
    .flex(Flex::Center)
    .areas(card);

  let block = panel("Daily Wins");
  let inner = block.inner(card);
  f.render_widget(block, card);

  let mut lines = vec![
    Line::from(muted("Track your victories, one day at a time")).centered(),
    Line::from(""),
    mode_tabs(form.mode),
    Line::from(""),
  ];

  for field in form.fields() {
    lines.push(Line::from(Span::styled(
      label(*field),
      Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(input_line(form, *field));
    if *field == AuthField::Password && form.mode == AuthMode::SignUp {
      lines.push(Line::from(muted("Minimum 6 characters")));
    }
    lines.push(Line::from(""));
  }

  lines.push(
    Line::from(Span::styled(
      format!("[ {} ]", form.submit_label()),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD),
    ))
    .centered(),
  );

  if form.mode == AuthMode::SignUp {
    lines.push(Line::from(""));
    lines.push(Line::from(muted("What you'll track:")).centered());
    for (category, text) in [
      (Category::Work, "Work victories"),
      (Category::Personal, "Personal joys"),
      (Category::Growth, "Growth moments"),
    ] {
      lines.push(Line::from(vec![
        Span::styled("  ● ", Style::default().fg(category_color(category))),
        muted(text),
      ]));
    }
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn card_height(form: &AuthForm) -> u16 {
  match form.mode {
    AuthMode::SignIn => 15,
    AuthMode::SignUp => 24,
  }
}

fn mode_tabs(mode: AuthMode) -> Line<'static> {
  let tab = |text: &'static str, active: bool| {
    if active {
      Span::styled(
        format!(" {text} "),
        Style::default()
          .fg(Color::Black)
          .bg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      )
    } else {
      muted(format!(" {text} "))
    }
  };
  Line::from(vec![
    tab("Sign In", mode == AuthMode::SignIn),
    Span::raw("   "),
    tab("Sign Up", mode == AuthMode::SignUp),
  ])
  .centered()
}

fn label(field: AuthField) -> &'static str {
  match field {
    AuthField::FullName => "Full Name",
    AuthField::Email => "Email",
    AuthField::Password => "Password",
  }
}

fn placeholder(field: AuthField) -> &'static str {
  match field {
    AuthField::FullName => "Your name",
    AuthField::Email => "you@example.com",
    AuthField::Password => "••••••••",
  }
}

fn input_line(form: &AuthForm, field: AuthField) -> Line<'static> {
  let focused = form.focus == field;
  let marker = if focused {
    Span::styled("▸ ", Style::default().fg(Color::Cyan))
  } else {
    Span::raw("  ")
  };

  let input = form.field(field);
  let text = if input.is_empty() {
    muted(placeholder(field))
  } else {
    Span::raw(input.display())
  };

  let mut spans = vec![marker, text];
  if focused {
    spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
  }
  Line::from(spans)
}
