//! Streak tracking: the count of consecutive calendar days with an entry.
//!
//! [`StreakState::transition`] is a pure function of the previous state and
//! the date being saved. It runs once per successful entry save.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user's persisted streak record.
///
/// `longest_streak >= current_streak` holds for every state produced by
/// [`StreakState::transition`] from a state that already satisfied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakState {
  pub current_streak:  u32,
  pub longest_streak:  u32,
  pub last_entry_date: Option<NaiveDate>,
}

/// How saving an entry for a given day relates to the previous state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreakChange {
  /// Today already has an entry; re-saving leaves the streak alone.
  SameDay,
  /// The day is earlier than the last entry date. The streak is left
  /// unchanged rather than reset.
  Backdated { last_entry_date: NaiveDate },
  /// No previous entry: the streak starts at one.
  Started,
  /// The day directly follows the last entry date.
  Extended,
  /// One or more days were skipped; the streak restarts at one.
  Broken { missed_days: i64 },
}

impl StreakChange {
  /// Whether the transition produces a state that must be written back.
  pub fn is_write(&self) -> bool {
    !matches!(self, Self::SameDay | Self::Backdated { .. })
  }
}

impl StreakState {
  pub fn classify(&self, today: NaiveDate) -> StreakChange {
    let Some(last) = self.last_entry_date else {
      return StreakChange::Started;
    };
    match (today - last).num_days() {
      0 => StreakChange::SameDay,
      1 => StreakChange::Extended,
      d if d > 1 => StreakChange::Broken { missed_days: d - 1 },
      _ => StreakChange::Backdated { last_entry_date: last },
    }
  }

  /// The state after saving an entry dated `today`.
  pub fn transition(&self, today: NaiveDate) -> StreakState {
    let current = match self.classify(today) {
      StreakChange::SameDay | StreakChange::Backdated { .. } => return *self,
      StreakChange::Extended => self.current_streak.saturating_add(1),
      StreakChange::Started | StreakChange::Broken { .. } => 1,
    };
    StreakState {
      current_streak:  current,
      longest_streak:  current.max(self.longest_streak),
      last_entry_date: Some(today),
    }
  }

  pub fn milestone(&self) -> Milestone { Milestone::for_streak(self.current_streak) }

  /// Caption under the best-streak counter.
  pub fn record_caption(&self) -> &'static str {
    if self.current_streak > 0 && self.longest_streak == self.current_streak {
      "Matching your record!"
    } else {
      "Your personal best"
    }
  }
}

// ─── Milestones ──────────────────────────────────────────────────────────────

/// Encouragement tier keyed on the current streak length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
  /// 0 days.
  Start,
  /// 1–2 days.
  GreatStart,
  /// 3–6 days.
  BuildingMomentum,
  /// 7–13 days.
  OnFire,
  /// 14–29 days.
  IncredibleConsistency,
  /// 30–99 days.
  Unstoppable,
  /// 100 days or more.
  Legendary,
}

impl Milestone {
  pub fn for_streak(days: u32) -> Self {
    match days {
      0 => Self::Start,
      1..3 => Self::GreatStart,
      3..7 => Self::BuildingMomentum,
      7..14 => Self::OnFire,
      14..30 => Self::IncredibleConsistency,
      30..100 => Self::Unstoppable,
      _ => Self::Legendary,
    }
  }

  pub fn message(self) -> &'static str {
    match self {
      Self::Start => "Start your journey",
      Self::GreatStart => "Great start!",
      Self::BuildingMomentum => "Building momentum!",
      Self::OnFire => "On fire! 🔥",
      Self::IncredibleConsistency => "Incredible consistency!",
      Self::Unstoppable => "You're unstoppable!",
      Self::Legendary => "Legendary streak! 🏆",
    }
  }
}

// ─── View ────────────────────────────────────────────────────────────────────

/// The streak as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakView {
  pub current_streak:  u32,
  pub longest_streak:  u32,
  pub last_entry_date: Option<NaiveDate>,
  pub milestone:       Milestone,
  pub record_caption:  String,
}

impl From<StreakState> for StreakView {
  fn from(state: StreakState) -> Self {
    Self {
      current_streak:  state.current_streak,
      longest_streak:  state.longest_streak,
      last_entry_date: state.last_entry_date,
      milestone:       state.milestone(),
      record_caption:  state.record_caption().to_owned(),
    }
  }
}

impl Default for StreakView {
  fn default() -> Self { StreakState::default().into() }
}

#[cfg(test)]
mod tests {
  use chrono::Days;
  use proptest::prelude::*;

  use super::*;

  fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(n)
  }

  fn state(current: u32, longest: u32, last: Option<NaiveDate>) -> StreakState {
    StreakState { current_streak: current, longest_streak: longest, last_entry_date: last }
  }

  #[test]
  fn same_day_resave_is_identity() {
    let s = state(4, 7, Some(day(10)));
    assert_eq!(s.transition(day(10)), s);
    assert_eq!(s.classify(day(10)), StreakChange::SameDay);
  }

  #[test]
  fn consecutive_day_extends() {
    let next = state(5, 5, Some(day(0))).transition(day(1));
    assert_eq!(next, state(6, 6, Some(day(1))));
  }

  #[test]
  fn gap_breaks_but_keeps_longest() {
    let prev = state(5, 9, Some(day(0)));
    assert_eq!(prev.classify(day(2)), StreakChange::Broken { missed_days: 1 });
    assert_eq!(prev.transition(day(2)), state(1, 9, Some(day(2))));
  }

  #[test]
  fn first_entry_starts_at_one() {
    let next = StreakState::default().transition(day(0));
    assert_eq!(next, state(1, 1, Some(day(0))));
  }

  #[test]
  fn backdated_write_is_ignored() {
    let prev = state(3, 3, Some(day(5)));
    assert_eq!(
      prev.classify(day(2)),
      StreakChange::Backdated { last_entry_date: day(5) }
    );
    assert_eq!(prev.transition(day(2)), prev);
    assert!(!prev.classify(day(2)).is_write());
  }

  #[test]
  fn new_user_scenario() {
    let s1 = StreakState::default().transition(day(1));
    assert_eq!((s1.current_streak, s1.longest_streak), (1, 1));
    let s2 = s1.transition(day(2));
    assert_eq!((s2.current_streak, s2.longest_streak), (2, 2));
    let s4 = s2.transition(day(4));
    assert_eq!((s4.current_streak, s4.longest_streak), (1, 2));
  }

  #[test]
  fn milestone_boundaries() {
    let cases = [
      (0, "Start your journey"),
      (1, "Great start!"),
      (2, "Great start!"),
      (3, "Building momentum!"),
      (6, "Building momentum!"),
      (7, "On fire! 🔥"),
      (13, "On fire! 🔥"),
      (14, "Incredible consistency!"),
      (29, "Incredible consistency!"),
      (30, "You're unstoppable!"),
      (99, "You're unstoppable!"),
      (100, "Legendary streak! 🏆"),
    ];
    for (days, msg) in cases {
      assert_eq!(Milestone::for_streak(days).message(), msg, "days = {days}");
    }
  }

  #[test]
  fn record_caption() {
    assert_eq!(state(0, 0, None).record_caption(), "Your personal best");
    assert_eq!(state(4, 4, Some(day(0))).record_caption(), "Matching your record!");
    assert_eq!(state(2, 4, Some(day(0))).record_caption(), "Your personal best");
  }

  #[test]
  fn absent_streak_views_as_zero() {
    let view = StreakView::default();
    assert_eq!(view.current_streak, 0);
    assert_eq!(view.milestone, Milestone::Start);
    assert_eq!(view.record_caption, "Your personal best");
  }

  proptest! {
    #[test]
    fn longest_is_max_of_new_current_and_previous(
      longest in 0u32..10_000,
      current_frac in 0.0f64..=1.0,
      gap in -30i64..60,
    ) {
      let current = (f64::from(longest) * current_frac) as u32;
      let last = day(100);
      let today = last + chrono::Duration::days(gap);
      let prev = state(current, longest, Some(last));
      let next = prev.transition(today);

      prop_assert_eq!(next.longest_streak, next.current_streak.max(prev.longest_streak));
      prop_assert!(next.longest_streak >= next.current_streak);
      if gap <= 0 {
        prop_assert_eq!(next, prev);
      } else {
        prop_assert_eq!(next.last_entry_date, Some(today));
      }
    }
  }
}
