//! Aggregate statistics over a user's entries.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::entry::Category;

/// Raw counts as produced by the store: number of entries, and per category
/// the number of entries with a non-empty win in that slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
  pub total_entries: u64,
  pub work:          u64,
  pub personal:      u64,
  pub growth:        u64,
}

impl CategoryCounts {
  pub fn get(&self, category: Category) -> u64 {
    match category {
      Category::Work => self.work,
      Category::Personal => self.personal,
      Category::Growth => self.growth,
    }
  }

  /// The category with the most wins. Ties go to the earlier category in
  /// display order; `None` when nothing has been recorded.
  pub fn top_category(&self) -> Option<Category> {
    let max = Category::all().map(|c| self.get(c)).max().unwrap_or(0);
    if max == 0 {
      return None;
    }
    Category::all().find(|c| self.get(*c) == max)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
  Active,
  Start,
}

/// The stats shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  pub total_entries:  u64,
  pub work_count:     u64,
  pub personal_count: u64,
  pub growth_count:   u64,
  pub top_category:   Option<Category>,
  pub status:         ActivityStatus,
}

impl From<CategoryCounts> for Stats {
  fn from(c: CategoryCounts) -> Self {
    Self {
      total_entries:  c.total_entries,
      work_count:     c.work,
      personal_count: c.personal,
      growth_count:   c.growth,
      top_category:   c.top_category(),
      status:         if c.total_entries > 0 {
        ActivityStatus::Active
      } else {
        ActivityStatus::Start
      },
    }
  }
}

impl Default for Stats {
  fn default() -> Self { CategoryCounts::default().into() }
}

impl Stats {
  /// Label for the top-category card.
  pub fn top_category_label(&self) -> String {
    self
      .top_category
      .map(|c| c.to_string())
      .unwrap_or_else(|| "None yet".to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn counts(total: u64, work: u64, personal: u64, growth: u64) -> CategoryCounts {
    CategoryCounts { total_entries: total, work, personal, growth }
  }

  #[test]
  fn empty_stats() {
    let stats = Stats::default();
    assert_eq!(stats.top_category, None);
    assert_eq!(stats.top_category_label(), "None yet");
    assert_eq!(stats.status, ActivityStatus::Start);
  }

  #[test]
  fn top_category_picks_max() {
    assert_eq!(counts(5, 1, 2, 4).top_category(), Some(Category::Growth));
    assert_eq!(counts(5, 0, 3, 1).top_category(), Some(Category::Personal));
  }

  #[test]
  fn ties_favour_display_order() {
    assert_eq!(counts(3, 2, 2, 2).top_category(), Some(Category::Work));
    assert_eq!(counts(3, 0, 2, 2).top_category(), Some(Category::Personal));
  }

  #[test]
  fn any_entry_makes_status_active() {
    let stats = Stats::from(counts(3, 2, 1, 2));
    assert_eq!(stats.status, ActivityStatus::Active);
    assert_eq!(stats.top_category_label(), "Work");
    assert_eq!(stats.work_count, 2);
  }
}
