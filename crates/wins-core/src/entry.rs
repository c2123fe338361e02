//! Daily entries: one user's recorded wins for a single calendar day.
//!
//! A user has at most one [`DailyEntry`] per date. Saving again for the same
//! date replaces the wins in place; entries are never deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator as _};
use uuid::Uuid;

use crate::{Error, Result};

/// Maximum length of a single win, in characters.
pub const MAX_WIN_CHARS: usize = 280;

// ─── Category ────────────────────────────────────────────────────────────────

/// The three slots a day's wins are recorded in.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Work,
  Personal,
  Growth,
}

impl Category {
  /// All categories in display order (also the tie-break order for stats).
  pub fn all() -> impl Iterator<Item = Category> { Category::iter() }
}

// ─── Stored entry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
  pub id:           Uuid,
  pub user_id:      Uuid,
  pub date:         NaiveDate,
  pub work_win:     Option<String>,
  pub personal_win: Option<String>,
  pub growth_win:   Option<String>,
}

impl DailyEntry {
  pub fn win(&self, category: Category) -> Option<&str> {
    match category {
      Category::Work => self.work_win.as_deref(),
      Category::Personal => self.personal_win.as_deref(),
      Category::Growth => self.growth_win.as_deref(),
    }
  }

  /// The non-empty wins of this entry, in display order.
  pub fn wins(&self) -> impl Iterator<Item = (Category, &str)> + '_ {
    Category::all().filter_map(|c| self.win(c).map(|w| (c, w)))
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Unvalidated wins as typed into the entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinsDraft {
  #[serde(default)]
  pub work_win:     Option<String>,
  #[serde(default)]
  pub personal_win: Option<String>,
  #[serde(default)]
  pub growth_win:   Option<String>,
}

impl WinsDraft {
  /// Trim every field, drop empty ones, and check the length limit and the
  /// at-least-one-win rule.
  pub fn normalize(self) -> Result<Self> {
    let draft = Self {
      work_win:     normalize_field(Category::Work, self.work_win)?,
      personal_win: normalize_field(Category::Personal, self.personal_win)?,
      growth_win:   normalize_field(Category::Growth, self.growth_win)?,
    };
    if draft.is_empty() {
      return Err(Error::NoWins);
    }
    Ok(draft)
  }

  /// `true` if no field holds any non-whitespace text.
  pub fn is_empty(&self) -> bool {
    [&self.work_win, &self.personal_win, &self.growth_win]
      .into_iter()
      .all(|w| w.as_deref().is_none_or(|s| s.trim().is_empty()))
  }
}

fn normalize_field(category: Category, raw: Option<String>) -> Result<Option<String>> {
  let Some(raw) = raw else { return Ok(None) };
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  let len = trimmed.chars().count();
  if len > MAX_WIN_CHARS {
    return Err(Error::WinTooLong { category, len, max: MAX_WIN_CHARS });
  }
  Ok(Some(trimmed.to_owned()))
}

// ─── NewEntry ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::WinsStore::upsert_entry`].
/// Only constructible from a draft that passed [`WinsDraft::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
  pub user_id:      Uuid,
  pub date:         NaiveDate,
  pub work_win:     Option<String>,
  pub personal_win: Option<String>,
  pub growth_win:   Option<String>,
}

impl NewEntry {
  pub fn new(user_id: Uuid, date: NaiveDate, draft: WinsDraft) -> Result<Self> {
    let draft = draft.normalize()?;
    Ok(Self {
      user_id,
      date,
      work_win: draft.work_win,
      personal_win: draft.personal_win,
      growth_win: draft.growth_win,
    })
  }
}

/// Result of an upsert: the stored row and whether it was newly inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upserted {
  pub entry:   DailyEntry,
  pub created: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft(work: &str, personal: &str, growth: &str) -> WinsDraft {
    let f = |s: &str| Some(s.to_string());
    WinsDraft {
      work_win:     f(work),
      personal_win: f(personal),
      growth_win:   f(growth),
    }
  }

  #[test]
  fn all_empty_is_rejected() {
    assert_eq!(draft("", "  ", "\n").normalize(), Err(Error::NoWins));
    assert_eq!(WinsDraft::default().normalize(), Err(Error::NoWins));
  }

  #[test]
  fn empty_fields_become_none_and_text_is_trimmed() {
    let d = draft("  shipped it ", "", "read a chapter").normalize().unwrap();
    assert_eq!(d.work_win.as_deref(), Some("shipped it"));
    assert_eq!(d.personal_win, None);
    assert_eq!(d.growth_win.as_deref(), Some("read a chapter"));
  }

  #[test]
  fn limit_counts_characters_not_bytes() {
    let at_limit = "é".repeat(MAX_WIN_CHARS);
    assert!(draft(&at_limit, "", "").normalize().is_ok());

    let over = "a".repeat(MAX_WIN_CHARS + 1);
    let err = draft("", &over, "").normalize().unwrap_err();
    assert_eq!(
      err,
      Error::WinTooLong {
        category: Category::Personal,
        len:      MAX_WIN_CHARS + 1,
        max:      MAX_WIN_CHARS,
      }
    );
  }

  #[test]
  fn wins_iterates_in_category_order() {
    let entry = DailyEntry {
      id:           Uuid::nil(),
      user_id:      Uuid::nil(),
      date:         NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      work_win:     None,
      personal_win: Some("called mum".into()),
      growth_win:   Some("rust".into()),
    };
    let wins: Vec<_> = entry.wins().collect();
    assert_eq!(
      wins,
      vec![(Category::Personal, "called mum"), (Category::Growth, "rust")]
    );
  }

  #[test]
  fn category_serializes_lowercase_and_displays_titled() {
    assert_eq!(serde_json::to_string(&Category::Growth).unwrap(), "\"growth\"");
    assert_eq!(Category::Work.to_string(), "Work");
  }
}
