//! Editable form state for the auth and entry views.
//!
//! Pure state with no I/O, so every rule the views enforce can be unit
//! tested here.

use wins_core::{
  entry::{Category, DailyEntry, MAX_WIN_CHARS, WinsDraft},
  session::Credentials,
};

// ─── TextField ────────────────────────────────────────────────────────────────

/// A single-line text input with an optional character limit.
#[derive(Debug, Clone, Default)]
pub struct TextField {
  value:  String,
  limit:  Option<usize>,
  masked: bool,
}

impl TextField {
  pub fn limited(limit: usize) -> Self { Self { limit: Some(limit), ..Self::default() } }

  pub fn masked() -> Self { Self { masked: true, ..Self::default() } }

  pub fn value(&self) -> &str { &self.value }

  /// Length in characters.
  pub fn len(&self) -> usize { self.value.chars().count() }

  pub fn is_empty(&self) -> bool { self.value.is_empty() }

  /// Append `c`. Returns `false` (and changes nothing) when the field is full.
  pub fn push(&mut self, c: char) -> bool {
    if self.limit.is_some_and(|max| self.len() >= max) {
      return false;
    }
    self.value.push(c);
    true
  }

  pub fn pop(&mut self) { self.value.pop(); }

  /// Replace the contents, truncated to the limit.
  pub fn set(&mut self, value: &str) {
    self.value = match self.limit {
      Some(max) => value.chars().take(max).collect(),
      None => value.to_owned(),
    };
  }

  pub fn clear(&mut self) { self.value.clear(); }

  /// Text to render; masked fields show one bullet per character.
  pub fn display(&self) -> String {
    if self.masked { "•".repeat(self.len()) } else { self.value.clone() }
  }

  /// `n/limit` counter for limited fields.
  pub fn counter(&self) -> Option<String> {
    self.limit.map(|max| format!("{}/{max}", self.len()))
  }
}

// ─── Entry form ───────────────────────────────────────────────────────────────

pub const CATEGORIES: [Category; 3] = [Category::Work, Category::Personal, Category::Growth];

/// Today's three win fields.
#[derive(Debug, Clone)]
pub struct EntryForm {
  pub fields:   [TextField; 3],
  pub focus:    usize,
  /// An entry for today already exists on the server.
  pub existing: bool,
  pub saving:   bool,
  touched:      bool,
}

impl Default for EntryForm {
  fn default() -> Self {
    Self {
      fields:   std::array::from_fn(|_| TextField::limited(MAX_WIN_CHARS)),
      focus:    0,
      existing: false,
      saving:   false,
      touched:  false,
    }
  }
}

impl EntryForm {
  pub fn field(&self, category: Category) -> &TextField {
    let idx = CATEGORIES.iter().position(|c| *c == category).unwrap_or(0);
    &self.fields[idx]
  }

  pub fn focused(&self) -> Category { CATEGORIES[self.focus] }

  pub fn next_field(&mut self) { self.focus = (self.focus + 1) % CATEGORIES.len(); }

  pub fn prev_field(&mut self) {
    self.focus = (self.focus + CATEGORIES.len() - 1) % CATEGORIES.len();
  }

  /// Type `c` into the focused field. Input past the limit is refused.
  pub fn type_char(&mut self, c: char) -> bool {
    self.touched = true;
    self.fields[self.focus].push(c)
  }

  pub fn backspace(&mut self) {
    self.touched = true;
    self.fields[self.focus].pop();
  }

  pub fn draft(&self) -> WinsDraft {
    let [work, personal, growth] = &self.fields;
    WinsDraft {
      work_win:     Some(work.value().to_owned()),
      personal_win: Some(personal.value().to_owned()),
      growth_win:   Some(growth.value().to_owned()),
    }
  }

  pub fn has_any_win(&self) -> bool { !self.draft().is_empty() }

  pub fn can_save(&self) -> bool { self.has_any_win() && !self.saving }

  pub fn button_label(&self) -> &'static str {
    if self.saving {
      "Saving..."
    } else if self.existing {
      "Update Today's Wins"
    } else {
      "Save Today's Wins"
    }
  }

  /// Apply today's stored entry. Fields the user already edited are kept.
  pub fn load(&mut self, entry: Option<&DailyEntry>) {
    let Some(entry) = entry else { return };
    self.existing = true;
    if self.touched {
      return;
    }
    for (field, category) in self.fields.iter_mut().zip(CATEGORIES) {
      field.set(entry.win(category).unwrap_or_default());
    }
  }
}

// ─── Auth form ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
  SignIn,
  SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
  FullName,
  Email,
  Password,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
  pub mode:       AuthMode,
  pub full_name:  TextField,
  pub email:      TextField,
  pub password:   TextField,
  pub focus:      AuthField,
  pub submitting: bool,
}

impl Default for AuthForm {
  fn default() -> Self {
    Self {
      mode:       AuthMode::SignIn,
      full_name:  TextField::default(),
      email:      TextField::default(),
      password:   TextField::masked(),
      focus:      AuthField::Email,
      submitting: false,
    }
  }
}

impl AuthForm {
  /// Visible fields, top to bottom.
  pub fn fields(&self) -> &'static [AuthField] {
    match self.mode {
      AuthMode::SignIn => &[AuthField::Email, AuthField::Password],
      AuthMode::SignUp => &[AuthField::FullName, AuthField::Email, AuthField::Password],
    }
  }

  pub fn toggle_mode(&mut self) {
    self.mode = match self.mode {
      AuthMode::SignIn => AuthMode::SignUp,
      AuthMode::SignUp => AuthMode::SignIn,
    };
    if !self.fields().contains(&self.focus) {
      self.focus = AuthField::Email;
    }
  }

  pub fn next_field(&mut self) { self.step(1); }

  pub fn prev_field(&mut self) { self.step(self.fields().len() - 1); }

  fn step(&mut self, by: usize) {
    let fields = self.fields();
    let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
    self.focus = fields[(idx + by) % fields.len()];
  }

  pub fn field_mut(&mut self, field: AuthField) -> &mut TextField {
    match field {
      AuthField::FullName => &mut self.full_name,
      AuthField::Email => &mut self.email,
      AuthField::Password => &mut self.password,
    }
  }

  pub fn field(&self, field: AuthField) -> &TextField {
    match field {
      AuthField::FullName => &self.full_name,
      AuthField::Email => &self.email,
      AuthField::Password => &self.password,
    }
  }

  pub fn type_char(&mut self, c: char) { self.field_mut(self.focus).push(c); }

  pub fn backspace(&mut self) { self.field_mut(self.focus).pop(); }

  /// Client-side validation. Returns credentials with the email normalised.
  pub fn credentials(&self) -> wins_core::Result<Credentials> {
    let raw = Credentials {
      email:    self.email.value().to_owned(),
      password: self.password.value().to_owned(),
    };
    let email = raw.validate()?;
    Ok(Credentials { email, password: raw.password })
  }

  pub fn full_name(&self) -> Option<String> {
    let name = self.full_name.value().trim();
    (self.mode == AuthMode::SignUp && !name.is_empty()).then(|| name.to_owned())
  }

  pub fn submit_label(&self) -> &'static str {
    match (self.submitting, self.mode) {
      (true, _) => "Loading...",
      (false, AuthMode::SignIn) => "Sign In",
      (false, AuthMode::SignUp) => "Create Account",
    }
  }

  /// Forget the typed password once it has been used.
  pub fn clear_secret(&mut self) { self.password.clear(); }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use uuid::Uuid;

  use super::*;

  fn type_str(form: &mut EntryForm, s: &str) {
    for c in s.chars() {
      form.type_char(c);
    }
  }

  #[test]
  fn input_beyond_limit_is_refused() {
    let mut field = TextField::limited(3);
    assert!(field.push('a'));
    assert!(field.push('é'));
    assert!(field.push('c'));
    assert!(!field.push('d'));
    assert_eq!(field.value(), "aéc");
    assert_eq!(field.counter().as_deref(), Some("3/3"));
  }

  #[test]
  fn entry_counter_tracks_characters() {
    let mut form = EntryForm::default();
    type_str(&mut form, "héllo");
    assert_eq!(form.field(Category::Work).counter().as_deref(), Some("5/280"));
    assert_eq!(form.field(Category::Growth).counter().as_deref(), Some("0/280"));
  }

  #[test]
  fn save_disabled_until_a_win_is_typed() {
    let mut form = EntryForm::default();
    assert!(!form.can_save());

    form.next_field();
    type_str(&mut form, "   ");
    assert!(!form.can_save());

    type_str(&mut form, "called mum");
    assert!(form.can_save());
    assert_eq!(form.focused(), Category::Personal);

    form.saving = true;
    assert!(!form.can_save());
  }

  #[test]
  fn button_label_reflects_state() {
    let mut form = EntryForm::default();
    assert_eq!(form.button_label(), "Save Today's Wins");
    form.existing = true;
    assert_eq!(form.button_label(), "Update Today's Wins");
    form.saving = true;
    assert_eq!(form.button_label(), "Saving...");
  }

  #[test]
  fn load_fills_untouched_form() {
    let entry = DailyEntry {
      id:           Uuid::nil(),
      user_id:      Uuid::nil(),
      date:         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      work_win:     Some("shipped".into()),
      personal_win: None,
      growth_win:   Some("read".into()),
    };

    let mut fresh = EntryForm::default();
    fresh.load(Some(&entry));
    assert!(fresh.existing);
    assert_eq!(fresh.field(Category::Work).value(), "shipped");
    assert_eq!(fresh.field(Category::Personal).value(), "");

    let mut edited = EntryForm::default();
    type_str(&mut edited, "mine");
    edited.load(Some(&entry));
    assert!(edited.existing);
    assert_eq!(edited.field(Category::Work).value(), "mine");
  }

  #[test]
  fn prev_field_wraps() {
    let mut form = EntryForm::default();
    form.prev_field();
    assert_eq!(form.focused(), Category::Growth);
  }

  #[test]
  fn auth_toggle_moves_focus_off_hidden_field() {
    let mut form = AuthForm::default();
    form.toggle_mode();
    assert_eq!(form.mode, AuthMode::SignUp);
    form.prev_field();
    assert_eq!(form.focus, AuthField::FullName);

    form.toggle_mode();
    assert_eq!(form.focus, AuthField::Email);
    assert_eq!(form.submit_label(), "Sign In");
  }

  #[test]
  fn auth_validation_runs_locally() {
    let mut form = AuthForm::default();
    for c in " Ada@Example.com".chars() {
      form.type_char(c);
    }
    form.next_field();
    for c in "12345".chars() {
      form.type_char(c);
    }
    assert_eq!(
      form.credentials().unwrap_err(),
      wins_core::Error::PasswordTooShort { min: 6 }
    );

    form.type_char('6');
    let creds = form.credentials().unwrap();
    assert_eq!(creds.email, "ada@example.com");
    assert_eq!(form.password.display(), "••••••");
  }

  #[test]
  fn full_name_only_sent_on_sign_up() {
    let mut form = AuthForm::default();
    form.full_name.set("  Ada Lovelace ");
    assert_eq!(form.full_name(), None);
    form.toggle_mode();
    assert_eq!(form.full_name().as_deref(), Some("Ada Lovelace"));
  }
}
