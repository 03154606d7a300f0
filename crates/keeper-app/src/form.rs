//! New-secret form state.

use keeper_client::{DraftField, SecretDraft, Ttl, ValidationError};

use crate::{KeyInput, TextInput};

/// Focusable field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormField {
    /// Secret text.
    #[default]
    Message,
    /// Lifetime selector.
    Ttl,
    /// Optional passphrase.
    Passphrase,
}

impl FormField {
    const ORDER: [Self; 3] = [Self::Message, Self::Ttl, Self::Passphrase];

    /// Next field, wrapping.
    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    /// Previous field, wrapping.
    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn index(self) -> usize {
        match self {
            Self::Message => 0,
            Self::Ttl => 1,
            Self::Passphrase => 2,
        }
    }
}

impl From<DraftField> for FormField {
    fn from(field: DraftField) -> Self {
        match field {
            DraftField::Message => Self::Message,
            DraftField::Ttl => Self::Ttl,
            DraftField::Passphrase => Self::Passphrase,
        }
    }
}

/// Inputs of the creation form plus the feedback shown next to them.
#[derive(Debug, Clone, Default)]
pub struct SecretForm {
    message: TextInput,
    ttl: Ttl,
    passphrase: TextInput,
    focus: FormField,
    errors: Vec<ValidationError>,
    failure: Option<String>,
}

impl SecretForm {
    /// Empty form, message focused, never expiring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a key to the focused field.
    ///
    /// Returns `false` when the key was not used.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Tab | KeyInput::Down => {
                self.focus = self.focus.next();
                true
            },
            KeyInput::BackTab | KeyInput::Up => {
                self.focus = self.focus.prev();
                true
            },
            _ => match self.focus {
                FormField::Message => self.message.apply(key),
                FormField::Passphrase => self.passphrase.apply(key),
                FormField::Ttl => match key {
                    KeyInput::Left => {
                        self.ttl = self.ttl.prev();
                        true
                    },
                    KeyInput::Right | KeyInput::Char(' ') => {
                        self.ttl = self.ttl.next();
                        true
                    },
                    _ => false,
                },
            },
        }
    }

    /// Snapshot of the inputs for submission.
    pub fn draft(&self) -> SecretDraft {
        let draft = SecretDraft::new(self.message.text()).with_ttl(self.ttl);
        if self.passphrase.is_empty() {
            draft
        } else {
            draft.with_passphrase(self.passphrase.text())
        }
    }

    /// Record validation errors and focus the first offending field.
    pub fn set_errors(&mut self, errors: Vec<ValidationError>) {
        if let Some(first) = errors.first() {
            self.focus = first.field().into();
        }
        self.errors = errors;
    }

    /// Record a failed submission.
    pub fn set_failure(&mut self, reason: impl Into<String>) {
        self.failure = Some(reason.into());
    }

    /// Drop feedback from an earlier submission.
    pub fn clear_feedback(&mut self) {
        self.errors.clear();
        self.failure = None;
    }

    /// Clear every input and all feedback.
    pub fn reset(&mut self) {
        self.message.clear();
        self.passphrase.clear();
        self.ttl = Ttl::default();
        self.focus = FormField::default();
        self.clear_feedback();
    }

    /// Message input.
    pub fn message(&self) -> &TextInput {
        &self.message
    }

    /// Passphrase input.
    pub fn passphrase(&self) -> &TextInput {
        &self.passphrase
    }

    /// Selected lifetime.
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Focused field.
    pub fn focus(&self) -> FormField {
        self.focus
    }

    /// All validation errors from the last submission.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Validation errors for one field.
    pub fn errors_for(&self, field: FormField) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |error| FormField::from(error.field()) == field)
    }

    /// Failure banner from the last submission.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}
