//! Single-line text input.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::KeyInput;

/// Editable text buffer with a cursor.
///
/// The cursor counts characters, not bytes, so multi-byte input edits
/// cleanly. Inputs may hold secret text: the buffer is zeroed on drop and
/// `Debug` only shows its length.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, ch);
        self.cursor += 1;
    }

    /// Apply an editing key.
    ///
    /// Returns `false` for keys that do not edit text, leaving them to the
    /// caller.
    pub fn apply(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(ch) => self.insert(ch),
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_count() {
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_count(),
            KeyInput::Enter
            | KeyInput::Tab
            | KeyInput::BackTab
            | KeyInput::Esc
            | KeyInput::Up
            | KeyInput::Down
            | KeyInput::Interrupt => return false,
        }
        true
    }

    /// Take the text out, leaving the input empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Clear the input, wiping the old contents.
    pub fn clear(&mut self) {
        self.buffer.zeroize();
        self.cursor = 0;
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(idx, _)| idx)
    }
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("chars", &self.char_count())
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::new();
        for ch in text.chars() {
            input.insert(ch);
        }
        input
    }

    #[test]
    fn edits_multibyte_text() {
        let mut input = typed("héllo");
        assert_eq!(input.cursor(), 5);

        input.apply(KeyInput::Left);
        input.apply(KeyInput::Left);
        input.apply(KeyInput::Left);
        input.apply(KeyInput::Backspace);
        assert_eq!(input.text(), "hllo");
        assert_eq!(input.cursor(), 1);

        input.insert('ë');
        assert_eq!(input.text(), "hëllo");
    }

    #[test]
    fn delete_at_end_is_noop() {
        let mut input = typed("ab");
        input.apply(KeyInput::Delete);
        assert_eq!(input.text(), "ab");

        input.apply(KeyInput::Home);
        input.apply(KeyInput::Delete);
        assert_eq!(input.text(), "b");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = typed("ab");
        input.apply(KeyInput::Right);
        assert_eq!(input.cursor(), 2);
        input.apply(KeyInput::Home);
        input.apply(KeyInput::Left);
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn navigation_keys_are_not_consumed() {
        let mut input = typed("ab");
        assert!(!input.apply(KeyInput::Enter));
        assert!(!input.apply(KeyInput::Tab));
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn take_empties_input() {
        let mut input = typed("secret");
        assert_eq!(input.take(), "secret");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn debug_hides_text() {
        let input = typed("hunter2");
        assert!(!format!("{input:?}").contains("hunter2"));
    }
}
