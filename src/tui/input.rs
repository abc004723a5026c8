use unicode_width::UnicodeWidthStr;

/// Editable single-line text with a cursor, counted in chars.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    value: String,
    cursor: usize,
}

impl InputState {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display width of the text left of the cursor.
    pub fn cursor_offset(&self) -> u16 {
        let prefix: String = self.value.chars().take(self.cursor).collect();
        prefix.width() as u16
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Removes the char before the cursor. Returns whether the text changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    /// Removes the char under the cursor. Returns whether the text changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.value.chars().count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    /// Clears the text. Returns whether the text changed.
    pub fn clear(&mut self) -> bool {
        self.cursor = 0;
        !std::mem::take(&mut self.value).is_empty()
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

#[test]
fn test_input_editing() {
    let mut input = InputState::default();
    for c in "narto".chars() {
        input.insert(c);
    }
    input.left();
    input.left();
    input.insert('u');
    assert_eq!(input.value(), "naruto");
    assert_eq!(input.cursor(), 4);

    assert!(input.backspace());
    assert_eq!(input.value(), "narto");
    input.home();
    assert!(!input.backspace());
    assert!(input.delete());
    assert_eq!(input.value(), "arto");
    input.end();
    assert!(!input.delete());
    assert_eq!(input.cursor(), 4);
}

#[test]
fn test_input_multibyte() {
    let mut input = InputState::default();
    for c in "進撃".chars() {
        input.insert(c);
    }
    assert_eq!(input.cursor_offset(), 4);
    input.left();
    input.insert('の');
    assert_eq!(input.value(), "進の撃");
    assert!(input.clear());
    assert!(!input.clear());
    assert_eq!(input.cursor(), 0);
}
