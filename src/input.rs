/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// The draft box at the bottom of the screen.
#[derive(Debug, Default)]
pub struct InputSurface {
    draft: String,
    cursor: usize, // cursor position in chars, not bytes
    focused: bool,
    mounted: bool,
}

impl InputSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Called after every draw. Grabs focus the first time only.
    pub fn mount(&mut self) {
        if !self.mounted {
            self.mounted = true;
            self.focused = true;
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Submit is disabled while a request is outstanding.
    pub fn can_submit(&self, pending: bool) -> bool {
        !pending
    }

    pub fn clear(&mut self) {
        self.draft.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.draft, self.cursor);
        self.draft.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.draft, self.cursor);
            self.draft.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.draft.chars().count() {
            let byte_pos = char_to_byte_index(&self.draft, self.cursor);
            self.draft.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.draft.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.draft.chars().count();
    }
}
