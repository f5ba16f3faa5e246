//! Grapheme-aware input buffer for the dialog's text field.

use unicode_segmentation::UnicodeSegmentation;

/// Single-line input draft with a cursor.
///
/// The cursor is a grapheme index, not a byte index, so arrow keys move over
/// combining sequences as a unit. [`DraftInput::cursor_byte_index`] converts
/// to a byte offset for rendering.
#[derive(Debug, Default, Clone)]
pub struct DraftInput {
    text: String,
    cursor: usize,
}

impl DraftInput {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Cursor position as a grapheme index.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Byte offset of the cursor into [`DraftInput::text`].
    #[must_use]
    pub fn cursor_byte_index(&self) -> usize {
        self.byte_index_at(self.cursor)
    }

    pub fn insert_char(&mut self, c: char) {
        let index = self.cursor_byte_index();
        self.text.insert(index, c);
        self.move_right();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let start = self.byte_index_at(self.cursor - 1);
        let end = self.byte_index_at(self.cursor);
        self.text.replace_range(start..end, "");
        self.move_left();
    }

    pub fn delete_forward(&mut self) {
        if self.cursor >= self.grapheme_count() {
            return;
        }

        let start = self.byte_index_at(self.cursor);
        let end = self.byte_index_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = self.clamp_cursor(self.cursor.saturating_add(1));
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    fn byte_index_at(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn clamp_cursor(&self, new_cursor: usize) -> usize {
        new_cursor.min(self.grapheme_count())
    }
}
