//! Text buffer plus cursor for the InputBox.
//!
//! The cursor is a byte offset that always sits on a char boundary.

#[derive(Debug, Default, Clone)]
pub(super) struct Editor {
    pub buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
}

impl Editor {
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.pos, c);
        self.pos += c.len_utf8();
    }

    pub fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.pos, text);
        self.pos += text.len();
    }

    /// Inserts dictated text at the cursor, separated from any word that
    /// already touches it.
    pub fn insert_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let needs_space = self.buffer[..self.pos]
            .chars()
            .next_back()
            .is_some_and(|c| !c.is_whitespace());
        if needs_space {
            self.insert_char(' ');
        }
        self.insert_str(text);
    }

    pub fn backspace(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        let prev = prev_char_boundary(&self.buffer, self.pos);
        self.buffer.drain(prev..self.pos);
        self.pos = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.pos >= self.buffer.len() {
            return false;
        }
        let next = next_char_boundary(&self.buffer, self.pos);
        self.buffer.drain(self.pos..next);
        true
    }

    pub fn left(&mut self) -> bool {
        self.move_to(prev_char_boundary(&self.buffer, self.pos))
    }

    pub fn right(&mut self) -> bool {
        self.move_to(next_char_boundary(&self.buffer, self.pos))
    }

    pub fn word_left(&mut self) -> bool {
        self.move_to(prev_word_boundary(&self.buffer, self.pos))
    }

    pub fn word_right(&mut self) -> bool {
        self.move_to(next_word_boundary(&self.buffer, self.pos))
    }

    /// Start of the current logical line.
    pub fn home(&mut self) -> bool {
        let start = self.buffer[..self.pos]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        self.move_to(start)
    }

    /// End of the current logical line.
    pub fn end(&mut self) -> bool {
        let end = self.buffer[self.pos..]
            .find('\n')
            .map(|i| self.pos + i)
            .unwrap_or(self.buffer.len());
        self.move_to(end)
    }

    pub fn move_to(&mut self, pos: usize) -> bool {
        let pos = pos.min(self.buffer.len());
        if pos == self.pos {
            return false;
        }
        self.pos = pos;
        true
    }

    /// Empties the buffer and returns what it held.
    pub fn take(&mut self) -> String {
        self.pos = 0;
        std::mem::take(&mut self.buffer)
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// readline `backward-word`: skip non-word chars, then the word.
fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let before = &text[..pos];
    let mut chars = before.char_indices().rev().peekable();

    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }

    let mut boundary = 0;
    while let Some(&(i, c)) = chars.peek() {
        if !is_word_char(c) {
            boundary = i + c.len_utf8();
            break;
        }
        boundary = i;
        chars.next();
    }
    boundary
}

/// readline `forward-word`: skip non-word chars, then the word.
fn next_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[pos..].char_indices().peekable();

    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }
    while chars.peek().is_some_and(|&(_, c)| is_word_char(c)) {
        chars.next();
    }

    match chars.peek() {
        Some(&(i, _)) => pos + i,
        None => text.len(),
    }
}
