//! Character cursor over a query string.

/// Cursor with a single-slot checkpoint.
///
/// `save` overwrites any previous checkpoint; `restore` rewinds to it.
/// `prepend` splices text back in at the cursor, which is how a word
/// that was only partly an alias gets its remainder re-read.
#[derive(Debug, Clone)]
pub struct Reader {
    input: Vec<char>,
    pos: usize,
    saved: usize,
}

impl Reader {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            saved: 0,
        }
    }

    /// Consume and return the character at the cursor.
    pub fn next(&mut self) -> Option<char> {
        let current = self.peek();
        if current.is_some() {
            self.pos += 1;
        }
        current
    }

    pub fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    /// Next whitespace-delimited word, ignoring leading whitespace,
    /// without consuming anything.
    pub fn peek_word(&self) -> String {
        self.input[self.pos.min(self.input.len())..]
            .iter()
            .skip_while(|c| c.is_whitespace())
            .take_while(|c| !c.is_whitespace())
            .collect()
    }

    /// Consume up to (not including) `stop` or the end of input.
    pub fn read_until(&mut self, stop: char) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c == stop {
                break;
            }
            s.push(c);
            self.pos += 1;
        }
        s
    }

    /// Skip leading whitespace, then consume until whitespace, `)` or
    /// the end of input.
    pub fn read_word(&mut self) -> String {
        self.skip_whitespace();
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ')' {
                break;
            }
            word.push(c);
            self.pos += 1;
        }
        word
    }

    /// Consume consecutive whitespace. Returns whether any was consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    pub fn complete(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn save(&mut self) {
        self.saved = self.pos;
    }

    pub fn restore(&mut self) {
        self.pos = self.saved;
    }

    /// Re-insert `s` in front of the unread remainder.
    pub fn prepend(&mut self, s: &str) {
        let at = self.pos.min(self.input.len());
        self.input.splice(at..at, s.chars());
        if self.saved > at {
            self.saved += s.chars().count();
        }
    }

    /// Unread remainder of the input.
    pub fn remaining(&self) -> String {
        self.input[self.pos.min(self.input.len())..].iter().collect()
    }
}
