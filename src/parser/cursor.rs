/// `Cursor` - Forward-only, peekable scanner over the characters of one line
///
/// End of input is a value (`None`), never a failure: every accessor is total.
/// The cursor cannot move backwards, which matches the classifier's single
/// left-to-right pass over each line.

/// Character scanner used by the line classifier
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the first character of `source`
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Character under the cursor, `None` at end of line
    #[must_use]
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Character `n` positions ahead of the cursor (`peek(0)` is `current()`)
    #[must_use]
    pub fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    /// Return the current character and step past it.
    ///
    /// At end of line this returns `None` and the position stays put.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += 1;
        Some(c)
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Step past `expected` if it is the current character
    pub fn eat(&mut self, expected: char) -> bool {
        if self.current() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.current().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Consume characters while `pred` holds and return them
    pub fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            taken.push(c);
            self.pos += 1;
        }
        taken
    }

    /// The whole line this cursor scans (for diagnostics)
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line() {
        let mut cursor = Cursor::new("");
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.peek(3), None);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn test_advance_and_peek() {
        let mut cursor = Cursor::new("++X");
        assert_eq!(cursor.current(), Some('+'));
        assert_eq!(cursor.peek(1), Some('+'));
        assert_eq!(cursor.peek(2), Some('X'));
        assert_eq!(cursor.peek(3), None);

        assert_eq!(cursor.advance(), Some('+'));
        assert_eq!(cursor.advance(), Some('+'));
        assert_eq!(cursor.current(), Some('X'));
        assert_eq!(cursor.advance(), Some('X'));
        assert!(cursor.is_at_end());
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut cursor = Cursor::new("口上 = 1");
        assert_eq!(cursor.advance(), Some('口'));
        assert_eq!(cursor.current(), Some('上'));
        assert_eq!(cursor.peek(2), Some('='));
    }

    #[test]
    fn test_eat_and_skip_whitespace() {
        let mut cursor = Cursor::new(";  #region");
        assert!(cursor.eat(';'));
        assert!(!cursor.eat(';'));
        cursor.skip_whitespace();
        assert!(cursor.eat('#'));
        assert_eq!(cursor.take_while(char::is_alphabetic), "region");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_take_while_stops_at_predicate() {
        let mut cursor = Cursor::new("FLAG:3 = 1");
        assert_eq!(cursor.take_while(|c| c != ':'), "FLAG");
        assert_eq!(cursor.current(), Some(':'));
        assert_eq!(cursor.source(), "FLAG:3 = 1");
    }
}
