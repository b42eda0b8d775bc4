//! Character-scanning cursor shared by the DDL extraction passes.
//!
//! Keyword matching is ASCII case-insensitive with word boundaries on both
//! sides. All offsets are byte positions; every delimiter the scanner acts on
//! is ASCII, so slicing at those positions is always valid UTF-8.

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    pub fn bump(&mut self) {
        if self.pos < self.src.len() {
            self.pos += 1;
        }
    }

    pub fn slice(&self, from: usize, to: usize) -> &'a str {
        &self.src[from..to]
    }

    /// Skip ASCII whitespace, returning how many bytes were consumed.
    pub fn skip_ws(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos - start
    }

    pub fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn keyword_at(&self, at: usize, word: &str) -> bool {
        let bytes = self.src.as_bytes();
        let end = at + word.len();
        if end > bytes.len() {
            return false;
        }
        if at > 0 && is_ident_byte(bytes[at - 1]) {
            return false;
        }
        if end < bytes.len() && is_ident_byte(bytes[end]) {
            return false;
        }
        bytes[at..end].eq_ignore_ascii_case(word.as_bytes())
    }

    /// Consume `word` at the cursor if it matches as a whole word.
    pub fn eat_keyword(&mut self, word: &str) -> bool {
        if self.keyword_at(self.pos, word) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    /// Consume a whitespace-separated keyword sequence, or restore the cursor.
    pub fn eat_keywords(&mut self, words: &[&str]) -> bool {
        let save = self.pos;
        for (i, word) in words.iter().enumerate() {
            if i > 0 && self.skip_ws() == 0 {
                self.pos = save;
                return false;
            }
            if !self.eat_keyword(word) {
                self.pos = save;
                return false;
            }
        }
        true
    }

    /// Scan forward for the next whole-word occurrence of `word`.
    /// On success the cursor lands after the word and its start is returned.
    pub fn seek_keyword(&mut self, word: &str) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let first = word.as_bytes()[0];
        let mut at = self.pos;
        while at + word.len() <= bytes.len() {
            if bytes[at].eq_ignore_ascii_case(&first) && self.keyword_at(at, word) {
                self.pos = at + word.len();
                return Some(at);
            }
            at += 1;
        }
        self.pos = self.src.len();
        None
    }

    /// Scan forward for a whitespace-separated keyword sequence.
    pub fn seek_keywords(&mut self, words: &[&str]) -> Option<usize> {
        loop {
            let start = self.seek_keyword(words[0])?;
            let mut ok = true;
            for word in &words[1..] {
                if self.skip_ws() == 0 || !self.eat_keyword(word) {
                    ok = false;
                    break;
                }
            }
            if ok {
                return Some(start);
            }
            self.pos = start + 1;
        }
    }

    /// Read a bare identifier run (`[A-Za-z0-9_]+`).
    pub fn read_word(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_byte) {
            self.pos += 1;
        }
        if self.pos > start {
            Some(&self.src[start..self.pos])
        } else {
            None
        }
    }

    /// Read a possibly quoted, possibly schema-qualified identifier, raw
    /// (quotes and dots included). Segments are `"…"`, `` `…` `` or bare
    /// identifier runs; a dot is only consumed when another segment follows.
    pub fn read_ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(q @ (b'"' | b'`')) => {
                    self.bump();
                    while let Some(b) = self.peek() {
                        self.bump();
                        if b == q {
                            break;
                        }
                    }
                }
                Some(b) if is_ident_byte(b) => {
                    while self.peek().is_some_and(is_ident_byte) {
                        self.bump();
                    }
                }
                _ => break,
            }
            let next = self.src.as_bytes().get(self.pos + 1).copied();
            if self.peek() == Some(b'.')
                && next.is_some_and(|b| is_ident_byte(b) || b == b'"' || b == b'`')
            {
                self.bump();
            } else {
                break;
            }
        }
        if self.pos > start {
            Some(&self.src[start..self.pos])
        } else {
            None
        }
    }

    /// With the cursor on `(`, consume through the matching `)` and return
    /// the inner text. `None` when the parentheses never balance.
    pub fn read_balanced_body(&mut self) -> Option<&'a str> {
        if self.peek() != Some(b'(') {
            return None;
        }
        self.bump();
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(b) = self.peek() {
            match b {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        let body = &self.src[start..self.pos];
                        self.bump();
                        return Some(body);
                    }
                }
                _ => {}
            }
            self.bump();
        }
        None
    }
}

/// Whole-word, case-insensitive containment of a keyword sequence.
pub(crate) fn contains_keywords(text: &str, words: &[&str]) -> bool {
    Scanner::new(text).seek_keywords(words).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_word_boundary() {
        let mut s = Scanner::new("XCREATE CREATE TABLE");
        assert_eq!(s.seek_keyword("CREATE"), Some(8));
        s.skip_ws();
        assert!(s.eat_keyword("table"));
    }

    #[test]
    fn test_eat_keywords_restores_on_failure() {
        let mut s = Scanner::new("IF NOT broken");
        assert!(!s.eat_keywords(&["IF", "NOT", "EXISTS"]));
        assert_eq!(s.pos(), 0);
        assert!(s.eat_keywords(&["IF", "NOT"]));
    }

    #[test]
    fn test_read_qualified_ident() {
        let mut s = Scanner::new(r#""writer_schema"."sites" ("#);
        assert_eq!(s.read_ident(), Some(r#""writer_schema"."sites""#));
        s.skip_ws();
        assert_eq!(s.peek(), Some(b'('));
    }

    #[test]
    fn test_ident_stops_at_trailing_dot() {
        let mut s = Scanner::new("sites. (");
        assert_eq!(s.read_ident(), Some("sites"));
    }

    #[test]
    fn test_balanced_body() {
        let mut s = Scanner::new("(a numeric(10,2), CHECK (a > 0));");
        assert_eq!(
            s.read_balanced_body(),
            Some("a numeric(10,2), CHECK (a > 0)")
        );
        assert_eq!(s.peek(), Some(b';'));
    }

    #[test]
    fn test_unbalanced_body() {
        let mut s = Scanner::new("(a int, (b");
        assert_eq!(s.read_balanced_body(), None);
        assert!(s.eof());
    }

    #[test]
    fn test_contains_keywords() {
        assert!(contains_keywords("code text NOT\n  NULL", &["NOT", "NULL"]));
        assert!(!contains_keywords("notnull", &["NOT", "NULL"]));
        assert!(!contains_keywords("nullable text", &["NULL"]));
    }
}
