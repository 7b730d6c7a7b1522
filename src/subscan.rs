//! Sub-scanners for runs, quoted strings and balanced groups
//!
//! Each sub-scanner is entered with the scanner positioned on the first code
//! point of the construct and returns the literal it covered. Failures are
//! latched on the scanner rather than returned.

use crate::classify::{CodePoint, is_escaped};
use crate::lexer::Scanner;
use std::borrow::Cow;

impl<'a> Scanner<'a> {
    /// Consumes code points while the lookahead satisfies the current
    /// predicate, moving to the next predicate once it stops matching
    ///
    /// The current code point is assumed to match already and is included in
    /// the returned literal.
    pub(crate) fn scan_pred(&mut self, preds: &[fn(CodePoint) -> bool]) -> &'a str {
        let start = self.offset();
        let mut i = 0;
        while let Some(pred) = preds.get(i) {
            if pred(self.peek_char()) {
                self.advance();
            } else {
                i += 1;
            }
        }
        self.slice(start, self.read_offset())
    }

    /// Scans a quoted string in which `\` escapes `rhs` or any of `escapes`
    ///
    /// The result borrows from the pattern unless an escape was seen. The
    /// scanner is left on the closing delimiter.
    pub(crate) fn scan_quoted(&mut self, lhs: char, rhs: char, escapes: &[char]) -> Cow<'a, str> {
        self.take(&[lhs]);
        let start = self.offset();
        let mut owned: Option<String> = None;

        while self.more() {
            let current = self.current();
            let lookahead = self.peek_char();
            if is_escaped(current, lookahead, &[rhs]) || is_escaped(current, lookahead, escapes) {
                let buf = owned.get_or_insert_with(|| self.slice(start, self.offset()).to_owned());
                if let Some(c) = self.take(&['\\']).as_char() {
                    buf.push(c);
                }
            } else if current.is(rhs) {
                return self.quoted_literal(start, owned);
            } else if let (Some(buf), Some(c)) = (owned.as_mut(), current.as_char()) {
                buf.push(c);
            }
            self.advance();
        }

        self.unterminated(rhs, self.current());
        self.quoted_literal(start, owned)
    }

    fn quoted_literal(&self, start: usize, owned: Option<String>) -> Cow<'a, str> {
        match owned {
            Some(buf) => Cow::Owned(buf),
            None => Cow::Borrowed(self.slice(start, self.offset())),
        }
    }

    /// Scans a quoted string with no escapes, leaving the scanner on `rhs`
    pub(crate) fn scan_quoted_raw(&mut self, lhs: char, rhs: char) -> &'a str {
        self.take(&[lhs]);
        let start = self.offset();
        while self.more() && !self.current().is(rhs) {
            self.advance();
        }
        if !self.current().is(rhs) {
            self.unterminated(lhs, self.current());
        }
        self.slice(start, self.offset())
    }

    /// Scans up to the `rhs` that balances the opening `lhs`, leaving the
    /// scanner on it
    pub(crate) fn scan_balanced(&mut self, lhs: char, rhs: char) -> &'a str {
        self.take(&[lhs]);
        let start = self.offset();
        let mut depth: isize = 1;

        while self.more() {
            let current = self.current();
            if current.is(rhs) {
                if depth - 1 == 0 {
                    return self.slice(start, self.offset());
                }
                depth -= 1;
            } else if current.is(lhs) {
                depth += 1;
            }
            self.advance();
        }

        self.unbalanced(self.current(), lhs, rhs, depth);
        self.slice(start, self.offset())
    }
}
