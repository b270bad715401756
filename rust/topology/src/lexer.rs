//! Token cursor over an ASCII shape payload.
//!
//! BREP payloads are whitespace-separated token streams; this cursor
//! walks them in one pass, tracking the line number for error reporting.
//! Numbers go through `lexical-core` rather than `std` parsing.

use crate::error::{Error, Result};

pub(crate) struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    /// Current 1-based line number.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            if self.input[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    /// Returns the next whitespace-delimited token, or `None` at end.
    pub(crate) fn next_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < self.input.len() && !self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        // Input was validated as UTF-8 up front; splitting on ASCII
        // whitespace keeps boundaries valid.
        std::str::from_utf8(&self.input[start..self.pos]).ok()
    }

    /// Next token, or a truncation error naming what was expected.
    pub(crate) fn expect(&mut self, what: &'static str) -> Result<&'a str> {
        self.next_token().ok_or(Error::Truncated(what))
    }

    /// Consumes one token and requires it to equal `keyword`.
    pub(crate) fn expect_keyword(&mut self, keyword: &'static str) -> Result<()> {
        let found = self.expect(keyword)?;
        if found == keyword {
            Ok(())
        } else {
            Err(Error::UnexpectedToken {
                expected: keyword,
                found: found.to_string(),
                line: self.line,
            })
        }
    }

    /// Skips tokens until `keyword` is consumed. Used to step over the
    /// free-text header between the magic and the first section.
    pub(crate) fn skip_until(&mut self, keyword: &'static str) -> Result<()> {
        loop {
            match self.next_token() {
                Some(token) if token == keyword => return Ok(()),
                Some(_) => continue,
                None => return Err(Error::Truncated(keyword)),
            }
        }
    }

    pub(crate) fn expect_u32(&mut self, what: &'static str) -> Result<u32> {
        let token = self.expect(what)?;
        lexical_core::parse::<u32>(token.as_bytes()).map_err(|_| Error::InvalidNumber {
            found: token.to_string(),
            line: self.line,
        })
    }

    pub(crate) fn expect_i64(&mut self, what: &'static str) -> Result<i64> {
        let token = self.expect(what)?;
        lexical_core::parse::<i64>(token.as_bytes()).map_err(|_| Error::InvalidNumber {
            found: token.to_string(),
            line: self.line,
        })
    }

    pub(crate) fn expect_f64(&mut self, what: &'static str) -> Result<f64> {
        let token = self.expect(what)?;
        lexical_core::parse::<f64>(token.as_bytes()).map_err(|_| Error::InvalidNumber {
            found: token.to_string(),
            line: self.line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_across_lines() {
        let mut lx = Lexer::new("alpha  beta\n gamma\n\n4");
        assert_eq!(lx.next_token(), Some("alpha"));
        assert_eq!(lx.next_token(), Some("beta"));
        assert_eq!(lx.next_token(), Some("gamma"));
        assert_eq!(lx.expect_u32("count").unwrap(), 4);
        assert_eq!(lx.line(), 4);
        assert_eq!(lx.next_token(), None);
    }

    #[test]
    fn numbers_parse_with_exponents() {
        let mut lx = Lexer::new("1e-07 -2.5 42 -3");
        assert_eq!(lx.expect_f64("tol").unwrap(), 1e-7);
        assert_eq!(lx.expect_f64("x").unwrap(), -2.5);
        assert_eq!(lx.expect_u32("count").unwrap(), 42);
        assert_eq!(lx.expect_i64("ref").unwrap(), -3);
    }

    #[test]
    fn bad_number_reports_token_and_line() {
        let mut lx = Lexer::new("\nnope");
        match lx.expect_f64("coordinate") {
            Err(Error::InvalidNumber { found, line }) => {
                assert_eq!(found, "nope");
                assert_eq!(line, 2);
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn truncation_names_the_missing_piece() {
        let mut lx = Lexer::new("");
        assert!(matches!(
            lx.expect("record count"),
            Err(Error::Truncated("record count"))
        ));
    }

    #[test]
    fn skip_until_finds_keyword() {
        let mut lx = Lexer::new("some (c) header text Locations 0");
        lx.skip_until("Locations").unwrap();
        assert_eq!(lx.expect_u32("count").unwrap(), 0);
    }
}
