//! The reader parses a byte buffer into a sequence of forms. The main
//! entry point is [read].
//!
//! The algorithm is a plain LL(2): the input is consumed one byte at a
//! time, front to back, and once a byte is consumed there is no going
//! back. Looking ahead without consuming goes through [Reader::peek],
//! which the grammar never needs for more than two bytes (distinguishing a
//! negative number from a symbol starting with `-`). Each form has a
//! dedicated `read_*` method returning the node on success or the first
//! lexical error, which terminates the whole read; partially built forms
//! are discarded.

use std::sync::Arc;

use tracing::trace;

use crate::ast::{Ast, Expr, ExprKind};
use crate::errors::{Error, ErrorKind, Result};
use crate::location::{Location, LocationRange};

/// Whitespace elides tokens and is never part of one. As in most lisps the
/// comma counts as whitespace.
fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b',')
}

/// Any printable byte that isn't structural can appear in a symbol.
fn is_identifier_byte(byte: u8) -> bool {
    !is_whitespace(byte) && byte != b'(' && byte != b')' && !byte.is_ascii_control()
}

pub struct Reader<'a> {
    ns: Arc<str>,
    buf: &'a [u8],

    /// Index of the next byte to consume. The buffer is not necessarily
    /// NUL terminated, so this is the only end-of-input signal.
    pos: usize,

    /// Location of the next byte to consume.
    location: Location,

    /// Location of the most recently consumed byte; token ranges end here.
    last: Location,

    forms: Ast,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8], ns: &str, filename: Option<&str>) -> Self {
        let ns: Arc<str> = Arc::from(ns);
        let location = Location::start_of(ns.clone(), filename.map(Arc::from));

        Self {
            ns,
            buf,
            pos: 0,
            last: location.clone(),
            location,
            forms: Ast::new(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Look `count` bytes ahead without consuming anything. `count == 0`
    /// is the byte [advance](Self::advance) would consume next.
    fn peek(&self, count: usize) -> Option<u8> {
        self.buf.get(self.pos + count).copied()
    }

    /// Consume one byte and keep the line/column bookkeeping in sync.
    fn advance(&mut self) -> Option<u8> {
        let byte = *self.buf.get(self.pos)?;

        self.last = self.location.clone();
        self.pos += 1;
        self.location.offset = Some(self.pos);

        if byte == b'\n' {
            self.location.line = self.location.line.saturating_add(1);
            self.location.col = 1;
        } else {
            self.location.col = self.location.col.saturating_add(1);
        }

        Some(byte)
    }

    fn skip_whitespace(&mut self) {
        while self.peek(0).map_or(false, is_whitespace) {
            self.advance();
        }
    }

    /// Read every form in the buffer.
    pub fn read(mut self) -> Result<Ast> {
        while !self.at_end() {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }

            let form = self.read_expr()?;
            self.forms.push(form);
        }

        Ok(self.forms)
    }

    /// Dispatch on the next byte to the proper reader method. The caller
    /// guarantees the next byte exists and is not whitespace.
    fn read_expr(&mut self) -> Result<Expr> {
        match self.peek(0) {
            Some(b'(') => self.read_list(),
            Some(b'"') => self.read_string(),
            Some(b':') => self.read_keyword(),
            Some(byte) if byte.is_ascii_digit() => self.read_number(false),
            Some(b'-') if self.peek(1).map_or(false, |b| b.is_ascii_digit()) => {
                // Swallow the '-'
                self.advance();
                self.read_number(true)
            }
            _ => self.read_symbol(),
        }
    }

    /// Reads a list recursively. The returned range spans from the opening
    /// paren to the closing one.
    fn read_list(&mut self) -> Result<Expr> {
        trace!("reading a list");

        let open = self.location.clone();
        self.advance();

        let mut elements = Ast::new();

        loop {
            self.skip_whitespace();

            match self.peek(0) {
                None => {
                    return Err(Error::new(
                        ErrorKind::EofWhileScanningAList,
                        LocationRange::span(open, self.last.clone()),
                    ));
                }
                Some(b')') => {
                    self.advance();
                    return Ok(Expr::new(
                        ExprKind::List(elements),
                        LocationRange::span(open, self.last.clone()),
                    ));
                }
                Some(_) => elements.push(self.read_expr()?),
            }
        }
    }

    /// Reads a number. The sign, if any, was consumed by the caller;
    /// `negative` tells us whether it was there.
    fn read_number(&mut self, negative: bool) -> Result<Expr> {
        trace!("reading a number");

        let start = if negative {
            self.last.clone()
        } else {
            self.location.clone()
        };
        let digits_from = self.pos;
        let mut float = false;

        match self.peek(0) {
            Some(byte) if byte.is_ascii_digit() => {}
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidDigitForNumber,
                    LocationRange::point(self.location.clone()),
                ));
            }
        }

        while let Some(byte) = self.peek(0) {
            match byte {
                b'0'..=b'9' => {
                    self.advance();
                }
                b'.' if float => {
                    return Err(Error::new(
                        ErrorKind::TwoFloatPoints,
                        LocationRange::point(self.location.clone()),
                    ));
                }
                b'.' => {
                    self.advance();
                    if !self.peek(0).map_or(false, |b| b.is_ascii_digit()) {
                        return Err(Error::new(
                            ErrorKind::InvalidDigitForNumber,
                            LocationRange::point(self.location.clone()),
                        ));
                    }
                    float = true;
                }
                byte if byte.is_ascii_alphabetic() => {
                    return Err(Error::new(
                        ErrorKind::InvalidDigitForNumber,
                        LocationRange::point(self.location.clone()),
                    ));
                }
                _ => break,
            }
        }

        let value = String::from_utf8_lossy(&self.buf[digits_from..self.pos]).into_owned();

        Ok(Expr::new(
            ExprKind::Number {
                value,
                negative,
                float,
            },
            LocationRange::span(start, self.last.clone()),
        ))
    }

    /// Reads a symbol greedily. Splitting a qualified lexeme into its
    /// namespace and name parts happens in [Expr::symbol].
    fn read_symbol(&mut self) -> Result<Expr> {
        trace!("reading a symbol");

        let start = self.location.clone();
        let lexeme_from = self.pos;

        while self.peek(0).map_or(false, is_identifier_byte) {
            self.advance();
        }

        if self.pos == lexeme_from {
            let extra_paren = self.peek(0) == Some(b')');
            self.advance();
            let location = LocationRange::point(self.last.clone());

            return Err(if extra_paren {
                Error::with_message(
                    ErrorKind::InvalidCharacterForSymbol,
                    location,
                    "an extra ')' is detected",
                )
            } else {
                Error::new(ErrorKind::InvalidCharacterForSymbol, location)
            });
        }

        let lexeme = String::from_utf8_lossy(&self.buf[lexeme_from..self.pos]);

        Ok(Expr::symbol(
            LocationRange::span(start, self.last.clone()),
            &lexeme,
            &self.ns,
        ))
    }

    /// Reads a `:keyword`. The stored name excludes the colon.
    fn read_keyword(&mut self) -> Result<Expr> {
        trace!("reading a keyword");

        let start = self.location.clone();
        self.advance();
        let name_from = self.pos;

        while self.peek(0).map_or(false, is_identifier_byte) {
            self.advance();
        }

        if self.pos == name_from {
            return Err(Error::new(
                ErrorKind::InvalidCharacterForSymbol,
                LocationRange::span(start, self.last.clone()),
            ));
        }

        let name = String::from_utf8_lossy(&self.buf[name_from..self.pos]).into_owned();

        Ok(Expr::new(
            ExprKind::Keyword(name),
            LocationRange::span(start, self.last.clone()),
        ))
    }

    /// Reads a `"..."` literal. The content is taken verbatim; there is no
    /// escape processing.
    fn read_string(&mut self) -> Result<Expr> {
        trace!("reading a string");

        let start = self.location.clone();
        self.advance();
        let content_from = self.pos;

        loop {
            match self.peek(0) {
                None => {
                    return Err(Error::with_message(
                        ErrorKind::InvalidCharacterForSymbol,
                        LocationRange::span(start, self.last.clone()),
                        "reached the end of the file while scanning a string literal",
                    ));
                }
                Some(b'"') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }

        let data = String::from_utf8_lossy(&self.buf[content_from..self.pos]).into_owned();
        self.advance();

        Ok(Expr::new(
            ExprKind::Str(data),
            LocationRange::span(start, self.last.clone()),
        ))
    }
}

/// Parse `input` as the contents of namespace `ns` and return its forms.
pub fn read(input: &[u8], ns: &str, filename: Option<&str>) -> Result<Ast> {
    Reader::new(input, ns, filename).read()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_list() {
        let ast = read(b"(a 1)", "user", None).unwrap();
        assert_eq!(ast.len(), 1);

        let list = &ast[0];
        assert_eq!(list.location.start.line, 1);
        assert_eq!(list.location.start.col, 1);
        assert_eq!(list.location.end.col, 5);

        let ExprKind::List(elements) = &list.kind else {
            panic!("expected a list, got {}", list);
        };
        assert_eq!(elements.len(), 2);

        let ExprKind::Symbol { ns_name, name } = &elements[0].kind else {
            panic!("expected a symbol");
        };
        assert_eq!(ns_name, "user");
        assert_eq!(name, "a");
        assert_eq!(elements[0].location.start.col, 2);

        let ExprKind::Number {
            value,
            negative,
            float,
        } = &elements[1].kind
        else {
            panic!("expected a number");
        };
        assert_eq!(value, "1");
        assert!(!negative);
        assert!(!float);
        assert_eq!(elements[1].location.start.col, 4);
    }

    #[test]
    fn node_offsets_point_back_into_the_buffer() {
        let input = b"(a 1)";
        let ast = read(input, "user", None).unwrap();

        let list = &ast[0];
        assert_eq!(list.location.start.offset, Some(0));

        let ExprKind::List(elements) = &list.kind else {
            panic!("expected a list");
        };
        assert_eq!(elements[0].location.start.offset, Some(1));
        assert_eq!(elements[1].location.start.offset, Some(3));
        assert_eq!(input[3], b'1');
    }

    #[test]
    fn a_number_with_two_float_points_is_an_error() {
        let err = read(b"1.2.3", "user", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TwoFloatPoints);
        assert_eq!(err.location.start.line, 1);
        assert_eq!(err.location.start.col, 4);
    }

    #[test]
    fn an_unterminated_list_is_anchored_at_the_opening_paren() {
        let err = read(b"(a", "user", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EofWhileScanningAList);
        assert_eq!(err.location.start.line, 1);
        assert_eq!(err.location.start.col, 1);
    }

    #[test]
    fn qualified_symbols_carry_their_own_namespace() {
        let ast = read(b"core/map", "user", None).unwrap();

        let ExprKind::Symbol { ns_name, name } = &ast[0].kind else {
            panic!("expected a symbol");
        };
        assert_eq!(ns_name, "core");
        assert_eq!(name, "map");
    }

    #[test]
    fn negative_and_float_numbers() {
        let ast = read(b"-42 3.14", "user", None).unwrap();
        assert_eq!(ast.len(), 2);

        let ExprKind::Number {
            value, negative, ..
        } = &ast[0].kind
        else {
            panic!("expected a number");
        };
        assert_eq!(value, "42");
        assert!(negative);

        let ExprKind::Number { value, float, .. } = &ast[1].kind else {
            panic!("expected a number");
        };
        assert_eq!(value, "3.14");
        assert!(float);
    }

    #[test]
    fn a_lone_dash_is_a_symbol() {
        let ast = read(b"-", "user", None).unwrap();

        let ExprKind::Symbol { name, .. } = &ast[0].kind else {
            panic!("expected a symbol");
        };
        assert_eq!(name, "-");
    }

    #[test]
    fn trailing_letters_invalidate_a_number() {
        let err = read(b"12ab", "user", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDigitForNumber);
        assert_eq!(err.location.start.col, 3);
    }

    #[test]
    fn commas_are_whitespace() {
        let ast = read(b"(a, 1)", "user", None).unwrap();

        let ExprKind::List(elements) = &ast[0].kind else {
            panic!("expected a list");
        };
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn keywords_drop_the_colon() {
        let ast = read(b":doc", "user", None).unwrap();

        let ExprKind::Keyword(name) = &ast[0].kind else {
            panic!("expected a keyword");
        };
        assert_eq!(name, "doc");
        assert_eq!(ast[0].location.start.col, 1);
        assert_eq!(ast[0].location.end.col, 4);
    }

    #[test]
    fn strings_are_taken_verbatim() {
        let ast = read(b"\"hi there\"", "user", None).unwrap();

        let ExprKind::Str(data) = &ast[0].kind else {
            panic!("expected a string");
        };
        assert_eq!(data, "hi there");
    }

    #[test]
    fn an_unterminated_string_is_an_error() {
        let err = read(b"\"hi", "user", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCharacterForSymbol);
        assert!(err.message().contains("string literal"));
    }

    #[test]
    fn a_stray_closing_paren_is_reported() {
        let err = read(b")", "user", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCharacterForSymbol);
        assert!(err.message().contains("an extra ')'"));
    }

    #[test]
    fn newlines_advance_the_line_counter() {
        let ast = read(b"a\nb", "user", None).unwrap();
        assert_eq!(ast.len(), 2);
        assert_eq!(ast[0].location.start.line, 1);
        assert_eq!(ast[1].location.start.line, 2);
        assert_eq!(ast[1].location.start.col, 1);
    }

    #[test]
    fn an_empty_buffer_reads_as_an_empty_tree() {
        assert!(read(b"", "user", None).unwrap().is_empty());
        assert!(read(b"  \n\t", "user", None).unwrap().is_empty());
    }

    #[test]
    fn nested_lists() {
        let ast = read(b"(a (b c) d)", "user", None).unwrap();

        let ExprKind::List(elements) = &ast[0].kind else {
            panic!("expected a list");
        };
        assert_eq!(elements.len(), 3);
        assert!(matches!(&elements[1].kind, ExprKind::List(inner) if inner.len() == 2));
    }
}
