use crate::http::request::{Header, Request};

/// Outcome of feeding bytes to the parser.
///
/// A boolean cannot distinguish "the request is malformed" from "the request
/// is not finished yet", so parsing is tri-state: `Complete` and `Invalid`
/// are decisive, `Incomplete` means more input is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A full request has been parsed
    Complete,
    /// The input is not a valid request
    Invalid,
    /// More input is required
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    MethodStart,
    Method,
    Uri,
    VersionH,
    VersionT1,
    VersionT2,
    VersionP,
    VersionSlash,
    VersionMajorStart,
    VersionMajor,
    VersionMinorStart,
    VersionMinor,
    ExpectingNewline1,
    HeaderLineStart,
    HeaderLws,
    HeaderName,
    SpaceBeforeHeaderValue,
    HeaderValue,
    ExpectingNewline2,
    ExpectingNewline3,
}

/// Incremental parser for incoming requests.
///
/// The parser holds only its current state; the request being built is passed
/// in by the owning connection. State persists across partial reads, so a
/// request split at any byte boundary parses identically to one fed whole.
#[derive(Debug)]
pub struct RequestParser {
    state: ParseState,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self { state: ParseState::MethodStart }
    }

    /// Reset parser state. Never happens implicitly.
    pub fn reset(&mut self) {
        self.state = ParseState::MethodStart;
    }

    /// Parse some data, one byte at a time, until the outcome is decisive or
    /// the input is exhausted. Returns the outcome and how many bytes were
    /// consumed; bytes past a decisive outcome are left untouched.
    pub fn parse(&mut self, req: &mut Request, input: &[u8]) -> (ParseOutcome, usize) {
        for (i, &byte) in input.iter().enumerate() {
            let outcome = self.consume(req, byte);
            if outcome != ParseOutcome::Incomplete {
                return (outcome, i + 1);
            }
        }
        (ParseOutcome::Incomplete, input.len())
    }

    /// Handle the next byte of input.
    pub fn consume(&mut self, req: &mut Request, input: u8) -> ParseOutcome {
        use ParseOutcome::*;
        use ParseState::*;

        match self.state {
            MethodStart => {
                if !is_char(input) || is_ctl(input) || is_tspecial(input) {
                    Invalid
                } else {
                    self.state = Method;
                    req.method.push(input as char);
                    Incomplete
                }
            }
            Method => {
                if input == b' ' {
                    self.state = Uri;
                    Incomplete
                } else if !is_char(input) || is_ctl(input) || is_tspecial(input) {
                    Invalid
                } else {
                    req.method.push(input as char);
                    Incomplete
                }
            }
            Uri => {
                if input == b' ' {
                    self.state = VersionH;
                    Incomplete
                } else if is_ctl(input) {
                    Invalid
                } else {
                    req.uri.push(input as char);
                    Incomplete
                }
            }
            VersionH => self.expect_literal(input, b'H', VersionT1),
            VersionT1 => self.expect_literal(input, b'T', VersionT2),
            VersionT2 => self.expect_literal(input, b'T', VersionP),
            VersionP => self.expect_literal(input, b'P', VersionSlash),
            VersionSlash => {
                if input == b'/' {
                    req.version_major = 0;
                    req.version_minor = 0;
                    self.state = VersionMajorStart;
                    Incomplete
                } else {
                    Invalid
                }
            }
            VersionMajorStart => {
                if is_digit(input) {
                    self.state = VersionMajor;
                    match push_digit(req.version_major, input) {
                        Some(v) => {
                            req.version_major = v;
                            Incomplete
                        }
                        None => Invalid,
                    }
                } else {
                    Invalid
                }
            }
            VersionMajor => {
                if input == b'.' {
                    self.state = VersionMinorStart;
                    Incomplete
                } else if is_digit(input) {
                    match push_digit(req.version_major, input) {
                        Some(v) => {
                            req.version_major = v;
                            Incomplete
                        }
                        None => Invalid,
                    }
                } else {
                    Invalid
                }
            }
            VersionMinorStart => {
                if is_digit(input) {
                    self.state = VersionMinor;
                    match push_digit(req.version_minor, input) {
                        Some(v) => {
                            req.version_minor = v;
                            Incomplete
                        }
                        None => Invalid,
                    }
                } else {
                    Invalid
                }
            }
            VersionMinor => {
                if input == b'\r' {
                    self.state = ExpectingNewline1;
                    Incomplete
                } else if is_digit(input) {
                    match push_digit(req.version_minor, input) {
                        Some(v) => {
                            req.version_minor = v;
                            Incomplete
                        }
                        None => Invalid,
                    }
                } else {
                    Invalid
                }
            }
            ExpectingNewline1 => self.expect_literal(input, b'\n', HeaderLineStart),
            HeaderLineStart => {
                if input == b'\r' {
                    self.state = ExpectingNewline3;
                    Incomplete
                } else if !req.headers.is_empty() && (input == b' ' || input == b'\t') {
                    self.state = HeaderLws;
                    Incomplete
                } else if !is_char(input) || is_ctl(input) || is_tspecial(input) {
                    Invalid
                } else {
                    req.headers.push(Header::default());
                    push_to_name(req, input);
                    self.state = HeaderName;
                    Incomplete
                }
            }
            HeaderLws => {
                if input == b'\r' {
                    self.state = ExpectingNewline2;
                    Incomplete
                } else if input == b' ' || input == b'\t' {
                    Incomplete
                } else if is_ctl(input) {
                    Invalid
                } else {
                    self.state = HeaderValue;
                    push_to_value(req, input);
                    Incomplete
                }
            }
            HeaderName => {
                if input == b':' {
                    self.state = SpaceBeforeHeaderValue;
                    Incomplete
                } else if !is_char(input) || is_ctl(input) || is_tspecial(input) {
                    Invalid
                } else {
                    push_to_name(req, input);
                    Incomplete
                }
            }
            SpaceBeforeHeaderValue => self.expect_literal(input, b' ', HeaderValue),
            HeaderValue => {
                if input == b'\r' {
                    self.state = ExpectingNewline2;
                    Incomplete
                } else if is_ctl(input) {
                    Invalid
                } else {
                    push_to_value(req, input);
                    Incomplete
                }
            }
            ExpectingNewline2 => self.expect_literal(input, b'\n', HeaderLineStart),
            ExpectingNewline3 => {
                if input == b'\n' {
                    Complete
                } else {
                    Invalid
                }
            }
        }
    }

    // A single-literal state accepts exactly its expected byte; anything
    // else is malformed, never reinterpreted by a later state.
    fn expect_literal(&mut self, input: u8, expected: u8, next: ParseState) -> ParseOutcome {
        if input == expected {
            self.state = next;
            ParseOutcome::Incomplete
        } else {
            ParseOutcome::Invalid
        }
    }
}

// Check if a byte is an HTTP character.
fn is_char(c: u8) -> bool {
    c <= 127
}

// Check if a byte is an HTTP control character.
fn is_ctl(c: u8) -> bool {
    c <= 31 || c == 127
}

// Check if a byte is defined as an HTTP tspecial character.
fn is_tspecial(c: u8) -> bool {
    matches!(
        c,
        b'(' | b')'
            | b'<'
            | b'>'
            | b'@'
            | b','
            | b';'
            | b':'
            | b'\\'
            | b'"'
            | b'/'
            | b'['
            | b']'
            | b'?'
            | b'='
            | b'{'
            | b'}'
            | b' '
            | b'\t'
    )
}

// Check if a byte is a digit.
fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

// Accumulate one decimal digit, rejecting values that no longer fit.
fn push_digit(value: u16, digit: u8) -> Option<u16> {
    value
        .checked_mul(10)?
        .checked_add(u16::from(digit - b'0'))
}

fn push_to_name(req: &mut Request, input: u8) {
    if let Some(header) = req.headers.last_mut() {
        header.name.push(input as char);
    }
}

fn push_to_value(req: &mut Request, input: u8) {
    if let Some(header) = req.headers.last_mut() {
        header.value.push(input as char);
    }
}
