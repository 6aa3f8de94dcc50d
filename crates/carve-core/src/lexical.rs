//! Lexical state tracking for brace-delimited sources.
//!
//! [`LexState`] is a small `Copy` value describing whether the scan cursor
//! sits inside a block comment, line comment, string literal or character
//! literal. Every brace-family pass threads its own value through
//! [`LexState::step`] (state in, state out) so no two passes ever share
//! state. Nested comments are not recognized.

use std::ops::ControlFlow;

/// Classification of a single character after a [`LexState::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Ordinary source text, visible to the locators
    Code,
    /// Part of a string or character literal, including its quotes
    Literal,
    /// Part of a block or line comment, including its markers
    Comment,
}

/// Lexical state of the scan cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexState {
    pub in_block_comment: bool,
    pub in_line_comment: bool,
    pub in_string: bool,
    pub in_char: bool,
    /// The next character is escaped and must be consumed verbatim
    pub escape_pending: bool,
}

impl LexState {
    /// State at the start of a file
    #[must_use]
    pub const fn new() -> Self {
        Self {
            in_block_comment: false,
            in_line_comment: false,
            in_string: false,
            in_char: false,
            escape_pending: false,
        }
    }

    /// State at the start of a new line: line comments never continue
    #[must_use]
    pub const fn begin_line(self) -> Self {
        Self {
            in_line_comment: false,
            ..self
        }
    }

    /// State after the last character of `line`
    ///
    /// String and character literals cannot span lines, so they close here
    /// unless the line ends in a backslash continuation.
    #[must_use]
    pub fn end_line(self, line: &str) -> Self {
        let continued = line.trim_end().ends_with('\\');
        Self {
            in_string: self.in_string && continued,
            in_char: self.in_char && continued,
            escape_pending: false,
            ..self
        }
    }

    /// Whether the cursor is inside a string or character literal
    #[must_use]
    pub const fn in_literal(&self) -> bool {
        self.in_string || self.in_char
    }

    /// Whether the cursor is outside every literal and comment
    #[must_use]
    pub const fn is_code(&self) -> bool {
        !self.in_block_comment && !self.in_line_comment && !self.in_literal()
    }

    /// Advance over `ch`, with `next` as one character of lookahead
    #[must_use]
    pub fn step(self, ch: char, next: Option<char>) -> Step {
        let mut state = self;
        let single = |state, class| Step {
            state,
            class,
            consumes_next: false,
        };
        let marker = |state| Step {
            state,
            class: CharClass::Comment,
            consumes_next: true,
        };

        if state.in_line_comment {
            return single(state, CharClass::Comment);
        }
        if state.escape_pending {
            state.escape_pending = false;
            return single(state, CharClass::Literal);
        }
        if ch == '\\' && state.in_literal() {
            state.escape_pending = true;
            return single(state, CharClass::Literal);
        }
        if state.in_block_comment {
            if ch == '*' && next == Some('/') {
                state.in_block_comment = false;
                return marker(state);
            }
            return single(state, CharClass::Comment);
        }
        if ch == '/' && !state.in_literal() {
            match next {
                Some('*') => {
                    state.in_block_comment = true;
                    return marker(state);
                }
                Some('/') => {
                    state.in_line_comment = true;
                    return marker(state);
                }
                _ => {}
            }
        }
        if ch == '"' && !state.in_char {
            state.in_string = !state.in_string;
            return single(state, CharClass::Literal);
        }
        if ch == '\'' && !state.in_string {
            state.in_char = !state.in_char;
            return single(state, CharClass::Literal);
        }
        if state.in_literal() {
            return single(state, CharClass::Literal);
        }
        single(state, CharClass::Code)
    }
}

/// Outcome of advancing a [`LexState`] over one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub state: LexState,
    pub class: CharClass,
    /// The lookahead character belongs to a two-character comment marker
    pub consumes_next: bool,
}

/// Walk `line` from byte offset `from`, calling `visit` with the byte offset
/// of every code character.
///
/// The state is reset for a new line first. Scanning stops at a line comment
/// or when `visit` breaks. On a break the returned state is the one in effect
/// at that point, otherwise it is the state after the end of the line.
pub fn scan_line<B>(
    state: LexState,
    line: &str,
    from: usize,
    mut visit: impl FnMut(usize, char) -> ControlFlow<B>,
) -> (LexState, ControlFlow<B>) {
    let mut state = state.begin_line();
    let Some(tail) = line.get(from..) else {
        return (state, ControlFlow::Continue(()));
    };
    let mut chars = tail.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if state.in_line_comment {
            break;
        }
        let next = chars.peek().map(|&(_, c)| c);
        let step = state.step(ch, next);
        state = step.state;
        if step.consumes_next {
            chars.next();
        }
        if step.class == CharClass::Code {
            if let ControlFlow::Break(b) = visit(from + offset, ch) {
                return (state, ControlFlow::Break(b));
            }
        }
    }
    (state.end_line(line), ControlFlow::Continue(()))
}

/// Copy of `line` with every non-code character replaced by spaces.
///
/// Byte offsets are preserved, so positions found in the masked text are
/// valid in the original line.
#[must_use]
pub fn mask_line(state: LexState, line: &str) -> (LexState, String) {
    let mut masked: Vec<u8> = vec![b' '; line.len()];
    let (state, _) = scan_line::<()>(state, line, 0, |offset, ch| {
        let width = ch.len_utf8();
        masked[offset..offset + width].copy_from_slice(&line.as_bytes()[offset..offset + width]);
        ControlFlow::Continue(())
    });
    // Whole code characters were copied over a blank buffer, so this is valid UTF-8.
    let masked = String::from_utf8(masked).unwrap_or_default();
    (state, masked)
}
