use std::iter::FusedIterator;
use std::vec::Vec;

const TEXT_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    BraceOpen,
    BraceClose,
    Quoted(Vec<u8>),
    Bare(Vec<u8>),
}

impl Token {
    /// Raw bytes of a quoted or bare token, `None` for braces
    pub fn into_text(self) -> Option<Vec<u8>> {
        match self {
            Token::Quoted(text) | Token::Bare(text) => Some(text),
            Token::BraceOpen | Token::BraceClose => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Token::Quoted(_) | Token::Bare(_))
    }
}

/// Scan one token starting at `cursor`.
///
/// Returns the token and the cursor just past it, or `None` at end of input.
/// Control bytes other than NUL separate tokens like spaces do; a NUL ends
/// the input.  An unterminated quoted string or trailing comment also ends
/// the input rather than producing an error.  Token bytes are kept as-is.
pub fn next_token(text: &[u8], cursor: usize) -> Option<(Token, usize)> {
    let mut pos = skip_whitespace(text, cursor)?;

    while text[pos..].starts_with(b"//") {
        let newline = text[pos + 2..].iter().position(|&b| b == b'\n')?;
        pos = skip_whitespace(text, pos + 2 + newline + 1)?;
    }

    match text[pos] {
        b'{' => Some((Token::BraceOpen, pos + 1)),
        b'}' => Some((Token::BraceClose, pos + 1)),
        b'"' => scan_quoted(text, pos + 1),
        b if b > b' ' => {
            let len = text[pos..].iter().take_while(|&&b| b > b' ').count();
            let bare = text[pos..pos + len].to_vec();
            Some((Token::Bare(bare), pos + len))
        }
        _ => None,
    }
}

/// Bytes skipped between tokens: everything up to and including space,
/// except NUL
pub(crate) fn is_separator(b: u8) -> bool {
    b != 0 && b <= b' '
}

fn skip_whitespace(text: &[u8], cursor: usize) -> Option<usize> {
    let skipped = text
        .get(cursor..)?
        .iter()
        .take_while(|&&b| is_separator(b))
        .count();
    let pos = cursor + skipped;

    if pos < text.len() {
        Some(pos)
    } else {
        None
    }
}

fn scan_quoted(text: &[u8], start: usize) -> Option<(Token, usize)> {
    let mut bytes = Vec::with_capacity(TEXT_CAPACITY);
    let mut pos = start;

    while pos < text.len() {
        match text[pos] {
            b'\\' if text.get(pos + 1) == Some(&b'"') => {
                bytes.push(b'"');
                pos += 2;
            }
            b'"' => return Some((Token::Quoted(bytes), pos + 1)),
            b => {
                bytes.push(b);
                pos += 1;
            }
        }
    }

    None
}

/// Lazily yields tokens from a text buffer
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a [u8],
    cursor: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self { text, cursor: 0 }
    }

    /// Byte offset of the next unread input
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match next_token(self.text, self.cursor) {
            Some((token, cursor)) => {
                self.cursor = cursor;
                Some(token)
            }
            None => {
                self.cursor = self.text.len();
                None
            }
        }
    }
}

impl FusedIterator for Tokens<'_> {}
