use crate::keyvalues::{SerialisedObject, Token, Tokens};
use crate::{TextParseError, TextParseResult};
use std::io::Read;
use std::iter::Peekable;
use std::string::String;
use std::vec::Vec;

#[derive(Debug)]
enum State {
    ExpectName,
    ExpectBodyOpen(String),
    InBody,
}

/// Parse every top-level object in `text`.
///
/// Truncated input yields whatever was read so far; unclosed objects are
/// closed at end of input.
pub fn parse_objects(text: &[u8]) -> Vec<SerialisedObject> {
    let mut roots = Vec::new();
    let mut stack: Vec<SerialisedObject> = Vec::new();
    let mut tokens = Tokens::new(text).peekable();
    let mut state = State::ExpectName;

    while let Some(token) = tokens.next() {
        state = match (state, token) {
            (State::ExpectName, Token::Quoted(name) | Token::Bare(name)) => {
                State::ExpectBodyOpen(into_string(name))
            }
            (State::ExpectName, _) => State::ExpectName,
            (State::ExpectBodyOpen(name), Token::BraceOpen) => {
                stack.push(SerialisedObject::new(name));
                State::InBody
            }
            (State::ExpectBodyOpen(_), Token::Quoted(name) | Token::Bare(name)) => {
                State::ExpectBodyOpen(into_string(name))
            }
            (State::ExpectBodyOpen(_), Token::BraceClose) => State::ExpectName,
            (State::InBody, Token::Quoted(text) | Token::Bare(text)) => {
                parse_member(text, &mut tokens, &mut stack);
                State::InBody
            }
            (State::InBody, Token::BraceOpen) => {
                stack.push(SerialisedObject::new(String::new()));
                State::InBody
            }
            (State::InBody, Token::BraceClose) => {
                close_object(&mut stack, &mut roots);

                if stack.is_empty() {
                    State::ExpectName
                } else {
                    State::InBody
                }
            }
        };
    }

    while !stack.is_empty() {
        close_object(&mut stack, &mut roots);
    }

    roots
}

/// Parse `text`, requiring exactly one top-level object
pub fn parse_single_object(text: &[u8]) -> TextParseResult<SerialisedObject> {
    let [object]: [SerialisedObject; 1] = parse_objects(text)
        .try_into()
        .map_err(|objects: Vec<_>| TextParseError::ObjectCount(objects.len()))?;

    Ok(object)
}

/// Read all of `reader`, then parse every top-level object
pub fn read_objects<R: Read>(
    mut reader: R,
) -> TextParseResult<Vec<SerialisedObject>> {
    let mut text = Vec::new();
    reader.read_to_end(&mut text)?;
    Ok(parse_objects(&text))
}

// A name followed by `{` opens a child; anything else is a key awaiting its
// value.  A key with no value is dropped.
fn parse_member(
    text: Vec<u8>,
    tokens: &mut Peekable<Tokens>,
    stack: &mut Vec<SerialisedObject>,
) {
    match tokens.peek() {
        Some(Token::BraceOpen) => {
            tokens.next();
            stack.push(SerialisedObject::new(into_string(text)));
        }
        Some(token) if token.is_text() => {
            let value = tokens.next().and_then(Token::into_text);

            if let (Some(value), Some(current)) = (value, stack.last_mut()) {
                current
                    .properties
                    .push((into_string(text), into_string(value)));
            }
        }
        _ => {}
    }
}

fn close_object(
    stack: &mut Vec<SerialisedObject>,
    roots: &mut Vec<SerialisedObject>,
) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

// Text assets are UTF-8; invalid sequences become U+FFFD
fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| {
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    })
}
