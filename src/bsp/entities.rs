use crate::common::{write_quoted, Writes};
use crate::keyvalues::{Token, Tokens};
use std::io;
use std::str;
use std::vec::Vec;

/// One flat record of the entities lump.
///
/// Keys may repeat; all occurrences are kept in source order.  Keys and
/// values hold the bytes as read, so text in legacy code pages re-encodes
/// unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entity {
    pub properties: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the first property named `key`, if it is valid UTF-8
    pub fn get(&self, key: &str) -> Option<&str> {
        str::from_utf8(self.get_bytes(key)?).ok()
    }

    /// Raw value of the first property named `key`
    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        self.properties
            .iter()
            .find(|(k, _)| k == key.as_bytes())
            .map(|(_, v)| v.as_slice())
    }

    /// Replace the first property named `key`, or append one
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        let key = key.into();
        let value = value.into();

        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.properties.push((key, value)),
        }
    }

    /// Remove every property named `key`, returning how many were removed
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.properties.len();
        self.properties.retain(|(k, _)| k != key.as_bytes());
        before - self.properties.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    pub fn classname(&self) -> Option<&str> {
        self.get("classname")
    }

    /// Index of the brush model named by a `"model" "*N"` property
    pub fn brush_model(&self) -> Option<usize> {
        self.get("model")?.strip_prefix('*')?.parse().ok()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entities {
    pub entities: Vec<Entity>,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Decode entity text; reading stops at the NUL terminator.
    ///
    /// `{` always opens a new record and `}` closes it.  Tokens outside a
    /// record and a key left without a value are dropped.
    pub fn parse(text: &[u8]) -> Self {
        let mut entities: Vec<Entity> = Vec::new();
        let mut in_record = false;
        let mut key: Option<Vec<u8>> = None;

        for token in Tokens::new(text) {
            match token {
                Token::BraceOpen => {
                    entities.push(Entity::new());
                    in_record = true;
                    key = None;
                }
                Token::BraceClose => {
                    in_record = false;
                    key = None;
                }
                Token::Quoted(text) | Token::Bare(text) if in_record => {
                    match (key.take(), entities.last_mut()) {
                        (Some(k), Some(current)) => {
                            current.properties.push((k, text))
                        }
                        _ => key = Some(text),
                    }
                }
                Token::Quoted(_) | Token::Bare(_) => {}
            }
        }

        Self { entities }
    }
}

impl<W: io::Write> Writes<W> for Entity {
    fn write_to(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"{\n")?;

        for (key, value) in self.iter() {
            if key.is_empty() || value.is_empty() {
                continue;
            }

            write_quoted(writer, key)?;
            writer.write_all(b" ")?;
            write_quoted(writer, value)?;
            writer.write_all(b"\n")?;
        }

        writer.write_all(b"}\n")
    }
}

impl<W: io::Write> Writes<W> for Entities {
    fn write_to(&self, writer: &mut W) -> io::Result<()> {
        for entity in &self.entities {
            entity.write_to(writer)?;
        }

        // null-terminate
        writer.write_all(&[0u8])
    }
}
