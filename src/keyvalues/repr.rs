use crate::common::{write_quoted, Writes};
use crate::keyvalues::parse_single_object;
use crate::TextParseError;
use std::io;
use std::str::FromStr;
use std::string::String;
use std::vec::Vec;

// Tabs are not token separators, so indent with spaces
const INDENT: &[u8] = b"    ";

/// A named node of key-value text.
///
/// Properties keep source order and may repeat a key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SerialisedObject {
    pub name: String,
    pub properties: Vec<(String, String)>,
    pub children: Vec<SerialisedObject>,
}

impl SerialisedObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of the first property named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_as<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key)?.parse().ok()
    }

    /// Replace the first property named `key`, or append one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.properties.push((key, value)),
        }
    }

    /// First child named `name`
    pub fn child(&self, name: &str) -> Option<&SerialisedObject> {
        self.children.iter().find(|child| child.name == name)
    }

    fn write_indented<W: io::Write>(
        &self,
        writer: &mut W,
        depth: usize,
    ) -> io::Result<()> {
        write_indent(writer, depth)?;
        write_name(writer, &self.name)?;
        writer.write_all(b"\n")?;
        write_indent(writer, depth)?;
        writer.write_all(b"{\n")?;

        for (key, value) in &self.properties {
            write_indent(writer, depth + 1)?;
            write_quoted(writer, key.as_bytes())?;
            writer.write_all(b" ")?;
            write_quoted(writer, value.as_bytes())?;
            writer.write_all(b"\n")?;
        }

        for child in &self.children {
            child.write_indented(writer, depth + 1)?;
        }

        write_indent(writer, depth)?;
        writer.write_all(b"}\n")
    }
}

impl FromStr for SerialisedObject {
    type Err = TextParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_single_object(text.as_bytes())
    }
}

impl<W: io::Write> Writes<W> for SerialisedObject {
    fn write_to(&self, writer: &mut W) -> io::Result<()> {
        self.write_indented(writer, 0)
    }
}

impl<W: io::Write> Writes<W> for [SerialisedObject] {
    fn write_to(&self, writer: &mut W) -> io::Result<()> {
        for object in self {
            object.write_to(writer)?;
        }
        Ok(())
    }
}

fn write_indent<W: io::Write>(writer: &mut W, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        writer.write_all(INDENT)?;
    }
    Ok(())
}

// Names that would re-scan as a single bare token are written unquoted
fn write_name<W: io::Write>(writer: &mut W, name: &str) -> io::Result<()> {
    let bare = !name.is_empty()
        && !name.starts_with("//")
        && name
            .bytes()
            .all(|b| b > b' ' && b != b'"' && b != b'{' && b != b'}');

    if bare {
        writer.write_all(name.as_bytes())
    } else {
        write_quoted(writer, name.as_bytes())
    }
}
