use crate::bsp::{LumpKind, Variant};
use std::io;
use std::string::String;

#[derive(Debug, thiserror::Error)]
pub enum BinParse {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("Unrecognized BSP version {0} ({bytes:?})", bytes = .0.to_le_bytes())]
    UnsupportedVersion(u32),

    #[error("Truncated header: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },

    #[error("Corrupt BSP: {message}")]
    Corrupt { message: String },

    #[error("No consistent directory (standard: {standard}; alternate: {alternate})")]
    NoConsistentLayout { standard: Layout, alternate: Layout },

    #[error("Cannot read as {variant:?}: {reason}")]
    Configuration {
        variant: Option<Variant>,
        #[source]
        reason: Layout,
    },
}

impl BinParse {
    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        BinParse::Corrupt {
            message: message.into(),
        }
    }
}

/// Why a directory does not describe a usable layout of the file
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Layout {
    #[error("autodetection disabled but no variant supplied")]
    NoVariant,

    #[error("{kind:?} lump offset {offset} lies inside the header")]
    InsideHeader { kind: LumpKind, offset: u32 },

    #[error("{kind:?} lump ends at {end} past end of file ({file_len} bytes)")]
    PastEnd {
        kind: LumpKind,
        end: u64,
        file_len: usize,
    },

    #[error("{first:?} lump overlaps {second:?} lump at byte {at}")]
    Overlap {
        first: LumpKind,
        second: LumpKind,
        at: u64,
    },

    #[error("{kind:?} lump length {length} is not a multiple of {size}")]
    Stride {
        kind: LumpKind,
        length: usize,
        size: usize,
    },

    #[error("Entities lump at {offset} has byte {byte:#04x} at {at}, not `{{`")]
    NotEntityText { offset: u32, at: usize, byte: u8 },
}

#[derive(Debug, thiserror::Error)]
pub enum TextParse {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("Expected exactly one object, found {0}")]
    ObjectCount(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum Write {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{kind:?} lump too large ({length} bytes)")]
    TooLarge { kind: LumpKind, length: usize },
}

pub type BinParseResult<T> = std::result::Result<T, BinParse>;

pub type TextParseResult<T> = std::result::Result<T, TextParse>;

pub type WriteResult<T> = std::result::Result<T, Write>;
