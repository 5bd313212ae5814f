use crate::bsp::{BspOptions, MODEL_SIZE, PLANE_SIZE};
use crate::common::read_u32;
use crate::keyvalues::is_separator;
use crate::{BinParseError, BinParseResult, LayoutError};
use std::mem::size_of;
use std::vec::Vec;
use tracing::{debug, trace};

pub const BSP_VERSION: u32 = 29;
pub const GOLDSRC_VERSION: u32 = 30;
pub const BSP2_VERSION: u32 = u32::from_le_bytes(*b"BSP2");
pub const ENTRY_COUNT: usize = 15;
pub const HEAD_SIZE: usize = size_of::<u32>() + ENTRY_COUNT * size_of::<Entry>();

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LumpKind {
    Entities = 0,
    Planes,
    Textures,
    Vertices,
    Vis,
    Nodes,
    TexInfo,
    Faces,
    Light,
    ClipNodes,
    Leaves,
    MarkSurfaces,
    Edges,
    SurfEdges,
    Models,
}

impl LumpKind {
    pub const ALL: [LumpKind; ENTRY_COUNT] = [
        LumpKind::Entities,
        LumpKind::Planes,
        LumpKind::Textures,
        LumpKind::Vertices,
        LumpKind::Vis,
        LumpKind::Nodes,
        LumpKind::TexInfo,
        LumpKind::Faces,
        LumpKind::Light,
        LumpKind::ClipNodes,
        LumpKind::Leaves,
        LumpKind::MarkSurfaces,
        LumpKind::Edges,
        LumpKind::SurfEdges,
        LumpKind::Models,
    ];
}

impl From<LumpKind> for usize {
    fn from(kind: LumpKind) -> Self {
        kind as usize
    }
}

/// Directory layout.
///
/// `AlternateSwap` (the Blue Shift layout) stores the planes entry in the
/// first directory position and the entities entry in the second.  Every
/// other position is shared with `Standard`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Standard,
    AlternateSwap,
}

impl Variant {
    /// Lump described by directory position `position`
    pub fn kind_at(self, position: usize) -> LumpKind {
        let index = match (self, position) {
            (Variant::AlternateSwap, 0) => 1,
            (Variant::AlternateSwap, 1) => 0,
            (_, index) => index,
        };

        LumpKind::ALL[index]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Entry {
    pub offset: u32,
    pub length: u32,
}

impl Entry {
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }

    /// Bytes covered by this entry within `file`
    pub fn slice<'a>(&self, file: &'a [u8]) -> BinParseResult<&'a [u8]> {
        if self.length == 0 {
            return Ok(&[]);
        }

        usize::try_from(self.end())
            .ok()
            .and_then(|end| file.get(self.offset as usize..end))
            .ok_or_else(|| {
                BinParseError::corrupt(format!(
                    "lump at {} (+{}) runs past end of file ({} bytes)",
                    self.offset,
                    self.length,
                    file.len()
                ))
            })
    }
}

/// Preamble and directory, with entries indexed by lump kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Head {
    version: u32,
    entries: [Entry; ENTRY_COUNT],
}

impl Head {
    pub fn new(version: u32, entries: [Entry; ENTRY_COUNT]) -> Self {
        Self { version, entries }
    }

    pub fn entry(&self, kind: LumpKind) -> Entry {
        self.entries[usize::from(kind)]
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Read the preamble and directory as laid out by `variant`
    pub fn decode(bytes: &[u8], variant: Variant) -> BinParseResult<Head> {
        let truncated = || BinParseError::Truncated {
            need: HEAD_SIZE,
            have: bytes.len(),
        };

        let version = read_u32(bytes, 0).ok_or_else(truncated)?;

        if version != BSP_VERSION
            && version != GOLDSRC_VERSION
            && version != BSP2_VERSION
        {
            return Err(BinParseError::UnsupportedVersion(version));
        }

        if bytes.len() < HEAD_SIZE {
            return Err(truncated());
        }

        let mut entries = [Entry::default(); ENTRY_COUNT];

        for position in 0..ENTRY_COUNT {
            let at = size_of::<u32>() + position * size_of::<Entry>();
            let entry = Entry {
                offset: read_u32(bytes, at).ok_or_else(truncated)?,
                length: read_u32(bytes, at + 4).ok_or_else(truncated)?,
            };
            entries[usize::from(variant.kind_at(position))] = entry;
        }

        Ok(Head { version, entries })
    }

    /// Write the preamble and directory as laid out by `variant`
    pub fn encode(&self, variant: Variant) -> [u8; HEAD_SIZE] {
        let mut bytes = [0u8; HEAD_SIZE];
        bytes[..4].copy_from_slice(&self.version.to_le_bytes());

        for position in 0..ENTRY_COUNT {
            let at = size_of::<u32>() + position * size_of::<Entry>();
            let entry = self.entry(variant.kind_at(position));
            bytes[at..at + 4].copy_from_slice(&entry.offset.to_le_bytes());
            bytes[at + 4..at + 8].copy_from_slice(&entry.length.to_le_bytes());
        }

        bytes
    }

    /// Check that this directory describes a consistent layout of `file`
    pub fn check_layout(&self, file: &[u8]) -> Result<(), LayoutError> {
        let mut spans: Vec<(u64, u64, LumpKind)> =
            Vec::with_capacity(ENTRY_COUNT);

        for kind in LumpKind::ALL {
            let entry = self.entry(kind);

            if entry.length == 0 {
                continue;
            }

            if (entry.offset as usize) < HEAD_SIZE {
                return Err(LayoutError::InsideHeader {
                    kind,
                    offset: entry.offset,
                });
            }

            if entry.end() > file.len() as u64 {
                return Err(LayoutError::PastEnd {
                    kind,
                    end: entry.end(),
                    file_len: file.len(),
                });
            }

            spans.push((u64::from(entry.offset), entry.end(), kind));
        }

        spans.sort_unstable_by_key(|&(start, _, _)| start);

        for pair in spans.windows(2) {
            let (_, end, first) = pair[0];
            let (start, _, second) = pair[1];

            if end > start {
                return Err(LayoutError::Overlap {
                    first,
                    second,
                    at: start,
                });
            }
        }

        self.check_stride(LumpKind::Planes, PLANE_SIZE)?;
        self.check_stride(LumpKind::Models, MODEL_SIZE)?;

        // In range, checked above
        let entities = self.entry(LumpKind::Entities);
        let text = entities.slice(file).unwrap_or_default();
        let first = text.iter().position(|&b| !is_separator(b));

        // Either entity text, or nothing but the terminator
        match first.map(|at| (at, text[at])) {
            None | Some((_, b'{')) => Ok(()),
            Some((at, 0)) if at + 1 == text.len() => Ok(()),
            Some((at, byte)) => Err(LayoutError::NotEntityText {
                offset: entities.offset,
                at,
                byte,
            }),
        }
    }

    fn check_stride(
        &self,
        kind: LumpKind,
        size: usize,
    ) -> Result<(), LayoutError> {
        let length = self.entry(kind).length as usize;

        if length % size == 0 {
            Ok(())
        } else {
            Err(LayoutError::Stride { kind, length, size })
        }
    }

    /// Decode the directory, choosing the variant per `options`
    pub fn resolve(
        bytes: &[u8],
        options: &BspOptions,
    ) -> BinParseResult<(Head, Variant)> {
        if !options.auto_detect_variant {
            let variant = options.forced_variant.ok_or(
                BinParseError::Configuration {
                    variant: None,
                    reason: LayoutError::NoVariant,
                },
            )?;

            let head = Head::decode(bytes, variant)?;
            head.check_layout(bytes).map_err(|reason| {
                BinParseError::Configuration {
                    variant: Some(variant),
                    reason,
                }
            })?;

            debug!(?variant, "using forced directory variant");
            return Ok((head, variant));
        }

        let standard = Head::decode(bytes, Variant::Standard)?;
        let alternate = Head::decode(bytes, Variant::AlternateSwap)?;

        let resolved = match (
            standard.check_layout(bytes),
            alternate.check_layout(bytes),
        ) {
            (Ok(()), Ok(())) => {
                debug!("both directory variants plausible, keeping standard");
                (standard, Variant::Standard)
            }
            (Ok(()), Err(reason)) => {
                trace!(%reason, "alternate directory variant rejected");
                (standard, Variant::Standard)
            }
            (Err(reason), Ok(())) => {
                trace!(%reason, "standard directory variant rejected");
                (alternate, Variant::AlternateSwap)
            }
            (Err(standard), Err(alternate)) => {
                return Err(BinParseError::NoConsistentLayout {
                    standard,
                    alternate,
                });
            }
        };

        debug!(variant = ?resolved.1, "detected directory variant");
        Ok(resolved)
    }
}

