use crate::bsp::{
    BspOptions, Entities, Entity, Entry, Head, LumpKind, Model, Payload, Plane,
    Variant, ENTRY_COUNT, GOLDSRC_VERSION, HEAD_SIZE,
};
use crate::{BinParseResult, WriteError, WriteResult};
use std::io::{self, Read};
use std::vec::Vec;
use tracing::{trace, warn};

/// One directory slot with its decoded payload.
///
/// The payload variant always matches the slot's registered type.
#[derive(Clone, Debug, PartialEq)]
pub struct Lump {
    payload: Payload,
    raw_length: u32,
}

impl Lump {
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Length in bytes as last read or written
    pub fn raw_length(&self) -> u32 {
        self.raw_length
    }
}

/// A BSP container: preamble version, directory variant and one lump per slot.
///
/// `variant` is read again on every write, so flipping it re-encodes the
/// same payloads under the other directory layout.
#[derive(Clone, Debug, PartialEq)]
pub struct BspFile {
    pub version: u32,
    pub variant: Variant,
    lumps: Vec<Lump>,
}

impl BspFile {
    pub fn new(version: u32) -> Self {
        let lumps = LumpKind::ALL
            .iter()
            .map(|&kind| Lump {
                payload: Payload::empty(kind),
                raw_length: 0,
            })
            .collect();

        Self {
            version,
            variant: Variant::Standard,
            lumps,
        }
    }

    /// Decode a whole container held in memory
    pub fn from_bytes(
        bytes: &[u8],
        options: &BspOptions,
    ) -> BinParseResult<Self> {
        let (head, variant) = Head::resolve(bytes, options)?;
        let mut lumps = Vec::with_capacity(ENTRY_COUNT);

        for kind in LumpKind::ALL {
            let entry = head.entry(kind);
            trace!(
                ?kind,
                offset = entry.offset,
                length = entry.length,
                "decoding lump"
            );
            let payload = Payload::decode(kind, entry.slice(bytes)?)?;

            lumps.push(Lump {
                payload,
                raw_length: entry.length,
            });
        }

        let bsp = Self {
            version: head.version(),
            variant,
            lumps,
        };

        bsp.post_read();
        Ok(bsp)
    }

    /// Read `reader` to the end, then decode
    pub fn read<R: Read>(
        mut reader: R,
        options: &BspOptions,
    ) -> BinParseResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, options)
    }

    pub fn lump(&self, kind: LumpKind) -> &Lump {
        &self.lumps[usize::from(kind)]
    }

    fn payload_mut(&mut self, kind: LumpKind) -> &mut Payload {
        &mut self.lumps[usize::from(kind)].payload
    }

    /// Bytes of a slot without a typed decoder
    pub fn raw(&self, kind: LumpKind) -> Option<&[u8]> {
        match self.lump(kind).payload() {
            Payload::Raw(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    pub fn raw_mut(&mut self, kind: LumpKind) -> Option<&mut Vec<u8>> {
        match self.payload_mut(kind) {
            Payload::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn entities(&self) -> &Entities {
        match &self.lump(LumpKind::Entities).payload {
            Payload::Entities(entities) => entities,
            _ => unreachable!("entities slot holds another payload"),
        }
    }

    pub fn entities_mut(&mut self) -> &mut Entities {
        match self.payload_mut(LumpKind::Entities) {
            Payload::Entities(entities) => entities,
            _ => unreachable!("entities slot holds another payload"),
        }
    }

    pub fn planes(&self) -> &[Plane] {
        match &self.lump(LumpKind::Planes).payload {
            Payload::Planes(planes) => planes,
            _ => &[],
        }
    }

    pub fn planes_mut(&mut self) -> &mut Vec<Plane> {
        match self.payload_mut(LumpKind::Planes) {
            Payload::Planes(planes) => planes,
            _ => unreachable!("planes slot holds another payload"),
        }
    }

    pub fn models(&self) -> &[Model] {
        match &self.lump(LumpKind::Models).payload {
            Payload::Models(models) => models,
            _ => &[],
        }
    }

    pub fn models_mut(&mut self) -> &mut Vec<Model> {
        match self.payload_mut(LumpKind::Models) {
            Payload::Models(models) => models,
            _ => unreachable!("models slot holds another payload"),
        }
    }

    /// Brush model an entity points at through `"model" "*N"`
    pub fn brush_model(&self, entity: &Entity) -> Option<&Model> {
        self.models().get(entity.brush_model()?)
    }

    // Cross-lump references are resolved lazily; this pass only reports the
    // ones that cannot resolve.
    fn post_read(&self) {
        for lump in &self.lumps {
            if let Payload::Entities(entities) = &lump.payload {
                self.link_brush_models(entities);
            }
        }
    }

    fn link_brush_models(&self, entities: &Entities) {
        let model_count = self.models().len();

        for (index, entity) in entities.entities.iter().enumerate() {
            if let Some(model) = entity.brush_model() {
                if model >= model_count {
                    warn!(
                        entity = index,
                        classname = entity.classname().unwrap_or_default(),
                        model,
                        model_count,
                        "entity references missing brush model"
                    );
                }
            }
        }
    }

    /// Encode the container using the current `variant`
    pub fn to_bytes(&mut self) -> WriteResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Encode into `writer`.
    ///
    /// Lumps are laid out back to back in directory order, the first one
    /// immediately after the directory.
    pub fn write_to<W: io::Write>(
        &mut self,
        writer: &mut W,
    ) -> WriteResult<()> {
        for lump in &mut self.lumps {
            lump.payload.pre_write();
        }

        let mut blobs = Vec::with_capacity(ENTRY_COUNT);

        for lump in &self.lumps {
            let mut blob = Vec::new();
            lump.payload.encode(&mut blob)?;
            blobs.push(blob);
        }

        let mut entries = [Entry::default(); ENTRY_COUNT];
        let mut offset = HEAD_SIZE as u32;

        for position in 0..ENTRY_COUNT {
            let kind = self.variant.kind_at(position);
            let index = usize::from(kind);
            let too_large = || WriteError::TooLarge {
                kind,
                length: blobs[index].len(),
            };

            let length =
                u32::try_from(blobs[index].len()).map_err(|_| too_large())?;
            entries[index] = Entry { offset, length };
            trace!(?kind, offset, length, "encoding lump");

            offset = offset.checked_add(length).ok_or_else(too_large)?;
            self.lumps[index].raw_length = length;
        }

        let head = Head::new(self.version, entries);
        writer.write_all(&head.encode(self.variant))?;

        for position in 0..ENTRY_COUNT {
            let index = usize::from(self.variant.kind_at(position));
            writer.write_all(&blobs[index])?;
        }

        Ok(())
    }
}

impl Default for BspFile {
    fn default() -> Self {
        Self::new(GOLDSRC_VERSION)
    }
}
