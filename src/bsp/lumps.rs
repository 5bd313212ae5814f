use crate::bsp::{Entities, LumpKind};
use crate::common::{read_f32, read_i32, read_vec3, write_vec3, Writes};
use crate::{BinParseError, BinParseResult};
use std::io;
use std::vec::Vec;

pub const PLANE_SIZE: usize = 20;
pub const MODEL_SIZE: usize = 64;

/// Fixed-size record of a lump that is a plain array
pub trait Record: Sized {
    const SIZE: usize;

    fn decode(chunk: &[u8]) -> Option<Self>;

    fn encode(&self, out: &mut Vec<u8>);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: [f32; 3],
    pub distance: f32,
    pub kind: i32,
}

impl Plane {
    /// Kind of a plane whose normal lies exactly on the X, Y or Z axis
    #[allow(clippy::float_cmp)]
    pub fn axial_kind(&self) -> Option<i32> {
        match self.normal {
            [x, y, z] if x.abs() == 1.0 && y == 0.0 && z == 0.0 => Some(0),
            [x, y, z] if x == 0.0 && y.abs() == 1.0 && z == 0.0 => Some(1),
            [x, y, z] if x == 0.0 && y == 0.0 && z.abs() == 1.0 => Some(2),
            _ => None,
        }
    }
}

impl Record for Plane {
    const SIZE: usize = PLANE_SIZE;

    fn decode(chunk: &[u8]) -> Option<Self> {
        Some(Plane {
            normal: read_vec3(chunk, 0)?,
            distance: read_f32(chunk, 12)?,
            kind: read_i32(chunk, 16)?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_vec3(out, &self.normal);
        out.extend(self.distance.to_le_bytes());
        out.extend(self.kind.to_le_bytes());
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Model {
    pub mins: [f32; 3],
    pub maxs: [f32; 3],
    pub origin: [f32; 3],
    pub head_nodes: [i32; 4],
    pub vis_leaves: i32,
    pub first_face: i32,
    pub face_count: i32,
}

impl Record for Model {
    const SIZE: usize = MODEL_SIZE;

    fn decode(chunk: &[u8]) -> Option<Self> {
        Some(Model {
            mins: read_vec3(chunk, 0)?,
            maxs: read_vec3(chunk, 12)?,
            origin: read_vec3(chunk, 24)?,
            head_nodes: [
                read_i32(chunk, 36)?,
                read_i32(chunk, 40)?,
                read_i32(chunk, 44)?,
                read_i32(chunk, 48)?,
            ],
            vis_leaves: read_i32(chunk, 52)?,
            first_face: read_i32(chunk, 56)?,
            face_count: read_i32(chunk, 60)?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_vec3(out, &self.mins);
        write_vec3(out, &self.maxs);
        write_vec3(out, &self.origin);

        for node in self.head_nodes {
            out.extend(node.to_le_bytes());
        }

        out.extend(self.vis_leaves.to_le_bytes());
        out.extend(self.first_face.to_le_bytes());
        out.extend(self.face_count.to_le_bytes());
    }
}

/// Decoded contents of one directory slot
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Entities(Entities),
    Planes(Vec<Plane>),
    Models(Vec<Model>),
    Raw(Vec<u8>),
}

impl Payload {
    /// Empty payload of the type registered for `kind`
    pub fn empty(kind: LumpKind) -> Self {
        match kind {
            LumpKind::Entities => Payload::Entities(Entities::new()),
            LumpKind::Planes => Payload::Planes(Vec::new()),
            LumpKind::Models => Payload::Models(Vec::new()),
            _ => Payload::Raw(Vec::new()),
        }
    }

    pub fn decode(kind: LumpKind, bytes: &[u8]) -> BinParseResult<Self> {
        Ok(match kind {
            LumpKind::Entities => Payload::Entities(Entities::parse(bytes)),
            LumpKind::Planes => Payload::Planes(decode_records(kind, bytes)?),
            LumpKind::Models => Payload::Models(decode_records(kind, bytes)?),
            _ => Payload::Raw(bytes.to_vec()),
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) -> io::Result<()> {
        match self {
            Payload::Entities(entities) => entities.write_to(out)?,
            Payload::Planes(planes) => encode_records(planes, out),
            Payload::Models(models) => encode_records(models, out),
            Payload::Raw(bytes) => out.extend_from_slice(bytes),
        }

        Ok(())
    }

    /// Recompute derived fields before writing
    pub fn pre_write(&mut self) {
        if let Payload::Planes(planes) = self {
            for plane in planes {
                if let Some(kind) = plane.axial_kind() {
                    plane.kind = kind;
                }
            }
        }
    }
}

fn decode_records<T: Record>(
    kind: LumpKind,
    bytes: &[u8],
) -> BinParseResult<Vec<T>> {
    if bytes.len() % T::SIZE != 0 {
        return Err(BinParseError::corrupt(format!(
            "{kind:?} lump length {} is not a multiple of {}",
            bytes.len(),
            T::SIZE
        )));
    }

    bytes
        .chunks_exact(T::SIZE)
        .enumerate()
        .map(|(index, chunk)| {
            T::decode(chunk).ok_or_else(|| {
                BinParseError::corrupt(format!("{kind:?} record {index} is short"))
            })
        })
        .collect()
}

fn encode_records<T: Record>(records: &[T], out: &mut Vec<u8>) {
    out.reserve(records.len() * T::SIZE);

    for record in records {
        record.encode(out);
    }
}
