use std::io;

/// Serialize a value into a writer in its on-disk text or binary form.
pub trait Writes<W: io::Write> {
    fn write_to(&self, writer: &mut W) -> io::Result<()>;
}

/// Read a little-endian `u32` at `at`; `None` if it runs off the end.
pub fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let chunk = bytes.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes(<[u8; 4]>::try_from(chunk).ok()?))
}

pub fn read_i32(bytes: &[u8], at: usize) -> Option<i32> {
    read_u32(bytes, at).map(|u| u as i32)
}

pub fn read_f32(bytes: &[u8], at: usize) -> Option<f32> {
    read_u32(bytes, at).map(f32::from_bits)
}

pub fn read_vec3(bytes: &[u8], at: usize) -> Option<[f32; 3]> {
    Some([
        read_f32(bytes, at)?,
        read_f32(bytes, at + 4)?,
        read_f32(bytes, at + 8)?,
    ])
}

pub fn write_vec3(out: &mut Vec<u8>, v: &[f32; 3]) {
    for component in v {
        out.extend(component.to_le_bytes());
    }
}

/// Quote a key or value, escaping embedded quotes as `\"`.
pub fn write_quoted<W: io::Write>(writer: &mut W, text: &[u8]) -> io::Result<()> {
    writer.write_all(b"\"")?;

    for (index, piece) in text.split(|&b| b == b'"').enumerate() {
        if index > 0 {
            writer.write_all(b"\\\"")?;
        }
        writer.write_all(piece)?;
    }

    writer.write_all(b"\"")
}
