use crate::bsp::{LumpKind, Model, Payload, Plane, Record, PLANE_SIZE};
use crate::BinParseError;
use pretty_assertions::assert_eq;
use std::vec::Vec;

fn plane(normal: [f32; 3], kind: i32) -> Plane {
    Plane {
        normal,
        distance: 64.0,
        kind,
    }
}

#[test]
fn plane_layout() {
    let mut bytes = Vec::new();
    plane([0.0, 0.0, 1.0], 2).encode(&mut bytes);

    assert_eq!(bytes.len(), PLANE_SIZE);
    assert_eq!(bytes[8..12], 1.0f32.to_le_bytes());
    assert_eq!(bytes[12..16], 64.0f32.to_le_bytes());
    assert_eq!(bytes[16..20], 2i32.to_le_bytes());
    assert_eq!(Plane::decode(&bytes), Some(plane([0.0, 0.0, 1.0], 2)));
}

#[test]
fn model_layout() {
    let model = Model {
        mins: [-16.0, -16.0, 0.0],
        maxs: [16.0, 16.0, 72.0],
        origin: [0.0; 3],
        head_nodes: [1, 2, 3, -1],
        vis_leaves: 4,
        first_face: 10,
        face_count: 6,
    };
    let mut bytes = Vec::new();
    model.encode(&mut bytes);

    assert_eq!(bytes.len(), Model::SIZE);
    assert_eq!(bytes[48..52], (-1i32).to_le_bytes());
    assert_eq!(bytes[60..64], 6i32.to_le_bytes());
    assert_eq!(Model::decode(&bytes), Some(model));
}

#[test]
fn axial_kinds() {
    assert_eq!(plane([-1.0, 0.0, 0.0], 9).axial_kind(), Some(0));
    assert_eq!(plane([0.0, 1.0, 0.0], 9).axial_kind(), Some(1));
    assert_eq!(plane([0.0, 0.0, -1.0], 9).axial_kind(), Some(2));
    assert_eq!(plane([0.6, 0.8, 0.0], 3).axial_kind(), None);
}

#[test]
fn pre_write_recomputes_axial_kinds_only() {
    let mut payload = Payload::Planes(vec![
        plane([0.0, 1.0, 0.0], 5),
        plane([0.6, 0.8, 0.0], 4),
    ]);
    payload.pre_write();

    assert_eq!(
        payload,
        Payload::Planes(vec![
            plane([0.0, 1.0, 0.0], 1),
            plane([0.6, 0.8, 0.0], 4),
        ])
    );
}

#[test]
fn decode_dispatches_by_kind() {
    let text = b"{\n\"classname\" \"worldspawn\"\n}\n\0";
    let payload = Payload::decode(LumpKind::Entities, text).unwrap();
    assert!(matches!(payload, Payload::Entities(ref e) if e.len() == 1));

    let payload = Payload::decode(LumpKind::Planes, &[0u8; 40]).unwrap();
    assert!(matches!(payload, Payload::Planes(ref p) if p.len() == 2));

    let payload = Payload::decode(LumpKind::Light, &[7u8; 5]).unwrap();
    assert_eq!(payload, Payload::Raw(vec![7u8; 5]));
}

#[test]
fn decode_bad_stride() {
    let err = Payload::decode(LumpKind::Models, &[0u8; 65]).unwrap_err();
    assert!(matches!(err, BinParseError::Corrupt { .. }));
    assert!(err.to_string().contains("Models"));
}

#[test]
fn encode_round_trips_payload_bytes() {
    let mut raw = Vec::new();
    for byte in 0..=255u8 {
        raw.push(byte);
    }

    for (kind, bytes) in [
        (LumpKind::Planes, {
            let mut bytes = Vec::new();
            plane([0.6, 0.8, 0.0], 4).encode(&mut bytes);
            bytes
        }),
        (LumpKind::Vis, raw),
    ] {
        let mut out = Vec::new();
        Payload::decode(kind, &bytes)
            .unwrap()
            .encode(&mut out)
            .unwrap();
        assert_eq!(out, bytes);
    }
}
