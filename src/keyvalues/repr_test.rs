use crate::common::Writes;
use crate::keyvalues::{parse_objects, SerialisedObject};
use pretty_assertions::assert_eq;
use std::string::String;
use std::vec::Vec;

fn sample() -> SerialisedObject {
    let mut root = SerialisedObject::new("world");
    root.properties.push((String::from("id"), String::from("1")));
    root.properties.push((String::from("id"), String::from("2")));
    root.properties
        .push((String::from("message"), String::from("say \"hi\"")));

    let mut solid = SerialisedObject::new("solid");
    solid.set("material", "TOOLS/NODRAW");
    solid.children.push(SerialisedObject::new("side"));
    root.children.push(solid);
    root.children.push(SerialisedObject::new("group name"));
    root
}

fn written(objects: &[SerialisedObject]) -> String {
    let mut bytes = Vec::new();
    objects.write_to(&mut bytes).unwrap();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn get_returns_first_occurrence() {
    let object = sample();
    assert_eq!(object.get("id"), Some("1"));
    assert_eq!(object.get_as::<u32>("id"), Some(1));
    assert_eq!(object.get_as::<u32>("message"), None);
    assert_eq!(object.get("missing"), None);
}

#[test]
fn set_replaces_first_or_appends() {
    let mut object = sample();
    object.set("id", "7");
    object.set("origin", "0 0 0");

    assert_eq!(
        object.properties,
        [
            (String::from("id"), String::from("7")),
            (String::from("id"), String::from("2")),
            (String::from("message"), String::from("say \"hi\"")),
            (String::from("origin"), String::from("0 0 0")),
        ]
    );
}

#[test]
fn child_by_name() {
    let object = sample();
    assert_eq!(object.child("solid").unwrap().get("material"), Some("TOOLS/NODRAW"));
    assert!(object.child("entity").is_none());
}

#[test]
fn write_layout() {
    let mut object = SerialisedObject::new("Test");
    object.set("Key", "Value");
    object.children.push(SerialisedObject::new("Inner"));

    assert_eq!(
        written(&[object]),
        "Test\n{\n    \"Key\" \"Value\"\n    Inner\n    {\n    }\n}\n"
    );
}

#[test]
fn write_then_parse_preserves_tree() {
    let objects = [sample(), SerialisedObject::new("")];
    let text = written(&objects);

    assert!(text.contains("\"group name\""));
    assert!(text.contains("\"say \\\"hi\\\"\""));
    assert_eq!(parse_objects(text.as_bytes()), objects);
}
