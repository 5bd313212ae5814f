use goldsrc_util::bsp::{
    BspFile, BspOptions, Entities, LumpKind, Variant, GOLDSRC_VERSION,
};
use goldsrc_util::common::Writes;
use goldsrc_util::keyvalues::{parse_objects, parse_single_object};
use goldsrc_util::{BinParseError, TextParseError};

const ENTITY_TEXT: &str = r#"{
"classname" "worldspawn"
"message" "Residue Processing"
"wad" "\sierra\half-life\valve\halflife.wad"
}
{
"classname" "func_door"
"model" "*1"
"target" "alarm"
"target" "lights"
}
"#;

fn build(variant: Variant) -> Vec<u8> {
    let mut bsp = BspFile::new(GOLDSRC_VERSION);
    *bsp.entities_mut() = Entities::parse(ENTITY_TEXT.as_bytes());
    bsp.raw_mut(LumpKind::Vertices)
        .unwrap()
        .extend(0..48u8);
    bsp.variant = variant;
    bsp.to_bytes().unwrap()
}

#[test]
fn container_survives_variant_flip() -> Result<(), BinParseError> {
    let standard = build(Variant::Standard);
    let mut bsp = BspFile::from_bytes(&standard, &BspOptions::default())?;
    assert_eq!(bsp.variant, Variant::Standard);

    bsp.variant = Variant::AlternateSwap;
    let alternate = bsp.to_bytes().unwrap();
    assert_eq!(alternate, build(Variant::AlternateSwap));
    assert_eq!(alternate.len(), standard.len());

    let reread = BspFile::from_bytes(&alternate, &BspOptions::default())?;
    assert_eq!(reread.variant, Variant::AlternateSwap);
    assert_eq!(reread.entities(), bsp.entities());

    let door = &reread.entities().entities[1];
    let targets: Vec<&[u8]> = door
        .iter()
        .filter(|(key, _)| *key == b"target")
        .map(|(_, value)| value)
        .collect();
    let expected: [&[u8]; 2] = [b"alarm", b"lights"];
    assert_eq!(targets, expected);
    Ok(())
}

#[test]
fn forced_variant_never_falls_back() {
    let standard = build(Variant::Standard);
    let options = BspOptions::forced(Variant::AlternateSwap);

    match BspFile::from_bytes(&standard, &options) {
        Err(BinParseError::Configuration { .. }) => {}
        other => panic!("Expected configuration error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn text_asset_round_trip() -> Result<(), TextParseError> {
    let asset = r#"
// generated by the level editor
versioninfo
{
    "editorversion" "400"
    "formatversion" "100"
}
world
{
    "id" "1"
    "classname" "worldspawn"
    solid
    {
        "id" "2"
        side { "id" "3" "material" "TOOLS/TOOLSNODRAW" }
    }
}
"#;
    let objects = parse_objects(asset.as_bytes());
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[1].get_as::<u32>("id"), Some(1));

    let side = &objects[1].children[0].children[0];
    assert_eq!(side.name, "side");
    assert_eq!(side.get("material"), Some("TOOLS/TOOLSNODRAW"));

    let mut text = Vec::new();
    objects.write_to(&mut text)?;
    assert_eq!(parse_objects(&text), objects);

    let world = parse_single_object(b"world { \"id\" \"1\" }")?;
    assert_eq!(world.name, "world");
    assert!(parse_single_object(asset.as_bytes()).is_err());
    Ok(())
}

#[test]
fn legacy_code_page_entities_are_byte_identical() -> Result<(), BinParseError> {
    let mut bsp = BspFile::new(GOLDSRC_VERSION);
    *bsp.entities_mut() =
        Entities::parse(b"{\n\"classname\" \"worldspawn\"\n\"message\" \"Caf\xe9\"\n}\n\0");
    let bytes = bsp.to_bytes().unwrap();

    let mut reread = BspFile::from_bytes(&bytes, &BspOptions::default())?;
    let world = &reread.entities().entities[0];
    assert_eq!(world.get_bytes("message"), Some(&b"Caf\xe9"[..]));
    assert_eq!(reread.to_bytes().unwrap(), bytes);
    Ok(())
}

#[test]
fn tab_indented_crlf_text_asset() {
    let asset = b"Test\r\n{\r\n\t\"Key1\" \"Value1\"\r\n\t\"Key2\" \"Value2\"\r\n}\r\nOther { }\r\n";
    let objects = parse_objects(asset);

    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].get("Key1"), Some("Value1"));
    assert_eq!(objects[0].get("Key2"), Some("Value2"));
    assert_eq!(objects[1].name, "Other");
}
