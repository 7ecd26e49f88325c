mod common;

use common::*;
use mp4atoms::boxes::FourCC;
use mp4atoms::parser::{BoxParser, ParseError, ScanOptions, Scope, read_box_header};
use mp4atoms::{NodeKind, default_registry};
use std::io::{Cursor, Seek};

fn parse_one(bytes: Vec<u8>, options: ScanOptions) -> Result<mp4atoms::AtomNode, ParseError> {
    let len = bytes.len() as u64;
    let mut cur = Cursor::new(bytes);
    let parser = BoxParser::new(default_registry(), options, len);
    parser.parse_box(&mut cur, Scope::file(len))
}

#[test]
fn read_single_ftyp_header() {
    let mut cur = Cursor::new(ftyp(b"isom"));

    let hdr = read_box_header(&mut cur).expect("read_box_header failed");

    assert_eq!(hdr.start, 0);
    assert_eq!(hdr.size, 20);
    assert_eq!(hdr.typ, FourCC(*b"ftyp"));
    assert_eq!(hdr.header_size, 8);
    assert_eq!(cur.stream_position().unwrap(), 8);
}

#[test]
fn extended_size_header() {
    let mut cur = Cursor::new(large_atom(b"mdat", &[0u8; 10]));
    let hdr = read_box_header(&mut cur).unwrap();
    assert_eq!(hdr.size, 26);
    assert_eq!(hdr.header_size, 16);
}

#[test]
fn uuid_header_carries_extended_type() {
    let id = [0xAB; 16];
    let mut payload = id.to_vec();
    payload.extend_from_slice(b"xyz");
    let mut cur = Cursor::new(atom(b"uuid", &payload));

    let hdr = read_box_header(&mut cur).unwrap();
    assert_eq!(hdr.header_size, 24);
    assert_eq!(hdr.uuid, Some(id));
}

#[test]
fn size_below_header_is_invalid() {
    let mut bytes = atom(b"free", &[]);
    bytes[3] = 4;
    let err = read_box_header(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, ParseError::InvalidSize { size: 4, .. }));
}

#[test]
fn extended_size_below_sixteen_is_invalid() {
    let mut bytes = large_atom(b"mdat", &[]);
    bytes[8..16].copy_from_slice(&12u64.to_be_bytes());
    let err = read_box_header(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, ParseError::InvalidSize { size: 12, .. }));
}

#[test]
fn extended_size_zero_is_invalid() {
    let mut bytes = large_atom(b"mdat", &[1, 2]);
    bytes[8..16].copy_from_slice(&0u64.to_be_bytes());
    let err = parse_one(bytes, ScanOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::InvalidSize { .. }));
}

#[test]
fn leaf_payload_is_a_byte_range() {
    let node = parse_one(atom(b"mdat", &[9u8; 5]), ScanOptions::default()).unwrap();
    assert_eq!(node.kind, NodeKind::Leaf);
    assert_eq!(node.payload(), Some((8, 5)));
    assert_eq!(node.size(), 13);
    assert!(node.version.is_none());
}

#[test]
fn container_children_tile_the_payload() {
    let moov = container(b"moov", &[mvhd(), container(b"trak", &[tkhd()]), atom(b"free", &[0; 3])]);
    let node = parse_one(moov.clone(), ScanOptions::default()).unwrap();

    assert_eq!(node.kind, NodeKind::Container);
    assert_eq!(node.size(), moov.len() as u64);
    let kids = node.children();
    assert_eq!(kids.len(), 3);
    let total: u64 = kids.iter().map(|k| k.size()).sum();
    assert_eq!(total, node.size() - node.hdr.header_size);
    assert_tiled(std::slice::from_ref(&node));
}

#[test]
fn versioned_atom_reads_version_and_flags() {
    let moov = container(b"moov", &[container(b"trak", &[full_atom(b"tkhd", 1, 0x000007, &[0; 92])])]);
    let node = parse_one(moov, ScanOptions::default()).unwrap();
    let tkhd = node.find(FourCC(*b"tkhd")).unwrap();
    assert_eq!(tkhd.version, Some(1));
    assert_eq!(tkhd.flags, Some(7));
    assert_eq!(tkhd.payload(), Some((tkhd.start() + 12, 92)));
}

#[test]
fn language_atom_reads_packed_language() {
    // "eng" = (5 << 10) | (14 << 5) | 7
    let titl = full_atom(b"titl", 0, 0, &[0x15, 0xC7, b'H', b'i', 0]);
    let moov = container(b"moov", &[container(b"udta", &[titl])]);
    let node = parse_one(moov, ScanOptions::default()).unwrap();

    let titl = node.find(FourCC(*b"titl")).unwrap();
    assert_eq!(titl.language, Some(0x15C7));
    assert_eq!(titl.language_code().as_deref(), Some("eng"));
    assert_eq!(titl.payload(), Some((titl.start() + 14, 3)));
}

#[test]
fn versioned_atom_too_short_for_version_is_invalid() {
    let moov = container(b"moov", &[atom(b"mvhd", &[0, 0])]);
    let err = parse_one(moov, ScanOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::InvalidSize { typ, .. } if typ == FourCC(*b"mvhd")));
}

#[test]
fn unknown_code_defaults_to_opaque_leaf() {
    let moov = container(b"moov", &[container(b"xyzw", &[atom(b"free", &[])])]);
    let node = parse_one(moov, ScanOptions::default()).unwrap();
    let xyzw = &node.children()[0];
    assert_eq!(xyzw.kind, NodeKind::Leaf);
    assert_eq!(xyzw.payload(), Some((16, 8)));
}

#[test]
fn probing_turns_clean_unknown_payload_into_container() {
    let options = ScanOptions {
        probe_unknown: true,
        ..Default::default()
    };
    let moov = container(
        b"moov",
        &[container(b"xyzw", &[atom(b"free", &[])]), atom(b"abcd", &[1, 2, 3])],
    );
    let node = parse_one(moov, options).unwrap();

    let xyzw = &node.children()[0];
    assert_eq!(xyzw.kind, NodeKind::ProbedContainer);
    assert_eq!(xyzw.children()[0].code(), FourCC(*b"free"));

    let abcd = &node.children()[1];
    assert_eq!(abcd.kind, NodeKind::Leaf);
}

#[test]
fn child_overrunning_container_is_a_size_mismatch() {
    let mut trak = container(b"trak", &[tkhd()]);
    let bigger = (trak.len() + 8) as u32;
    trak[0..4].copy_from_slice(&bigger.to_be_bytes());
    // trailing bytes so the overrun stays inside the stream
    let bytes = [container(b"moov", &[mvhd(), trak]), atom(b"free", &[])].concat();

    let err = parse_one(bytes, ScanOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::SizeMismatch { container, .. } if container == FourCC(*b"moov")));
}

#[test]
fn trailing_bytes_inside_container_are_a_size_mismatch() {
    let moov = atom(b"moov", &[mvhd(), vec![0, 0, 0, 0]].concat());
    let err = parse_one(moov, ScanOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::SizeMismatch { container, .. } if container == FourCC(*b"moov")));
}

#[test]
fn box_longer_than_stream_is_truncated() {
    let mut mdat = atom(b"mdat", &[0; 4]);
    mdat[0..4].copy_from_slice(&100u32.to_be_bytes());
    let err = parse_one(mdat, ScanOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ParseError::TruncatedStream {
            offset: 0,
            needed: 100,
            available: 12
        }
    ));
}

#[test]
fn size_zero_child_extends_to_container_end() {
    let moov = container(b"moov", &[mvhd(), open_ended(b"free", &[7; 5])]);
    let node = parse_one(moov.clone(), ScanOptions::default()).unwrap();

    let free = &node.children()[1];
    assert_eq!(free.hdr.size, 0);
    assert_eq!(free.end, moov.len() as u64);
    assert_eq!(free.size(), 13);
    assert_eq!(free.payload(), Some((free.start() + 8, 5)));
}

#[test]
fn size_zero_container_followed_by_stray_bytes_is_rejected() {
    // udta claims the rest of moov, which leaves 4 bytes that are not a box
    let udta = [open_ended(b"udta", &[]), vec![0xDE, 0xAD, 0xBE, 0xEF]].concat();
    let moov = atom(b"moov", &[mvhd(), udta].concat());
    let err = parse_one(moov, ScanOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::SizeMismatch { container, .. } if container == FourCC(*b"udta")));
}

#[test]
fn runaway_nesting_is_rejected() {
    let options = ScanOptions {
        probe_unknown: true,
        ..Default::default()
    };
    let mut nested = atom(b"leaf", &[]);
    for _ in 0..70 {
        nested = container(b"nest", &[nested]);
    }
    let err = parse_one(nested, options).unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { .. }));
}

fn with_unknown_containers() -> ScanOptions {
    ScanOptions {
        probe_unknown: true,
        ..Default::default()
    }
}

#[test]
fn unknown_atom_stays_leaf_when_children_do_not_parse() {
    // 'data' is a full atom, so an 8-byte one has no room for version/flags
    let moov = container(b"moov", &[mvhd(), container(b"xyzw", &[atom(b"data", &[])])]);
    let node = parse_one(moov.clone(), ScanOptions::default()).unwrap();
    let guessed = parse_one(moov, with_unknown_containers()).unwrap();
    assert_eq!(guessed, node);

    let xyzw = &guessed.children()[1];
    assert_eq!(xyzw.kind, NodeKind::Leaf);
    assert_eq!(xyzw.payload(), Some((xyzw.start() + 8, 8)));
    assert_eq!(xyzw.full_name(), "Unknown Atom");
}

#[test]
fn undersized_uuid_child_keeps_unknown_atom_a_leaf() {
    // an 8-byte 'uuid' cannot hold its 16-byte extended type
    let moov = container(b"moov", &[mvhd(), container(b"xyzw", &[atom(b"uuid", &[])])]);
    let node = parse_one(moov, with_unknown_containers()).unwrap();
    assert_eq!(node.children()[1].kind, NodeKind::Leaf);

    let trailing = [
        container(b"moov", &[mvhd(), container(b"xyzw", &[atom(b"uuid", &[])])]),
        atom(b"free", &[0; 24]),
    ]
    .concat();
    let node = parse_one(trailing, with_unknown_containers()).unwrap();
    assert_eq!(node.children()[1].kind, NodeKind::Leaf);
}

#[test]
fn full_name_comes_from_the_parsing_registry() {
    use mp4atoms::known_boxes::KNOWN_ATOMS;
    use mp4atoms::registry::AtomRegistry;

    let moov_entry = KNOWN_ATOMS.iter().find(|a| a.code == *b"moov").unwrap();
    let registry = AtomRegistry::new().with_atom(moov_entry);
    let bytes = container(b"moov", &[mvhd()]);
    let len = bytes.len() as u64;
    let parser = BoxParser::new(&registry, ScanOptions::default(), len);
    let node = parser.parse_box(&mut Cursor::new(bytes.clone()), Scope::file(len)).unwrap();

    assert_eq!(node.full_name(), "Movie Box");
    let mvhd = &node.children()[0];
    assert_eq!(mvhd.kind, NodeKind::Leaf);
    assert_eq!(mvhd.version, None);
    assert_eq!(mvhd.full_name(), "Unknown Atom");

    let standard = parse_one(bytes, ScanOptions::default()).unwrap();
    assert_eq!(standard.children()[0].full_name(), "Movie Header Box");
}

#[test]
fn file_level_atom_inside_size_zero_container_is_rejected() {
    let bytes = [open_ended(b"moov", &mvhd()), atom(b"mdat", &[0; 4])].concat();
    let err = parse_one(bytes, ScanOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ParseError::SizeMismatch { container, offset: 116 } if container == FourCC(*b"moov")
    ));
}
