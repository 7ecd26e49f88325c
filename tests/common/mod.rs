#![allow(dead_code)]

use mp4atoms::AtomNode;
use std::io::Cursor;

pub const JP2_MAGIC: u32 = 0x0D0A_870A;

pub fn atom(code: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(8 + payload.len());
    v.extend_from_slice(&((8 + payload.len()) as u32).to_be_bytes());
    v.extend_from_slice(code);
    v.extend_from_slice(payload);
    v
}

pub fn full_atom(code: &[u8; 4], version: u8, flags: u32, payload: &[u8]) -> Vec<u8> {
    let mut p = vec![version];
    p.extend_from_slice(&flags.to_be_bytes()[1..]);
    p.extend_from_slice(payload);
    atom(code, &p)
}

pub fn container(code: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    atom(code, &children.concat())
}

/// 64-bit size form: size32 = 1 followed by the real size.
pub fn large_atom(code: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(code);
    v.extend_from_slice(&((16 + payload.len()) as u64).to_be_bytes());
    v.extend_from_slice(payload);
    v
}

/// Size-0 atom: extends to the end of its enclosing scope.
pub fn open_ended(code: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&0u32.to_be_bytes());
    v.extend_from_slice(code);
    v.extend_from_slice(payload);
    v
}

pub fn ftyp(brand: &[u8; 4]) -> Vec<u8> {
    let mut p = brand.to_vec();
    p.extend_from_slice(&0u32.to_be_bytes());
    p.extend_from_slice(brand);
    atom(b"ftyp", &p)
}

pub fn jp2_signature(magic: u32) -> Vec<u8> {
    atom(b"jP  ", &magic.to_be_bytes())
}

pub fn mvhd() -> Vec<u8> {
    full_atom(b"mvhd", 0, 0, &[0u8; 96])
}

pub fn tkhd() -> Vec<u8> {
    full_atom(b"tkhd", 0, 3, &[0u8; 80])
}

pub fn stream(parts: &[Vec<u8>]) -> Cursor<Vec<u8>> {
    Cursor::new(parts.concat())
}

/// Children of every container must be contiguous and end exactly where
/// their parent ends.
pub fn assert_tiled(atoms: &[AtomNode]) {
    for a in atoms {
        let kids = a.children();
        if let (Some(first), Some(last)) = (kids.first(), kids.last()) {
            assert!(first.start() >= a.start() + a.hdr.header_size);
            assert_eq!(last.end, a.end, "children of {} stop short", a.code());
            for pair in kids.windows(2) {
                assert_eq!(pair[0].end, pair[1].start(), "gap inside {}", a.code());
            }
        }
        assert_tiled(kids);
    }
}
