use crate::util::read_slice;
use std::fmt;
use std::io::{Read, Seek};

/// A four-byte atom code such as `moov` or `©nam`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(code: &[u8; 4]) -> Self {
        FourCC(*code)
    }

    /// Build a code from a 4-character string. Characters above U+00FF
    /// cannot be represented and yield `None`; `©` maps to byte 0xA9.
    pub fn from_str(s: &str) -> Option<Self> {
        let mut out = [0u8; 4];
        let mut n = 0;
        for c in s.chars() {
            if n == 4 || (c as u32) > 0xFF {
                return None;
            }
            out[n] = c as u32 as u8;
            n += 1;
        }
        if n == 4 { Some(FourCC(out)) } else { None }
    }

    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| match c {
                32..=126 => c as char,
                0xA9 => '©',
                _ => '.',
            })
            .collect()
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}
impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(b: &[u8; 4]) -> Self {
        FourCC(*b)
    }
}

impl PartialEq<&[u8; 4]> for FourCC {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

pub const FTYP: FourCC = FourCC::new(b"ftyp");
pub const MOOV: FourCC = FourCC::new(b"moov");
pub const TRAK: FourCC = FourCC::new(b"trak");
pub const UUID: FourCC = FourCC::new(b"uuid");
pub const JP2_SIGNATURE: FourCC = FourCC::new(b"jP  ");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxHeader {
    pub size: u64,          // declared total size, 0 = to end of scope
    pub typ: FourCC,
    pub uuid: Option<[u8; 16]>,
    pub header_size: u64,   // 8, 16, 24 or 32
    pub start: u64,
}

/// How the parser resolved a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Container,
    Leaf,
    DualStateContainer,
    DualStateLeaf,
    /// Unregistered code whose payload tiled as nested boxes (opt-in).
    ProbedContainer,
}

impl NodeKind {
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Container | NodeKind::DualStateContainer | NodeKind::ProbedContainer
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Container => "container",
            NodeKind::Leaf => "leaf",
            NodeKind::DualStateContainer => "dual-container",
            NodeKind::DualStateLeaf => "dual-leaf",
            NodeKind::ProbedContainer => "probed-container",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBody {
    Children(Vec<AtomNode>),
    Payload { data_offset: u64, data_len: u64 },
}

/// One parsed atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomNode {
    pub hdr: BoxHeader,
    /// Resolved end offset; differs from `start + size` only for size-0 atoms.
    pub end: u64,
    pub kind: NodeKind,
    pub version: Option<u8>,
    pub flags: Option<u32>,
    pub language: Option<u16>,
    /// Parent code the registry was consulted with, `None` at file level.
    pub parent: Option<FourCC>,
    /// Full name from the registry the atom was parsed with.
    pub name: Option<&'static str>,
    pub body: NodeBody,
}

impl AtomNode {
    pub fn code(&self) -> FourCC {
        self.hdr.typ
    }

    pub fn start(&self) -> u64 {
        self.hdr.start
    }

    /// Total length including header, with the size-0 sentinel resolved.
    pub fn size(&self) -> u64 {
        self.end - self.hdr.start
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn children(&self) -> &[AtomNode] {
        match &self.body {
            NodeBody::Children(kids) => kids,
            NodeBody::Payload { .. } => &[],
        }
    }

    /// `(offset, len)` of the opaque payload for leaf-like atoms.
    pub fn payload(&self) -> Option<(u64, u64)> {
        match self.body {
            NodeBody::Payload { data_offset, data_len } => Some((data_offset, data_len)),
            NodeBody::Children(_) => None,
        }
    }

    /// First descendant (pre-order) with the given code.
    pub fn find(&self, code: FourCC) -> Option<&AtomNode> {
        for kid in self.children() {
            if kid.code() == code {
                return Some(kid);
            }
            if let Some(hit) = kid.find(code) {
                return Some(hit);
            }
        }
        None
    }

    /// Read the opaque payload bytes of a leaf-like atom from `r`.
    pub fn read_payload<R: Read + Seek>(&self, r: &mut R) -> std::io::Result<Option<Vec<u8>>> {
        match self.payload() {
            Some((offset, len)) => read_slice(r, offset, len).map(Some),
            None => Ok(None),
        }
    }

    pub fn language_code(&self) -> Option<String> {
        self.language.map(lang_from_u16)
    }

    pub fn full_name(&self) -> &'static str {
        self.name.unwrap_or("Unknown Atom")
    }
}

/// Decode a packed ISO-639-2/T language (three 5-bit letters offset by 0x60).
pub fn lang_from_u16(code: u16) -> String {
    let code = code & 0x7FFF;
    if code == 0 {
        return "und".to_string();
    }
    let c1 = ((code >> 10) & 0x1F) as u8 + 0x60;
    let c2 = ((code >> 5) & 0x1F) as u8 + 0x60;
    let c3 = (code & 0x1F) as u8 + 0x60;
    format!("{}{}{}", c1 as char, c2 as char, c3 as char)
}
