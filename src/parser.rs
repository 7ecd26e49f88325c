use crate::boxes::{AtomNode, BoxHeader, FourCC, NodeBody, NodeKind};
use crate::registry::{AtomRegistry, ContainerState, Context};
use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace, warn};
use std::io::{self, Read, Seek, SeekFrom};

/// Deepest container nesting accepted before the scan gives up.
pub const MAX_NESTING: usize = 64;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("unsupported brand: {0}")]
    UnsupportedBrand(String),
    #[error("bad mpeg4 file ({0})")]
    MalformedHeader(String),
    #[error("bad jpeg2000 file (invalid signature)")]
    MalformedJpeg2000Header,
    #[error("bad mpeg4 file (no '{0}' atom)")]
    MissingRequiredAtom(FourCC),
    #[error("invalid size {size} for '{typ}' at offset {offset}")]
    InvalidSize { typ: FourCC, offset: u64, size: u64 },
    #[error("truncated stream at offset {offset}: {needed} bytes declared, {available} available")]
    TruncatedStream {
        offset: u64,
        needed: u64,
        available: u64,
    },
    #[error("children of '{container}' do not tile its payload (offset {offset})")]
    SizeMismatch { container: FourCC, offset: u64 },
    #[error("atoms nested deeper than {max} levels at offset {offset}", max = MAX_NESTING)]
    NestingTooDeep { offset: u64 },
}

impl ParseError {
    /// Errors that describe the byte layout itself, as opposed to I/O
    /// failures or hitting the nesting limit.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ParseError::InvalidSize { .. }
                | ParseError::TruncatedStream { .. }
                | ParseError::SizeMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Switches that change how ambiguous atoms are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Resolve dual-state atoms (`stsd`, `dref`, sample entries) as containers.
    pub deep_scan: bool,
    /// Parse unregistered atoms as containers when their payload tiles
    /// exactly as nested boxes.
    pub probe_unknown: bool,
}

/// The region a box must fit in, and the context its code is looked up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub context: Context,
    pub end: u64,
    pub depth: usize,
    /// Set below any box that declared size 0 and so claimed the rest of
    /// its own scope.
    pub open_ended: bool,
}

impl Scope {
    pub fn file(end: u64) -> Self {
        Scope {
            context: Context::File,
            end,
            depth: 0,
            open_ended: false,
        }
    }

    fn within(&self, parent: &BoxHeader, end: u64) -> Self {
        Scope {
            context: Context::Within(parent.typ),
            end,
            depth: self.depth + 1,
            open_ended: self.open_ended || parent.size == 0,
        }
    }
}

pub fn read_box_header<R: Read + Seek>(r: &mut R) -> Result<BoxHeader> {
    let start = r.stream_position()?;
    let size32 = r.read_u32::<BigEndian>()?;
    let mut typ = [0u8; 4];
    r.read_exact(&mut typ)?;
    let mut size = size32 as u64;

    if size32 == 1 {
        size = r.read_u64::<BigEndian>()?;
    }

    let mut uuid = None;
    if &typ == b"uuid" {
        let mut u = [0u8; 16];
        r.read_exact(&mut u)?;
        uuid = Some(u);
    }

    let header_size = match (size32 == 1, &typ == b"uuid") {
        (true, true) => 8 + 8 + 16,
        (true, false) => 8 + 8,
        (false, true) => 8 + 16,
        (false, false) => 8,
    } as u64;

    // 0 is only a sentinel in the 32-bit field, never in the extended one.
    if size32 != 0 && size < header_size {
        return Err(ParseError::InvalidSize {
            typ: FourCC(typ),
            offset: start,
            size,
        });
    }

    Ok(BoxHeader {
        size,
        typ: FourCC(typ),
        uuid,
        header_size,
        start,
    })
}

/// Recursive-descent box reader driven by an [`AtomRegistry`].
pub struct BoxParser<'a> {
    registry: &'a AtomRegistry,
    options: ScanOptions,
    stream_len: u64,
}

impl<'a> BoxParser<'a> {
    pub fn new(registry: &'a AtomRegistry, options: ScanOptions, stream_len: u64) -> Self {
        Self {
            registry,
            options,
            stream_len,
        }
    }

    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// Read exactly one box at the cursor. On success the cursor sits at
    /// the end of the box.
    pub fn parse_box<R: Read + Seek>(&self, r: &mut R, scope: Scope) -> Result<AtomNode> {
        let start = r.stream_position()?;
        if scope.depth > MAX_NESTING {
            return Err(ParseError::NestingTooDeep { offset: start });
        }

        if scope.end.saturating_sub(start) < 8 {
            return Err(self.mismatch(scope, start));
        }
        let available = self.stream_len.saturating_sub(start);
        if available < 8 {
            return Err(ParseError::TruncatedStream {
                offset: start,
                needed: 8,
                available,
            });
        }

        let hdr = match read_box_header(r) {
            Ok(h) => h,
            Err(ParseError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(ParseError::TruncatedStream {
                    offset: start,
                    needed: 16,
                    available,
                });
            }
            Err(e) => return Err(e),
        };

        let invalid = || ParseError::InvalidSize {
            typ: hdr.typ,
            offset: start,
            size: hdr.size,
        };

        let box_end = if hdr.size == 0 {
            if scope.end < start + hdr.header_size {
                return Err(invalid());
            }
            scope.end
        } else {
            start.checked_add(hdr.size).ok_or_else(invalid)?
        };
        if box_end > self.stream_len {
            return Err(ParseError::TruncatedStream {
                offset: start,
                needed: box_end - start,
                available,
            });
        }
        if box_end > scope.end {
            return Err(self.mismatch(scope, start));
        }

        let content_start = start + hdr.header_size;
        let known = self.registry.lookup(hdr.typ, scope.context);
        let (mut kind, prefix, versioned, has_language) = match known.map(|k| k.behavior) {
            Some(b) => {
                let (kind, prefix) = match b.state {
                    ContainerState::Parent => (NodeKind::Container, 0),
                    ContainerState::Child => (NodeKind::Leaf, 0),
                    ContainerState::DualState { prefix } if self.options.deep_scan => {
                        (NodeKind::DualStateContainer, prefix)
                    }
                    ContainerState::DualState { .. } => (NodeKind::DualStateLeaf, 0),
                };
                (kind, prefix, b.versioned, b.language)
            }
            None => {
                // A file-level atom swallowed by a size-0 box: the size-0 box was not last.
                if scope.open_ended && self.registry.is_file_level(hdr.typ) {
                    return Err(self.mismatch(scope, start));
                }
                let probed = self.options.probe_unknown
                    && self.tiles_as_boxes(r, content_start, box_end)?;
                if probed {
                    (NodeKind::ProbedContainer, 0, false, false)
                } else {
                    (NodeKind::Leaf, 0, false, false)
                }
            }
        };

        r.seek(SeekFrom::Start(content_start))?;
        let mut pos = content_start;

        let (mut version, mut flags, mut language) = (None, None, None);
        if versioned {
            if box_end - pos < 4 {
                return Err(invalid());
            }
            version = Some(r.read_u8()?);
            flags = Some(r.read_u24::<BigEndian>()?);
            pos += 4;
        }
        if has_language {
            if box_end - pos < 2 {
                return Err(invalid());
            }
            language = Some(r.read_u16::<BigEndian>()?);
            pos += 2;
        }

        trace!(
            "{:>10} {:>10} {} {}",
            start,
            box_end - start,
            hdr.typ,
            kind.as_str()
        );

        let payload = NodeBody::Payload {
            data_offset: pos,
            data_len: box_end - pos,
        };
        let body = if kind.is_container() {
            let children_start = pos + prefix;
            if children_start > box_end {
                return Err(invalid());
            }
            r.seek(SeekFrom::Start(children_start))?;
            match self.parse_children(r, scope.within(&hdr, box_end)) {
                Ok(kids) => {
                    if kind == NodeKind::ProbedContainer {
                        warn!(
                            "unregistered atom '{}' at {} parsed as a container",
                            hdr.typ, start
                        );
                    }
                    NodeBody::Children(kids)
                }
                // Headers tiled but the children themselves did not parse.
                Err(e) if kind == NodeKind::ProbedContainer && e.is_structural() => {
                    debug!("probe of '{}' at {} rejected: {}", hdr.typ, start, e);
                    kind = NodeKind::Leaf;
                    payload
                }
                Err(e) => return Err(e),
            }
        } else {
            payload
        };

        // Skip to end of box
        r.seek(SeekFrom::Start(box_end))?;
        Ok(AtomNode {
            hdr,
            end: box_end,
            kind,
            version,
            flags,
            language,
            parent: scope.context.parent(),
            name: known.map(|k| k.name),
            body,
        })
    }

    /// Parse boxes until the cursor reaches `scope.end`. Every child must end
    /// inside the scope, so the children exactly tile it on success.
    pub fn parse_children<R: Read + Seek>(&self, r: &mut R, scope: Scope) -> Result<Vec<AtomNode>> {
        let mut kids = Vec::new();
        while r.stream_position()? < scope.end {
            kids.push(self.parse_box(r, scope)?);
        }
        Ok(kids)
    }

    fn mismatch(&self, scope: Scope, offset: u64) -> ParseError {
        match scope.context {
            Context::Within(container) => ParseError::SizeMismatch { container, offset },
            Context::File => ParseError::TruncatedStream {
                offset,
                needed: 8,
                available: scope.end.saturating_sub(offset),
            },
        }
    }

    // Header-only walk: true when [start, end) is one or more boxes with
    // printable codes and explicit sizes that end exactly at `end`.
    fn tiles_as_boxes<R: Read + Seek>(&self, r: &mut R, start: u64, end: u64) -> Result<bool> {
        let mut pos = start;
        if pos >= end {
            return Ok(false);
        }
        while pos < end {
            if end - pos < 8 {
                return Ok(false);
            }
            r.seek(SeekFrom::Start(pos))?;
            let size32 = r.read_u32::<BigEndian>()?;
            let mut typ = [0u8; 4];
            r.read_exact(&mut typ)?;
            if !typ.iter().all(|&c| (32..=126).contains(&c) || c == 0xA9) {
                return Ok(false);
            }
            let (size, min) = if size32 == 1 {
                if end - pos < 16 {
                    return Ok(false);
                }
                (r.read_u64::<BigEndian>()?, 16)
            } else {
                (size32 as u64, 8)
            };
            if size < min || size > end - pos {
                return Ok(false);
            }
            pos += size;
        }
        Ok(true)
    }
}
