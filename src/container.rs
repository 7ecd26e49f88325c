use crate::boxes::{AtomNode, FTYP, FourCC, JP2_SIGNATURE, MOOV, TRAK};
use crate::brand::{MetadataStyle, classify, is_psp_brand};
use crate::parser::{BoxParser, ParseError, Result, ScanOptions, Scope};
use crate::registry::default_registry;
use crate::util::stream_len;
use crate::visit::{AtomVisitor, walk};
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Payload of the 12-byte JPEG 2000 signature box.
pub const JP2_MAGIC: u32 = 0x0D0A_870A;

enum Phase {
    Init,
    BrandIdentified,
    Scanning,
    Done,
}

/// The parsed atom hierarchy of one file.
///
/// Built in a single pass by [`AtomTree::scan`]; a failed scan returns an
/// error and no tree. Read-only afterwards.
#[derive(Debug, Clone)]
pub struct AtomTree {
    atoms: Vec<AtomNode>,
    metadata_style: MetadataStyle,
    psp_brand: bool,
    major_brand: Option<FourCC>,
}

impl AtomTree {
    /// Scan with default options (no deep scan, no probing).
    pub fn scan<R: Read + Seek>(r: &mut R) -> Result<Self> {
        Self::scan_with(r, &ScanOptions::default())
    }

    /// Open `path`, scan it and close it again.
    ///
    /// ```no_run
    /// use mp4atoms::{AtomTree, ScanOptions};
    ///
    /// let tree = AtomTree::open("video.mp4", &ScanOptions::default())?;
    /// println!("{} tracks, {:?}", tree.track_count(), tree.metadata_style());
    /// # Ok::<(), mp4atoms::ParseError>(())
    /// ```
    pub fn open(path: impl AsRef<Path>, options: &ScanOptions) -> Result<Self> {
        let mut f = File::open(path)?;
        Self::scan_with(&mut f, options)
    }

    /// Scan the whole source from offset 0.
    pub fn scan_with<R: Read + Seek>(r: &mut R, options: &ScanOptions) -> Result<Self> {
        let len = stream_len(r)?;
        r.seek(SeekFrom::Start(0))?;
        let parser = BoxParser::new(default_registry(), *options, len);

        let mut tree = AtomTree {
            atoms: Vec::new(),
            metadata_style: MetadataStyle::Undefined,
            psp_brand: false,
            major_brand: None,
        };

        let mut phase = Phase::Init;
        loop {
            phase = match phase {
                Phase::Init => {
                    tree.identify(r, &parser)?;
                    Phase::BrandIdentified
                }
                Phase::BrandIdentified => {
                    debug!(
                        "brand {:?} -> {:?}{}",
                        tree.major_brand,
                        tree.metadata_style,
                        if tree.psp_brand { " (psp)" } else { "" }
                    );
                    Phase::Scanning
                }
                Phase::Scanning => {
                    while r.stream_position()? < len {
                        let atom = parser.parse_box(r, Scope::file(len))?;
                        tree.atoms.push(atom);
                    }
                    if !tree.atoms.iter().any(|a| a.code() == MOOV) {
                        return Err(ParseError::MissingRequiredAtom(MOOV));
                    }
                    Phase::Done
                }
                Phase::Done => break,
            };
        }
        debug!("scanned {} top-level atoms, {} tracks", tree.atoms.len(), tree.track_count());
        Ok(tree)
    }

    // Parse the leading ftyp (or JPEG 2000 signature + ftyp) and classify
    // the major brand.
    fn identify<R: Read + Seek>(&mut self, r: &mut R, parser: &BoxParser<'_>) -> Result<()> {
        let len = parser.stream_len();
        let missing_ftyp = || ParseError::MalformedHeader("ftyp atom missing or alignment error".into());
        if len < 8 {
            return Err(missing_ftyp());
        }

        let size32 = r.read_u32::<BigEndian>()?;
        let mut code = [0u8; 4];
        r.read_exact(&mut code)?;
        r.seek(SeekFrom::Start(0))?;

        let jpeg2000 = size32 == 12 && FourCC(code) == JP2_SIGNATURE;
        if FourCC(code) != FTYP && !jpeg2000 {
            return Err(missing_ftyp());
        }

        let first = parser.parse_box(r, Scope::file(len))?;
        if !jpeg2000 {
            let brand = read_brand(r, &first)?;
            self.set_brand(brand, classify(brand)?);
            self.atoms.push(first);
            return Ok(());
        }

        debug!("JPEG 2000 signature found");
        let (offset, _) = first.payload().ok_or(ParseError::MalformedJpeg2000Header)?;
        r.seek(SeekFrom::Start(offset))?;
        if r.read_u32::<BigEndian>()? != JP2_MAGIC {
            return Err(ParseError::MalformedJpeg2000Header);
        }
        r.seek(SeekFrom::Start(first.end))?;
        self.atoms.push(first);

        let expected_ftyp = || ParseError::MalformedHeader("Expected ftyp atom missing".into());
        if r.stream_position()? >= len {
            return Err(expected_ftyp());
        }
        let ftyp = parser.parse_box(r, Scope::file(len))?;
        if ftyp.code() != FTYP {
            return Err(expected_ftyp());
        }
        let brand = read_brand(r, &ftyp)?;
        let style = classify(brand)?;
        if style != MetadataStyle::MotionJpeg2000 {
            return Err(ParseError::UnsupportedBrand(brand.to_string()));
        }
        self.set_brand(brand, style);
        self.atoms.push(ftyp);
        Ok(())
    }

    fn set_brand(&mut self, brand: FourCC, style: MetadataStyle) {
        self.major_brand = Some(brand);
        self.metadata_style = style;
        self.psp_brand = is_psp_brand(brand);
    }

    pub fn atoms(&self) -> &[AtomNode] {
        &self.atoms
    }

    pub fn metadata_style(&self) -> MetadataStyle {
        self.metadata_style
    }

    pub fn psp_brand(&self) -> bool {
        self.psp_brand
    }

    pub fn major_brand(&self) -> Option<FourCC> {
        self.major_brand
    }

    /// Follow `path` one code per level from the roots, depth-first; the
    /// first node whose ancestor chain matches wins.
    pub fn find_atom(&self, path: &[FourCC]) -> Option<&AtomNode> {
        find_in(&self.atoms, path)
    }

    /// [`find_atom`](Self::find_atom) with a dotted path such as `moov.trak.mdia`.
    pub fn find_path(&self, dotted: &str) -> Option<&AtomNode> {
        let path = dotted
            .split('.')
            .map(FourCC::from_str)
            .collect::<Option<Vec<_>>>()?;
        self.find_atom(&path)
    }

    // Children of every container root, one level only.
    fn second_level(&self) -> impl Iterator<Item = &AtomNode> {
        self.atoms
            .iter()
            .filter(|a| a.is_container())
            .flat_map(|a| a.children())
    }

    pub fn track_count(&self) -> usize {
        self.second_level().filter(|a| a.code() == TRAK).count()
    }

    /// Search the `track`-th (1-based) `trak` for the first `code` descendant.
    pub fn find_atom_in_track(&self, track: usize, code: FourCC) -> Option<&AtomNode> {
        let index = track.checked_sub(1)?;
        self.second_level()
            .filter(|a| a.code() == TRAK)
            .nth(index)?
            .find(code)
    }

    /// Depth-first walk over all atoms in stream order.
    pub fn walk<V: AtomVisitor + ?Sized>(&self, visitor: &mut V) -> bool {
        walk(&self.atoms, visitor)
    }
}

fn find_in<'a>(level: &'a [AtomNode], path: &[FourCC]) -> Option<&'a AtomNode> {
    let (first, rest) = path.split_first()?;
    for atom in level.iter().filter(|a| a.code() == *first) {
        if rest.is_empty() {
            return Some(atom);
        }
        if let Some(hit) = find_in(atom.children(), rest) {
            return Some(hit);
        }
    }
    None
}

fn read_brand<R: Read + Seek>(r: &mut R, ftyp: &AtomNode) -> Result<FourCC> {
    let (offset, _) = ftyp
        .payload()
        .filter(|&(_, len)| len >= 4)
        .ok_or_else(|| ParseError::MalformedHeader("ftyp atom too short".into()))?;
    r.seek(SeekFrom::Start(offset))?;
    let mut brand = [0u8; 4];
    r.read_exact(&mut brand)?;
    r.seek(SeekFrom::Start(ftyp.end))?;
    Ok(FourCC(brand))
}
