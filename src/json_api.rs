use crate::{
    boxes::AtomNode,
    container::AtomTree,
    visit::{AtomVisitor, Walk, walk},
};
use serde::Serialize;

/// A JSON-serializable representation of a single atom.
///
/// This is a read-only view built from an [`AtomTree`] for CLI output and
/// UIs; it carries geometry and header fields, never payload bytes.
#[derive(Debug, Serialize)]
pub struct JsonAtom {
    /// Absolute byte offset of the atom header
    pub offset: u64,
    /// Total size including header, size-0 atoms resolved
    pub size: u64,
    pub header_size: u64,
    /// Absolute offset of the opaque payload (None for containers)
    pub payload_offset: Option<u64>,
    pub payload_size: Option<u64>,

    /// Four-character code, e.g. "moov"
    pub typ: String,
    /// Hex-encoded extended type for `uuid` atoms
    pub uuid: Option<String>,
    pub version: Option<u8>,
    pub flags: Option<u32>,
    /// Decoded ISO-639-2/T language for language-bearing atoms
    pub language: Option<String>,
    pub kind: String,
    pub full_name: String,
    pub children: Option<Vec<JsonAtom>>,
}

impl JsonAtom {
    fn from_node(atom: &AtomNode) -> Self {
        let (payload_offset, payload_size) = atom
            .payload()
            .map(|(off, len)| (Some(off), Some(len)))
            .unwrap_or((None, None));
        JsonAtom {
            offset: atom.start(),
            size: atom.size(),
            header_size: atom.hdr.header_size,
            payload_offset,
            payload_size,
            typ: atom.code().to_string(),
            uuid: atom.hdr.uuid.map(hex::encode),
            version: atom.version,
            flags: atom.flags,
            language: atom.language_code(),
            kind: atom.kind.as_str().to_string(),
            full_name: atom.full_name().to_string(),
            children: None,
        }
    }
}

#[derive(Default)]
struct JsonBuilder {
    open: Vec<(JsonAtom, Vec<JsonAtom>)>,
    roots: Vec<JsonAtom>,
}

impl AtomVisitor for JsonBuilder {
    fn enter(&mut self, atom: &AtomNode, _depth: usize) -> Walk {
        self.open.push((JsonAtom::from_node(atom), Vec::new()));
        Walk::Continue
    }

    fn leave(&mut self, atom: &AtomNode, _depth: usize) {
        let Some((mut json, kids)) = self.open.pop() else {
            return;
        };
        if atom.is_container() {
            json.children = Some(kids);
        }
        match self.open.last_mut() {
            Some((_, siblings)) => siblings.push(json),
            None => self.roots.push(json),
        }
    }
}

/// Build the JSON view of every root atom, in stream order.
pub fn to_json_atoms(tree: &AtomTree) -> Vec<JsonAtom> {
    let mut builder = JsonBuilder::default();
    tree.walk(&mut builder);
    builder.roots
}

/// JSON view of a single atom and its subtree.
pub fn to_json_atom(atom: &AtomNode) -> Option<JsonAtom> {
    let mut builder = JsonBuilder::default();
    walk(std::slice::from_ref(atom), &mut builder);
    builder.roots.pop()
}
