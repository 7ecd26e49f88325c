//! Atom scanner for ISO base media files (MP4, 3GP, 3G2, MotionJPEG2000).
//!
//! [`AtomTree::scan`] walks the length-prefixed atom stream, classifies each
//! atom against the registry in [`registry`], checks the major brand and
//! returns the complete hierarchy, or the first [`ParseError`] it met.

pub mod boxes;
pub mod brand;
pub mod container;
pub mod json_api;
pub mod known_boxes;
pub mod parser;
pub mod registry;
pub mod util;
pub mod visit;

pub use boxes::{AtomNode, BoxHeader, FourCC, NodeBody, NodeKind};
pub use brand::{MetadataStyle, classify};
pub use container::AtomTree;
pub use json_api::{JsonAtom, to_json_atom, to_json_atoms};
pub use parser::{BoxParser, ParseError, ScanOptions, Scope, read_box_header};
pub use registry::{AtomBehavior, AtomRegistry, Context, default_registry};
pub use visit::{AtomVisitor, Walk};
