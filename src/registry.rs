use crate::boxes::FourCC;
use crate::known_boxes::{KNOWN_ATOMS, KnownAtom, Parent};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Where an atom sits: at file level or inside a named parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    File,
    Within(FourCC),
}

impl Context {
    pub fn parent(self) -> Option<FourCC> {
        match self {
            Context::File => None,
            Context::Within(cc) => Some(cc),
        }
    }
}

/// Container/leaf classification of a registered atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Parent,
    Child,
    /// Resolved per scan by the deep-scan discriminator. `prefix` is the
    /// number of fixed payload bytes (after version/flags) that precede
    /// the children when resolved as a container.
    DualState { prefix: u64 },
}

/// Behaviour descriptor looked up for every parsed atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomBehavior {
    pub state: ContainerState,
    pub versioned: bool,
    pub language: bool,
}

impl AtomBehavior {
    pub const fn new(state: ContainerState, versioned: bool, language: bool) -> Self {
        Self { state, versioned, language }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.state, ContainerState::Parent)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.state, ContainerState::Child)
    }

    pub fn is_dual_state(&self) -> bool {
        matches!(self.state, ContainerState::DualState { .. })
    }
}

/// Registry of atom behaviours keyed by `(code, context)`.
///
/// Context-qualified entries win over any-level ones. The registry is
/// immutable once constructed; use [`AtomRegistry::with_atom`] to build it
/// fluently or [`default_registry`] for the shared standard table.
pub struct AtomRegistry {
    map: HashMap<(FourCC, Option<Context>), &'static KnownAtom>,
}

impl AtomRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Registry holding every entry of the built-in atom table.
    pub fn standard() -> Self {
        KNOWN_ATOMS
            .iter()
            .fold(Self::new(), |reg, atom| reg.with_atom(atom))
    }

    /// Return a new registry with the given atom added under each of its parents.
    pub fn with_atom(mut self, atom: &'static KnownAtom) -> Self {
        let code = FourCC(atom.code);
        for parent in atom.parents {
            let ctx = match parent {
                Parent::Any => None,
                Parent::File => Some(Context::File),
                Parent::In(p) => Some(Context::Within(FourCC(*p))),
            };
            self.map.insert((code, ctx), atom);
        }
        self
    }

    pub fn lookup(&self, code: FourCC, ctx: Context) -> Option<&'static KnownAtom> {
        self.map
            .get(&(code, Some(ctx)))
            .or_else(|| self.map.get(&(code, None)))
            .copied()
    }

    /// True when `code` has a file-level entry, such as `moov` or `mdat`.
    pub fn is_file_level(&self, code: FourCC) -> bool {
        self.map.contains_key(&(code, Some(Context::File)))
    }

    pub fn behavior(&self, code: FourCC, ctx: Context) -> Option<AtomBehavior> {
        self.lookup(code, ctx).map(|k| k.behavior)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for AtomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The shared standard registry, built on first use.
pub fn default_registry() -> &'static AtomRegistry {
    static REGISTRY: OnceLock<AtomRegistry> = OnceLock::new();
    REGISTRY.get_or_init(AtomRegistry::standard)
}
