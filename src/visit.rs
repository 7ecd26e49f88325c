//! Ordered traversal over parsed atoms.
//!
//! Serializers and printers implement [`AtomVisitor`] and hand it to
//! [`walk`] (or [`crate::AtomTree::walk`]); the walk is depth-first in
//! stream order, calling `enter` before a node's children and `leave`
//! after them.

use crate::boxes::AtomNode;

/// What the walker should do after `enter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
    Stop,
}

pub trait AtomVisitor {
    fn enter(&mut self, atom: &AtomNode, depth: usize) -> Walk;

    fn leave(&mut self, _atom: &AtomNode, _depth: usize) {}
}

/// Visit `atoms` and their descendants. Returns `false` if a visitor stopped
/// the walk early.
pub fn walk<V: AtomVisitor + ?Sized>(atoms: &[AtomNode], visitor: &mut V) -> bool {
    walk_level(atoms, 0, visitor)
}

fn walk_level<V: AtomVisitor + ?Sized>(atoms: &[AtomNode], depth: usize, visitor: &mut V) -> bool {
    for atom in atoms {
        match visitor.enter(atom, depth) {
            Walk::Stop => return false,
            Walk::SkipChildren => {}
            Walk::Continue => {
                if !walk_level(atom.children(), depth + 1, visitor) {
                    return false;
                }
            }
        }
        visitor.leave(atom, depth);
    }
    true
}
