//! Document positions and boundary bias.
//!
//! A [`Position`] is an offset that follows the text it points into: when the document is
//! edited elsewhere, every live position is shifted so that it keeps referring to the same
//! character boundary. Chunk views anchor their ranges with positions, which is what lets
//! unaffected paragraphs survive an edit without being rebuilt.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Which side of a boundary an offset is attached to.
///
/// An offset that sits exactly between two ranges (end of row A, start of row B) is
/// ambiguous. `Forward` attaches it to the following content, `Backward` to the preceding
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bias {
    /// Attached to the following content.
    #[default]
    Forward,
    /// Attached to the preceding content.
    Backward,
}

#[derive(Debug)]
struct Anchor {
    offset: Cell<usize>,
    bias: Bias,
}

/// A stable reference to a character boundary in a [`TextDocument`](crate::TextDocument).
///
/// Cloning a position shares the anchor; both clones move together.
#[derive(Debug, Clone)]
pub struct Position {
    anchor: Rc<Anchor>,
}

impl Position {
    /// Current character offset.
    pub fn offset(&self) -> usize {
        self.anchor.offset.get()
    }

    /// Bias the position was created with.
    pub fn bias(&self) -> Bias {
        self.anchor.bias
    }

    /// Whether both positions share one anchor (one is a clone of the other).
    pub fn same_anchor(&self, other: &Position) -> bool {
        Rc::ptr_eq(&self.anchor, &other.anchor)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.offset() == other.offset() && self.bias() == other.bias()
    }
}

/// Entry count below which released positions are never swept on creation.
const MIN_SWEEP: usize = 64;

#[derive(Debug, Default)]
struct Anchors {
    entries: Vec<Weak<Anchor>>,
    /// Entry count that triggers the next sweep of released anchors.
    sweep_at: usize,
}

impl Anchors {
    fn sweep(&mut self) {
        self.entries.retain(|weak| weak.strong_count() > 0);
        self.reset_threshold();
    }

    fn reset_threshold(&mut self) {
        self.sweep_at = (self.entries.len() * 2).max(MIN_SWEEP);
    }
}

/// Tracks every live [`Position`] of one document.
///
/// The registry only holds weak references, so dropping the last clone of a position
/// releases it. Released entries are pruned on the next edit, and on creation once the entry
/// list has doubled since the last sweep, so re-wrapping without edits stays bounded.
#[derive(Debug, Clone, Default)]
pub struct PositionRegistry {
    anchors: Rc<RefCell<Anchors>>,
}

impl PositionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracked position.
    ///
    /// No bounds check is performed here; [`TextDocument::create_position`](crate::TextDocument::create_position)
    /// validates the offset against the document.
    pub fn create(&self, offset: usize, bias: Bias) -> Position {
        let anchor = Rc::new(Anchor {
            offset: Cell::new(offset),
            bias,
        });
        let mut anchors = self.anchors.borrow_mut();
        anchors.entries.push(Rc::downgrade(&anchor));
        if anchors.entries.len() > anchors.sweep_at {
            anchors.sweep();
        }
        Position { anchor }
    }

    /// Number of positions still alive.
    pub fn live_count(&self) -> usize {
        self.anchors
            .borrow()
            .entries
            .iter()
            .filter(|anchor| anchor.strong_count() > 0)
            .count()
    }

    /// Number of entries held, including released positions that were not swept yet.
    pub fn tracked_count(&self) -> usize {
        self.anchors.borrow().entries.len()
    }

    /// Shift positions for `len` characters inserted at `offset`.
    pub(crate) fn apply_insert(&self, offset: usize, len: usize) {
        if len == 0 {
            return;
        }
        self.update(|at, bias| {
            if at > offset || (at == offset && bias == Bias::Forward) {
                at + len
            } else {
                at
            }
        });
    }

    /// Shift positions for `len` characters deleted at `offset`.
    pub(crate) fn apply_delete(&self, offset: usize, len: usize) {
        if len == 0 {
            return;
        }
        let end = offset + len;
        self.update(|at, _| {
            if at >= end {
                at - len
            } else if at > offset {
                offset
            } else {
                at
            }
        });
    }

    fn update(&self, shift: impl Fn(usize, Bias) -> usize) {
        let mut anchors = self.anchors.borrow_mut();
        anchors.entries.retain(|weak| match weak.upgrade() {
            Some(anchor) => {
                anchor.offset.set(shift(anchor.offset.get(), anchor.bias));
                true
            }
            None => false,
        });
        anchors.reset_threshold();
    }
}
