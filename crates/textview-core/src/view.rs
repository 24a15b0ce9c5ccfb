//! The view contract shared by every node of the view tree.
//!
//! Four view kinds make up the tree: [`DocumentView`](crate::DocumentView) →
//! [`BlockView`](crate::BlockView) → [`ParagraphView`](crate::ParagraphView) →
//! [`ChunkView`](crate::ChunkView). They all implement [`TextView`]; containers answer
//! mapping and navigation queries by delegating to the child that covers the query and
//! composing the child's answer.

use crate::document::NodeId;
use crate::geometry::{Point, Rect, Size};
use crate::position::Bias;
use thiserror::Error;

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One character towards the start.
    Left,
    /// One character towards the end.
    Right,
    /// One row up.
    Up,
    /// One row down.
    Down,
}

/// Outcome of [`TextView::navigate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationResult {
    /// The move stayed inside the view; the returned caret is the target.
    Valid,
    /// The query was out of range or the layout is stale.
    Invalid,
    /// The move would leave the view; the returned caret is clamped to the view's edge.
    BoundaryChanged,
}

/// An offset together with the side of the boundary it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Caret {
    /// Character offset.
    pub offset: usize,
    /// Boundary bias.
    pub bias: Bias,
}

impl Caret {
    /// Create a caret.
    pub const fn new(offset: usize, bias: Bias) -> Self {
        Self { offset, bias }
    }

    /// Caret attached to the following content.
    pub const fn forward(offset: usize) -> Self {
        Self::new(offset, Bias::Forward)
    }

    /// Caret attached to the preceding content.
    pub const fn backward(offset: usize) -> Self {
        Self::new(offset, Bias::Backward)
    }
}

/// The closed set of view kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Root view.
    Document,
    /// Paragraph collection.
    Block,
    /// Line-breaking container for one paragraph.
    Paragraph,
    /// One row of text.
    Chunk,
}

/// Layout, mapping and navigation contract of a view.
///
/// Mapping and navigation are only defined while the view is arranged
/// ([`is_layout_valid`](Self::is_layout_valid)); otherwise they fail without touching
/// stale geometry.
pub trait TextView {
    /// Kind of this view.
    fn kind(&self) -> ViewKind;

    /// First character offset covered by the view.
    fn offset(&self) -> usize;

    /// Exclusive end offset.
    fn end_offset(&self) -> usize;

    /// Rectangle assigned by the last [`arrange`](Self::arrange).
    fn layout_rect(&self) -> Rect;

    /// Whether the view has been arranged since it was last invalidated.
    fn is_layout_valid(&self) -> bool;

    /// Size computed by the last [`measure`](Self::measure).
    fn desired_size(&self) -> Size;

    /// Compute the desired size for the given available size.
    fn measure(&mut self, available: Size) -> Size;

    /// Position the view (and its children) inside `rect`.
    fn arrange(&mut self, rect: Rect);

    /// Drop the arranged state of this view and all of its descendants.
    fn invalidate_layout(&mut self);

    /// Rectangle of the caret slot at `offset`.
    ///
    /// `bias` selects between two children sharing `offset` as a boundary.
    fn model_to_view(&self, offset: usize, bias: Bias) -> Option<Rect>;

    /// Offset and bias of the caret slot nearest to `point`.
    fn view_to_model(&self, point: Point) -> Option<(usize, Bias)>;

    /// Move `caret` one step in `direction`.
    fn navigate(&self, caret: Caret, direction: Direction) -> (NavigationResult, Caret);

    /// Number of child views.
    fn child_count(&self) -> usize;

    /// Child view at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= self.child_count()`.
    fn child(&self, index: usize) -> &dyn TextView;
}

/// A broken partition between a view and its children.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A child does not start where its predecessor ended.
    #[error("{kind:?} child {index} starts at {found}, expected {expected}")]
    Gap {
        /// Kind of the container.
        kind: ViewKind,
        /// Index of the offending child.
        index: usize,
        /// Offset the child should start at.
        expected: usize,
        /// Offset the child actually starts at.
        found: usize,
    },
    /// The children do not end where the container ends.
    #[error("{kind:?} children end at {found}, container ends at {expected}")]
    Overrun {
        /// Kind of the container.
        kind: ViewKind,
        /// Container end offset.
        expected: usize,
        /// End offset of the last child.
        found: usize,
    },
    /// A container without children.
    #[error("{kind:?} container has no children")]
    Empty {
        /// Kind of the container.
        kind: ViewKind,
    },
    /// A change names a paragraph node the view tree does not know.
    #[error("paragraph node {node:?} is not part of the view tree")]
    UnknownNode {
        /// The missing node.
        node: NodeId,
    },
    /// A change places a paragraph at an index the view tree cannot hold.
    #[error("paragraph node {node:?} cannot be placed at index {index}")]
    Misaligned {
        /// The node being placed.
        node: NodeId,
        /// Requested index.
        index: usize,
    },
}

/// Check that the children of `view` (recursively) partition its range: they start at
/// the view's offset, abut one another, and end at the view's end offset.
pub fn check_partition(view: &dyn TextView) -> Result<(), TreeError> {
    let count = view.child_count();
    if count == 0 {
        return if view.kind() == ViewKind::Chunk {
            Ok(())
        } else {
            Err(TreeError::Empty { kind: view.kind() })
        };
    }

    let mut expected = view.offset();
    for index in 0..count {
        let child = view.child(index);
        if child.offset() != expected {
            return Err(TreeError::Gap {
                kind: view.kind(),
                index,
                expected,
                found: child.offset(),
            });
        }
        check_partition(child)?;
        expected = child.end_offset();
    }
    if expected != view.end_offset() {
        return Err(TreeError::Overrun {
            kind: view.kind(),
            expected: view.end_offset(),
            found: expected,
        });
    }
    Ok(())
}

/// Index of the child covering `offset`.
///
/// Inside a child the answer is unambiguous. On a boundary shared by two children,
/// `Backward` picks the earlier child and `Forward` the later one. The container's own
/// start and end are owned by the first and last child respectively.
pub(crate) fn child_index_for_offset<V: TextView>(
    children: &[V],
    offset: usize,
    bias: Bias,
) -> Option<usize> {
    let first = children.first()?;
    let last = children.last()?;
    if offset < first.offset() || offset > last.end_offset() {
        return None;
    }
    let index = match bias {
        Bias::Forward => children
            .partition_point(|child| child.end_offset() <= offset)
            .min(children.len() - 1),
        Bias::Backward => children
            .partition_point(|child| child.offset() < offset)
            .saturating_sub(1),
    };
    Some(index)
}

/// Index of the child whose vertical band contains `y`.
pub(crate) fn child_index_for_y<V: TextView>(children: &[V], y: f32) -> Option<usize> {
    let index = children.partition_point(|child| child.layout_rect().bottom() <= y);
    children
        .get(index)
        .filter(|child| child.layout_rect().contains_y(y))
        .map(|_| index)
}

/// Horizontal navigation across siblings.
///
/// The child covering the caret answers first. When it reports
/// [`NavigationResult::BoundaryChanged`], the adjacent sibling in the direction of travel
/// is asked again at the same absolute offset; only if there is no such sibling does the
/// boundary result propagate to the caller.
pub(crate) fn navigate_across_children<V: TextView>(
    children: &[V],
    caret: Caret,
    direction: Direction,
) -> (NavigationResult, Caret) {
    let Some(index) = child_index_for_offset(children, caret.offset, caret.bias) else {
        return (NavigationResult::Invalid, caret);
    };
    let (result, target) = children[index].navigate(caret, direction);
    if result != NavigationResult::BoundaryChanged {
        return (result, target);
    }

    let neighbor = match direction {
        Direction::Left => index.checked_sub(1).map(|i| (i, Bias::Backward)),
        Direction::Right => Some(index + 1)
            .filter(|i| *i < children.len())
            .map(|i| (i, Bias::Forward)),
        Direction::Up | Direction::Down => None,
    };
    match neighbor {
        Some((neighbor, bias)) => {
            children[neighbor].navigate(Caret::new(target.offset, bias), direction)
        }
        None => (NavigationResult::BoundaryChanged, target),
    }
}

/// Logs a query rejected because the layout is stale.
pub(crate) fn trace_stale_query(kind: ViewKind, query: &'static str) {
    tracing::debug!(target: "textview.query", ?kind, query, "stale_layout");
}
