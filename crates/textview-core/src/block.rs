//! Block view: the vertical stack of paragraph views.

use crate::document::{DocumentChange, EditKind, NodeChange, NodeId, TextDocument};
use crate::geometry::{Point, Rect, Size};
use crate::layout::{LayoutOptions, TextAlignment};
use crate::metrics::FontMetrics;
use crate::paragraph::ParagraphView;
use crate::position::Bias;
use crate::view::{
    Caret, Direction, NavigationResult, TextView, TreeError, ViewKind, check_partition,
    child_index_for_offset, child_index_for_y, navigate_across_children, trace_stale_query,
};

/// Container of one [`ParagraphView`] per paragraph node, in document order.
#[derive(Debug, Clone)]
pub struct BlockView {
    paragraphs: Vec<ParagraphView>,
    options: LayoutOptions,
    desired_size: Size,
    layout_rect: Rect,
    layout_valid: bool,
}

impl BlockView {
    /// Build a paragraph view for every paragraph of `document`.
    pub fn new(document: &TextDocument, metrics: &dyn FontMetrics, options: LayoutOptions) -> Self {
        let paragraphs = (0..document.paragraph_count())
            .filter_map(|index| ParagraphView::for_node(document, index, metrics, options))
            .collect();
        Self {
            paragraphs,
            options,
            desired_size: Size::default(),
            layout_rect: Rect::default(),
            layout_valid: false,
        }
    }

    /// Paragraph views, top to bottom.
    pub fn paragraphs(&self) -> &[ParagraphView] {
        &self.paragraphs
    }

    /// Index of the paragraph view mirroring `node`.
    pub fn paragraph_index(&self, node: NodeId) -> Option<usize> {
        self.paragraphs.iter().position(|paragraph| paragraph.node() == node)
    }

    /// Replace the layout options of every paragraph.
    pub fn set_options(&mut self, options: LayoutOptions) {
        self.options = options;
        for paragraph in &mut self.paragraphs {
            paragraph.set_options(options);
        }
        self.layout_valid = false;
    }

    /// Mirror a document edit: rebuild the changed paragraphs, drop the removed ones and
    /// create the inserted ones. Every other paragraph view is kept as is.
    ///
    /// `document` must already reflect `change`. Returns the number of paragraph views
    /// touched.
    pub fn apply_change(
        &mut self,
        document: &TextDocument,
        change: &DocumentChange,
        metrics: &dyn FontMetrics,
    ) -> Result<usize, TreeError> {
        for node_change in &change.nodes {
            match node_change.kind {
                EditKind::Changed => {
                    let index = self.locate(node_change)?;
                    self.paragraphs[index] =
                        build_paragraph(document, node_change, metrics, self.options)?;
                }
                EditKind::Removed => {
                    let index = self.locate(node_change)?;
                    self.paragraphs.remove(index);
                }
                EditKind::Inserted => {
                    if node_change.index > self.paragraphs.len() {
                        return Err(TreeError::Misaligned {
                            node: node_change.node,
                            index: node_change.index,
                        });
                    }
                    let paragraph = build_paragraph(document, node_change, metrics, self.options)?;
                    self.paragraphs.insert(node_change.index, paragraph);
                }
            }
        }
        self.layout_valid = false;

        tracing::trace!(
            target: "textview.layout",
            touched = change.nodes.len(),
            paragraphs = self.paragraphs.len(),
            "block_change_applied"
        );
        debug_assert!(check_partition(&*self).is_ok());
        Ok(change.nodes.len())
    }

    fn locate(&self, change: &NodeChange) -> Result<usize, TreeError> {
        let hinted = self
            .paragraphs
            .get(change.index)
            .is_some_and(|paragraph| paragraph.node() == change.node);
        if hinted {
            return Ok(change.index);
        }
        self.paragraph_index(change.node)
            .ok_or(TreeError::UnknownNode { node: change.node })
    }

    fn navigate_vertically(&self, caret: Caret, direction: Direction) -> (NavigationResult, Caret) {
        let Some(index) = child_index_for_offset(&self.paragraphs, caret.offset, caret.bias) else {
            return (NavigationResult::Invalid, caret);
        };
        let (result, target) = self.paragraphs[index].navigate(caret, direction);
        if result != NavigationResult::BoundaryChanged {
            return (result, target);
        }

        match direction {
            Direction::Up => match index.checked_sub(1) {
                Some(previous) => (NavigationResult::Valid, self.paragraphs[previous].end_caret()),
                None => (NavigationResult::BoundaryChanged, Caret::forward(self.offset())),
            },
            _ => match self.paragraphs.get(index + 1) {
                Some(next) => (NavigationResult::Valid, Caret::forward(next.offset())),
                None => (NavigationResult::BoundaryChanged, target),
            },
        }
    }
}

fn build_paragraph(
    document: &TextDocument,
    change: &NodeChange,
    metrics: &dyn FontMetrics,
    options: LayoutOptions,
) -> Result<ParagraphView, TreeError> {
    let unknown = || TreeError::UnknownNode { node: change.node };
    let index = if document.paragraph_ids().get(change.index) == Some(&change.node) {
        change.index
    } else {
        document.paragraph_by_id(change.node).ok_or_else(unknown)?.index
    };
    ParagraphView::for_node(document, index, metrics, options).ok_or_else(unknown)
}

impl TextView for BlockView {
    fn kind(&self) -> ViewKind {
        ViewKind::Block
    }

    fn offset(&self) -> usize {
        self.paragraphs.first().map_or(0, |paragraph| paragraph.offset())
    }

    fn end_offset(&self) -> usize {
        self.paragraphs.last().map_or(0, |paragraph| paragraph.end_offset())
    }

    fn layout_rect(&self) -> Rect {
        self.layout_rect
    }

    fn is_layout_valid(&self) -> bool {
        self.layout_valid
    }

    fn desired_size(&self) -> Size {
        self.desired_size
    }

    fn measure(&mut self, available: Size) -> Size {
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for paragraph in &mut self.paragraphs {
            let size = paragraph.measure(Size::new(available.width, f32::INFINITY));
            width = width.max(size.width);
            height += size.height;
        }
        if self.options.alignment == TextAlignment::Fill && available.width.is_finite() {
            width = width.max(available.width);
        }
        self.desired_size = Size::new(width, height);
        self.desired_size
    }

    fn arrange(&mut self, rect: Rect) {
        let mut y = rect.y;
        for paragraph in &mut self.paragraphs {
            let height = paragraph.desired_size().height;
            paragraph.arrange(Rect::new(rect.x, y, rect.width, height));
            y += height;
        }
        self.layout_rect = rect;
        self.layout_valid = true;
    }

    fn invalidate_layout(&mut self) {
        self.layout_valid = false;
        for paragraph in &mut self.paragraphs {
            paragraph.invalidate_layout();
        }
    }

    fn model_to_view(&self, offset: usize, bias: Bias) -> Option<Rect> {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Block, "model_to_view");
            return None;
        }
        let index = child_index_for_offset(&self.paragraphs, offset, bias)?;
        self.paragraphs[index].model_to_view(offset, bias)
    }

    fn view_to_model(&self, point: Point) -> Option<(usize, Bias)> {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Block, "view_to_model");
            return None;
        }
        let index = child_index_for_y(&self.paragraphs, point.y)?;
        self.paragraphs[index].view_to_model(point)
    }

    fn navigate(&self, caret: Caret, direction: Direction) -> (NavigationResult, Caret) {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Block, "navigate");
            return (NavigationResult::Invalid, caret);
        }
        match direction {
            Direction::Left | Direction::Right => {
                navigate_across_children(&self.paragraphs, caret, direction)
            }
            Direction::Up | Direction::Down => self.navigate_vertically(caret, direction),
        }
    }

    fn child_count(&self) -> usize {
        self.paragraphs.len()
    }

    fn child(&self, index: usize) -> &dyn TextView {
        &self.paragraphs[index]
    }
}
