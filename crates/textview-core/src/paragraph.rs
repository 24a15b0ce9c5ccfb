//! Paragraph view: greedy line breaking of one paragraph node.
//!
//! The paragraph keeps a single "source" chunk spanning its whole text. Whenever the wrap
//! width changes, the source is broken again into row chunks by
//! [`break_lines`](crate::layout::break_lines); character advances are measured once per
//! text change, never per re-wrap.

use crate::chunk::ChunkView;
use crate::document::{NodeId, TextDocument};
use crate::geometry::{Point, Rect, Size};
use crate::layout::{LayoutOptions, TextAlignment, break_lines};
use crate::metrics::FontMetrics;
use crate::position::Bias;
use crate::view::{
    Caret, Direction, NavigationResult, TextView, ViewKind, check_partition,
    child_index_for_offset, child_index_for_y, navigate_across_children, trace_stale_query,
};

/// Line-breaking container for one paragraph node.
#[derive(Debug, Clone)]
pub struct ParagraphView {
    node: NodeId,
    source: ChunkView,
    chunks: Vec<ChunkView>,
    options: LayoutOptions,
    /// Wrap width the current rows were broken for.
    broken_for: Option<f32>,
    line_height: f32,
    desired_size: Size,
    layout_rect: Rect,
    layout_valid: bool,
}

impl ParagraphView {
    /// Build the view for the paragraph at `index` of `document`.
    ///
    /// Returns `None` if there is no such paragraph. Rows are produced by the first
    /// [`measure`](TextView::measure).
    pub fn for_node(
        document: &TextDocument,
        index: usize,
        metrics: &dyn FontMetrics,
        options: LayoutOptions,
    ) -> Option<Self> {
        let node = document.paragraph(index)?;
        let text = document.paragraph_text(index)?;
        let registry = document.positions().clone();
        let start = registry.create(node.offset, Bias::Forward);
        let end = registry.create(node.end_offset, Bias::Backward);
        let source = ChunkView::new(&text, start, end, metrics, registry);
        Some(Self::from_source(node.id?, source, options))
    }

    /// Build a paragraph view over an existing source chunk.
    pub fn from_source(node: NodeId, source: ChunkView, options: LayoutOptions) -> Self {
        let line_height = source.line_height();
        Self {
            node,
            chunks: vec![source.clone()],
            source,
            options,
            broken_for: None,
            line_height,
            desired_size: Size::default(),
            layout_rect: Rect::default(),
            layout_valid: false,
        }
    }

    /// Identity of the paragraph node this view mirrors.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Paragraph text, including its terminating line break.
    pub fn text(&self) -> &str {
        self.source.text()
    }

    /// Row chunks, top to bottom.
    pub fn chunks(&self) -> &[ChunkView] {
        &self.chunks
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.chunks.len()
    }

    /// Layout options in effect.
    pub fn options(&self) -> LayoutOptions {
        self.options
    }

    /// Replace the layout options; rows are broken again on the next measure.
    pub fn set_options(&mut self, options: LayoutOptions) {
        if self.options != options {
            self.options = options;
            self.broken_for = None;
            self.invalidate_layout();
        }
    }

    /// Last caret slot of the paragraph: before its line break, if any.
    pub fn caret_end(&self) -> usize {
        self.source.caret_end()
    }

    /// Caret at [`caret_end`](Self::caret_end), attached to this paragraph.
    pub fn end_caret(&self) -> Caret {
        self.source.end_caret()
    }

    fn rebuild_rows(&mut self, wrap_width: f32) {
        self.chunks = break_lines(&self.source, wrap_width, self.options.wrap_mode);
        self.broken_for = Some(wrap_width);
        self.layout_valid = false;
        tracing::trace!(
            target: "textview.layout",
            node = self.node.0,
            rows = self.chunks.len(),
            wrap_width,
            "paragraph_rows_rebuilt"
        );
        debug_assert!(check_partition(&*self).is_ok());
    }

    fn navigate_vertically(&self, caret: Caret, direction: Direction) -> (NavigationResult, Caret) {
        let Some(rect) = self.model_to_view(caret.offset, caret.bias) else {
            return (NavigationResult::Invalid, caret);
        };
        let step = match direction {
            Direction::Up => -self.line_height,
            _ => self.line_height,
        };
        let probe = Point::new(rect.x, rect.y + rect.height / 2.0 + step);

        if !self.layout_rect.contains_y(probe.y) {
            let edge = match direction {
                Direction::Up => Caret::forward(self.offset()),
                _ => self.last_chunk().caret_at(self.end_offset()),
            };
            return (NavigationResult::BoundaryChanged, edge);
        }

        match self.view_to_model(probe) {
            Some((offset, bias)) => (NavigationResult::Valid, Caret::new(offset, bias)),
            None => (NavigationResult::Invalid, caret),
        }
    }

    fn last_chunk(&self) -> &ChunkView {
        self.chunks.last().unwrap_or(&self.source)
    }
}

impl TextView for ParagraphView {
    fn kind(&self) -> ViewKind {
        ViewKind::Paragraph
    }

    fn offset(&self) -> usize {
        self.source.offset()
    }

    fn end_offset(&self) -> usize {
        self.source.end_offset()
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
        let wrap_width = self.options.wrap_width(available.width);
        if self.broken_for != Some(wrap_width) {
            self.rebuild_rows(wrap_width);
        }

        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for chunk in &mut self.chunks {
            let size = chunk.measure(Size::new(wrap_width, self.line_height));
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
        let fill = self.options.alignment == TextAlignment::Fill && rect.width.is_finite();
        let mut y = rect.y;
        for chunk in &mut self.chunks {
            let x = rect.x + self.options.row_x(rect.width, chunk.line_width());
            let width = if fill {
                rect.width.max(chunk.full_width())
            } else {
                chunk.full_width()
            };
            chunk.arrange(Rect::new(x, y, width, self.line_height));
            y += self.line_height;
        }
        self.layout_rect = rect;
        self.layout_valid = true;
    }

    fn invalidate_layout(&mut self) {
        self.layout_valid = false;
        for chunk in &mut self.chunks {
            chunk.invalidate_layout();
        }
    }

    fn model_to_view(&self, offset: usize, bias: Bias) -> Option<Rect> {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Paragraph, "model_to_view");
            return None;
        }
        let index = child_index_for_offset(&self.chunks, offset, bias)?;
        self.chunks[index].model_to_view(offset, bias)
    }

    fn view_to_model(&self, point: Point) -> Option<(usize, Bias)> {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Paragraph, "view_to_model");
            return None;
        }
        if !self.layout_rect.contains_y(point.y) {
            return None;
        }
        let index = child_index_for_y(&self.chunks, point.y)?;
        let chunk = &self.chunks[index];
        let row = chunk.layout_rect();
        if point.x < row.x {
            return Some((chunk.offset(), Bias::Forward));
        }
        if point.x >= row.right() {
            let caret = chunk.end_caret();
            return Some((caret.offset, caret.bias));
        }
        chunk.view_to_model(point)
    }

    fn navigate(&self, caret: Caret, direction: Direction) -> (NavigationResult, Caret) {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Paragraph, "navigate");
            return (NavigationResult::Invalid, caret);
        }
        match direction {
            Direction::Left | Direction::Right => {
                navigate_across_children(&self.chunks, caret, direction)
            }
            Direction::Up | Direction::Down => self.navigate_vertically(caret, direction),
        }
    }

    fn child_count(&self) -> usize {
        self.chunks.len()
    }

    fn child(&self, index: usize) -> &dyn TextView {
        &self.chunks[index]
    }
}
