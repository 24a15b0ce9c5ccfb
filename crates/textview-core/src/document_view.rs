//! Document view: root of the view tree.
//!
//! The document view owns the single [`BlockView`], the font metrics and the layout
//! options. It is the only view that talks to the host: every document edit and every
//! option change invalidates the layout and notifies the registered invalidation
//! callbacks exactly once, so the host can schedule a new measure/arrange pass.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use textview_core::{
//!     Bias, Direction, DocumentView, FixedMetrics, NavigationResult, Rect, Size,
//!     TextDocument, TextView,
//! };
//!
//! let document = TextDocument::new("Hello World, Here I am.");
//! let mut view = DocumentView::new(&document, Rc::new(FixedMetrics::new(11.0, 15.0)));
//!
//! let size = view.measure(Size::new(200.0, f32::INFINITY));
//! view.arrange(Rect::new(0.0, 0.0, 200.0, size.height));
//!
//! assert_eq!(view.model_to_view(2, Bias::Forward), Some(Rect::new(22.0, 0.0, 11.0, 15.0)));
//! assert_eq!(view.navigate_offset(2, Direction::Down), (NavigationResult::Valid, 20));
//! ```

use std::fmt;
use std::rc::Rc;

use crate::block::BlockView;
use crate::document::{DocumentChange, TextDocument};
use crate::geometry::{Point, Rect, Size};
use crate::layout::{LayoutOptions, TextAlignment, WrapMode};
use crate::metrics::FontMetrics;
use crate::position::Bias;
use crate::view::{
    Caret, Direction, NavigationResult, TextView, TreeError, ViewKind, trace_stale_query,
};

/// Host callback invoked whenever the view tree's layout becomes invalid.
pub type InvalidateCallback = Box<dyn FnMut()>;

/// Root of the view tree.
pub struct DocumentView {
    block: BlockView,
    metrics: Rc<dyn FontMetrics>,
    options: LayoutOptions,
    callbacks: Vec<InvalidateCallback>,
    desired_size: Size,
    layout_rect: Rect,
    layout_valid: bool,
}

impl DocumentView {
    /// Build the view tree for `document` with default layout options.
    pub fn new(document: &TextDocument, metrics: Rc<dyn FontMetrics>) -> Self {
        Self::with_options(document, metrics, LayoutOptions::default())
    }

    /// Build the view tree for `document`.
    pub fn with_options(
        document: &TextDocument,
        metrics: Rc<dyn FontMetrics>,
        options: LayoutOptions,
    ) -> Self {
        let block = BlockView::new(document, metrics.as_ref(), options);
        tracing::debug!(
            target: "textview.layout",
            paragraphs = block.child_count(),
            ?options,
            "view_tree_built"
        );
        Self {
            block,
            metrics,
            options,
            callbacks: Vec::new(),
            desired_size: Size::default(),
            layout_rect: Rect::default(),
            layout_valid: false,
        }
    }

    /// The block view.
    pub fn block(&self) -> &BlockView {
        &self.block
    }

    /// Font metrics used to measure characters.
    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics.as_ref()
    }

    /// Layout options in effect.
    pub fn options(&self) -> LayoutOptions {
        self.options
    }

    /// Register a callback invoked whenever the layout becomes invalid because of an edit or
    /// an option change.
    pub fn on_invalidate<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Replace the layout options.
    pub fn set_options(&mut self, options: LayoutOptions) {
        if self.options == options {
            return;
        }
        self.options = options;
        self.block.set_options(options);
        self.invalidate_and_notify();
    }

    /// Change the wrap mode.
    pub fn set_wrap_mode(&mut self, wrap_mode: WrapMode) {
        self.set_options(LayoutOptions {
            wrap_mode,
            ..self.options
        });
    }

    /// Change the row alignment.
    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.set_options(LayoutOptions {
            alignment,
            ..self.options
        });
    }

    /// Mirror a document edit into the view tree.
    ///
    /// Only the paragraphs named by `change` are rebuilt. Unless the change is empty, the
    /// layout becomes invalid and the host is notified once.
    pub fn apply_change(
        &mut self,
        document: &TextDocument,
        change: &DocumentChange,
    ) -> Result<(), TreeError> {
        if change.is_empty() {
            return Ok(());
        }
        let touched = self
            .block
            .apply_change(document, change, self.metrics.as_ref())?;
        tracing::debug!(
            target: "textview.layout",
            version = change.version,
            touched,
            "document_change_applied"
        );
        self.invalidate_and_notify();
        Ok(())
    }

    /// Move the caret at `offset` (attached forward) one step in `direction`, returning the
    /// result and the target offset.
    pub fn navigate_offset(&self, offset: usize, direction: Direction) -> (NavigationResult, usize) {
        let (result, caret) = self.navigate(Caret::forward(offset), direction);
        (result, caret.offset)
    }

    fn invalidate_and_notify(&mut self) {
        self.layout_valid = false;
        for callback in &mut self.callbacks {
            callback();
        }
    }
}

impl fmt::Debug for DocumentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentView")
            .field("block", &self.block)
            .field("options", &self.options)
            .field("callbacks", &self.callbacks.len())
            .field("layout_rect", &self.layout_rect)
            .field("layout_valid", &self.layout_valid)
            .finish()
    }
}

impl TextView for DocumentView {
    fn kind(&self) -> ViewKind {
        ViewKind::Document
    }

    fn offset(&self) -> usize {
        self.block.offset()
    }

    fn end_offset(&self) -> usize {
        self.block.end_offset()
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
        self.desired_size = self.block.measure(available);
        self.desired_size
    }

    fn arrange(&mut self, rect: Rect) {
        self.block.arrange(rect);
        self.layout_rect = rect;
        self.layout_valid = true;
        tracing::trace!(
            target: "textview.layout",
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "arranged"
        );
    }

    fn invalidate_layout(&mut self) {
        self.layout_valid = false;
        self.block.invalidate_layout();
    }

    fn model_to_view(&self, offset: usize, bias: Bias) -> Option<Rect> {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Document, "model_to_view");
            return None;
        }
        self.block.model_to_view(offset, bias)
    }

    fn view_to_model(&self, point: Point) -> Option<(usize, Bias)> {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Document, "view_to_model");
            return None;
        }
        self.block.view_to_model(point)
    }

    fn navigate(&self, caret: Caret, direction: Direction) -> (NavigationResult, Caret) {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Document, "navigate");
            return (NavigationResult::Invalid, caret);
        }
        self.block.navigate(caret, direction)
    }

    fn child_count(&self) -> usize {
        1
    }

    fn child(&self, index: usize) -> &dyn TextView {
        assert_eq!(index, 0, "document views have a single block child");
        &self.block
    }
}
