//! Host surface
//!
//! [`TextSurface`] ties a [`TextDocument`] to its [`DocumentView`] for hosts that do not want
//! to wire the two together themselves.
//!
//! - **Edits** go through the surface, which forwards every [`DocumentChange`] to the view
//!   tree before notifying subscribers.
//! - **Version tracking**: the surface version follows the document version.
//! - **Layout**: [`layout`](TextSurface::layout) runs measure + arrange; the view tree's
//!   invalidation upcall marks the surface as needing layout.
//! - **Rows**: [`rows`](TextSurface::rows) snapshots the arranged rows for rendering.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use textview_core::{FixedMetrics, Rect, TextSurface};
//!
//! let mut surface = TextSurface::new("Hello World", Rc::new(FixedMetrics::new(10.0, 16.0)));
//! surface.layout(Rect::new(0.0, 0.0, 60.0, 400.0));
//! assert_eq!(surface.rows().len(), 2);
//!
//! surface.insert_at(0, "Oh ").unwrap();
//! assert!(surface.needs_layout());
//! surface.relayout();
//! assert_eq!(surface.rows()[0].text, "Oh ");
//! ```

use std::cell::Cell;
use std::rc::Rc;

use crate::document::{DocumentChange, DocumentError, TextDocument};
use crate::document_view::DocumentView;
use crate::geometry::{Point, Rect, Size};
use crate::layout::LayoutOptions;
use crate::metrics::FontMetrics;
use crate::position::Bias;
use crate::view::{Caret, Direction, NavigationResult, TextView, TreeError};
use thiserror::Error;

/// Callback invoked after every applied edit.
pub type ChangeCallback = Box<dyn FnMut(&DocumentChange)>;

/// Errors raised by [`TextSurface`] edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The edit itself was rejected by the document.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// The view tree could not mirror the edit.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// One arranged row, as handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Index of the paragraph the row belongs to.
    pub paragraph: usize,
    /// First character offset of the row.
    pub offset: usize,
    /// Exclusive end offset.
    pub end_offset: usize,
    /// Row text, including hanging whitespace and line breaks.
    pub text: String,
    /// Rectangle assigned to the row.
    pub rect: Rect,
}

/// A document plus its view tree.
pub struct TextSurface {
    document: TextDocument,
    view: DocumentView,
    viewport: Option<Rect>,
    needs_layout: Rc<Cell<bool>>,
    callbacks: Vec<ChangeCallback>,
}

impl TextSurface {
    /// Create a surface over `text` with default layout options.
    pub fn new(text: &str, metrics: Rc<dyn FontMetrics>) -> Self {
        Self::with_options(text, metrics, LayoutOptions::default())
    }

    /// Create a surface over `text`.
    pub fn with_options(text: &str, metrics: Rc<dyn FontMetrics>, options: LayoutOptions) -> Self {
        let document = TextDocument::new(text);
        let mut view = DocumentView::with_options(&document, metrics, options);
        let needs_layout = Rc::new(Cell::new(true));
        let flag = Rc::clone(&needs_layout);
        view.on_invalidate(move || flag.set(true));
        Self {
            document,
            view,
            viewport: None,
            needs_layout,
            callbacks: Vec::new(),
        }
    }

    /// The document.
    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    /// The view tree.
    pub fn view(&self) -> &DocumentView {
        &self.view
    }

    /// Mutable access to the view tree, e.g. to change layout options.
    pub fn view_mut(&mut self) -> &mut DocumentView {
        &mut self.view
    }

    /// Document version.
    pub fn version(&self) -> u64 {
        self.document.version()
    }

    /// Whether the document changed after `version`.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.document.version() > version
    }

    /// Whether the view tree was invalidated since the last layout pass.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout.get()
    }

    /// Subscribe to applied edits.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&DocumentChange) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Insert `text` at `offset`.
    pub fn insert_at(&mut self, offset: usize, text: &str) -> Result<DocumentChange, SurfaceError> {
        let change = self.document.insert_at(offset, text)?;
        self.apply(change)
    }

    /// Delete `length` characters starting at `offset`.
    pub fn delete_at(&mut self, offset: usize, length: usize) -> Result<DocumentChange, SurfaceError> {
        let change = self.document.delete_at(offset, length)?;
        self.apply(change)
    }

    fn apply(&mut self, change: DocumentChange) -> Result<DocumentChange, SurfaceError> {
        if change.is_empty() {
            return Ok(change);
        }
        self.view.apply_change(&self.document, &change)?;
        for callback in &mut self.callbacks {
            callback(&change);
        }
        Ok(change)
    }

    /// Measure and arrange the view tree inside `viewport`.
    pub fn layout(&mut self, viewport: Rect) -> Size {
        let size = self.view.measure(Size::new(viewport.width, f32::INFINITY));
        self.view.arrange(Rect::new(
            viewport.x,
            viewport.y,
            viewport.width,
            size.height,
        ));
        self.viewport = Some(viewport);
        self.needs_layout.set(false);
        size
    }

    /// Lay out again inside the last viewport if the tree was invalidated.
    ///
    /// Returns `None` when no layout was needed or no viewport is known yet.
    pub fn relayout(&mut self) -> Option<Size> {
        if !self.needs_layout() {
            return None;
        }
        let viewport = self.viewport?;
        Some(self.layout(viewport))
    }

    /// Rectangle of the caret slot at `caret`.
    pub fn caret_rect(&self, caret: Caret) -> Option<Rect> {
        self.view.model_to_view(caret.offset, caret.bias)
    }

    /// Caret nearest to `point`.
    pub fn hit_test(&self, point: Point) -> Option<Caret> {
        self.view
            .view_to_model(point)
            .map(|(offset, bias)| Caret::new(offset, bias))
    }

    /// Move `caret` one step in `direction`.
    pub fn move_caret(&self, caret: Caret, direction: Direction) -> (NavigationResult, Caret) {
        self.view.navigate(caret, direction)
    }

    /// Arranged rows, top to bottom. Empty while the layout is stale.
    pub fn rows(&self) -> Vec<Row> {
        if !self.view.is_layout_valid() {
            return Vec::new();
        }
        self.view
            .block()
            .paragraphs()
            .iter()
            .enumerate()
            .flat_map(|(paragraph, view)| {
                view.chunks().iter().map(move |chunk| Row {
                    paragraph,
                    offset: chunk.offset(),
                    end_offset: chunk.end_offset(),
                    text: chunk.text().to_string(),
                    rect: chunk.layout_rect(),
                })
            })
            .collect()
    }

    /// Text of `[start, end)`.
    pub fn text_in(&self, start: usize, end: usize) -> Option<String> {
        self.document.slice(start, end)
    }

    /// Caret attached forward at `offset`, clamped to the document.
    pub fn caret_at(&self, offset: usize) -> Caret {
        Caret::new(offset.min(self.document.len_chars()), Bias::Forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FixedMetrics;
    use std::cell::RefCell;

    fn surface(text: &str) -> TextSurface {
        TextSurface::new(text, Rc::new(FixedMetrics::new(11.0, 15.0)))
    }

    #[test]
    fn test_edits_flow_to_view_and_subscribers() {
        let mut surface = surface("abc\ndef");
        surface.layout(Rect::new(0.0, 0.0, 100.0, 100.0));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        surface.subscribe(move |change| log.borrow_mut().push(change.version));

        surface.insert_at(4, "x\n").unwrap();
        assert!(surface.needs_layout());
        assert_eq!(surface.rows(), Vec::new());
        assert_eq!(surface.view().block().child_count(), 3);
        assert_eq!(*seen.borrow(), vec![1]);

        surface.delete_at(0, 0).unwrap();
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(surface.version(), 1);
        assert!(surface.has_changed_since(0));
    }

    #[test]
    fn test_rejected_edit_leaves_surface_untouched() {
        let mut surface = surface("abc");
        assert_eq!(
            surface.delete_at(2, 5),
            Err(SurfaceError::Document(DocumentError::RangeOutOfBounds {
                offset: 2,
                length: 5,
                len: 3
            }))
        );
        assert_eq!(surface.version(), 0);
    }

    #[test]
    fn test_relayout_uses_last_viewport() {
        let mut surface = surface("abc def");
        assert_eq!(surface.relayout(), None);

        surface.layout(Rect::new(5.0, 7.0, 50.0, 100.0));
        assert_eq!(surface.relayout(), None);

        surface.insert_at(7, " ghi").unwrap();
        assert_eq!(surface.relayout(), Some(Size::new(33.0, 45.0)));
        let rows = surface.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].rect, Rect::new(5.0, 37.0, 33.0, 15.0));
    }

    #[test]
    fn test_hit_test_and_caret_rect() {
        let mut surface = surface("abc");
        surface.layout(Rect::new(0.0, 0.0, 100.0, 100.0));
        let caret = surface.hit_test(Point::new(12.0, 3.0)).unwrap();
        assert_eq!(caret, Caret::forward(1));
        assert_eq!(surface.caret_rect(caret), Some(Rect::new(11.0, 0.0, 11.0, 15.0)));
        assert_eq!(
            surface.move_caret(caret, Direction::Right),
            (NavigationResult::Valid, Caret::forward(2))
        );
        assert_eq!(surface.caret_at(10), Caret::forward(3));
    }

    #[test]
    fn test_text_between_hit_carets() {
        let mut surface = surface("select me
please");
        surface.layout(Rect::new(0.0, 0.0, 200.0, 100.0));

        let from = surface.hit_test(Point::new(80.0, 5.0)).unwrap();
        let to = surface.hit_test(Point::new(30.0, 20.0)).unwrap();
        assert_eq!((from.offset, to.offset), (7, 13));
        assert_eq!(surface.text_in(from.offset, to.offset), Some("me\nple".to_string()));
        assert_eq!(surface.text_in(4, 40), None);
    }
}
