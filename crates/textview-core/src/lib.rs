#![warn(missing_docs)]
//! Textview Core - Headless View Tree for Plain Text
//!
//! # Overview
//!
//! `textview-core` turns a plain-text document into a tree of views that can be measured,
//! arranged and queried, without drawing anything. A host supplies font metrics and an
//! available width; the tree answers where every character sits and how a caret moves.
//!
//! # Core Features
//!
//! - **Greedy Line Breaking**: wrap after the last whitespace that fits, falling back to
//!   character breaks for words wider than the row
//! - **Bidirectional Mapping**: character offset → caret rectangle and point → offset, with
//!   a bias to disambiguate offsets shared by two rows
//! - **Cursor Navigation**: left/right/up/down with an explicit boundary result
//! - **Incremental Rebuild**: only the paragraphs touched by an edit are rebuilt
//! - **Stale-Layout Safety**: every query fails while the layout is invalid
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  TextSurface (document + view, host API)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  DocumentView (root, invalidation upcall)   │
//! ├─────────────────────────────────────────────┤
//! │  BlockView (paragraph stack)                │  ← View Tree
//! ├─────────────────────────────────────────────┤
//! │  ParagraphView (line breaking)              │
//! ├─────────────────────────────────────────────┤
//! │  ChunkView (one row)                        │
//! ├─────────────────────────────────────────────┤
//! │  TextDocument + PositionRegistry (Rope)     │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use textview_core::{Bias, Caret, Direction, FixedMetrics, NavigationResult, Rect, TextSurface};
//!
//! let mut surface = TextSurface::new(
//!     "Hello World, Here I am. Can you see me? This is on the next line.",
//!     Rc::new(FixedMetrics::new(11.0, 15.0)),
//! );
//! surface.layout(Rect::new(0.0, 0.0, 200.0, 600.0));
//!
//! let rows: Vec<String> = surface.rows().into_iter().map(|row| row.text).collect();
//! assert_eq!(rows[0], "Hello World, Here ");
//!
//! // Offset 18 ends the first row (Backward) and starts the second one (Forward).
//! let end_of_row = surface.caret_rect(Caret::new(18, Bias::Backward)).unwrap();
//! let start_of_row = surface.caret_rect(Caret::new(18, Bias::Forward)).unwrap();
//! assert_eq!(end_of_row.y, 0.0);
//! assert_eq!(start_of_row.y, 15.0);
//!
//! let (result, _) = surface.move_caret(Caret::forward(0), Direction::Up);
//! assert_eq!(result, NavigationResult::BoundaryChanged);
//! ```
//!
//! # Module Description
//!
//! - [`geometry`] - Points, sizes, rectangles and insets
//! - [`metrics`] - Font metrics supplied by the host
//! - [`position`] - Tracked positions that follow edits
//! - [`document`] - Rope-backed document with paragraph nodes
//! - [`layout`] - Layout options and the line-breaking driver
//! - [`view`] - The view contract and shared helpers
//! - [`chunk`], [`paragraph`], [`block`], [`document_view`] - The four view kinds
//! - [`surface`] - Document and view wired together for hosts
//!
//! # Logging
//!
//! The crate emits [`tracing`] events under the `textview.document`, `textview.layout` and
//! `textview.query` targets. It never installs a subscriber.

pub mod block;
pub mod chunk;
pub mod document;
pub mod document_view;
pub mod geometry;
pub mod layout;
pub mod metrics;
pub mod paragraph;
pub mod position;
pub mod surface;
pub mod view;

pub use block::BlockView;
pub use chunk::ChunkView;
pub use document::{
    DocumentChange, DocumentError, EditKind, Node, NodeChange, NodeId, TextDocument,
};
pub use document_view::{DocumentView, InvalidateCallback};
pub use geometry::{Insets, Point, Rect, Size};
pub use layout::{LayoutOptions, TextAlignment, WrapMode, break_lines};
pub use metrics::{CellMetrics, FixedMetrics, FontMetrics, cell_count};
pub use paragraph::ParagraphView;
pub use position::{Bias, Position, PositionRegistry};
pub use surface::{ChangeCallback, Row, SurfaceError, TextSurface};
pub use view::{
    Caret, Direction, NavigationResult, TextView, TreeError, ViewKind, check_partition,
};
