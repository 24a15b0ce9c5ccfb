//! Layout options and the greedy line-breaking algorithm.
//!
//! Paragraph text is wrapped in one pass over the paragraph's source chunk. Each row ends
//! where [`ChunkView::break_at`] would split the remaining text, and the last row is the
//! first remainder that fits the available width.

use crate::chunk::{ChunkView, RowBreaker};

/// Soft wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// No soft wrapping (each paragraph is a single row).
    None,
    /// Wrap at character boundaries.
    Char,
    /// Prefer wrapping after whitespace, falling back to character wrap.
    #[default]
    Word,
}

/// Horizontal placement of rows inside their paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    /// Rows start at the left edge.
    #[default]
    Left,
    /// Rows are centred.
    Center,
    /// Rows end at the right edge.
    Right,
    /// Rows span the full available width (text itself stays left-aligned).
    Fill,
}

/// Options that affect how paragraphs are broken into rows and placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutOptions {
    /// Soft wrapping mode.
    pub wrap_mode: WrapMode,
    /// Row alignment.
    pub alignment: TextAlignment,
}

impl LayoutOptions {
    /// Options with the given wrap mode and default alignment.
    pub fn with_wrap_mode(wrap_mode: WrapMode) -> Self {
        Self {
            wrap_mode,
            ..Self::default()
        }
    }

    /// Width paragraphs should wrap at for a given available width.
    pub fn wrap_width(&self, available_width: f32) -> f32 {
        match self.wrap_mode {
            WrapMode::None => f32::INFINITY,
            WrapMode::Char | WrapMode::Word => available_width,
        }
    }

    /// Horizontal offset of a row of `row_width` inside `available_width`.
    pub fn row_x(&self, available_width: f32, row_width: f32) -> f32 {
        if !available_width.is_finite() {
            return 0.0;
        }
        let slack = (available_width - row_width).max(0.0);
        match self.alignment {
            TextAlignment::Left | TextAlignment::Fill => 0.0,
            TextAlignment::Center => slack / 2.0,
            TextAlignment::Right => slack,
        }
    }
}

/// Break `source` into rows no wider than `max_width`.
///
/// Always returns at least one chunk. Every chunk but the last is produced by a break, so
/// the chunks partition `source`'s range in order.
pub fn break_lines(source: &ChunkView, max_width: f32, mode: WrapMode) -> Vec<ChunkView> {
    let breaker = RowBreaker::new(source);
    let len = source.len();
    let mut rows = Vec::new();
    let mut from = 0;
    let mut start = source.start_position().clone();
    loop {
        let to = from + breaker.row_len(from, max_width, mode);
        if to == len {
            if from == 0 {
                rows.push(source.clone());
            } else {
                rows.push(breaker.row(from, len, start, source.end_position().clone()));
            }
            break;
        }
        let (end, next) = breaker.boundary(to);
        rows.push(breaker.row(from, to, start, end));
        start = next;
        from = to;
    }
    rows
}
