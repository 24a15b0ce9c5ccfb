//! Font metrics providers.
//!
//! Glyph rasterization lives outside this crate; views only need per-character advances
//! and the line box height. Hosts plug their font stack in through [`FontMetrics`].

use unicode_width::UnicodeWidthChar;

/// Supplies character advances and line metrics to the view tree.
pub trait FontMetrics {
    /// Horizontal advance of `ch`.
    fn character_width(&self, ch: char) -> f32;

    /// Height of one line box.
    fn line_height(&self) -> f32;

    /// Distance from the top of the line box to the baseline.
    fn baseline(&self) -> f32;
}

/// Monospaced metrics: every character has the same advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMetrics {
    /// Advance of every character.
    pub char_width: f32,
    /// Line box height.
    pub line_height: f32,
    /// Baseline offset from the top of the line box.
    pub baseline: f32,
}

impl FixedMetrics {
    /// Create fixed metrics; the baseline defaults to 80% of the line height.
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
            baseline: line_height * 0.8,
        }
    }
}

impl FontMetrics for FixedMetrics {
    fn character_width(&self, _ch: char) -> f32 {
        self.char_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn baseline(&self) -> f32 {
        self.baseline
    }
}

/// Terminal-style cell metrics.
///
/// The advance of a character is `cell_width` times its UAX #11 cell count, so CJK and
/// most emoji take two cells and combining marks take none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Width of a single cell.
    pub cell_width: f32,
    /// Line box height.
    pub line_height: f32,
    /// Baseline offset from the top of the line box.
    pub baseline: f32,
}

impl CellMetrics {
    /// Create cell metrics; the baseline defaults to 80% of the line height.
    pub fn new(cell_width: f32, line_height: f32) -> Self {
        Self {
            cell_width,
            line_height,
            baseline: line_height * 0.8,
        }
    }
}

impl FontMetrics for CellMetrics {
    fn character_width(&self, ch: char) -> f32 {
        self.cell_width * cell_count(ch) as f32
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn baseline(&self) -> f32 {
        self.baseline
    }
}

/// Number of terminal cells occupied by `ch` (UAX #11).
///
/// - 1: narrow characters (ASCII, etc.)
/// - 2: wide characters (CJK, fullwidth, most emoji)
/// - 0: zero-width characters (combining marks, etc.)
///
/// Control characters have no defined width and count as one cell.
pub fn cell_count(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Characters that terminate a paragraph. They occupy offsets but never width.
pub(crate) fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}
