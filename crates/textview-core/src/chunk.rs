//! Chunk view: one row of text.
//!
//! A chunk is a run of characters that is laid out on a single row. Its range is anchored
//! with document [`Position`]s so that it keeps tracking the right characters while other
//! paragraphs are edited.
//!
//! Leading whitespace, trailing whitespace and trailing line breaks are counted separately
//! (`trim_start`, `trim_end`, `trim_line_breaks`). They stay inside the chunk's offset range
//! but are excluded from its content width; trailing whitespace "hangs" past the right edge
//! of a row instead of forcing a break.

use crate::geometry::{Insets, Point, Rect, Size};
use crate::layout::WrapMode;
use crate::metrics::{FontMetrics, is_line_break};
use crate::position::{Bias, Position, PositionRegistry};
use crate::view::{Caret, Direction, NavigationResult, TextView, ViewKind, trace_stale_query};

/// Leaf view covering one row of a paragraph.
#[derive(Debug, Clone)]
pub struct ChunkView {
    start: Position,
    end: Position,
    text: String,
    /// Advance of every character; line breaks have zero advance.
    advances: Vec<f32>,
    trim_start: usize,
    trim_end: usize,
    trim_line_breaks: usize,
    padding: Insets,
    line_height: f32,
    baseline: f32,
    registry: PositionRegistry,
    desired_size: Size,
    layout_rect: Rect,
    layout_valid: bool,
}

impl ChunkView {
    /// Create a chunk over `[start, end)` holding `text`, measuring every character with
    /// `metrics`.
    ///
    /// `text` must contain exactly `end - start` characters.
    pub fn new(
        text: &str,
        start: Position,
        end: Position,
        metrics: &dyn FontMetrics,
        registry: PositionRegistry,
    ) -> Self {
        let advances = text
            .chars()
            .map(|ch| {
                if is_line_break(ch) {
                    0.0
                } else {
                    metrics.character_width(ch)
                }
            })
            .collect();
        Self::from_parts(
            text.to_string(),
            advances,
            start,
            end,
            metrics.line_height(),
            metrics.baseline(),
            registry,
        )
    }

    /// Create a chunk for `text` starting at `offset`, allocating its boundary positions
    /// from `registry`.
    pub fn from_text(
        text: &str,
        offset: usize,
        metrics: &dyn FontMetrics,
        registry: PositionRegistry,
    ) -> Self {
        let end = offset + text.chars().count();
        let start = registry.create(offset, Bias::Forward);
        let end = registry.create(end, Bias::Backward);
        Self::new(text, start, end, metrics, registry)
    }

    fn from_parts(
        text: String,
        advances: Vec<f32>,
        start: Position,
        end: Position,
        line_height: f32,
        baseline: f32,
        registry: PositionRegistry,
    ) -> Self {
        debug_assert_eq!(advances.len(), end.offset().saturating_sub(start.offset()));

        let chars: Vec<char> = text.chars().collect();
        let trim_line_breaks = chars.iter().rev().take_while(|ch| is_line_break(**ch)).count();
        let body = chars.len() - trim_line_breaks;
        let trim_start = chars[..body]
            .iter()
            .take_while(|ch| ch.is_whitespace())
            .count();
        let trim_end = chars[trim_start..body]
            .iter()
            .rev()
            .take_while(|ch| ch.is_whitespace())
            .count();
        let padding = Insets::horizontal(
            advances[..trim_start].iter().sum(),
            advances[body - trim_end..body].iter().sum(),
        );

        Self {
            start,
            end,
            text,
            advances,
            trim_start,
            trim_end,
            trim_line_breaks,
            padding,
            line_height,
            baseline,
            registry,
            desired_size: Size::default(),
            layout_rect: Rect::default(),
            layout_valid: false,
        }
    }

    /// Text of the chunk, including trimmed whitespace and line breaks.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.advances.len()
    }

    /// Whether the chunk covers no characters.
    pub fn is_empty(&self) -> bool {
        self.advances.is_empty()
    }

    /// Leading whitespace characters excluded from the content width.
    pub fn trim_start(&self) -> usize {
        self.trim_start
    }

    /// Trailing whitespace characters (before any line break) excluded from the content width.
    pub fn trim_end(&self) -> usize {
        self.trim_end
    }

    /// Trailing line-break characters.
    pub fn trim_line_breaks(&self) -> usize {
        self.trim_line_breaks
    }

    /// Widths of the leading and trailing trimmed whitespace.
    pub fn padding(&self) -> Insets {
        self.padding
    }

    /// Line box height.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Baseline offset from the top of the row.
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Position anchoring the start of the chunk.
    pub fn start_position(&self) -> &Position {
        &self.start
    }

    /// Position anchoring the end of the chunk.
    pub fn end_position(&self) -> &Position {
        &self.end
    }

    /// Width of the visible content, without trimmed whitespace.
    pub fn content_width(&self) -> f32 {
        self.advances[self.trim_start..self.body_len() - self.trim_end]
            .iter()
            .sum()
    }

    /// Width the row needs: leading padding plus content. Trailing whitespace hangs.
    pub fn line_width(&self) -> f32 {
        self.padding.left + self.content_width()
    }

    /// Width of every character of the chunk, trailing whitespace included.
    pub fn full_width(&self) -> f32 {
        self.advances.iter().sum()
    }

    /// Whether the row fits into `max_width` without breaking.
    pub fn fits(&self, max_width: f32) -> bool {
        self.line_width() <= max_width
    }

    /// Last caret slot of the row: before any trailing line break.
    pub fn caret_end(&self) -> usize {
        self.end_offset() - self.trim_line_breaks
    }

    /// Caret at [`caret_end`](Self::caret_end), attached to this row.
    pub fn end_caret(&self) -> Caret {
        let offset = self.caret_end();
        if offset > self.offset() {
            Caret::backward(offset)
        } else {
            Caret::forward(offset)
        }
    }

    fn body_len(&self) -> usize {
        self.len() - self.trim_line_breaks
    }

    fn x_at(&self, index: usize) -> f32 {
        self.advances[..index].iter().sum()
    }

    /// Text of `[offset, end_offset)`, or `None` if the range is not inside this chunk.
    pub fn text_for(&self, offset: usize, end_offset: usize) -> Option<&str> {
        if offset < self.offset() || end_offset > self.end_offset() || offset > end_offset {
            return None;
        }
        let from = offset - self.offset();
        let to = end_offset - self.offset();
        Some(char_slice(&self.text, from, to))
    }

    /// A narrower chunk over `[start, end)`, with trims derived from its own text.
    pub fn sub_chunk(&self, start: Position, end: Position) -> Option<ChunkView> {
        let text = self.text_for(start.offset(), end.offset())?.to_string();
        let from = start.offset() - self.offset();
        let to = end.offset() - self.offset();
        Some(self.with_text(text, from, to, start, end))
    }

    fn with_text(
        &self,
        text: String,
        from: usize,
        to: usize,
        start: Position,
        end: Position,
    ) -> ChunkView {
        ChunkView::from_parts(
            text,
            self.advances[from..to].to_vec(),
            start,
            end,
            self.line_height,
            self.baseline,
            self.registry.clone(),
        )
    }

    /// Split the chunk so that the first part fits into `max_width`.
    ///
    /// The split happens after the last whitespace run whose preceding content fits. When no
    /// such run exists (a single word wider than `max_width`), the split falls on the last
    /// character that fits, and never before the first character, so every call makes
    /// progress. If the whole chunk fits, the second part is empty.
    pub fn break_at(&self, max_width: f32) -> (ChunkView, ChunkView) {
        self.break_with(max_width, WrapMode::Word)
    }

    pub(crate) fn break_with(&self, max_width: f32, mode: WrapMode) -> (ChunkView, ChunkView) {
        let breaker = RowBreaker::new(self);
        let len = self.len();
        let split = breaker.row_len(0, max_width, mode);
        if split == len {
            return (
                self.clone(),
                breaker.row(len, len, self.end.clone(), self.end.clone()),
            );
        }

        let (first_end, second_start) = breaker.boundary(split);
        (
            breaker.row(0, split, self.start.clone(), first_end),
            breaker.row(split, len, second_start, self.end.clone()),
        )
    }

    /// Caret for `offset`, attached to this chunk.
    ///
    /// The end of a chunk that does not end its paragraph belongs to this row (`Backward`);
    /// the slot after a line break belongs to the next paragraph (`Forward`).
    pub(crate) fn caret_at(&self, offset: usize) -> Caret {
        if offset == self.end_offset() && self.trim_line_breaks == 0 && !self.is_empty() {
            Caret::backward(offset)
        } else {
            Caret::forward(offset)
        }
    }

    fn covers(&self, offset: usize) -> bool {
        offset >= self.offset() && offset <= self.end_offset()
    }
}

impl TextView for ChunkView {
    fn kind(&self) -> ViewKind {
        ViewKind::Chunk
    }

    fn offset(&self) -> usize {
        self.start.offset()
    }

    fn end_offset(&self) -> usize {
        self.end.offset()
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

    fn measure(&mut self, _available: Size) -> Size {
        self.desired_size = Size::new(self.line_width(), self.line_height);
        self.desired_size
    }

    fn arrange(&mut self, rect: Rect) {
        self.layout_rect = rect;
        self.layout_valid = true;
    }

    fn invalidate_layout(&mut self) {
        self.layout_valid = false;
    }

    fn model_to_view(&self, offset: usize, _bias: Bias) -> Option<Rect> {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Chunk, "model_to_view");
            return None;
        }
        if !self.covers(offset) {
            return None;
        }
        let index = offset - self.offset();
        let width = self.advances.get(index).copied().unwrap_or(0.0);
        Some(Rect::new(
            self.layout_rect.x + self.x_at(index),
            self.layout_rect.y,
            width,
            self.line_height,
        ))
    }

    fn view_to_model(&self, point: Point) -> Option<(usize, Bias)> {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Chunk, "view_to_model");
            return None;
        }
        if !self.layout_rect.contains(point) {
            return None;
        }

        let local_x = point.x - self.layout_rect.x;
        let mut left = 0.0f32;
        for (index, advance) in self.advances[..self.body_len()].iter().enumerate() {
            if local_x < left + advance / 2.0 {
                return Some((self.offset() + index, Bias::Forward));
            }
            if local_x < left + advance {
                return Some((self.offset() + index + 1, Bias::Backward));
            }
            left += advance;
        }
        let caret = self.end_caret();
        Some((caret.offset, caret.bias))
    }

    fn navigate(&self, caret: Caret, direction: Direction) -> (NavigationResult, Caret) {
        if !self.layout_valid {
            trace_stale_query(ViewKind::Chunk, "navigate");
            return (NavigationResult::Invalid, caret);
        }
        let offset = caret.offset;
        if !self.covers(offset) {
            return (NavigationResult::Invalid, caret);
        }
        match direction {
            Direction::Left if offset > self.offset() => {
                (NavigationResult::Valid, self.caret_at(offset - 1))
            }
            Direction::Left => (
                NavigationResult::BoundaryChanged,
                self.caret_at(self.offset()),
            ),
            Direction::Right if offset < self.end_offset() => {
                (NavigationResult::Valid, self.caret_at(offset + 1))
            }
            Direction::Right => (
                NavigationResult::BoundaryChanged,
                self.caret_at(self.end_offset()),
            ),
            Direction::Up | Direction::Down => (NavigationResult::Invalid, caret),
        }
    }

    fn child_count(&self) -> usize {
        0
    }

    fn child(&self, index: usize) -> &dyn TextView {
        panic!("chunk views have no children (requested child {index})")
    }
}

/// Character table of one chunk, built once so that a paragraph is broken into rows in a
/// single pass instead of re-slicing the remaining tail after every break.
pub(crate) struct RowBreaker<'a> {
    chunk: &'a ChunkView,
    chars: Vec<char>,
    /// Byte offset of every character, followed by the text length.
    bytes: Vec<usize>,
    /// Start of the whitespace run that ends the chunk's body (before any line break).
    trailing_space: usize,
}

impl<'a> RowBreaker<'a> {
    pub(crate) fn new(chunk: &'a ChunkView) -> Self {
        let mut chars = Vec::with_capacity(chunk.len());
        let mut bytes = Vec::with_capacity(chunk.len() + 1);
        for (byte, ch) in chunk.text.char_indices() {
            chars.push(ch);
            bytes.push(byte);
        }
        bytes.push(chunk.text.len());

        let body = chunk.body_len();
        let space = chars[..body]
            .iter()
            .rev()
            .take_while(|ch| ch.is_whitespace())
            .count();
        Self {
            chunk,
            chars,
            bytes,
            trailing_space: body - space,
        }
    }

    /// Number of characters of the row starting at `from` (`1..`, or `0` at the end).
    pub(crate) fn row_len(&self, from: usize, max_width: f32, mode: WrapMode) -> usize {
        let rest = self.chars.len() - from;
        if rest == 0 || mode == WrapMode::None || self.fits_from(from, max_width) {
            return rest;
        }
        if mode == WrapMode::Word {
            if let Some(count) = self.word_split(from, max_width) {
                return count;
            }
        }

        let advances = &self.chunk.advances[from..];
        let mut x = 0.0f32;
        let mut count = 0usize;
        while count < rest && x + advances[count] <= max_width {
            x += advances[count];
            count += 1;
        }
        count.max(1)
    }

    /// Whether `[from, len)` fits, measured like [`ChunkView::line_width`]: leading
    /// whitespace counts, the trailing whitespace run hangs.
    fn fits_from(&self, from: usize, max_width: f32) -> bool {
        let body = self.chunk.body_len().max(from);
        let content_end = if from < self.trailing_space {
            self.trailing_space
        } else {
            body
        };
        let mut x = 0.0f32;
        for advance in &self.chunk.advances[from..content_end] {
            x += advance;
            if x > max_width {
                return false;
            }
        }
        true
    }

    fn word_split(&self, from: usize, max_width: f32) -> Option<usize> {
        let chars = &self.chars;
        let mut best = None;
        let mut x = 0.0f32;
        let mut run_start_x = 0.0f32;
        for index in from..chars.len() {
            if chars[index].is_whitespace() {
                if index == from || !chars[index - 1].is_whitespace() {
                    run_start_x = x;
                }
                let run_continues = chars.get(index + 1).is_some_and(|next| next.is_whitespace());
                if !run_continues {
                    if run_start_x > max_width {
                        break;
                    }
                    best = Some(index + 1 - from);
                }
            } else if x > max_width {
                // Every later run starts even further right.
                break;
            }
            x += self.chunk.advances[index];
        }
        best
    }

    /// The two positions at a break `at` characters into the chunk: the end of the row
    /// before it and the start of the row after it.
    pub(crate) fn boundary(&self, at: usize) -> (Position, Position) {
        let offset = self.chunk.offset() + at;
        (
            self.chunk.registry.create(offset, Bias::Backward),
            self.chunk.registry.create(offset, Bias::Forward),
        )
    }

    /// Row over characters `[from, to)` of the chunk.
    pub(crate) fn row(&self, from: usize, to: usize, start: Position, end: Position) -> ChunkView {
        let text = self.chunk.text[self.bytes[from]..self.bytes[to]].to_string();
        self.chunk.with_text(text, from, to, start, end)
    }
}

/// Sub-slice of `text` between two character indices.
fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let byte_at = |index: usize| {
        text.char_indices()
            .nth(index)
            .map(|(byte, _)| byte)
            .unwrap_or(text.len())
    };
    &text[byte_at(from)..byte_at(to)]
}
