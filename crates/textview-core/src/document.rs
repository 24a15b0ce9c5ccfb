//! Text document: a character buffer with a paragraph node tree.
//!
//! The document is a thin collaborator of the view tree. It stores text in a [`Rope`],
//! exposes one paragraph node per `'\n'`-terminated line, and reports every edit as a
//! [`DocumentChange`] naming the paragraph nodes that changed, appeared or disappeared.
//!
//! # Example
//!
//! ```rust
//! use textview_core::{EditKind, TextDocument};
//!
//! let mut document = TextDocument::new("Hello\nWorld");
//! assert_eq!(document.paragraph_count(), 2);
//!
//! let change = document.insert_at(5, " there\nnew").unwrap();
//! assert_eq!(document.paragraph_count(), 3);
//! assert_eq!(change.nodes[0].kind, EditKind::Changed);
//! assert_eq!(change.nodes[1].kind, EditKind::Inserted);
//! ```

use crate::position::{Bias, Position, PositionRegistry};
use ropey::Rope;
use thiserror::Error;

/// Stable identity of a paragraph node.
///
/// Ids are never reused within one document, so views can match paragraphs across edits
/// by identity instead of by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A document-owned range.
///
/// Nodes carry no rendering state. The root node spans the whole document; paragraph
/// nodes include their terminating `'\n'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// Paragraph identity (`None` for the root).
    pub id: Option<NodeId>,
    /// Index among the root's children (0 for the root).
    pub index: usize,
    /// First character offset.
    pub offset: usize,
    /// Exclusive end offset.
    pub end_offset: usize,
}

impl Node {
    /// Number of characters covered by the node.
    pub fn len(&self) -> usize {
        self.end_offset - self.offset
    }

    /// Whether the node covers no characters.
    pub fn is_empty(&self) -> bool {
        self.offset == self.end_offset
    }
}

/// How a paragraph node was affected by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// The node kept its identity but its text changed.
    Changed,
    /// The node is new.
    Inserted,
    /// The node no longer exists.
    Removed,
}

/// One structural notification.
///
/// `index` is the node's index in the paragraph list at the moment the notification is
/// applied: replaying a [`DocumentChange`]'s `nodes` in order against the old paragraph
/// list yields the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeChange {
    /// Affected node.
    pub node: NodeId,
    /// Paragraph index at which the change applies.
    pub index: usize,
    /// Kind of change.
    pub kind: EditKind,
}

/// Description of a single document edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    /// Character offset of the edit.
    pub offset: usize,
    /// Number of characters removed at `offset`.
    pub removed_len: usize,
    /// Number of characters inserted at `offset`.
    pub inserted_len: usize,
    /// Structural notifications, in application order.
    pub nodes: Vec<NodeChange>,
    /// Document version after the edit.
    pub version: u64,
}

impl DocumentChange {
    /// Whether the edit left the document untouched.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Invalid edit or position requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// An offset past the end of the document.
    #[error("offset {offset} is out of range (document length {len})")]
    OffsetOutOfRange {
        /// Requested offset.
        offset: usize,
        /// Document length in characters.
        len: usize,
    },
    /// A range extending past the end of the document.
    #[error("range {offset}+{length} is out of bounds (document length {len})")]
    RangeOutOfBounds {
        /// Range start.
        offset: usize,
        /// Range length.
        length: usize,
        /// Document length in characters.
        len: usize,
    },
}

/// Linear character buffer with a paragraph node tree.
pub struct TextDocument {
    rope: Rope,
    /// Paragraph identities, index-aligned with the rope's lines.
    paragraphs: Vec<NodeId>,
    next_id: u64,
    positions: PositionRegistry,
    version: u64,
}

impl TextDocument {
    /// Create a document from text.
    pub fn new(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let count = rope.len_lines();
        Self {
            rope,
            paragraphs: (0..count as u64).map(NodeId).collect(),
            next_id: count as u64,
            positions: PositionRegistry::new(),
            version: 0,
        }
    }

    /// Create an empty document (one empty paragraph).
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Length in characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Whether the document has no characters.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Whole text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of `[start, end)`, or `None` when the range is invalid.
    pub fn slice(&self, start: usize, end: usize) -> Option<String> {
        if start > end || end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(start..end).to_string())
    }

    /// Version number, incremented by every non-empty edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The position tracker of this document.
    pub fn positions(&self) -> &PositionRegistry {
        &self.positions
    }

    /// Root node spanning the whole document.
    pub fn root(&self) -> Node {
        Node {
            id: None,
            index: 0,
            offset: 0,
            end_offset: self.len_chars(),
        }
    }

    /// Number of paragraph nodes (always at least one).
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Paragraph identities in document order.
    pub fn paragraph_ids(&self) -> &[NodeId] {
        &self.paragraphs
    }

    /// Paragraph node at `index`.
    pub fn paragraph(&self, index: usize) -> Option<Node> {
        let id = *self.paragraphs.get(index)?;
        let offset = self.rope.line_to_char(index);
        let end_offset = if index + 1 < self.paragraphs.len() {
            self.rope.line_to_char(index + 1)
        } else {
            self.len_chars()
        };
        Some(Node {
            id: Some(id),
            index,
            offset,
            end_offset,
        })
    }

    /// Paragraph node with identity `id`.
    pub fn paragraph_by_id(&self, id: NodeId) -> Option<Node> {
        let index = self.paragraphs.iter().position(|candidate| *candidate == id)?;
        self.paragraph(index)
    }

    /// Text of the paragraph at `index`, including its terminating `'\n'`.
    pub fn paragraph_text(&self, index: usize) -> Option<String> {
        if index >= self.paragraphs.len() {
            return None;
        }
        Some(self.rope.line(index).to_string())
    }

    /// Create a tracked position.
    pub fn create_position(&self, offset: usize, bias: Bias) -> Result<Position, DocumentError> {
        if offset > self.len_chars() {
            return Err(DocumentError::OffsetOutOfRange {
                offset,
                len: self.len_chars(),
            });
        }
        Ok(self.positions.create(offset, bias))
    }

    /// Insert `text` at character `offset`.
    pub fn insert_at(&mut self, offset: usize, text: &str) -> Result<DocumentChange, DocumentError> {
        if offset > self.len_chars() {
            return Err(DocumentError::OffsetOutOfRange {
                offset,
                len: self.len_chars(),
            });
        }
        Ok(self.replace(offset, 0, text))
    }

    /// Delete `length` characters starting at `offset`.
    pub fn delete_at(
        &mut self,
        offset: usize,
        length: usize,
    ) -> Result<DocumentChange, DocumentError> {
        let len = self.len_chars();
        if offset.checked_add(length).is_none_or(|end| end > len) {
            return Err(DocumentError::RangeOutOfBounds {
                offset,
                length,
                len,
            });
        }
        Ok(self.replace(offset, length, ""))
    }

    fn replace(&mut self, offset: usize, removed_len: usize, inserted: &str) -> DocumentChange {
        let inserted_len = inserted.chars().count();
        if removed_len == 0 && inserted_len == 0 {
            return DocumentChange {
                offset,
                removed_len,
                inserted_len,
                nodes: Vec::new(),
                version: self.version,
            };
        }

        // Paragraphs touched by the edit. The paragraph holding the end of the removed
        // range is included: removing its predecessor's '\n' merges the two.
        let first = self.rope.char_to_line(offset);
        let last = self.rope.char_to_line(offset + removed_len);

        if removed_len > 0 {
            self.rope.remove(offset..offset + removed_len);
            self.positions.apply_delete(offset, removed_len);
        }
        if inserted_len > 0 {
            self.rope.insert(offset, inserted);
            self.positions.apply_insert(offset, inserted_len);
        }

        let new_last = self.rope.char_to_line(offset + inserted_len);
        let old_count = last - first + 1;
        let new_count = new_last - first + 1;

        let mut nodes = Vec::new();
        for index in first..first + old_count.min(new_count) {
            nodes.push(NodeChange {
                node: self.paragraphs[index],
                index,
                kind: EditKind::Changed,
            });
        }
        if old_count > new_count {
            for index in (first + new_count..=last).rev() {
                let node = self.paragraphs.remove(index);
                nodes.push(NodeChange {
                    node,
                    index,
                    kind: EditKind::Removed,
                });
            }
        } else {
            for index in first + old_count..=new_last {
                let node = NodeId(self.next_id);
                self.next_id += 1;
                self.paragraphs.insert(index, node);
                nodes.push(NodeChange {
                    node,
                    index,
                    kind: EditKind::Inserted,
                });
            }
        }
        debug_assert_eq!(self.paragraphs.len(), self.rope.len_lines());

        self.version += 1;
        tracing::trace!(
            target: "textview.document",
            offset,
            removed_len,
            inserted_len,
            changed_nodes = nodes.len(),
            version = self.version,
            "edit"
        );

        DocumentChange {
            offset,
            removed_len,
            inserted_len,
            nodes,
            version: self.version,
        }
    }
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::empty()
    }
}
