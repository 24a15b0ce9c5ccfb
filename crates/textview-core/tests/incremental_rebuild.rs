//! Incremental rebuild of the view tree after document edits.
//!
//! Random edit sequences are replayed against a document and its view tree; after every edit
//! the incrementally updated tree must lay out exactly like a tree built from scratch.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::rc::Rc;
use textview_core::{
    DocumentView, EditKind, FixedMetrics, FontMetrics, NodeId, Rect, Size, TextDocument, TextView,
    check_partition,
};

const WIDTH: f32 = 120.0;

#[derive(Debug, PartialEq)]
struct RowSnapshot {
    offset: usize,
    end_offset: usize,
    text: String,
    rect: Rect,
}

fn metrics() -> Rc<dyn FontMetrics> {
    Rc::new(FixedMetrics::new(11.0, 15.0))
}

fn layout(view: &mut DocumentView) {
    let size = view.measure(Size::new(WIDTH, f32::INFINITY));
    view.arrange(Rect::new(0.0, 0.0, WIDTH, size.height));
}

fn snapshot(view: &DocumentView) -> Vec<RowSnapshot> {
    view.block()
        .paragraphs()
        .iter()
        .flat_map(|paragraph| paragraph.chunks())
        .map(|chunk| RowSnapshot {
            offset: chunk.offset(),
            end_offset: chunk.end_offset(),
            text: chunk.text().to_string(),
            rect: chunk.layout_rect(),
        })
        .collect()
}

fn view_node_ids(view: &DocumentView) -> Vec<NodeId> {
    view.block()
        .paragraphs()
        .iter()
        .map(|paragraph| paragraph.node())
        .collect()
}

fn random_insert(rng: &mut StdRng) -> &'static str {
    const PIECES: [&str; 8] = ["a", "word ", " ", "\n", "two\nlines", "\n\n", "longerwordhere", "你好"];
    PIECES[rng.gen_range(0..PIECES.len())]
}

#[test]
fn test_random_edits_match_fresh_layout() {
    let mut rng = StdRng::seed_from_u64(0x7e57_1a70);
    let mut document = TextDocument::new(
        "The quick brown fox jumps over the lazy dog.\nSecond line\n\nFourth paragraph here",
    );
    let mut view = DocumentView::new(&document, metrics());
    layout(&mut view);

    for step in 0..300 {
        let len = document.len_chars();
        let change = if len > 0 && rng.gen_bool(0.4) {
            let offset = rng.gen_range(0..len);
            let length = rng.gen_range(1..=(len - offset).min(12));
            document.delete_at(offset, length).unwrap()
        } else {
            let offset = rng.gen_range(0..=len);
            document.insert_at(offset, random_insert(&mut rng)).unwrap()
        };

        view.apply_change(&document, &change).unwrap();
        assert!(!view.is_layout_valid(), "step {step}");
        layout(&mut view);

        let mut fresh = DocumentView::new(&document, metrics());
        layout(&mut fresh);

        assert_eq!(snapshot(&view), snapshot(&fresh), "step {step}");
        assert_eq!(view_node_ids(&view), document.paragraph_ids().to_vec(), "step {step}");
        assert_eq!(check_partition(&view), Ok(()), "step {step}");
        assert_eq!(view.end_offset(), document.len_chars());
    }
}

#[test]
fn test_untouched_paragraphs_keep_their_rows() {
    let mut document = TextDocument::new("alpha beta gamma delta\nsecond\nthird paragraph text\nlast");
    let mut view = DocumentView::new(&document, metrics());
    layout(&mut view);

    let before: Vec<_> = view
        .block()
        .paragraphs()
        .iter()
        .map(|paragraph| (paragraph.node(), paragraph.chunks().to_vec()))
        .collect();

    let change = document.insert_at(25, "XYZ").unwrap();
    assert_eq!(change.nodes.len(), 1);
    assert_eq!(change.nodes[0].kind, EditKind::Changed);
    let touched = change.nodes[0].node;

    view.apply_change(&document, &change).unwrap();
    layout(&mut view);

    for (node, chunks) in &before {
        let index = view.block().paragraph_index(*node).unwrap();
        let after = view.block().paragraphs()[index].chunks();
        if *node == touched {
            assert_eq!(after[0].text(), "seXYZcond\n");
            continue;
        }
        assert_eq!(after.len(), chunks.len());
        for (old, new) in chunks.iter().zip(after) {
            assert!(old.start_position().same_anchor(new.start_position()));
            assert!(old.end_position().same_anchor(new.end_position()));
        }
    }

    // Rows after the edit moved by the inserted length.
    let third = view.block().paragraphs()[2].chunks();
    assert_eq!(third[0].offset(), 33);
}

#[test]
fn test_structural_changes_preserve_identity() {
    let mut document = TextDocument::new("one\ntwo\nthree");
    let mut view = DocumentView::new(&document, metrics());
    layout(&mut view);
    let ids = document.paragraph_ids().to_vec();

    // Split "two" into two paragraphs.
    let change = document.insert_at(5, "\n").unwrap();
    view.apply_change(&document, &change).unwrap();
    let after_split = view_node_ids(&view);
    assert_eq!(after_split.len(), 4);
    assert_eq!(after_split[0], ids[0]);
    assert_eq!(after_split[1], ids[1]);
    assert_eq!(after_split[3], ids[2]);

    // Join "one" with "t".
    let change = document.delete_at(3, 1).unwrap();
    view.apply_change(&document, &change).unwrap();
    layout(&mut view);
    let after_join = view_node_ids(&view);
    assert_eq!(after_join, vec![ids[0], after_split[2], ids[2]]);
    assert_eq!(document.paragraph_text(0).unwrap(), "onet\n");
    assert_eq!(check_partition(&view), Ok(()));
}

#[test]
fn test_each_edit_notifies_once() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut document = TextDocument::new("abc\ndef\nghi");
    let mut view = DocumentView::new(&document, metrics());
    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    view.on_invalidate(move || counter.set(counter.get() + 1));

    for edit in 1..=50 {
        let offset = rng.gen_range(0..=document.len_chars());
        let change = document.insert_at(offset, random_insert(&mut rng)).unwrap();
        view.apply_change(&document, &change).unwrap();
        assert_eq!(calls.get(), edit);
    }
}

#[test]
fn test_deleting_everything_leaves_one_empty_paragraph() {
    let mut document = TextDocument::new("one\ntwo\nthree\n");
    let mut view = DocumentView::new(&document, metrics());
    layout(&mut view);

    let change = document.delete_at(0, document.len_chars()).unwrap();
    view.apply_change(&document, &change).unwrap();
    layout(&mut view);

    assert_eq!(view.block().child_count(), 1);
    assert_eq!(view.end_offset(), 0);
    assert_eq!(view.desired_size(), Size::new(0.0, 15.0));
    assert_eq!(check_partition(&view), Ok(()));
}
