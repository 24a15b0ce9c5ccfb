//! Offset ↔ geometry mapping.

use pretty_assertions::assert_eq;
use std::rc::Rc;
use textview_core::{
    Bias, DocumentView, FixedMetrics, LayoutOptions, Point, Rect, Size, TextAlignment, TextDocument,
    TextView,
};

const TEXT: &str = "Hello World, Here I am. Can you see me? This is on the next line.\n\
                    Second paragraph.\n\
                    \n\
                    Last one";

fn laid_out(document: &TextDocument, width: f32) -> DocumentView {
    let mut view = DocumentView::new(document, Rc::new(FixedMetrics::new(11.0, 15.0)));
    let size = view.measure(Size::new(width, f32::INFINITY));
    view.arrange(Rect::new(10.0, 20.0, width, size.height));
    view
}

#[test]
fn test_first_character_rect() {
    let document = TextDocument::new("Hello");
    let view = laid_out(&document, 200.0);
    assert_eq!(
        view.model_to_view(0, Bias::Forward),
        Some(Rect::new(10.0, 20.0, 11.0, 15.0))
    );
}

#[test]
fn test_row_boundary_resolves_by_bias() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 200.0);

    let backward = view.model_to_view(18, Bias::Backward).unwrap();
    let forward = view.model_to_view(18, Bias::Forward).unwrap();
    assert_eq!(backward, Rect::new(208.0, 20.0, 0.0, 15.0));
    assert_eq!(forward, Rect::new(10.0, 35.0, 11.0, 15.0));
}

#[test]
fn test_every_offset_maps_to_a_rect() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 150.0);
    for offset in 0..=document.len_chars() {
        for bias in [Bias::Forward, Bias::Backward] {
            let rect = view.model_to_view(offset, bias);
            assert!(rect.is_some(), "offset {offset} ({bias:?}) has no rect");
        }
    }
    assert_eq!(view.model_to_view(document.len_chars() + 1, Bias::Forward), None);
}

#[test]
fn test_view_to_model_inverts_model_to_view() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 150.0);
    let text: Vec<char> = document.text().chars().collect();

    for (offset, ch) in text.iter().enumerate() {
        if *ch == '\n' {
            continue;
        }
        let rect = view.model_to_view(offset, Bias::Forward).unwrap();
        let probe = Point::new(rect.x + rect.width / 4.0, rect.y + rect.height / 2.0);
        assert_eq!(
            view.view_to_model(probe),
            Some((offset, Bias::Forward)),
            "offset {offset}"
        );
    }
}

#[test]
fn test_right_half_of_a_character_goes_to_the_next_slot() {
    let document = TextDocument::new("abcd");
    let view = laid_out(&document, 200.0);
    assert_eq!(
        view.view_to_model(Point::new(10.0 + 11.0 * 0.75, 25.0)),
        Some((1, Bias::Backward))
    );
}

#[test]
fn test_points_beside_a_row_clamp_to_its_edges() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 200.0);

    assert_eq!(view.view_to_model(Point::new(0.0, 25.0)), Some((0, Bias::Forward)));
    assert_eq!(view.view_to_model(Point::new(0.0, 40.0)), Some((18, Bias::Forward)));
    assert_eq!(view.view_to_model(Point::new(500.0, 25.0)), Some((18, Bias::Backward)));
    // Row 4 ("next line.\n"): right of the text lands before the line break.
    assert_eq!(view.view_to_model(Point::new(500.0, 70.0)), Some((65, Bias::Backward)));
}

#[test]
fn test_points_outside_the_document_fail() {
    let document = TextDocument::new("abc");
    let view = laid_out(&document, 200.0);
    assert_eq!(view.view_to_model(Point::new(15.0, 19.0)), None);
    assert_eq!(view.view_to_model(Point::new(15.0, 35.0)), None);
}

#[test]
fn test_empty_paragraph_maps_to_its_offset() {
    let document = TextDocument::new("ab\n\ncd");
    let view = laid_out(&document, 200.0);
    assert_eq!(
        view.model_to_view(3, Bias::Forward),
        Some(Rect::new(10.0, 35.0, 0.0, 15.0))
    );
    assert_eq!(view.view_to_model(Point::new(40.0, 40.0)), Some((3, Bias::Forward)));
}

#[test]
fn test_empty_document() {
    let document = TextDocument::empty();
    let view = laid_out(&document, 200.0);
    assert_eq!(
        view.model_to_view(0, Bias::Forward),
        Some(Rect::new(10.0, 20.0, 0.0, 15.0))
    );
    assert_eq!(view.desired_size(), Size::new(0.0, 15.0));
}

#[test]
fn test_right_alignment_moves_rects() {
    let document = TextDocument::new("abc");
    let options = LayoutOptions {
        alignment: TextAlignment::Right,
        ..LayoutOptions::default()
    };
    let mut view =
        DocumentView::with_options(&document, Rc::new(FixedMetrics::new(10.0, 15.0)), options);
    let size = view.measure(Size::new(100.0, f32::INFINITY));
    view.arrange(Rect::new(0.0, 0.0, 100.0, size.height));
    assert_eq!(
        view.model_to_view(0, Bias::Forward),
        Some(Rect::new(70.0, 0.0, 10.0, 15.0))
    );
    assert_eq!(view.view_to_model(Point::new(75.0, 5.0)), Some((1, Bias::Backward)));
}

#[test]
fn test_stale_layout_rejects_mapping() {
    let mut document = TextDocument::new("abc");
    let mut view = laid_out(&document, 200.0);
    let change = document.insert_at(1, "z").unwrap();
    view.apply_change(&document, &change).unwrap();

    assert_eq!(view.model_to_view(0, Bias::Forward), None);
    assert_eq!(view.view_to_model(Point::new(12.0, 22.0)), None);
}
