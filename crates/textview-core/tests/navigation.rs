//! Caret navigation across chunks, paragraphs and the document.

use pretty_assertions::assert_eq;
use std::rc::Rc;
use textview_core::{
    Bias, Caret, Direction, DocumentView, FixedMetrics, NavigationResult, Rect, Size, TextDocument,
    TextView,
};

const TEXT: &str = "Hello World, Here I am. Can you see me? This is on the next line.\n\
                    \n\
                    short\n\
                    A second wrapped paragraph with several words in it";

fn laid_out(document: &TextDocument, width: f32) -> DocumentView {
    let mut view = DocumentView::new(document, Rc::new(FixedMetrics::new(11.0, 15.0)));
    let size = view.measure(Size::new(width, f32::INFINITY));
    view.arrange(Rect::new(0.0, 0.0, width, size.height));
    view
}

#[test]
fn test_down_moves_exactly_one_line() {
    let document = TextDocument::new("Hello World, Here I am.");
    let view = laid_out(&document, 200.0);

    let before = view.model_to_view(2, Bias::Forward).unwrap();
    let (result, target) = view.navigate(Caret::forward(2), Direction::Down);
    assert_eq!(result, NavigationResult::Valid);
    let after = view.model_to_view(target.offset, target.bias).unwrap();

    assert_eq!((after.x - before.x, after.y - before.y), (0.0, 15.0));
}

#[test]
fn test_up_from_first_row_reports_boundary() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 200.0);
    assert_eq!(
        view.navigate_offset(5, Direction::Up),
        (NavigationResult::BoundaryChanged, 0)
    );
}

#[test]
fn test_down_from_last_row_reports_boundary() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 200.0);
    let len = document.len_chars();
    let (result, offset) = view.navigate_offset(len - 2, Direction::Down);
    assert_eq!((result, offset), (NavigationResult::BoundaryChanged, len));
}

#[test]
fn test_horizontal_edges_of_the_document() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 200.0);
    let len = document.len_chars();
    assert_eq!(
        view.navigate_offset(0, Direction::Left),
        (NavigationResult::BoundaryChanged, 0)
    );
    assert_eq!(
        view.navigate(Caret::backward(len), Direction::Right),
        (NavigationResult::BoundaryChanged, Caret::backward(len))
    );
}

#[test]
fn test_right_then_left_returns_to_start() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 200.0);

    for offset in 0..document.len_chars() {
        let (result, target) = view.navigate(Caret::forward(offset), Direction::Right);
        assert_eq!(result, NavigationResult::Valid, "right from {offset}");
        assert_eq!(target.offset, offset + 1);

        let (result, back) = view.navigate(target, Direction::Left);
        assert_eq!(result, NavigationResult::Valid, "left from {target:?}");
        assert_eq!(back.offset, offset);
    }
}

#[test]
fn test_right_walks_every_offset_once() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 120.0);

    let mut caret = Caret::forward(0);
    let mut visited = vec![0];
    loop {
        let (result, next) = view.navigate(caret, Direction::Right);
        if result == NavigationResult::BoundaryChanged {
            break;
        }
        assert_eq!(result, NavigationResult::Valid);
        visited.push(next.offset);
        caret = next;
    }
    let expected: Vec<usize> = (0..=document.len_chars()).collect();
    assert_eq!(visited, expected);
}

#[test]
fn test_vertical_moves_cross_paragraphs() {
    let document = TextDocument::new("first\n\nthird");
    let view = laid_out(&document, 200.0);

    assert_eq!(view.navigate_offset(2, Direction::Down), (NavigationResult::Valid, 6));
    assert_eq!(view.navigate_offset(6, Direction::Down), (NavigationResult::Valid, 7));
    assert_eq!(view.navigate_offset(9, Direction::Up), (NavigationResult::Valid, 6));
    assert_eq!(
        view.navigate(Caret::forward(6), Direction::Up),
        (NavigationResult::Valid, Caret::backward(5))
    );
}

#[test]
fn test_down_then_up_stays_in_column() {
    let document = TextDocument::new(TEXT);
    let view = laid_out(&document, 200.0);
    for offset in 0..10 {
        let (result, down) = view.navigate(Caret::forward(offset), Direction::Down);
        assert_eq!(result, NavigationResult::Valid);
        let (result, up) = view.navigate(down, Direction::Up);
        assert_eq!(result, NavigationResult::Valid);
        assert_eq!(up, Caret::forward(offset));
    }
}

#[test]
fn test_navigation_needs_a_valid_layout() {
    let document = TextDocument::new(TEXT);
    let mut view = laid_out(&document, 200.0);
    view.invalidate_layout();
    for direction in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
        assert_eq!(
            view.navigate_offset(3, direction),
            (NavigationResult::Invalid, 3)
        );
    }
}

#[test]
fn test_out_of_range_caret_is_invalid() {
    let document = TextDocument::new("abc");
    let view = laid_out(&document, 200.0);
    assert_eq!(
        view.navigate_offset(10, Direction::Right),
        (NavigationResult::Invalid, 10)
    );
}
