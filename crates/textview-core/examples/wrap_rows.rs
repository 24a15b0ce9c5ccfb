//! Row wrapping example
//!
//! Lays out a short document at a few widths and prints the resulting rows, then walks a
//! caret down through them.

use std::rc::Rc;
use textview_core::{
    Caret, Direction, FixedMetrics, NavigationResult, Rect, TextAlignment, TextSurface,
};

const TEXT: &str = "Hello World, Here I am. Can you see me? This is on the next line.\n\
                    \n\
                    A second paragraph, centred when asked to.";

fn print_rows(surface: &TextSurface) {
    for row in surface.rows() {
        println!(
            "  [{:>3}..{:>3}) p{} x={:>6.1} y={:>5.1} {:?}",
            row.offset, row.end_offset, row.paragraph, row.rect.x, row.rect.y, row.text
        );
    }
}

fn main() {
    let mut surface = TextSurface::new(TEXT, Rc::new(FixedMetrics::new(11.0, 15.0)));

    for width in [400.0, 200.0, 120.0] {
        let size = surface.layout(Rect::new(0.0, 0.0, width, 1000.0));
        println!("width {width}: {} x {}", size.width, size.height);
        print_rows(&surface);
    }

    println!("\ncentred at 200:");
    surface.view_mut().set_alignment(TextAlignment::Center);
    surface.layout(Rect::new(0.0, 0.0, 200.0, 1000.0));
    print_rows(&surface);

    println!("\ncaret walking down from offset 2:");
    let mut caret = Caret::forward(2);
    loop {
        let (result, next) = surface.move_caret(caret, Direction::Down);
        println!("  {:?} -> {:?} ({result:?})", caret, next);
        if result != NavigationResult::Valid {
            break;
        }
        caret = next;
    }

    println!("\nediting:");
    surface.subscribe(|change| {
        println!(
            "  version {}: {} node change(s) at offset {}",
            change.version,
            change.nodes.len(),
            change.offset
        );
    });
    if let Err(error) = surface.insert_at(24, "Still here. ") {
        eprintln!("edit failed: {error}");
        return;
    }
    surface.relayout();
    print_rows(&surface);
}
