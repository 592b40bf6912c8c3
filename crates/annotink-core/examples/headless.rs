//! Headless host-integration demo.
//!
//! Drives the engine the way a UI shell would: a tiny render host that
//! hit-tests against shape bounds, a couple of creation gestures, keyboard
//! navigation, and a copy/paste round trip. Run with:
//!
//! ```sh
//! RUST_LOG=debug cargo run -p annotink-core --example headless
//! ```

use annotink_core::{
    AnnotationEngine, Gesture, GeometryKind, InteractionMode, Modifiers, RedrawReason, RenderHost,
    Shape, ShapeId,
};
use kurbo::Point;

/// Render host that "draws" to stdout and hit-tests against shape bounds.
#[derive(Default)]
struct ConsoleHost {
    shapes: Vec<Shape>,
}

impl RenderHost for ConsoleHost {
    fn request_redraw(&mut self, shapes: &[Shape], reason: RedrawReason) {
        self.shapes = shapes.to_vec();
        println!("redraw ({reason:?}): {} shape(s)", shapes.len());
    }

    fn hit_test(&self, pos: Point) -> Option<ShapeId> {
        // Front-most wins, as a real renderer would resolve overlaps.
        self.shapes
            .iter()
            .rev()
            .find(|shape| shape.bounds().contains(pos))
            .map(|shape| shape.id.clone())
    }
}

fn main() {
    env_logger::init();

    let mut engine = AnnotationEngine::new(ConsoleHost::default());
    engine.subscribe(|event| println!("event: {event:?}"));

    // Draw two boxes and a marker.
    engine.set_mode(InteractionMode::Create);
    drag(&mut engine, Point::new(10.0, 10.0), Point::new(60.0, 40.0));
    drag(&mut engine, Point::new(80.0, 20.0), Point::new(140.0, 70.0));
    engine.set_create_kind(GeometryKind::Marker);
    drag(&mut engine, Point::new(100.0, 100.0), Point::new(100.0, 100.0));

    // Select the first box by clicking it, then cycle with Tab.
    engine.set_mode(InteractionMode::Edit);
    click(&mut engine, Point::new(30.0, 20.0));
    engine.key("Tab", Modifiers::NONE);
    engine.key("Tab", Modifiers::SHIFT);

    // Round-trip the selection through the clipboard.
    if let Some(text) = engine.copy() {
        println!("clipboard: {text}");
        match engine.paste(&text) {
            Ok(ids) => println!("pasted {} shape(s)", ids.len()),
            Err(err) => eprintln!("paste failed: {err}"),
        }
    }

    // Delete whatever is selected.
    engine.key("Delete", Modifiers::NONE);
    println!("final count: {}", engine.shape_count());
}

fn drag(engine: &mut AnnotationEngine<ConsoleHost>, from: Point, to: Point) {
    engine.pointer(Gesture::Begin { pos: from }, Modifiers::NONE);
    engine.pointer(
        Gesture::Move {
            pos: from.midpoint(to),
        },
        Modifiers::NONE,
    );
    engine.pointer(Gesture::End { pos: to }, Modifiers::NONE);
}

fn click(engine: &mut AnnotationEngine<ConsoleHost>, at: Point) {
    engine.pointer(Gesture::Begin { pos: at }, Modifiers::NONE);
    engine.pointer(Gesture::End { pos: at }, Modifiers::NONE);
}
