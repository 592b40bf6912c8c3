//! Rendering collaborator boundary.
//!
//! The engine never draws; it asks the host's renderer to redraw from the
//! current shape set and delegates hit-testing to it, since only the
//! renderer knows real device coordinates and stroke widths. Zoom and pan
//! live entirely on the renderer's side; the engine reads the scale at most
//! for adaptive handle sizing and never owns it.

use crate::shapes::{Shape, ShapeId};
use kurbo::Point;

/// Why a redraw is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawReason {
    /// Individual shapes changed; the host may diff or animate.
    Incremental,
    /// The whole collection was replaced; redraw from scratch.
    FullReplace,
}

/// Capabilities the engine consumes from the rendering side.
pub trait RenderHost {
    /// Redraw the surface from the full current shape set.
    fn request_redraw(&mut self, shapes: &[Shape], reason: RedrawReason);

    /// Report which shape, if any, lies under a point in shape space.
    fn hit_test(&self, pos: Point) -> Option<ShapeId>;

    /// Current view scale, for adaptive handle sizing.
    fn view_scale(&self) -> f64 {
        1.0
    }
}

/// Host that draws nothing and hits nothing. Useful for headless sessions
/// and as a placeholder while wiring a real renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderHost;

impl RenderHost for NullRenderHost {
    fn request_redraw(&mut self, _shapes: &[Shape], _reason: RedrawReason) {}

    fn hit_test(&self, _pos: Point) -> Option<ShapeId> {
        None
    }
}
