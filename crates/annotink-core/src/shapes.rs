//! Shape data model for the annotation surface.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Unique identifier of a shape within a session.
///
/// Ids are opaque strings minted by an [`IdGenerator`](crate::ids::IdGenerator)
/// and are never reassigned to a different shape while the session lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The kind of geometry a shape carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    #[default]
    Box,
    Polygon,
    Marker,
}

/// Geometry payload of a shape.
///
/// Containers treat this as opaque data; only the engine constructs it from
/// gestures and translates it during drag-move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    /// Axis-aligned box.
    Box { rect: Rect },
    /// Closed polygon with at least three vertices.
    Polygon { vertices: Vec<Point> },
    /// Single point of interest.
    Marker { at: Point },
}

impl Geometry {
    /// Box geometry from two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Geometry::Box {
            rect: Rect::from_points(a, b),
        }
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Box { .. } => GeometryKind::Box,
            Geometry::Polygon { .. } => GeometryKind::Polygon,
            Geometry::Marker { .. } => GeometryKind::Marker,
        }
    }

    /// Bounding rectangle of the geometry.
    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Box { rect } => *rect,
            Geometry::Polygon { vertices } => {
                let mut bounds: Option<Rect> = None;
                for v in vertices {
                    let r = Rect::from_points(*v, *v);
                    bounds = Some(match bounds {
                        Some(b) => b.union(r),
                        None => r,
                    });
                }
                bounds.unwrap_or(Rect::ZERO)
            }
            Geometry::Marker { at } => Rect::from_points(*at, *at),
        }
    }

    /// Translate the geometry by a delta in shape space.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Geometry::Box { rect } => *rect = *rect + delta,
            Geometry::Polygon { vertices } => {
                for v in vertices.iter_mut() {
                    *v = *v + delta;
                }
            }
            Geometry::Marker { at } => *at = *at + delta,
        }
    }
}

/// An identified geometric annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Session-unique identifier, immutable after creation.
    pub id: ShapeId,
    /// Geometry payload.
    pub geometry: Geometry,
    /// Arbitrary host-defined properties (class labels, colors, notes).
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Shape {
    pub fn new(id: ShapeId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            properties: Map::new(),
        }
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.geometry.translate(delta);
    }

    /// Identity-free content of this shape, for clipboard transfer.
    pub fn payload(&self) -> ShapePayload {
        ShapePayload {
            geometry: self.geometry.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// Shape content without identity; the unit of clipboard transfer.
///
/// Re-materializing a payload always mints a fresh id, so pasted shapes never
/// alias the shapes they were copied from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapePayload {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl ShapePayload {
    pub fn into_shape(self, id: ShapeId) -> Shape {
        Shape {
            id,
            geometry: self.geometry,
            properties: self.properties,
        }
    }
}
