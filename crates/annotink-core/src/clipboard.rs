//! Clipboard text codec.
//!
//! Shapes travel over the clipboard as a JSON array of identity-free
//! payloads. Decoding is all-or-nothing: any malformed entry fails the whole
//! paste and leaves the collection untouched.

use crate::shapes::{Shape, ShapePayload};
use thiserror::Error;

/// Clipboard decode failure.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("clipboard text is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("clipboard payload is not a shape list")]
    NotShapeList,
}

/// Serialize shapes to clipboard text. Returns `None` for an empty slice
/// (copying nothing is a no-op, not an error).
pub fn encode(shapes: &[Shape]) -> Option<String> {
    if shapes.is_empty() {
        return None;
    }
    let payloads: Vec<ShapePayload> = shapes.iter().map(Shape::payload).collect();
    // Payload types serialize infallibly.
    serde_json::to_string(&payloads).ok()
}

/// Parse clipboard text back into shape payloads.
pub fn decode(text: &str) -> Result<Vec<ShapePayload>, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(ParseError::NotShapeList);
    };
    entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).map_err(ParseError::Json))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Geometry, Shape, ShapeId};
    use kurbo::Point;
    use serde_json::json;

    fn sample() -> Shape {
        let mut shape = Shape::new(
            ShapeId::from("a"),
            Geometry::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 20.0)),
        );
        shape.properties.insert("class".to_string(), json!("tree"));
        shape
    }

    #[test]
    fn test_encode_empty_is_none() {
        assert!(encode(&[]).is_none());
    }

    #[test]
    fn test_roundtrip_preserves_content() {
        let shape = sample();
        let text = encode(std::slice::from_ref(&shape)).unwrap();
        let payloads = decode(&text).unwrap();

        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].geometry, shape.geometry);
        assert_eq!(payloads[0].properties, shape.properties);
    }

    #[test]
    fn test_malformed_text_fails() {
        assert!(matches!(decode("not json"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_non_list_fails() {
        assert!(matches!(
            decode(r#"{"kind":"marker","at":{"x":0.0,"y":0.0}}"#),
            Err(ParseError::NotShapeList)
        ));
    }

    #[test]
    fn test_one_bad_entry_fails_the_whole_list() {
        let text = r#"[{"geometry":{"kind":"marker","at":{"x":1.0,"y":2.0}}},{"geometry":42}]"#;
        assert!(decode(text).is_err());
    }
}
