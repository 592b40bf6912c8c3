//! Annotink Core Library
//!
//! Interaction engine for 2D image annotation: an observable shape
//! collection, selection handling, an interaction-mode state machine, and an
//! outward event surface for host applications. Rendering and hit-testing
//! live behind the [`render::RenderHost`] boundary.

pub mod clipboard;
pub mod container;
pub mod engine;
pub mod events;
pub mod ids;
pub mod input;
pub mod mode;
pub mod render;
pub mod selection;
pub mod shapes;

pub use clipboard::ParseError;
pub use container::{ContainerEvent, Identified, ObservableContainer, ObserverId};
pub use engine::AnnotationEngine;
pub use events::{AnnotationEvent, EventBus, ListenerId};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use input::{EngineCommand, Gesture, KeyChord, Keymap, Modifiers, NavDirection};
pub use mode::{InteractionMode, ModeController};
pub use render::{NullRenderHost, RedrawReason, RenderHost};
pub use selection::SelectionSet;
pub use shapes::{Geometry, GeometryKind, Shape, ShapeId, ShapePayload};
