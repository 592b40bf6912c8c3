//! The annotation interaction engine.
//!
//! [`AnnotationEngine`] owns the shape collection, the selection, the mode
//! state machine and the outward event bus, and translates phased pointer
//! gestures and key commands into container mutations. All mutation is
//! synchronous on the caller's thread; queued events are flushed to
//! listeners once per public call, after the mutation has fully applied.

use crate::clipboard::{self, ParseError};
use crate::container::{ContainerEvent, ObservableContainer, ObserverId};
use crate::events::{AnnotationEvent, EventBus, ListenerId};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::input::{EngineCommand, Gesture, Keymap, Modifiers, NavDirection};
use crate::mode::{InteractionMode, ModeController};
use crate::render::{RedrawReason, RenderHost};
use crate::selection::SelectionSet;
use crate::shapes::{Geometry, GeometryKind, Shape, ShapeId};
use kurbo::Point;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Polygon vertices closer than this to the previous one are dropped.
const MIN_VERTEX_SPACING: f64 = 2.0;

/// Geometry accumulated for an in-progress shape construction.
#[derive(Debug, Clone)]
struct Draft {
    kind: GeometryKind,
    points: Vec<Point>,
}

impl Draft {
    fn new(kind: GeometryKind, start: Point) -> Self {
        Self {
            kind,
            points: vec![start],
        }
    }

    fn push(&mut self, pos: Point) {
        match self.kind {
            // Two-point geometry: the latest position replaces the previous
            // endpoint.
            GeometryKind::Box | GeometryKind::Marker => {
                if self.points.len() < 2 {
                    self.points.push(pos);
                } else {
                    self.points[1] = pos;
                }
            }
            GeometryKind::Polygon => {
                let far_enough = self
                    .points
                    .last()
                    .is_none_or(|last| last.distance(pos) > MIN_VERTEX_SPACING);
                if far_enough {
                    self.points.push(pos);
                }
            }
        }
    }

    /// Finished geometry, or `None` when the accumulated points are
    /// degenerate (zero-area box, polygon with under three vertices).
    fn finish(self) -> Option<Geometry> {
        match self.kind {
            GeometryKind::Box => {
                let first = *self.points.first()?;
                let last = *self.points.last()?;
                if first == last {
                    return None;
                }
                Some(Geometry::from_corners(first, last))
            }
            GeometryKind::Marker => Some(Geometry::Marker {
                at: *self.points.last()?,
            }),
            GeometryKind::Polygon => {
                if self.points.len() < 3 {
                    return None;
                }
                Some(Geometry::Polygon {
                    vertices: self.points,
                })
            }
        }
    }
}

/// An in-flight drag of the current selection.
#[derive(Debug, Clone, Copy)]
struct DragState {
    last: Point,
    moved: bool,
}

/// Orchestrates creation, selection, navigation, deletion and clipboard
/// transfer over an observable shape collection.
///
/// The collection and selection are owned exclusively by the engine; hosts
/// mutate them only through the engine's operations, which keeps the
/// selection a subset of the live collection at every observable point.
pub struct AnnotationEngine<H: RenderHost> {
    shapes: ObservableContainer<Shape>,
    selection: SelectionSet,
    mode: ModeController,
    draft: Option<Draft>,
    drag: Option<DragState>,
    create_kind: GeometryKind,
    ids: Box<dyn IdGenerator>,
    retired: HashSet<ShapeId>,
    bus: EventBus,
    keymap: Keymap,
    host: H,
}

impl<H: RenderHost> fmt::Debug for AnnotationEngine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationEngine")
            .field("shapes", &self.shapes.len())
            .field("selected", &self.selection.len())
            .field("mode", &self.mode.current())
            .finish()
    }
}

impl<H: RenderHost> AnnotationEngine<H> {
    /// Engine with random uuid ids.
    pub fn new(host: H) -> Self {
        Self::with_id_generator(host, Box::new(UuidGenerator))
    }

    /// Engine with a caller-supplied id source.
    pub fn with_id_generator(host: H, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            shapes: ObservableContainer::new(),
            selection: SelectionSet::new(),
            mode: ModeController::new(),
            draft: None,
            drag: None,
            create_kind: GeometryKind::default(),
            ids,
            retired: HashSet::new(),
            bus: EventBus::new(),
            keymap: Keymap::default(),
            host,
        }
    }

    // --- outward surface -------------------------------------------------

    /// Register an event listener, invoked in subscription order.
    pub fn subscribe(&mut self, listener: impl FnMut(&AnnotationEvent) + 'static) -> ListenerId {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.bus.unsubscribe(id);
    }

    /// Observe structural changes of the shape collection directly.
    pub fn observe_shapes(
        &mut self,
        observer: impl FnMut(&ContainerEvent<Shape>) + 'static,
    ) -> ObserverId {
        self.shapes.subscribe(observer)
    }

    pub fn unobserve_shapes(&mut self, id: ObserverId) {
        self.shapes.unsubscribe(id);
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    // --- shapes and selection accessors ----------------------------------

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn get_shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn selected_ids(&self) -> &[ShapeId] {
        self.selection.ids()
    }

    pub fn selected_shapes(&self) -> Vec<&Shape> {
        self.shapes
            .iter()
            .filter(|shape| self.selection.has(&shape.id))
            .collect()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode.current()
    }

    pub fn create_kind(&self) -> GeometryKind {
        self.create_kind
    }

    /// Geometry kind the next creation gesture will produce.
    pub fn set_create_kind(&mut self, kind: GeometryKind) {
        self.create_kind = kind;
    }

    /// Whether a shape construction is currently in progress.
    pub fn is_creating(&self) -> bool {
        self.draft.is_some()
    }

    // --- bulk operations --------------------------------------------------

    /// Replace the whole collection atomically.
    ///
    /// The selection is cleared silently and any in-progress construction or
    /// drag is discarded; the render host is cued to redraw from scratch.
    /// No per-shape create or delete events are emitted.
    pub fn set_shapes(&mut self, shapes: Vec<Shape>) {
        for id in self.shapes.ids() {
            self.retired.insert(id.clone());
        }
        self.selection.clear();
        self.draft = None;
        self.drag = None;
        self.shapes.set(shapes);
        self.request_redraw(RedrawReason::FullReplace);
        self.bus.flush();
    }

    /// Set the selection programmatically. Non-member ids are dropped.
    /// Ignored while interaction is disabled, since nothing is targetable.
    pub fn set_selected_ids(&mut self, ids: Vec<ShapeId>) {
        if self.mode.current() == InteractionMode::None {
            log::debug!("selection change ignored while interaction is disabled");
            return;
        }
        self.apply_selection(ids);
        self.bus.flush();
    }

    /// Merge properties into a shape, emitting one update event. Unknown
    /// ids are ignored.
    pub fn update_properties(&mut self, id: &ShapeId, properties: Map<String, Value>) {
        let Some(shape) = self.shapes.get_mut(id) else {
            log::debug!("property update for unknown shape {id} ignored");
            return;
        };
        for (key, value) in properties {
            shape.properties.insert(key, value);
        }
        self.bus.emit(AnnotationEvent::Updated(vec![id.clone()]));
        self.request_redraw(RedrawReason::Incremental);
        self.bus.flush();
    }

    // --- mode -------------------------------------------------------------

    /// Transition the interaction mode. A no-op (and no event) when the
    /// mode is unchanged.
    ///
    /// Leaving `create` mid-construction discards the incomplete shape;
    /// entering `none` clears the selection so nothing stays targetable.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        let Some(new_mode) = self.mode.set(mode) else {
            return;
        };
        if self.draft.take().is_some() {
            log::debug!("discarding in-progress shape on mode change");
        }
        self.drag = None;
        self.bus.emit(AnnotationEvent::ModeChanged(new_mode));
        if new_mode == InteractionMode::None && self.selection.clear() {
            self.bus
                .emit(AnnotationEvent::SelectionChanged(Vec::new()));
            self.request_redraw(RedrawReason::Incremental);
        }
        self.bus.flush();
    }

    // --- gestures ---------------------------------------------------------

    /// Feed one pointer gesture. Gestures a mode does not accept are
    /// silently ignored, since gestures are inherently racy against mode
    /// changes.
    pub fn pointer(&mut self, gesture: Gesture, modifiers: Modifiers) {
        match self.mode.current() {
            InteractionMode::Create => self.creation_gesture(gesture),
            InteractionMode::Edit => self.edit_gesture(gesture, modifiers),
            InteractionMode::None => {
                log::trace!("pointer gesture ignored while interaction is disabled");
            }
        }
        self.bus.flush();
    }

    fn creation_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Begin { pos } => {
                self.draft = Some(Draft::new(self.create_kind, pos));
            }
            Gesture::Move { pos } => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.push(pos);
                }
            }
            Gesture::End { pos } => {
                let Some(mut draft) = self.draft.take() else {
                    return;
                };
                draft.push(pos);
                match draft.finish() {
                    Some(geometry) => self.commit_shape(geometry),
                    None => log::debug!("discarding degenerate draft"),
                }
                // Creation mode stays active for the next shape.
            }
        }
    }

    fn commit_shape(&mut self, geometry: Geometry) {
        let id = self.mint_id();
        let shape = Shape::new(id, geometry);
        self.shapes.add(shape.clone());
        self.bus.emit(AnnotationEvent::Created(shape));
        self.request_redraw(RedrawReason::Incremental);
    }

    fn edit_gesture(&mut self, gesture: Gesture, modifiers: Modifiers) {
        match gesture {
            Gesture::Begin { pos } => {
                // Hits referring to ids no longer in the collection are
                // stale and dropped.
                let hit = self
                    .host
                    .hit_test(pos)
                    .filter(|id| self.shapes.has(id));
                match hit {
                    Some(id) if modifiers.shift => {
                        let shapes = &self.shapes;
                        if self.selection.toggle(id, |id| shapes.has(id)) {
                            self.emit_selection();
                        }
                    }
                    Some(id) => {
                        // A plain press on an already-selected shape keeps
                        // the selection so the whole group can be dragged.
                        if !self.selection.has(&id) {
                            self.apply_selection(vec![id]);
                        }
                        self.drag = Some(DragState {
                            last: pos,
                            moved: false,
                        });
                    }
                    None => {
                        if !modifiers.shift && self.selection.clear() {
                            self.emit_selection();
                        }
                    }
                }
            }
            Gesture::Move { pos } => {
                if let Some(drag) = self.drag.as_mut() {
                    let delta = pos - drag.last;
                    drag.last = pos;
                    if delta.x != 0.0 || delta.y != 0.0 {
                        drag.moved = true;
                        for id in self.selection.ids().to_vec() {
                            if let Some(shape) = self.shapes.get_mut(&id) {
                                shape.translate(delta);
                            }
                        }
                        self.request_redraw(RedrawReason::Incremental);
                    }
                }
            }
            Gesture::End { .. } => {
                if let Some(drag) = self.drag.take() {
                    if drag.moved && !self.selection.is_empty() {
                        self.bus
                            .emit(AnnotationEvent::Updated(self.selection.ids().to_vec()));
                        self.request_redraw(RedrawReason::Incremental);
                    }
                }
            }
        }
    }

    // --- keyboard ---------------------------------------------------------

    /// Feed one key press through the keymap. Returns whether the key was
    /// consumed.
    pub fn key(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let Some(command) = self.keymap.resolve(key, modifiers) else {
            return false;
        };
        match command {
            EngineCommand::NavigateForward => self.navigate(NavDirection::Forward),
            EngineCommand::NavigateBackward => self.navigate(NavDirection::Backward),
            EngineCommand::DeleteSelection => self.delete_selection(),
            EngineCommand::ClearSelection => self.clear_selection(),
            EngineCommand::SelectAll => self.select_all(),
        }
        true
    }

    /// Step the selection through the collection's insertion order, wrapping
    /// at the ends. A no-op on an empty collection and outside `edit` mode.
    ///
    /// With no current selection the step starts from index 0; with several
    /// shapes selected, the smallest insertion index anchors the step.
    pub fn navigate(&mut self, direction: NavDirection) {
        if !self.mode.current().accepts_selection() {
            log::trace!("navigation ignored in {:?} mode", self.mode.current());
            return;
        }
        let len = self.shapes.len();
        if len == 0 {
            return;
        }
        let anchor = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.shapes.index_of(id))
            .min()
            .unwrap_or(0);
        let next = match direction {
            NavDirection::Forward => (anchor + 1) % len,
            NavDirection::Backward => (anchor + len - 1) % len,
        };
        let Some(target) = self.shapes.at(next) else {
            return;
        };
        let target = target.id.clone();
        self.apply_selection(vec![target]);
        self.bus.flush();
    }

    /// Remove every selected shape from the collection and empty the
    /// selection, as one logical change: one delete event carrying all
    /// removed ids and one selection event.
    pub fn delete_selection(&mut self) {
        let ids = self.selection.ids().to_vec();
        if ids.is_empty() {
            return;
        }
        // Selection empties before the first shape leaves the collection,
        // so no observer sees a deleted id still selected.
        self.selection.clear();
        for id in &ids {
            if self.shapes.delete(id).is_some() {
                self.retired.insert(id.clone());
            }
        }
        self.drag = None;
        log::debug!("deleted {} shape(s)", ids.len());
        self.bus.emit(AnnotationEvent::Deleted(ids));
        self.bus.emit(AnnotationEvent::SelectionChanged(Vec::new()));
        self.request_redraw(RedrawReason::Incremental);
        self.bus.flush();
    }

    /// Clear the selection without touching the collection. In `create`
    /// mode this instead cancels any in-progress construction. Calling
    /// again with nothing to clear emits nothing.
    pub fn clear_selection(&mut self) {
        if self.mode.current() == InteractionMode::Create {
            if self.draft.take().is_some() {
                log::debug!("creation cancelled");
            }
            return;
        }
        if self.selection.clear() {
            self.emit_selection();
        }
        self.bus.flush();
    }

    /// Select every shape in the collection.
    pub fn select_all(&mut self) {
        if !self.mode.current().accepts_selection() {
            return;
        }
        let all: Vec<ShapeId> = self.shapes.ids().cloned().collect();
        self.apply_selection(all);
        self.bus.flush();
    }

    // --- clipboard --------------------------------------------------------

    /// Serialize the selected shapes to clipboard text, in collection
    /// order. `None` when nothing is selected.
    pub fn copy(&self) -> Option<String> {
        let selected: Vec<Shape> = self
            .shapes
            .iter()
            .filter(|shape| self.selection.has(&shape.id))
            .cloned()
            .collect();
        clipboard::encode(&selected)
    }

    /// Parse clipboard text and add every contained shape under a fresh id,
    /// emitting the normal create events. All-or-nothing: on parse failure
    /// the collection is left unchanged.
    pub fn paste(&mut self, text: &str) -> Result<Vec<ShapeId>, ParseError> {
        let payloads = clipboard::decode(text)?;
        let mut new_ids = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let id = self.mint_id();
            let shape = payload.into_shape(id.clone());
            self.shapes.add(shape.clone());
            self.bus.emit(AnnotationEvent::Created(shape));
            new_ids.push(id);
        }
        if !new_ids.is_empty() {
            self.request_redraw(RedrawReason::Incremental);
        }
        self.bus.flush();
        Ok(new_ids)
    }

    // --- internals --------------------------------------------------------

    /// Next id that collides with neither a live nor a retired id. Retired
    /// ids stay reserved for the whole session so listeners holding an id
    /// never see it alias a different shape.
    fn mint_id(&mut self) -> ShapeId {
        loop {
            let id = self.ids.next_id();
            if !self.shapes.has(&id) && !self.retired.contains(&id) {
                return id;
            }
            log::warn!("id collision on {id}, re-rolling");
        }
    }

    fn apply_selection(&mut self, ids: Vec<ShapeId>) {
        let shapes = &self.shapes;
        if self.selection.replace(ids, |id| shapes.has(id)) {
            self.emit_selection();
        }
    }

    fn emit_selection(&mut self) {
        self.bus.emit(AnnotationEvent::SelectionChanged(
            self.selection.ids().to_vec(),
        ));
        self.request_redraw(RedrawReason::Incremental);
    }

    fn request_redraw(&mut self, reason: RedrawReason) {
        let snapshot: Vec<Shape> = self.shapes.iter().cloned().collect();
        self.host.request_redraw(&snapshot, reason);
    }
}
