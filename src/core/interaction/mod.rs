//! Pan, zoom, hover and click handling over a computed layout
//!
//! [`InteractionController`] is a small gesture state machine. Hosts feed it
//! [`InputEvent`]s in screen coordinates and get back [`Action`]s describing
//! what changed; the live [`ViewState`] is what the renderer paints with.

use crate::core::layout::{Layout, Point, ViewTransform, Viewport};
use serde::{Deserialize, Serialize};

/// Gesture tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Smallest allowed scale
    pub min_scale: f64,
    /// Largest allowed scale
    pub max_scale: f64,
    /// Wheel zoom factor is `2^(-delta_y * wheel_sensitivity)`
    pub wheel_sensitivity: f64,
    /// Screen pixels a press may travel and still count as a click
    pub click_threshold: f64,
    /// Radius of a hovered node, also the hit radius of every node
    pub hover_radius: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 5.0,
            wheel_sensitivity: 0.002,
            click_threshold: 3.0,
            hover_radius: 10.0,
        }
    }
}

/// Host input, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// A pointer (mouse button, finger) went down
    PointerDown {
        /// Pointer identifier
        pointer: u32,
        /// Screen position
        at: Point,
    },
    /// A pointer moved
    PointerMove {
        /// Pointer identifier
        pointer: u32,
        /// Screen position
        at: Point,
    },
    /// A pointer was released
    PointerUp {
        /// Pointer identifier
        pointer: u32,
        /// Screen position
        at: Point,
    },
    /// The host aborted a pointer
    PointerCancel {
        /// Pointer identifier
        pointer: u32,
    },
    /// Wheel or trackpad scroll
    Wheel {
        /// Screen position of the cursor
        at: Point,
        /// Vertical delta; negative zooms in
        delta_y: f64,
    },
    /// The container changed size
    Resize {
        /// New width
        width: f64,
        /// New height
        height: f64,
    },
}

/// Observable outcome of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// The view transform changed
    TransformChanged(ViewTransform),
    /// The hovered node changed (`None` when nothing is hovered)
    HoverChanged(Option<usize>),
    /// The drawing surface changed size
    SurfaceResized(Viewport),
    /// A node was clicked or picked by name
    NodeActivated(String),
}

/// Coarse gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureState {
    /// No pointer down
    Idle,
    /// One pointer down (a click until it travels past the threshold)
    Panning,
    /// Two pointers down
    Zooming,
}

/// Everything the renderer needs besides the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    /// Live pan/zoom
    pub transform: ViewTransform,
    /// Hovered node id
    pub hovered: Option<usize>,
    /// Current surface extents
    pub surface: Viewport,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    pointer: u32,
    /// Where the pointer went down; the click threshold is measured from here
    down_at: Point,
    /// Pan anchor, moved whenever the transform changes mid-press
    origin: Point,
    current: Point,
    start: ViewTransform,
    moved: bool,
    node: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Pinch {
    pointers: [(u32, Point); 2],
    start_distance: f64,
    start_world: Point,
    start_scale: f64,
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Idle,
    Panning(Press),
    Zooming(Pinch),
}

/// Gesture state machine bound to one layout.
#[derive(Debug, Clone)]
pub struct InteractionController {
    layout: Layout,
    config: InteractionConfig,
    transform: ViewTransform,
    surface: Viewport,
    hovered: Option<usize>,
    gesture: Gesture,
}

impl InteractionController {
    /// Bind a controller to `layout`, starting from its initial transform
    #[must_use]
    pub const fn new(layout: Layout, surface: Viewport, config: InteractionConfig) -> Self {
        Self {
            transform: layout.initial_transform,
            layout,
            config,
            surface,
            hovered: None,
            gesture: Gesture::Idle,
        }
    }

    /// Replace the layout, resetting transform, hover and any gesture in flight
    pub fn load(&mut self, layout: Layout) {
        self.transform = layout.initial_transform;
        self.layout = layout;
        self.hovered = None;
        self.gesture = Gesture::Idle;
    }

    /// The bound layout
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Live transform
    #[must_use]
    pub const fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Current surface extents
    #[must_use]
    pub const fn surface(&self) -> Viewport {
        self.surface
    }

    /// Hovered node id
    #[must_use]
    pub const fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Coarse gesture state
    #[must_use]
    pub const fn state(&self) -> GestureState {
        match self.gesture {
            Gesture::Idle => GestureState::Idle,
            Gesture::Panning(_) => GestureState::Panning,
            Gesture::Zooming(_) => GestureState::Zooming,
        }
    }

    /// Snapshot for the renderer
    #[must_use]
    pub const fn view_state(&self) -> ViewState {
        ViewState {
            transform: self.transform,
            hovered: self.hovered,
            surface: self.surface,
        }
    }

    /// Feed one event
    pub fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        match event {
            InputEvent::PointerDown { pointer, at } => self.on_down(pointer, at, &mut actions),
            InputEvent::PointerMove { pointer, at } => self.on_move(pointer, at, &mut actions),
            InputEvent::PointerUp { pointer, at } => self.on_up(pointer, at, &mut actions),
            InputEvent::PointerCancel { pointer } => self.on_cancel(pointer, &mut actions),
            InputEvent::Wheel { at, delta_y } => {
                let factor = (-delta_y * self.config.wheel_sensitivity).exp2();
                if let Some(action) = self.zoom_by(factor, at) {
                    actions.push(action);
                }
            }
            InputEvent::Resize { width, height } => {
                let surface = Viewport::new(width, height);
                if surface.is_valid() && surface != self.surface {
                    self.surface = surface;
                    actions.push(Action::SurfaceResized(surface));
                }
            }
        }
        actions
    }

    /// Multiply the scale by `factor` about a screen focal point, clamped to
    /// the configured range. Returns `None` when nothing changed.
    pub fn zoom_by(&mut self, factor: f64, focal: Point) -> Option<Action> {
        if !(factor.is_finite() && factor > 0.0) {
            return None;
        }
        let scale = self.clamp_scale(self.transform.scale * factor);
        if (scale - self.transform.scale).abs() < f64::EPSILON {
            return None;
        }
        let next = self.transform.rescaled_about(scale, focal);
        self.set_transform(next)
    }

    /// Activate a node by name, as if it had been clicked
    #[must_use]
    pub fn activate(&self, name: &str) -> Option<Action> {
        self.layout
            .node_by_name(name)
            .map(|node| Action::NodeActivated(node.name.clone()))
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }

    fn set_transform(&mut self, next: ViewTransform) -> Option<Action> {
        if next == self.transform {
            return None;
        }
        self.transform = next;
        // Gestures in flight continue from the new transform.
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning(press) => {
                press.start = next;
                press.origin = press.current;
            }
            Gesture::Zooming(pinch) => {
                let [(_, a), (_, b)] = pinch.pointers;
                pinch.start_distance = a.distance(b);
                pinch.start_world = next.invert(a.midpoint(b));
                pinch.start_scale = next.scale;
            }
        }
        Some(Action::TransformChanged(next))
    }

    fn node_at(&self, screen: Point) -> Option<usize> {
        let world = self.transform.invert(screen);
        self.layout
            .hit_test(world, self.config.hover_radius)
            .map(|node| node.id)
    }

    fn update_hover(&mut self, at: Point, actions: &mut Vec<Action>) {
        let hovered = self.node_at(at);
        if hovered != self.hovered {
            self.hovered = hovered;
            actions.push(Action::HoverChanged(hovered));
        }
    }

    fn start_pinch(&self, first: (u32, Point), second: (u32, Point)) -> Pinch {
        let mid = first.1.midpoint(second.1);
        Pinch {
            pointers: [first, second],
            start_distance: first.1.distance(second.1),
            start_world: self.transform.invert(mid),
            start_scale: self.transform.scale,
        }
    }

    fn on_down(&mut self, pointer: u32, at: Point, actions: &mut Vec<Action>) {
        match self.gesture {
            Gesture::Idle => {
                self.update_hover(at, actions);
                self.gesture = Gesture::Panning(Press {
                    pointer,
                    down_at: at,
                    origin: at,
                    current: at,
                    start: self.transform,
                    moved: false,
                    node: self.node_at(at),
                });
            }
            Gesture::Panning(press) if press.pointer != pointer => {
                let pinch = self.start_pinch((press.pointer, press.current), (pointer, at));
                self.gesture = Gesture::Zooming(pinch);
            }
            // Third finger or a repeated down: ignored.
            Gesture::Panning(_) | Gesture::Zooming(_) => {}
        }
    }

    fn on_move(&mut self, pointer: u32, at: Point, actions: &mut Vec<Action>) {
        match self.gesture {
            Gesture::Idle => self.update_hover(at, actions),
            Gesture::Panning(mut press) if press.pointer == pointer => {
                press.current = at;
                if !press.moved && press.down_at.distance(at) > self.config.click_threshold {
                    press.moved = true;
                }
                self.gesture = Gesture::Panning(press);
                if press.moved {
                    let next = press
                        .start
                        .translated(at.x - press.origin.x, at.y - press.origin.y);
                    if let Some(action) = self.set_transform(next) {
                        actions.push(action);
                    }
                } else {
                    self.update_hover(at, actions);
                }
            }
            Gesture::Zooming(mut pinch) => {
                let Some(slot) = pinch.pointers.iter().position(|(id, _)| *id == pointer) else {
                    return;
                };
                pinch.pointers[slot].1 = at;
                self.gesture = Gesture::Zooming(pinch);

                let [(_, a), (_, b)] = pinch.pointers;
                let distance = a.distance(b);
                if pinch.start_distance <= f64::EPSILON || distance <= f64::EPSILON {
                    return;
                }
                let scale = self.clamp_scale(pinch.start_scale * distance / pinch.start_distance);
                let mid = a.midpoint(b);
                let next = ViewTransform::new(
                    pinch.start_world.x.mul_add(-scale, mid.x),
                    pinch.start_world.y.mul_add(-scale, mid.y),
                    scale,
                );
                if next != self.transform {
                    // Keep the pinch anchored to where it started.
                    self.transform = next;
                    actions.push(Action::TransformChanged(next));
                }
            }
            Gesture::Panning(_) => {}
        }
    }

    fn on_up(&mut self, pointer: u32, at: Point, actions: &mut Vec<Action>) {
        match self.gesture {
            Gesture::Panning(press) if press.pointer == pointer => {
                self.gesture = Gesture::Idle;
                if press.moved || press.down_at.distance(at) > self.config.click_threshold {
                    return;
                }
                if let Some(id) = press.node.filter(|&id| Some(id) == self.node_at(at)) {
                    actions.push(Action::NodeActivated(self.layout.nodes[id].name.clone()));
                }
            }
            Gesture::Zooming(pinch) => self.end_pinch(pinch, pointer),
            Gesture::Idle | Gesture::Panning(_) => {}
        }
    }

    fn on_cancel(&mut self, pointer: u32, actions: &mut Vec<Action>) {
        match self.gesture {
            Gesture::Panning(press) if press.pointer == pointer => {
                self.gesture = Gesture::Idle;
                if self.hovered.take().is_some() {
                    actions.push(Action::HoverChanged(None));
                }
            }
            Gesture::Zooming(pinch) => self.end_pinch(pinch, pointer),
            Gesture::Idle | Gesture::Panning(_) => {}
        }
    }

    /// One finger of a pinch lifted: the other keeps panning, never clicks.
    fn end_pinch(&mut self, pinch: Pinch, pointer: u32) {
        let Some(slot) = pinch.pointers.iter().position(|(id, _)| *id == pointer) else {
            return;
        };
        let (remaining, at) = pinch.pointers[1 - slot];
        self.gesture = Gesture::Panning(Press {
            pointer: remaining,
            down_at: at,
            origin: at,
            current: at,
            start: self.transform,
            moved: true,
            node: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{NodeKind, TreeNode};

    fn controller() -> InteractionController {
        let tree = TreeNode::new("X", NodeKind::Root).with_child(
            TreeNode::new("A", NodeKind::Category)
                .with_child(TreeNode::new("A1", NodeKind::Annotation)),
        );
        let layout = Layout::compute(&tree, 1024.0, 768.0).unwrap();
        let viewport = layout.viewport;
        InteractionController::new(layout, viewport, InteractionConfig::default())
    }

    fn screen_of(ctrl: &InteractionController, name: &str) -> Point {
        let node = ctrl.layout().node_by_name(name).unwrap();
        ctrl.transform().apply(node.position)
    }

    fn down(at: Point) -> InputEvent {
        InputEvent::PointerDown { pointer: 1, at }
    }

    fn mv(at: Point) -> InputEvent {
        InputEvent::PointerMove { pointer: 1, at }
    }

    fn up(at: Point) -> InputEvent {
        InputEvent::PointerUp { pointer: 1, at }
    }

    #[test]
    fn test_starts_at_initial_transform() {
        let ctrl = controller();
        assert_eq!(ctrl.transform(), ViewTransform::new(80.0, 50.0, 0.75));
        assert_eq!(ctrl.state(), GestureState::Idle);
    }

    #[test]
    fn test_click_activates_node() {
        let mut ctrl = controller();
        let at = screen_of(&ctrl, "A1");
        ctrl.handle(down(at));
        assert_eq!(ctrl.state(), GestureState::Panning);
        let nudge = Point::new(at.x + 1.0, at.y + 1.0);
        assert!(ctrl.handle(mv(nudge)).iter().all(|a| !matches!(a, Action::TransformChanged(_))));
        let actions = ctrl.handle(up(nudge));
        assert_eq!(actions, vec![Action::NodeActivated("A1".to_string())]);
        assert_eq!(ctrl.state(), GestureState::Idle);
    }

    #[test]
    fn test_drag_past_threshold_is_pan() {
        let mut ctrl = controller();
        let at = screen_of(&ctrl, "A");
        let before = ctrl.transform();
        ctrl.handle(down(at));
        let far = Point::new(at.x + 40.0, at.y - 10.0);
        let actions = ctrl.handle(mv(far));
        assert!(actions.iter().any(|a| matches!(a, Action::TransformChanged(_))));
        // Dragging back onto the node still doesn't click.
        ctrl.handle(mv(at));
        let actions = ctrl.handle(up(at));
        assert!(actions.iter().all(|a| !matches!(a, Action::NodeActivated(_))));
        assert_eq!(ctrl.transform(), before);
    }

    #[test]
    fn test_wheel_mid_press_keeps_click_threshold() {
        let mut ctrl = controller();
        let at = screen_of(&ctrl, "A1");
        ctrl.handle(down(at));
        let halfway = Point::new(at.x + 2.5, at.y);
        ctrl.handle(mv(halfway));
        let zoom = ctrl.handle(InputEvent::Wheel {
            at: halfway,
            delta_y: -1.0,
        });
        assert_eq!(zoom.len(), 1);

        // 5 px from the press in total, though only 2.5 px since the wheel.
        let end = Point::new(at.x + 5.0, at.y);
        let actions = ctrl.handle(mv(end));
        assert!(actions.iter().any(|a| matches!(a, Action::TransformChanged(_))));
        let actions = ctrl.handle(up(end));
        assert!(actions.iter().all(|a| !matches!(a, Action::NodeActivated(_))));
    }

    #[test]
    fn test_pan_translates() {
        let mut ctrl = controller();
        let start = Point::new(500.0, 600.0);
        ctrl.handle(down(start));
        ctrl.handle(mv(Point::new(530.0, 580.0)));
        ctrl.handle(up(Point::new(530.0, 580.0)));
        assert_eq!(ctrl.transform(), ViewTransform::new(110.0, 30.0, 0.75));
    }

    #[test]
    fn test_zoom_clamps_high() {
        let mut ctrl = controller();
        ctrl.zoom_by(8.0, Point::new(100.0, 100.0));
        assert!((ctrl.transform().scale - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_clamps_low() {
        let mut ctrl = controller();
        // 0.75 * 2^-10 is well below the floor.
        ctrl.handle(InputEvent::Wheel {
            at: Point::new(10.0, 10.0),
            delta_y: 5000.0,
        });
        assert!((ctrl.transform().scale - 0.1).abs() < f64::EPSILON);
        assert!(ctrl.zoom_by(0.5, Point::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_wheel_zoom_keeps_point_under_cursor() {
        let mut ctrl = controller();
        let cursor = Point::new(300.0, 200.0);
        let world = ctrl.transform().invert(cursor);
        let actions = ctrl.handle(InputEvent::Wheel {
            at: cursor,
            delta_y: -100.0,
        });
        assert_eq!(actions.len(), 1);
        let t = ctrl.transform();
        assert!((t.scale - 0.75 * 0.2f64.exp2()).abs() < 1e-12);
        assert!(t.apply(world).distance(cursor) < 1e-9);
    }

    #[test]
    fn test_resize_keeps_transform() {
        let mut ctrl = controller();
        let before = ctrl.transform();
        let actions = ctrl.handle(InputEvent::Resize {
            width: 400.0,
            height: 300.0,
        });
        assert_eq!(
            actions,
            vec![Action::SurfaceResized(Viewport::new(400.0, 300.0))]
        );
        assert_eq!(ctrl.surface(), Viewport::new(400.0, 300.0));
        assert_eq!(ctrl.transform(), before);
        // Idempotent
        assert!(ctrl
            .handle(InputEvent::Resize {
                width: 400.0,
                height: 300.0
            })
            .is_empty());
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let mut ctrl = controller();
        let a = ctrl.layout().node_by_name("A").unwrap().id;
        let at = screen_of(&ctrl, "A");
        assert_eq!(
            ctrl.handle(mv(at)),
            vec![Action::HoverChanged(Some(a))]
        );
        assert_eq!(ctrl.hovered(), Some(a));
        assert!(ctrl.handle(mv(at)).is_empty());
        let actions = ctrl.handle(mv(Point::new(at.x, at.y + 200.0)));
        assert_eq!(actions, vec![Action::HoverChanged(None)]);
    }

    #[test]
    fn test_pinch_zoom_never_activates() {
        let mut ctrl = controller();
        let at = screen_of(&ctrl, "A");
        ctrl.handle(down(at));
        ctrl.handle(InputEvent::PointerDown {
            pointer: 2,
            at: Point::new(at.x + 100.0, at.y),
        });
        assert_eq!(ctrl.state(), GestureState::Zooming);
        ctrl.handle(InputEvent::PointerMove {
            pointer: 2,
            at: Point::new(at.x + 200.0, at.y),
        });
        assert!((ctrl.transform().scale - 1.5).abs() < 1e-9);

        ctrl.handle(InputEvent::PointerUp {
            pointer: 2,
            at: Point::new(at.x + 200.0, at.y),
        });
        assert_eq!(ctrl.state(), GestureState::Panning);
        let actions = ctrl.handle(up(at));
        assert!(actions.is_empty());
        assert_eq!(ctrl.state(), GestureState::Idle);
    }

    #[test]
    fn test_load_resets() {
        let mut ctrl = controller();
        ctrl.zoom_by(2.0, Point::new(0.0, 0.0));
        ctrl.handle(down(Point::new(1.0, 1.0)));

        let tree = TreeNode::new("Solo", NodeKind::Root);
        ctrl.load(Layout::compute(&tree, 1024.0, 768.0).unwrap());
        assert_eq!(ctrl.state(), GestureState::Idle);
        assert_eq!(ctrl.transform(), ViewTransform::new(80.0, 50.0, 0.75));
        assert_eq!(ctrl.layout().nodes.len(), 1);
    }

    #[test]
    fn test_activate_by_name() {
        let ctrl = controller();
        assert_eq!(
            ctrl.activate("A1"),
            Some(Action::NodeActivated("A1".to_string()))
        );
        assert!(ctrl.activate("nope").is_none());
    }

    #[test]
    fn test_events_from_json() {
        let json = r#"[
            {"type": "pointer_down", "pointer": 1, "at": {"x": 1.0, "y": 2.0}},
            {"type": "wheel", "at": {"x": 0.0, "y": 0.0}, "delta_y": -120.0},
            {"type": "resize", "width": 800.0, "height": 600.0}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[2],
            InputEvent::Resize {
                width: 800.0,
                height: 600.0
            }
        );
    }
}
