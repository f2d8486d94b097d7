//! Drag / pinch / wheel classification.
//!
//! One state machine for mouse, touch and wheel input: `idle -> rotating |
//! zooming -> idle`. The controller never touches the camera itself; it
//! turns input into [`CameraCommand`]s for the state owner to apply.

use foundation::math::Vec2;
use foundation::time::Time;
use tracing::debug;

use crate::config::GlobeConfig;
use crate::projection::CameraCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i32),
}

impl MouseButton {
    /// DOM `MouseEvent.button` numbering.
    pub fn from_index(button: i32) -> Self {
        match button {
            0 => MouseButton::Primary,
            1 => MouseButton::Auxiliary,
            2 => MouseButton::Secondary,
            other => MouseButton::Other(other),
        }
    }
}

/// Unit of a wheel delta (DOM `WheelEvent.deltaMode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelDeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Input normalized at the host boundary.
///
/// Touch events carry every touch still on the surface after the event,
/// so `TouchEnd { touches: vec![] }` means the last finger lifted.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Vec2, button: MouseButton },
    PointerMove { position: Vec2 },
    PointerUp { position: Vec2 },
    Wheel { delta_y: f64, mode: WheelDeltaMode },
    TouchStart { touches: Vec<Vec2> },
    TouchMove { touches: Vec<Vec2> },
    TouchEnd { touches: Vec<Vec2> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    Rotating,
    Zooming,
}

/// State of one interaction, from first contact to release.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub mode: GestureMode,
    pub last_pointer_position: Option<Vec2>,
    pub active_pointer_count: usize,
    last_pinch_distance: Option<f64>,
}

impl GestureSession {
    fn rotating(position: Vec2, pointers: usize) -> Self {
        Self {
            mode: GestureMode::Rotating,
            last_pointer_position: Some(position),
            active_pointer_count: pointers,
            last_pinch_distance: None,
        }
    }

    fn zooming(touches: &[Vec2]) -> Self {
        Self {
            mode: GestureMode::Zooming,
            last_pointer_position: None,
            active_pointer_count: touches.len(),
            last_pinch_distance: pinch_distance(touches),
        }
    }

    /// Lock to zooming for the rest of the session.
    fn lock_zoom(&mut self, touches: &[Vec2]) {
        if self.mode != GestureMode::Zooming {
            debug!(touches = touches.len(), "gesture: rotating -> zooming");
        }
        self.mode = GestureMode::Zooming;
        self.last_pointer_position = None;
        self.active_pointer_count = touches.len();
        self.last_pinch_distance = pinch_distance(touches);
    }
}

fn pinch_distance(touches: &[Vec2]) -> Option<f64> {
    match touches {
        [a, b, ..] => Some(a.distance(*b)),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct GestureController {
    session: Option<GestureSession>,
    hover_suppressed_until: Option<Time>,
    hover_cooldown_ms: f64,
    wheel_zoom_sensitivity: f64,
    line_wheel_multiplier: f64,
    page_wheel_multiplier: f64,
}

impl GestureController {
    pub fn new(config: &GlobeConfig) -> Self {
        Self {
            session: None,
            hover_suppressed_until: None,
            hover_cooldown_ms: config.hover_cooldown_ms,
            wheel_zoom_sensitivity: config.wheel_zoom_sensitivity,
            line_wheel_multiplier: config.line_wheel_multiplier,
            page_wheel_multiplier: config.page_wheel_multiplier,
        }
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> Option<GestureMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Hover tooltips are suppressed during a gesture and for the cooldown
    /// window after release.
    pub fn hover_allowed(&self, now: Time) -> bool {
        if self.session.is_some() {
            return false;
        }
        match self.hover_suppressed_until {
            Some(until) => now >= until,
            None => true,
        }
    }

    pub fn handle(&mut self, event: &InputEvent, now: Time) -> Vec<CameraCommand> {
        match event {
            InputEvent::PointerDown { position, button } => {
                self.pointer_down(*position, *button);
                Vec::new()
            }
            InputEvent::PointerMove { position } => self.pointer_move(*position),
            InputEvent::PointerUp { .. } => {
                if self.session.is_some() {
                    self.end_session(now);
                }
                Vec::new()
            }
            InputEvent::Wheel { delta_y, mode } => {
                self.suppress_hover(now);
                vec![CameraCommand::ScaleBy(self.wheel_factor(*delta_y, *mode))]
            }
            InputEvent::TouchStart { touches } => {
                self.touch_start(touches);
                Vec::new()
            }
            InputEvent::TouchMove { touches } => self.touch_move(touches),
            InputEvent::TouchEnd { touches } => {
                self.touch_end(touches, now);
                Vec::new()
            }
        }
    }

    /// Zoom factor for one wheel event: `2^(-delta_y * s)`.
    pub fn wheel_factor(&self, delta_y: f64, mode: WheelDeltaMode) -> f64 {
        let multiplier = match mode {
            WheelDeltaMode::Pixel => 1.0,
            WheelDeltaMode::Line => self.line_wheel_multiplier,
            WheelDeltaMode::Page => self.page_wheel_multiplier,
        };
        let factor = 2f64.powf(-delta_y * self.wheel_zoom_sensitivity * multiplier);
        if factor.is_finite() { factor } else { 1.0 }
    }

    fn pointer_down(&mut self, position: Vec2, button: MouseButton) {
        if button != MouseButton::Primary {
            debug!(?button, "gesture: ignoring non-primary button");
            return;
        }
        if self.session.is_some() {
            return;
        }
        debug!("gesture: idle -> rotating (mouse)");
        self.session = Some(GestureSession::rotating(position, 1));
    }

    fn pointer_move(&mut self, position: Vec2) -> Vec<CameraCommand> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.mode != GestureMode::Rotating {
            return Vec::new();
        }
        let command = session.last_pointer_position.map(|last| {
            let delta = position - last;
            CameraCommand::RotateDelta {
                dx: delta.x,
                dy: delta.y,
            }
        });
        session.last_pointer_position = Some(position);
        command.into_iter().collect()
    }

    fn touch_start(&mut self, touches: &[Vec2]) {
        match self.session.as_mut() {
            None => {
                let session = if touches.len() >= 2 {
                    debug!(touches = touches.len(), "gesture: idle -> zooming");
                    GestureSession::zooming(touches)
                } else if let Some(&first) = touches.first() {
                    debug!("gesture: idle -> rotating (touch)");
                    GestureSession::rotating(first, 1)
                } else {
                    return;
                };
                self.session = Some(session);
            }
            Some(session) => {
                if touches.len() >= 2 {
                    session.lock_zoom(touches);
                } else {
                    session.active_pointer_count = touches.len();
                }
            }
        }
    }

    fn touch_move(&mut self, touches: &[Vec2]) -> Vec<CameraCommand> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if touches.len() >= 2 && session.mode == GestureMode::Rotating {
            session.lock_zoom(touches);
            return Vec::new();
        }
        match session.mode {
            GestureMode::Rotating => {
                let Some(&position) = touches.first() else {
                    return Vec::new();
                };
                let command = session.last_pointer_position.map(|last| {
                    let delta = position - last;
                    CameraCommand::RotateDelta {
                        dx: delta.x,
                        dy: delta.y,
                    }
                });
                session.last_pointer_position = Some(position);
                command.into_iter().collect()
            }
            GestureMode::Zooming => {
                let current = pinch_distance(touches);
                let command = match (session.last_pinch_distance, current) {
                    (Some(prev), Some(cur)) if prev > 0.0 && cur > 0.0 => {
                        Some(CameraCommand::ScaleBy(cur / prev))
                    }
                    _ => None,
                };
                session.last_pinch_distance = current;
                command.into_iter().collect()
            }
        }
    }

    fn touch_end(&mut self, remaining: &[Vec2], now: Time) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if remaining.is_empty() {
            self.end_session(now);
            return;
        }
        session.active_pointer_count = remaining.len();
        match session.mode {
            GestureMode::Zooming => session.last_pinch_distance = pinch_distance(remaining),
            GestureMode::Rotating => session.last_pointer_position = remaining.first().copied(),
        }
    }

    fn end_session(&mut self, now: Time) {
        if let Some(session) = self.session.take() {
            debug!(mode = ?session.mode, "gesture: -> idle");
        }
        self.suppress_hover(now);
    }

    fn suppress_hover(&mut self, now: Time) {
        let until = now.add_millis(self.hover_cooldown_ms);
        self.hover_suppressed_until = Some(match self.hover_suppressed_until {
            Some(prev) if prev > until => prev,
            _ => until,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{GestureController, GestureMode, InputEvent, MouseButton, WheelDeltaMode};
    use crate::config::GlobeConfig;
    use crate::projection::CameraCommand;
    use foundation::math::Vec2;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ~= {b} (eps={eps})");
    }

    fn controller() -> GestureController {
        GestureController::new(&GlobeConfig::default())
    }

    fn down(x: f64, y: f64, button: i32) -> InputEvent {
        InputEvent::PointerDown {
            position: Vec2::new(x, y),
            button: MouseButton::from_index(button),
        }
    }

    fn mv(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove {
            position: Vec2::new(x, y),
        }
    }

    #[test]
    fn primary_drag_rotates_by_pointer_delta() {
        let mut g = controller();
        assert!(g.handle(&down(10.0, 10.0, 0), Time(0.0)).is_empty());
        assert_eq!(g.mode(), Some(GestureMode::Rotating));
        assert_eq!(
            g.handle(&mv(15.0, 7.0), Time(16.0)),
            vec![CameraCommand::RotateDelta { dx: 5.0, dy: -3.0 }]
        );
        assert_eq!(
            g.handle(&mv(16.0, 7.0), Time(32.0)),
            vec![CameraCommand::RotateDelta { dx: 1.0, dy: 0.0 }]
        );
        g.handle(
            &InputEvent::PointerUp {
                position: Vec2::new(16.0, 7.0),
            },
            Time(40.0),
        );
        assert!(g.is_idle());
        assert!(g.handle(&mv(30.0, 30.0), Time(41.0)).is_empty());
    }

    #[test]
    fn secondary_and_auxiliary_buttons_do_not_rotate() {
        for button in [1, 2] {
            let mut g = controller();
            g.handle(&down(0.0, 0.0, button), Time(0.0));
            assert!(g.is_idle());
            assert!(g.handle(&mv(50.0, 50.0), Time(1.0)).is_empty());
        }
    }

    #[test]
    fn two_finger_start_stays_zoom_after_lifting_one() {
        let mut g = controller();
        let a = Vec2::new(100.0, 100.0);
        let b = Vec2::new(200.0, 100.0);
        g.handle(&InputEvent::TouchStart { touches: vec![a, b] }, Time(0.0));
        assert_eq!(g.mode(), Some(GestureMode::Zooming));

        let cmds = g.handle(
            &InputEvent::TouchMove {
                touches: vec![a, Vec2::new(300.0, 100.0)],
            },
            Time(16.0),
        );
        assert_eq!(cmds, vec![CameraCommand::ScaleBy(2.0)]);

        g.handle(&InputEvent::TouchEnd { touches: vec![a] }, Time(32.0));
        assert_eq!(g.mode(), Some(GestureMode::Zooming));
        let cmds = g.handle(
            &InputEvent::TouchMove {
                touches: vec![Vec2::new(140.0, 160.0)],
            },
            Time(48.0),
        );
        assert!(cmds.is_empty());

        g.handle(&InputEvent::TouchEnd { touches: vec![] }, Time(64.0));
        assert!(g.is_idle());
    }

    #[test]
    fn second_finger_locks_a_rotating_session_to_zoom() {
        let mut g = controller();
        let a = Vec2::new(10.0, 10.0);
        g.handle(&InputEvent::TouchStart { touches: vec![a] }, Time(0.0));
        assert_eq!(g.mode(), Some(GestureMode::Rotating));
        g.handle(
            &InputEvent::TouchStart {
                touches: vec![a, Vec2::new(20.0, 10.0)],
            },
            Time(5.0),
        );
        assert_eq!(g.mode(), Some(GestureMode::Zooming));
        g.handle(&InputEvent::TouchEnd { touches: vec![a] }, Time(10.0));
        let cmds = g.handle(
            &InputEvent::TouchMove {
                touches: vec![Vec2::new(50.0, 50.0)],
            },
            Time(20.0),
        );
        assert!(cmds.is_empty());
    }

    #[test]
    fn wheel_always_zooms() {
        let mut g = controller();
        g.handle(&down(0.0, 0.0, 0), Time(0.0));
        let cmds = g.handle(
            &InputEvent::Wheel {
                delta_y: -500.0,
                mode: WheelDeltaMode::Pixel,
            },
            Time(1.0),
        );
        match cmds.as_slice() {
            [CameraCommand::ScaleBy(k)] => assert_close(*k, 2.0, 1e-12),
            other => panic!("expected one ScaleBy, got {other:?}"),
        }
        assert_eq!(g.mode(), Some(GestureMode::Rotating));
    }

    #[test]
    fn mouse_press_during_touch_session_is_ignored() {
        let mut g = controller();
        let finger = Vec2::new(10.0, 10.0);
        g.handle(&InputEvent::TouchStart { touches: vec![finger] }, Time(0.0));
        assert!(g.handle(&down(500.0, 500.0, 0), Time(5.0)).is_empty());
        assert_eq!(g.mode(), Some(GestureMode::Rotating));
        assert_eq!(
            g.handle(
                &InputEvent::TouchMove {
                    touches: vec![Vec2::new(15.0, 10.0)],
                },
                Time(16.0),
            ),
            vec![CameraCommand::RotateDelta { dx: 5.0, dy: 0.0 }]
        );
    }

    #[test]
    fn wheel_starts_hover_cooldown() {
        let mut g = controller();
        g.handle(
            &InputEvent::Wheel {
                delta_y: 100.0,
                mode: WheelDeltaMode::Pixel,
            },
            Time(100.0),
        );
        assert!(g.is_idle());
        assert!(!g.hover_allowed(Time(120.0)));
        assert!(g.hover_allowed(Time(150.0)));
    }

    #[test]
    fn wheel_delta_modes() {
        let g = controller();
        assert_eq!(g.wheel_factor(0.0, WheelDeltaMode::Pixel), 1.0);
        assert_close(g.wheel_factor(500.0, WheelDeltaMode::Pixel), 0.5, 1e-12);
        assert_close(g.wheel_factor(-20.0, WheelDeltaMode::Line), 2.0, 1e-12);
        assert_close(g.wheel_factor(1.0, WheelDeltaMode::Page), 0.5, 1e-12);
    }

    #[test]
    fn hover_suppressed_during_drag_and_cooldown() {
        let mut g = controller();
        assert!(g.hover_allowed(Time(0.0)));
        g.handle(&down(0.0, 0.0, 0), Time(0.0));
        assert!(!g.hover_allowed(Time(10.0)));
        g.handle(
            &InputEvent::PointerUp {
                position: Vec2::new(0.0, 0.0),
            },
            Time(100.0),
        );
        assert!(!g.hover_allowed(Time(120.0)));
        assert!(g.hover_allowed(Time(150.0)));
    }

    #[test]
    fn cooldown_is_configurable() {
        let mut g = GestureController::new(&GlobeConfig {
            hover_cooldown_ms: 0.0,
            ..GlobeConfig::default()
        });
        g.handle(&down(0.0, 0.0, 0), Time(0.0));
        g.handle(
            &InputEvent::PointerUp {
                position: Vec2::new(0.0, 0.0),
            },
            Time(5.0),
        );
        assert!(g.hover_allowed(Time(5.0)));
    }
}
