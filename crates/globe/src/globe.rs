use foundation::math::{Rotation, Vec2};
use foundation::time::Time;
use regions::Region;
use runtime::{AnimationKind, Animator, Event, EventBus, FrameRequest, Step};
use tracing::debug;

use crate::config::{ConfigError, GlobeConfig};
use crate::gesture::{GestureController, InputEvent};
use crate::picking::{PickHit, pick_region};
use crate::projection::{CameraState, ProjectionEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawCause {
    Gesture,
    Animation,
    Viewport,
}

/// Notifications for the renderer, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobeEvent {
    Redraw { cause: RedrawCause },
    AnimationFinished(AnimationKind),
}

/// The interactive globe: sole owner of the camera.
///
/// Gestures and animations both write the camera; whichever writes last
/// wins. An animation frame interpolates toward its target from the value
/// that was live when the animation started, so a drag in the middle of a
/// rotation is simply overwritten by the next frame.
///
/// Ordering contract:
/// - Each mutating call updates the camera before emitting its redraw event.
/// - `drain_events()` yields events in emission order.
#[derive(Debug)]
pub struct Globe {
    config: GlobeConfig,
    projection: ProjectionEngine,
    gestures: GestureController,
    rotation_anim: Animator<Rotation>,
    /// Runs in zoom-ratio units so a resize mid-zoom keeps the intended zoom.
    scale_anim: Animator<f64>,
    events: EventBus<GlobeEvent>,
}

impl Globe {
    pub fn new(width: f64, height: f64, config: GlobeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            projection: ProjectionEngine::new(width, height, &config),
            gestures: GestureController::new(&config),
            rotation_anim: Animator::new(AnimationKind::Rotation),
            scale_anim: Animator::new(AnimationKind::Scale),
            events: EventBus::new(),
            config,
        })
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn projection(&self) -> &ProjectionEngine {
        &self.projection
    }

    pub fn camera(&self) -> CameraState {
        self.projection.camera()
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn set_viewport(&mut self, width: f64, height: f64, now: Time) {
        self.projection.set_viewport(width, height);
        self.redraw(now, RedrawCause::Viewport);
    }

    /// Feed one input event. Returns true if the camera changed.
    pub fn handle_input(&mut self, event: &InputEvent, now: Time) -> bool {
        let mut changed = false;
        for command in self.gestures.handle(event, now) {
            changed |= self.projection.apply(command);
        }
        if changed {
            self.redraw(now, RedrawCause::Gesture);
        }
        changed
    }

    pub fn set_rotation(&mut self, rotation: Rotation, now: Time) -> Rotation {
        let committed = self.projection.set_rotation(rotation);
        self.redraw(now, RedrawCause::Gesture);
        committed
    }

    pub fn set_scale(&mut self, scale: f64, now: Time) -> f64 {
        let committed = self.projection.set_scale(scale);
        self.redraw(now, RedrawCause::Gesture);
        committed
    }

    /// Start rotating toward `target`, superseding any rotation in flight.
    ///
    /// The host schedules the returned request on its frame driver and hands
    /// it back to [`Globe::on_animation_frame`].
    pub fn animate_rotation_to(&mut self, target: Rotation, duration_ms: f64, now: Time) -> FrameRequest {
        let live = self.projection.rotation();
        let target = target.constrained(self.config.max_tilt_deg);
        debug!(from = ?live.as_array(), to = ?target.as_array(), duration_ms, "rotate-to");
        self.rotation_anim.start(live, target, now, duration_ms)
    }

    /// Start zooming toward `target` (pixels per radius unit), clamped first.
    pub fn animate_scale_to(&mut self, target: f64, duration_ms: f64, now: Time) -> FrameRequest {
        let ratio = target / self.projection.base_radius();
        self.animate_zoom_ratio_to(ratio, duration_ms, now)
    }

    /// Zoom to a ratio of the base radius over the configured zoom duration.
    pub fn zoom_to_ratio(&mut self, ratio: f64, now: Time) -> FrameRequest {
        self.animate_zoom_ratio_to(ratio, self.config.zoom_duration_ms, now)
    }

    fn animate_zoom_ratio_to(&mut self, ratio: f64, duration_ms: f64, now: Time) -> FrameRequest {
        let live = self.projection.zoom_ratio();
        let [min, max] = self.config.scale_extent;
        let target = if ratio.is_nan() { live } else { ratio.clamp(min, max) };
        debug!(from = live, to = target, duration_ms, "zoom-to");
        self.scale_anim.start(live, target, now, duration_ms)
    }

    /// Bring a region's centroid to the middle of the disc.
    pub fn rotate_to_region(&mut self, region: &Region, now: Time) -> FrameRequest {
        let target = Rotation::centered_on(region.centroid());
        self.animate_rotation_to(target, self.config.rotate_duration_ms, now)
    }

    /// Run one scheduled frame. Returns the follow-up request, if any.
    /// A stale request (superseded generation) is a no-op.
    pub fn on_animation_frame(&mut self, request: FrameRequest, now: Time) -> Option<FrameRequest> {
        let next = match request.kind {
            AnimationKind::Rotation => match self.rotation_anim.step(request, now) {
                Step::Apply { value, next } => {
                    self.projection.set_rotation(value);
                    Some(next)
                }
                Step::Stale => None,
            },
            AnimationKind::Scale => match self.scale_anim.step(request, now) {
                Step::Apply { value, next } => {
                    self.projection.set_scale(value * self.projection.base_radius());
                    Some(next)
                }
                Step::Stale => None,
            },
        }?;
        self.redraw(now, RedrawCause::Animation);
        if next.is_none() {
            self.events
                .emit(now, GlobeEvent::AnimationFinished(request.kind));
        }
        next
    }

    /// Step every live animation. Returns true while any is still running.
    pub fn tick(&mut self, now: Time) -> bool {
        for request in [self.rotation_anim.live_request(), self.scale_anim.live_request()]
            .into_iter()
            .flatten()
        {
            self.on_animation_frame(request, now);
        }
        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.rotation_anim.is_active() || self.scale_anim.is_active()
    }

    pub fn pick<'a>(&self, regions: &'a [Region], screen: Vec2) -> Option<PickHit<'a>> {
        pick_region(&self.projection, regions, screen)
    }

    /// Like [`Globe::pick`], but nothing is returned while a gesture is active
    /// or during the cooldown after one.
    pub fn hover<'a>(&self, regions: &'a [Region], screen: Vec2, now: Time) -> Option<PickHit<'a>> {
        if !self.gestures.hover_allowed(now) {
            return None;
        }
        self.pick(regions, screen)
    }

    pub fn drain_events(&mut self) -> Vec<Event<GlobeEvent>> {
        self.events.drain()
    }

    fn redraw(&mut self, now: Time, cause: RedrawCause) {
        self.events.emit(now, GlobeEvent::Redraw { cause });
    }
}
