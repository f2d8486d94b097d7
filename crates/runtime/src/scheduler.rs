use foundation::time::Time;
use tracing::trace;

use crate::tween::{Lerp, smoothstep};

/// Which animatable property a task drives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    Rotation,
    Scale,
}

/// Monotonic token identifying the live task of an [`Animator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// What the host's frame driver hands back on the next tick.
///
/// A request whose generation no longer matches the animator's current one
/// is stale and steps to [`Step::Stale`]; there is no explicit cancel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameRequest {
    pub kind: AnimationKind,
    pub generation: Generation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTask<T> {
    pub kind: AnimationKind,
    pub start_value: T,
    pub target_value: T,
    pub start_time: Time,
    pub duration_ms: f64,
    pub generation: Generation,
}

impl<T: Lerp> AnimationTask<T> {
    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Time) -> f64 {
        if self.duration_ms <= 0.0 || !self.duration_ms.is_finite() {
            return 1.0;
        }
        (now.since(self.start_time) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased value at `now`. The final frame returns the target verbatim.
    pub fn sample(&self, now: Time) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.target_value.clone();
        }
        self.start_value.lerp(&self.target_value, smoothstep(t))
    }
}

/// Outcome of stepping an animation frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
    /// Commit `value`; schedule `next` if the task has not finished.
    Apply {
        value: T,
        next: Option<FrameRequest>,
    },
    /// Superseded or finished; the frame is a no-op.
    Stale,
}

/// Owns at most one live task for a single property.
///
/// Starting a new task bumps the generation, which atomically supersedes
/// whatever was running: frames already scheduled for the old generation
/// step to [`Step::Stale`].
#[derive(Debug, Clone)]
pub struct Animator<T> {
    kind: AnimationKind,
    next_generation: u64,
    task: Option<AnimationTask<T>>,
}

impl<T: Lerp> Animator<T> {
    pub fn new(kind: AnimationKind) -> Self {
        Self {
            kind,
            next_generation: 0,
            task: None,
        }
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    /// Begin animating from the live value toward `target`.
    pub fn start(&mut self, live_value: T, target: T, now: Time, duration_ms: f64) -> FrameRequest {
        self.next_generation += 1;
        let generation = Generation(self.next_generation);
        if let Some(old) = &self.task {
            trace!(kind = ?self.kind, old = old.generation.0, new = generation.0, "animation superseded");
        }
        self.task = Some(AnimationTask {
            kind: self.kind,
            start_value: live_value,
            target_value: target,
            start_time: now,
            duration_ms,
            generation,
        });
        FrameRequest {
            kind: self.kind,
            generation,
        }
    }

    /// Advance the task named by `request` to `now`.
    pub fn step(&mut self, request: FrameRequest, now: Time) -> Step<T> {
        let Some(task) = &self.task else {
            return Step::Stale;
        };
        if request.kind != self.kind || request.generation != task.generation {
            trace!(
                kind = ?self.kind,
                stale = request.generation.0,
                live = task.generation.0,
                "dropping stale animation frame"
            );
            return Step::Stale;
        }

        let value = task.sample(now);
        let finished = task.progress(now) >= 1.0;
        let next = if finished {
            self.task = None;
            None
        } else {
            Some(request)
        };
        Step::Apply { value, next }
    }

    /// Step whatever task is live, if any.
    pub fn tick(&mut self, now: Time) -> Option<Step<T>> {
        let request = self.live_request()?;
        Some(self.step(request, now))
    }

    pub fn live_request(&self) -> Option<FrameRequest> {
        self.task.as_ref().map(|t| FrameRequest {
            kind: self.kind,
            generation: t.generation,
        })
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    pub fn task(&self) -> Option<&AnimationTask<T>> {
        self.task.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationKind, Animator, Step};
    use foundation::time::Time;

    fn applied(step: Step<f64>) -> f64 {
        match step {
            Step::Apply { value, .. } => value,
            Step::Stale => panic!("expected an applied frame"),
        }
    }

    #[test]
    fn eases_toward_target_and_finishes() {
        let mut anim = Animator::new(AnimationKind::Scale);
        let req = anim.start(100.0, 200.0, Time(0.0), 100.0);

        let v = applied(anim.step(req, Time(50.0)));
        assert_eq!(v, 150.0);
        let v = applied(anim.step(req, Time(25.0)));
        assert!(v > 100.0 && v < 125.0);

        match anim.step(req, Time(100.0)) {
            Step::Apply { value, next } => {
                assert_eq!(value, 200.0);
                assert!(next.is_none());
            }
            Step::Stale => panic!("final frame must apply"),
        }
        assert!(!anim.is_active());
        assert_eq!(anim.step(req, Time(120.0)), Step::Stale);
    }

    #[test]
    fn new_start_supersedes_old_generation() {
        let mut anim = Animator::new(AnimationKind::Scale);
        let first = anim.start(0.0, 10.0, Time(0.0), 750.0);
        let second = anim.start(3.0, 90.0, Time(100.0), 750.0);
        assert!(second.generation > first.generation);

        assert_eq!(anim.step(first, Time(116.0)), Step::Stale);
        assert_eq!(applied(anim.step(second, Time(850.0))), 90.0);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let mut anim = Animator::new(AnimationKind::Scale);
        let req = anim.start(1.0, 4.0, Time(10.0), 0.0);
        assert_eq!(applied(anim.step(req, Time(10.0))), 4.0);
        assert!(!anim.is_active());
    }

    #[test]
    fn tick_steps_the_live_task() {
        let mut anim = Animator::new(AnimationKind::Scale);
        assert!(anim.tick(Time(0.0)).is_none());
        anim.start(0.0, 1.0, Time(0.0), 10.0);
        assert!(matches!(anim.tick(Time(5.0)), Some(Step::Apply { next: Some(_), .. })));
    }
}
