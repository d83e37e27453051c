//! Opacity fades.
//!
//! The built-in path is a linear tween stepped every [`FRAME_INTERVAL_MS`];
//! a custom fade function replaces it entirely. Each animated element owns
//! a [`Fader`], and starting a new fade on it cancels the one in flight.

use std::cell::RefCell;
use std::rc::Rc;

use crate::options::FadeFn;
use crate::platform::Platform;

pub const FRAME_INTERVAL_MS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenStep {
    Continue(f64),
    /// The last step, snapped exactly to the target.
    Finished(f64),
}

impl TweenStep {
    pub fn value(&self) -> f64 {
        match self {
            TweenStep::Continue(v) | TweenStep::Finished(v) => *v,
        }
    }
}

/// Linear interpolation of opacity from a start value to a target.
///
/// Each frame's value is computed from the frame index, so the tween
/// always finishes in exactly [`OpacityTween::steps`] frames.
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityTween {
    direction: FadeDirection,
    start: f64,
    current: f64,
    target: f64,
    steps: u32,
    taken: u32,
}

impl OpacityTween {
    /// Number of frames a transition of `duration_ms` is split into.
    pub fn steps(duration_ms: u32) -> u32 {
        duration_ms.div_ceil(FRAME_INTERVAL_MS).max(1)
    }

    /// Tween from 0 up to `target`. `None` when the target is not numeric.
    pub fn fade_in(target: f64, duration_ms: u32) -> Option<Self> {
        if target.is_nan() {
            return None;
        }
        Some(Self::between(FadeDirection::In, 0.0, target, duration_ms))
    }

    /// Tween from `start` down to 0. `None` when the start is not numeric.
    pub fn fade_out(start: f64, duration_ms: u32) -> Option<Self> {
        if start.is_nan() {
            return None;
        }
        Some(Self::between(FadeDirection::Out, start, 0.0, duration_ms))
    }

    fn between(direction: FadeDirection, start: f64, target: f64, duration_ms: u32) -> Self {
        Self {
            direction,
            start,
            current: start,
            target,
            steps: Self::steps(duration_ms),
            taken: 0,
        }
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Moves one frame towards the target.
    pub fn advance(&mut self) -> TweenStep {
        self.taken = (self.taken + 1).min(self.steps);
        let progress = f64::from(self.taken) / f64::from(self.steps);
        let next = self.start + (self.target - self.start) * progress;
        let reached = self.taken == self.steps
            || match self.direction {
                FadeDirection::In => next >= self.target,
                FadeDirection::Out => next <= self.target,
            };

        if reached {
            self.current = self.target;
            TweenStep::Finished(self.target)
        } else {
            self.current = next;
            TweenStep::Continue(next)
        }
    }
}

/// Runs fades on a single element, one at a time.
pub struct Fader<P: Platform> {
    running: Rc<RefCell<Option<P::Timer>>>,
}

impl<P: Platform> Default for Fader<P> {
    fn default() -> Self {
        Self {
            running: Rc::new(RefCell::new(None)),
        }
    }
}

impl<P: Platform> Fader<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a built-in tween is still stepping.
    pub fn is_running(&self) -> bool {
        self.running.borrow().is_some()
    }

    /// Stops the tween in flight, leaving the element at its current opacity.
    pub fn cancel(&self) {
        let timer = self.running.borrow_mut().take();
        drop(timer);
    }

    /// Fades `element` in, towards `target` or else its computed opacity.
    pub fn fade_in(
        &self,
        platform: &Rc<P>,
        element: &P::Element,
        target: Option<f64>,
        duration_ms: u32,
        custom: Option<&FadeFn<P>>,
    ) {
        self.cancel();
        if let Some(fade) = custom {
            fade.call(platform, element);
            return;
        }

        let target = target.unwrap_or_else(|| platform.computed_opacity(element));
        platform.set_opacity(element, 0.0);
        platform.set_display(element, "block");
        match OpacityTween::fade_in(target, duration_ms) {
            Some(tween) => self.run(platform, element, tween),
            None => log::debug!("Computed opacity is not numeric, skipping fade in"),
        }
    }

    /// Fades `element` out from its computed opacity down to 0.
    pub fn fade_out(
        &self,
        platform: &Rc<P>,
        element: &P::Element,
        duration_ms: u32,
        custom: Option<&FadeFn<P>>,
    ) {
        self.cancel();
        if let Some(fade) = custom {
            fade.call(platform, element);
            return;
        }

        let start = platform.computed_opacity(element);
        match OpacityTween::fade_out(start, duration_ms) {
            Some(tween) => self.run(platform, element, tween),
            None => log::debug!("Computed opacity is not numeric, skipping fade out"),
        }
    }

    fn run(&self, platform: &Rc<P>, element: &P::Element, tween: OpacityTween) {
        let weak_platform = Rc::downgrade(platform);
        let element = element.clone();
        let running = Rc::downgrade(&self.running);
        let mut tween = tween;

        let timer = platform.set_interval(
            FRAME_INTERVAL_MS,
            Box::new(move || {
                let Some(platform) = weak_platform.upgrade() else {
                    return;
                };
                let step = tween.advance();
                platform.set_opacity(&element, step.value());
                if let TweenStep::Finished(_) = step {
                    if let Some(running) = running.upgrade() {
                        let timer = running.borrow_mut().take();
                        drop(timer);
                    }
                }
            }),
        );
        *self.running.borrow_mut() = Some(timer);
    }
}
