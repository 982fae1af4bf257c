//! Animated bounds transitions.
//!
//! A [`BoundsAnimator`] moves and resizes views over time. Callers request
//! "animate view X to rectangle R over duration D"; every tick, the animator interpolates the
//! bounds of each animating view and assigns them through a [`BoundsTarget`], until each job
//! reaches its destination.
//!
//! The animator never owns views. Jobs refer to their target by [`ViewId`], and a target that has
//! disappeared from the tree by the time of a tick is dropped without further ado.

use crate::easing::Easing;
use crate::rect::Rect;
use crate::tick::TickSource;
use crate::view::ViewId;
use log::{debug, trace};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Access to view bounds.
///
/// Implemented by whatever owns the views; the animator only ever reads and writes bounds through
/// this trait.
pub trait BoundsTarget {
    /// Returns the current bounds of a view, or `None` if the view does not exist.
    fn bounds(&self, view: ViewId) -> Option<Rect>;

    /// Sets the bounds of a view and requests relayout and repaint.
    ///
    /// Returns false if the view does not exist.
    fn set_bounds(&mut self, view: ViewId, bounds: Rect) -> bool;
}

/// Errors from requesting an animation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AnimationError {
    #[error("cannot animate {0:?}: no such view")]
    NoSuchView(ViewId),
    #[error("invalid destination bounds {0:?}")]
    InvalidBounds(Rect),
}

/// Job lifecycle.
///
/// `Pending → Running → Completed`, or `Cancelled` from either of the first two. Jobs held by the
/// animator are always `Pending` or `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Created; no tick has been applied yet.
    Pending,
    /// At least one intermediate frame has been applied.
    Running,
    /// The destination bounds were applied.
    Completed,
    /// Cancelled explicitly, replaced, or the target disappeared.
    Cancelled,
}

impl JobState {
    pub fn is_finished(self) -> bool {
        match self {
            JobState::Completed | JobState::Cancelled => true,
            JobState::Pending | JobState::Running => false,
        }
    }
}

/// One in-flight bounds interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationJob {
    target: ViewId,
    start_bounds: Rect,
    end_bounds: Rect,
    start_time: Instant,
    duration: Duration,
    easing: Easing,
    state: JobState,
}

impl AnimationJob {
    pub fn target(&self) -> ViewId {
        self.target
    }

    pub fn start_bounds(&self) -> Rect {
        self.start_bounds
    }

    pub fn end_bounds(&self) -> Rect {
        self.end_bounds
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Linear progress at `now`, in `[0, 1]`.
    ///
    /// A zero duration is complete at any time.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration == Duration::from_secs(0) {
            return 1.;
        }
        let elapsed = now
            .checked_duration_since(self.start_time)
            .unwrap_or_default();
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        t.max(0.).min(1.)
    }

    /// The bounds at `now`. Depends on nothing but `now`.
    ///
    /// Once complete this is exactly the destination, without interpolation.
    pub fn bounds_at(&self, now: Instant) -> Rect {
        let t = self.progress(now);
        if t >= 1. {
            self.end_bounds
        } else {
            self.start_bounds
                .lerp(self.end_bounds, self.easing.evaluate(t))
        }
    }
}

/// Animator settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorConfig {
    /// Duration used by [`BoundsAnimator::animate_to_default`].
    pub default_duration: Duration,
    /// Curve applied to new jobs.
    pub easing: Easing,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        AnimatorConfig {
            default_duration: Duration::from_millis(200),
            easing: Easing::EaseOut,
        }
    }
}

impl AnimatorConfig {
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Number of jobs whose target bounds were assigned.
    pub applied: usize,
    /// Jobs that ended this tick, with their final state, in target order.
    pub finished: Vec<(ViewId, JobState)>,
}

/// Drives bounds animations.
///
/// All methods are meant to be called from a single thread. Use [`SharedAnimator`] if a host
/// needs to reach the animator from several threads.
#[derive(Debug)]
pub struct BoundsAnimator<T> {
    ticks: T,
    config: AnimatorConfig,
    /// At most one job per target; ordered so ticks advance jobs in a stable order.
    jobs: BTreeMap<ViewId, AnimationJob>,
}

/// An animator behind a lock, for hosts that are not single-threaded.
pub type SharedAnimator<T> = Arc<Mutex<BoundsAnimator<T>>>;

impl<T: TickSource> BoundsAnimator<T> {
    pub fn new(ticks: T) -> BoundsAnimator<T> {
        BoundsAnimator::with_config(ticks, AnimatorConfig::default())
    }

    pub fn with_config(ticks: T, config: AnimatorConfig) -> BoundsAnimator<T> {
        BoundsAnimator {
            ticks,
            config,
            jobs: BTreeMap::new(),
        }
    }

    /// Wraps this animator for shared use.
    pub fn into_shared(self) -> SharedAnimator<T> {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Changes the configuration. Jobs already running keep their duration and curve.
    pub fn set_config(&mut self, config: AnimatorConfig) {
        self.config = config;
    }

    /// Sets the duration used by `animate_to_default`.
    pub fn set_animation_duration(&mut self, duration: Duration) {
        self.config.default_duration = duration;
    }

    pub fn tick_source(&self) -> &T {
        &self.ticks
    }

    pub fn tick_source_mut(&mut self) -> &mut T {
        &mut self.ticks
    }

    /// Animates `target` from its current bounds to `destination` over `duration`.
    ///
    /// If the target is already animating, its job is replaced and the new one starts from
    /// wherever the target is right now. A zero duration applies the destination on the next
    /// tick.
    pub fn animate_to<V: BoundsTarget + ?Sized>(
        &mut self,
        views: &V,
        target: ViewId,
        destination: Rect,
        duration: Duration,
    ) -> Result<(), AnimationError> {
        if !destination.is_valid() {
            return Err(AnimationError::InvalidBounds(destination));
        }
        let start_bounds = views
            .bounds(target)
            .ok_or(AnimationError::NoSuchView(target))?;

        let job = AnimationJob {
            target,
            start_bounds,
            end_bounds: destination,
            start_time: self.ticks.now(),
            duration,
            easing: self.config.easing,
            state: JobState::Pending,
        };

        if let Some(previous) = self.jobs.insert(target, job) {
            debug!(
                "replacing animation of {:?} ({:?} -> {:?}) from {:?}",
                target, previous.start_bounds, previous.end_bounds, start_bounds
            );
        } else {
            trace!("animating {:?} to {:?} over {:?}", target, destination, duration);
        }

        if !self.ticks.is_subscribed() {
            self.ticks.subscribe();
        }
        Ok(())
    }

    /// Animates `target` over the configured default duration.
    pub fn animate_to_default<V: BoundsTarget + ?Sized>(
        &mut self,
        views: &V,
        target: ViewId,
        destination: Rect,
    ) -> Result<(), AnimationError> {
        let duration = self.config.default_duration;
        self.animate_to(views, target, destination, duration)
    }

    /// Stops animating `target`, leaving its bounds wherever the last tick put them.
    ///
    /// Returns false if the target was not animating.
    pub fn cancel(&mut self, target: ViewId) -> bool {
        let cancelled = self.jobs.remove(&target).is_some();
        if cancelled {
            trace!("cancelled animation of {:?}", target);
            self.unsubscribe_if_idle();
        }
        cancelled
    }

    /// Stops all animations.
    pub fn cancel_all(&mut self) {
        self.jobs.clear();
        self.unsubscribe_if_idle();
    }

    /// Advances every job to `now` and applies the resulting bounds.
    pub fn on_tick<V: BoundsTarget + ?Sized>(&mut self, now: Instant, views: &mut V) -> TickReport {
        let mut report = TickReport::default();

        for (target, job) in self.jobs.iter_mut() {
            let t = job.progress(now);
            let bounds = job.bounds_at(now);

            if !views.set_bounds(*target, bounds) {
                debug!("dropping animation of {:?}: view is gone", target);
                job.state = JobState::Cancelled;
                report.finished.push((*target, JobState::Cancelled));
                continue;
            }
            report.applied += 1;

            if t >= 1. {
                job.state = JobState::Completed;
                report.finished.push((*target, JobState::Completed));
            } else {
                job.state = JobState::Running;
            }
        }

        self.jobs.retain(|_, job| !job.state.is_finished());
        self.unsubscribe_if_idle();
        report
    }

    fn unsubscribe_if_idle(&mut self) {
        if self.jobs.is_empty() && self.ticks.is_subscribed() {
            trace!("no animations left; going idle");
            self.ticks.unsubscribe();
        }
    }

    /// Whether any job is in flight.
    pub fn is_active(&self) -> bool {
        !self.jobs.is_empty()
    }

    pub fn is_animating(&self, target: ViewId) -> bool {
        self.jobs.contains_key(&target)
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn job(&self, target: ViewId) -> Option<&AnimationJob> {
        self.jobs.get(&target)
    }

    pub fn job_state(&self, target: ViewId) -> Option<JobState> {
        self.jobs.get(&target).map(|job| job.state)
    }

    /// The destination of the target’s in-flight job.
    pub fn target_bounds(&self, target: ViewId) -> Option<Rect> {
        self.jobs.get(&target).map(|job| job.end_bounds)
    }
}
