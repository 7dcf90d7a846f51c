//! A deterministic, in-memory [`Toolkit`].
//!
//! Widgets are entities of a [`World`] carrying visual, layout,
//! background and label components. Time only moves when the toolkit
//! is stepped, one fixed frame at a time, which makes every animation
//! reproducible down to the frame.
//!
//! ```
//! use core::time::Duration;
//! use motionrx_view::headless::{Headless, ViewState};
//! use motionrx_view::prelude::*;
//!
//! let toolkit = Headless::new();
//! let view = toolkit.spawn(ViewState::default().with_alpha(0.0));
//!
//! let fade = ViewAnimator::new(toolkit.clone(), view)
//!     .fade_in(Tween::millis(200));
//!
//! assert_eq!(toolkit.run(fade), Ok(Duration::from_millis(200)));
//! assert_eq!(toolkit.state(view).unwrap().alpha, 1.0);
//! ```

use core::fmt;
use core::mem;
use core::time::Duration;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use bevy_color::Srgba;
use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use bevy_math::{UVec2, Vec2, Vec3};
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use motionrx_core::prelude::*;
use smallvec::SmallVec;

use crate::toolkit::{
    Axis, FloatProperty, FrameFn, PropertyAnimation, Timing, Toolkit,
};
use crate::units::Density;

pub const DEFAULT_FRAME: Duration = Duration::from_millis(10);
/// Simulated time after which [`Headless::run`] gives up.
pub const DEFAULT_LIMIT: Duration = Duration::from_secs(60);

type Targets = SmallVec<[(FloatProperty, f32); 2]>;

/// A widget of a [`Headless`] toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessView(Entity);

#[derive(Component, Debug, Clone, Copy)]
struct Visual {
    alpha: f32,
    translation: Vec3,
    scale: Vec2,
    /// Degrees around the x, y and z axis.
    rotation: Vec3,
    elevation: f32,
}

#[derive(Component, Debug, Clone, Copy)]
struct Layout {
    origin: Vec2,
    size: UVec2,
    layout_requests: u32,
}

#[derive(Component, Debug, Clone, Copy)]
struct Background(Srgba);

#[derive(Component, Debug, Clone)]
struct Label(String);

/// Every observable attribute of a headless widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub alpha: f32,
    pub translation: Vec3,
    pub scale: Vec2,
    pub rotation: Vec3,
    pub elevation: f32,
    /// Top left corner assigned by the layout, in pixels.
    pub origin: Vec2,
    /// Layout size in pixels.
    pub size: UVec2,
    /// Number of relayouts requested through size changes.
    pub layout_requests: u32,
    pub background: Srgba,
    pub text: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            translation: Vec3::ZERO,
            scale: Vec2::ONE,
            rotation: Vec3::ZERO,
            elevation: 0.0,
            origin: Vec2::ZERO,
            size: UVec2::ZERO,
            layout_requests: 0,
            background: Srgba::NONE,
            text: String::new(),
        }
    }
}

impl ViewState {
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec2::splat(scale);
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_size(mut self, size: UVec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_background(mut self, background: Srgba) -> Self {
        self.background = background;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// What a toolkit animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Properties(HeadlessView),
    Value,
    Timer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Handed to the toolkit.
    Requested,
    /// The start delay elapsed, start values were captured.
    Began,
    Finished,
    Cancelled,
    Failed,
}

/// An entry of the toolkit's animation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub at: Duration,
    pub id: u64,
    pub activity: Activity,
    pub kind: EventKind,
}

enum Job {
    Properties {
        view: HeadlessView,
        targets: Targets,
        from: Option<Targets>,
    },
    Frames(FrameFn),
    Timer,
}

impl Job {
    fn activity(&self) -> Activity {
        match self {
            Job::Properties { view, .. } => {
                Activity::Properties(*view)
            }
            Job::Frames(_) => Activity::Value,
            Job::Timer => Activity::Timer,
        }
    }
}

struct Running {
    begin: Duration,
    duration: Duration,
    ease: Ease,
    began: bool,
    job: Job,
    done: Completer,
}

struct Stage {
    world: World,
    clock: Duration,
    frame: Duration,
    density: Density,
    next_id: u64,
    /// Keyed by start order, so later animations write last.
    running: BTreeMap<u64, Running>,
    history: Vec<Event>,
}

impl Stage {
    fn record(
        &mut self,
        id: u64,
        activity: Activity,
        kind: EventKind,
    ) {
        self.history.push(Event {
            at: self.clock,
            id,
            activity,
            kind,
        });
    }

    fn cancel(&mut self, id: u64) {
        if let Some(entry) = self.running.remove(&id) {
            tracing::debug!(id, "headless animation cancelled");
            let activity = entry.job.activity();
            self.record(id, activity, EventKind::Cancelled);
        }
    }

    fn visual(
        &self,
        view: HeadlessView,
    ) -> Result<&Visual, AnimationError> {
        self.world
            .get::<Visual>(view.0)
            .ok_or_else(|| AnimationError::detached(view))
    }

    fn layout(
        &self,
        view: HeadlessView,
    ) -> Result<&Layout, AnimationError> {
        self.world
            .get::<Layout>(view.0)
            .ok_or_else(|| AnimationError::detached(view))
    }

    fn read(
        &self,
        view: HeadlessView,
        property: FloatProperty,
    ) -> Result<f32, AnimationError> {
        let Visual {
            alpha,
            translation,
            scale,
            rotation,
            elevation,
        } = *self.visual(view)?;

        Ok(match property {
            FloatProperty::Alpha => alpha,
            FloatProperty::TranslationX => translation.x,
            FloatProperty::TranslationY => translation.y,
            FloatProperty::ScaleX => scale.x,
            FloatProperty::ScaleY => scale.y,
            FloatProperty::Rotation => rotation.z,
            FloatProperty::RotationX => rotation.x,
            FloatProperty::RotationY => rotation.y,
            FloatProperty::X => {
                self.layout(view)?.origin.x + translation.x
            }
            FloatProperty::Y => {
                self.layout(view)?.origin.y + translation.y
            }
            FloatProperty::Z => elevation + translation.z,
        })
    }

    fn write(
        &mut self,
        view: HeadlessView,
        property: FloatProperty,
        value: f32,
    ) -> Result<(), AnimationError> {
        let origin = self.layout(view)?.origin;
        let mut visual = self
            .world
            .get_mut::<Visual>(view.0)
            .ok_or_else(|| AnimationError::detached(view))?;
        let Visual {
            alpha,
            translation,
            scale,
            rotation,
            elevation,
        } = &mut *visual;

        match property {
            FloatProperty::Alpha => *alpha = value,
            FloatProperty::TranslationX => translation.x = value,
            FloatProperty::TranslationY => translation.y = value,
            FloatProperty::ScaleX => scale.x = value,
            FloatProperty::ScaleY => scale.y = value,
            FloatProperty::Rotation => rotation.z = value,
            FloatProperty::RotationX => rotation.x = value,
            FloatProperty::RotationY => rotation.y = value,
            FloatProperty::X => translation.x = value - origin.x,
            FloatProperty::Y => translation.y = value - origin.y,
            FloatProperty::Z => translation.z = value - *elevation,
        }
        Ok(())
    }

    /// Writes each property `eased` of the way from its start value
    /// to its target.
    fn blend(
        &mut self,
        view: HeadlessView,
        targets: &[(FloatProperty, f32)],
        start: &[(FloatProperty, f32)],
        eased: f32,
    ) -> Result<(), AnimationError> {
        targets.iter().zip(start).try_for_each(
            |(&(property, to), &(_, from))| {
                let value = f32::interp(&from, &to, eased);
                self.write(view, property, value)
            },
        )
    }

    fn snapshot(
        &self,
        view: HeadlessView,
        targets: &[(FloatProperty, f32)],
    ) -> Result<Targets, AnimationError> {
        targets
            .iter()
            .map(|&(property, _)| {
                Ok((property, self.read(view, property)?))
            })
            .collect()
    }
}

/// Handle to a headless widget toolkit. Clones share the same world
/// and clock.
#[derive(Clone)]
pub struct Headless {
    inner: Rc<RefCell<Stage>>,
}

impl Headless {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Stage {
                world: World::new(),
                clock: Duration::ZERO,
                frame: DEFAULT_FRAME,
                density: Density::BASELINE,
                next_id: 0,
                running: BTreeMap::new(),
                history: Vec::new(),
            })),
        }
    }

    pub fn with_density(self, density: Density) -> Self {
        self.inner.borrow_mut().density = density;
        self
    }

    /// # Panics
    ///
    /// Panics if `frame` is zero.
    pub fn with_frame(self, frame: Duration) -> Self {
        assert!(!frame.is_zero(), "frame duration must not be zero");
        self.inner.borrow_mut().frame = frame;
        self
    }

    pub fn spawn(&self, state: ViewState) -> HeadlessView {
        let ViewState {
            alpha,
            translation,
            scale,
            rotation,
            elevation,
            origin,
            size,
            layout_requests,
            background,
            text,
        } = state;

        let entity = self
            .inner
            .borrow_mut()
            .world
            .spawn((
                Visual {
                    alpha,
                    translation,
                    scale,
                    rotation,
                    elevation,
                },
                Layout {
                    origin,
                    size,
                    layout_requests,
                },
                Background(background),
                Label(text),
            ))
            .id();

        tracing::debug!(?entity, "headless view spawned");
        HeadlessView(entity)
    }

    pub fn state(
        &self,
        view: HeadlessView,
    ) -> Result<ViewState, AnimationError> {
        let stage = self.inner.borrow();
        let visual = *stage.visual(view)?;
        let layout = *stage.layout(view)?;
        let background = stage
            .world
            .get::<Background>(view.0)
            .map(|b| b.0)
            .ok_or_else(|| AnimationError::detached(view))?;
        let text = stage
            .world
            .get::<Label>(view.0)
            .map(|l| l.0.clone())
            .ok_or_else(|| AnimationError::detached(view))?;

        Ok(ViewState {
            alpha: visual.alpha,
            translation: visual.translation,
            scale: visual.scale,
            rotation: visual.rotation,
            elevation: visual.elevation,
            origin: layout.origin,
            size: layout.size,
            layout_requests: layout.layout_requests,
            background,
            text,
        })
    }

    /// Removes the widget. Animations still driving it fail with
    /// [`AnimationError::Detached`] on their next frame.
    pub fn detach(&self, view: HeadlessView) {
        if self.inner.borrow_mut().world.despawn(view.0) {
            tracing::debug!(?view, "headless view detached");
        }
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().clock
    }

    pub fn frame(&self) -> Duration {
        self.inner.borrow().frame
    }

    pub fn history(&self) -> Vec<Event> {
        self.inner.borrow().history.clone()
    }

    /// Whether no toolkit animation is pending.
    pub fn is_idle(&self) -> bool {
        self.inner.borrow().running.is_empty()
    }

    /// Advances the clock by one frame and drives every running
    /// animation, in start order.
    pub fn step(&self) {
        let (now, entries) = {
            let mut stage = self.inner.borrow_mut();
            let frame = stage.frame;
            stage.clock += frame;
            (stage.clock, mem::take(&mut stage.running))
        };
        let running = entries.len();
        tracing::trace!(?now, running, "headless frame");

        let mut survivors = self.process(now, entries);
        self.inner.borrow_mut().running.append(&mut survivors);
    }

    /// Awaits `unit` while stepping the toolkit, returning the
    /// simulated time it took.
    pub fn run(
        &self,
        unit: Completion,
    ) -> Result<Duration, AnimationError> {
        self.run_for(unit, DEFAULT_LIMIT)
    }

    /// Like [`Headless::run`], failing with
    /// [`AnimationError::TimedOut`] once `limit` elapsed. The unit is
    /// dropped, and thereby cancelled, on timeout.
    pub fn run_for(
        &self,
        unit: Completion,
        limit: Duration,
    ) -> Result<Duration, AnimationError> {
        let started = self.now();
        let mut playback = Playback::new(self);
        let outcome = playback.spawn(unit);

        loop {
            playback.run_until_stalled();
            if let Some((result, at)) = outcome.take() {
                return result.map(|()| at - started);
            }
            if self.now() - started >= limit {
                tracing::warn!(?limit, "headless run timed out");
                return Err(AnimationError::TimedOut(limit));
            }
            self.step();
        }
    }

    fn process(
        &self,
        now: Duration,
        entries: BTreeMap<u64, Running>,
    ) -> BTreeMap<u64, Running> {
        entries
            .into_iter()
            .filter_map(|(id, entry)| {
                self.tick(id, entry, now).map(|entry| (id, entry))
            })
            .collect()
    }

    fn record(&self, id: u64, activity: Activity, kind: EventKind) {
        self.inner.borrow_mut().record(id, activity, kind);
    }

    /// Drives a single animation. No borrow of the stage is held
    /// while frame callbacks or completers run.
    fn tick(
        &self,
        id: u64,
        mut entry: Running,
        now: Duration,
    ) -> Option<Running> {
        let activity = entry.job.activity();

        if entry.done.is_canceled() {
            self.record(id, activity, EventKind::Cancelled);
            return None;
        }
        if now < entry.begin {
            return Some(entry);
        }
        if !entry.began {
            entry.began = true;
            self.record(id, activity, EventKind::Began);
        }

        let raw = fraction(now - entry.begin, entry.duration);
        let eased = entry.ease.apply(raw);

        let result = match &mut entry.job {
            Job::Properties {
                view,
                targets,
                from,
            } => {
                let mut stage = self.inner.borrow_mut();
                let captured = match from.take() {
                    Some(start) => Ok(start),
                    None => stage.snapshot(*view, targets.as_slice()),
                };

                captured.and_then(|start| {
                    let written = stage.blend(
                        *view,
                        targets.as_slice(),
                        start.as_slice(),
                        eased,
                    );
                    *from = Some(start);
                    written
                })
            }
            Job::Frames(on_frame) => on_frame(eased),
            Job::Timer => Ok(()),
        };

        match result {
            Err(error) => {
                self.record(id, activity, EventKind::Failed);
                entry.done.fail(error);
                None
            }
            Ok(()) if raw >= 1.0 => {
                self.record(id, activity, EventKind::Finished);
                entry.done.complete();
                None
            }
            Ok(()) => Some(entry),
        }
    }

    fn start(
        &self,
        job: Job,
        timing: &Timing,
        done: Completer,
    ) -> Result<AnimationGuard, AnimationError> {
        let activity = job.activity();
        let (id, now) = {
            let mut stage = self.inner.borrow_mut();
            let id = stage.next_id;
            stage.next_id += 1;
            stage.record(id, activity, EventKind::Requested);
            (id, stage.clock)
        };

        let entry = Running {
            begin: now + timing.start_delay,
            duration: timing.duration,
            ease: timing.ease,
            began: false,
            job,
            done,
        };

        // Zero-length work finishes inside the start call.
        if timing.start_delay.is_zero() && timing.duration.is_zero() {
            let entries = BTreeMap::from([(id, entry)]);
            let mut left = self.process(now, entries);
            self.inner.borrow_mut().running.append(&mut left);
            return Ok(AnimationGuard::noop());
        }

        self.inner.borrow_mut().running.insert(id, entry);

        let stage = Rc::downgrade(&self.inner);
        Ok(AnimationGuard::new(move || {
            let Some(stage) = stage.upgrade() else {
                return;
            };
            // While a frame is running the entry notices its dropped
            // completion by itself.
            if let Ok(mut stage) = stage.try_borrow_mut() {
                stage.cancel(id);
            };
        }))
    }
}

impl Default for Headless {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Headless {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(stage) => f
                .debug_struct("Headless")
                .field("now", &stage.clock)
                .field("frame", &stage.frame)
                .field("running", &stage.running.len())
                .finish(),
            Err(_) => {
                f.debug_struct("Headless").finish_non_exhaustive()
            }
        }
    }
}

fn fraction(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0) as f32
}

impl Scheduler for Headless {
    fn schedule(
        &self,
        delay: Duration,
        done: Completer,
    ) -> Result<AnimationGuard, AnimationError> {
        let timing =
            Timing::new(Duration::ZERO).with_start_delay(delay);
        self.start(Job::Timer, &timing, done)
    }
}

impl Toolkit for Headless {
    type View = HeadlessView;

    fn density(&self) -> Density {
        self.inner.borrow().density
    }

    fn property(
        &self,
        view: HeadlessView,
        property: FloatProperty,
    ) -> Result<f32, AnimationError> {
        self.inner.borrow().read(view, property)
    }

    fn size(
        &self,
        view: HeadlessView,
    ) -> Result<UVec2, AnimationError> {
        Ok(self.inner.borrow().layout(view)?.size)
    }

    fn set_size(
        &self,
        view: HeadlessView,
        axis: Axis,
        px: u32,
    ) -> Result<(), AnimationError> {
        let mut stage = self.inner.borrow_mut();
        let mut layout = stage
            .world
            .get_mut::<Layout>(view.0)
            .ok_or_else(|| AnimationError::detached(view))?;

        match axis {
            Axis::Width => layout.size.x = px,
            Axis::Height => layout.size.y = px,
        }
        layout.layout_requests += 1;
        Ok(())
    }

    fn background_color(
        &self,
        view: HeadlessView,
    ) -> Result<Srgba, AnimationError> {
        self.inner
            .borrow()
            .world
            .get::<Background>(view.0)
            .map(|b| b.0)
            .ok_or_else(|| AnimationError::detached(view))
    }

    fn set_background_color(
        &self,
        view: HeadlessView,
        color: Srgba,
    ) -> Result<(), AnimationError> {
        let mut stage = self.inner.borrow_mut();
        let mut background = stage
            .world
            .get_mut::<Background>(view.0)
            .ok_or_else(|| AnimationError::detached(view))?;
        background.0 = color;
        Ok(())
    }

    fn text(
        &self,
        view: HeadlessView,
    ) -> Result<String, AnimationError> {
        self.inner
            .borrow()
            .world
            .get::<Label>(view.0)
            .map(|l| l.0.clone())
            .ok_or_else(|| AnimationError::detached(view))
    }

    fn set_text(
        &self,
        view: HeadlessView,
        text: &str,
    ) -> Result<(), AnimationError> {
        let mut stage = self.inner.borrow_mut();
        let mut label = stage
            .world
            .get_mut::<Label>(view.0)
            .ok_or_else(|| AnimationError::detached(view))?;
        label.0 = text.to_owned();
        Ok(())
    }

    fn animate_properties(
        &self,
        view: HeadlessView,
        animation: &PropertyAnimation,
        done: Completer,
    ) -> Result<AnimationGuard, AnimationError> {
        self.inner.borrow().visual(view)?;

        let job = Job::Properties {
            view,
            targets: animation.targets.clone(),
            from: None,
        };
        self.start(job, &animation.timing, done)
    }

    fn animate_fraction(
        &self,
        timing: &Timing,
        on_frame: FrameFn,
        done: Completer,
    ) -> Result<AnimationGuard, AnimationError> {
        self.start(Job::Frames(on_frame), timing, done)
    }
}

/// Drives several units on one [`Headless`] toolkit, frame by frame.
pub struct Playback {
    toolkit: Headless,
    pool: LocalPool,
}

/// The eventual result of a unit spawned on a [`Playback`].
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    slot: Rc<RefCell<Option<(AnimationResult, Duration)>>>,
}

impl Outcome {
    pub fn result(&self) -> Option<AnimationResult> {
        self.slot.borrow().as_ref().map(|(result, _)| result.clone())
    }

    /// Toolkit time at which the unit resolved.
    pub fn finished_at(&self) -> Option<Duration> {
        self.slot.borrow().as_ref().map(|(_, at)| *at)
    }

    pub fn is_done(&self) -> bool {
        self.slot.borrow().is_some()
    }

    fn take(&self) -> Option<(AnimationResult, Duration)> {
        self.slot.borrow_mut().take()
    }
}

impl Playback {
    pub fn new(toolkit: &Headless) -> Self {
        Self {
            toolkit: toolkit.clone(),
            pool: LocalPool::new(),
        }
    }

    pub fn toolkit(&self) -> &Headless {
        &self.toolkit
    }

    /// Starts awaiting `unit`. Nothing is polled until the playback
    /// runs.
    pub fn spawn(&mut self, unit: Completion) -> Outcome {
        let outcome = Outcome::default();
        let slot = outcome.slot.clone();
        let toolkit = self.toolkit.clone();

        let task = async move {
            let result = unit.await;
            *slot.borrow_mut() = Some((result, toolkit.now()));
        };

        if let Err(error) = self.pool.spawner().spawn_local(task) {
            let failure = AnimationError::Toolkit(error.to_string());
            let now = self.now();
            *outcome.slot.borrow_mut() = Some((Err(failure), now));
        }
        outcome
    }

    /// Polls every spawned unit until none can make progress without
    /// another frame.
    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn step(&mut self) {
        self.pool.run_until_stalled();
        self.toolkit.step();
        self.pool.run_until_stalled();
    }

    /// Steps frames until the toolkit clock moved by at least
    /// `duration`.
    pub fn advance(&mut self, duration: Duration) {
        let until = self.now() + duration;
        self.pool.run_until_stalled();
        while self.now() < until {
            self.step();
        }
    }

    pub fn now(&self) -> Duration {
        self.toolkit.now()
    }
}

impl fmt::Debug for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playback")
            .field("toolkit", &self.toolkit)
            .finish_non_exhaustive()
    }
}
