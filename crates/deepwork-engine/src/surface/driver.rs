use std::any::Any;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::coords::{Rect, Vec2, Viewport};
use crate::scene::DrawList;
use crate::time::FrameClock;

use super::{
    BackingSize, Canvas, Container, LayoutSlot, MeasureOutcome, SizingState, SurfaceConfig, SurfacePlacement,
};

/// Per-frame paint contract.
///
/// Routines draw into `canvas` in logical units covering `size`; `timestamp`
/// is the time since the surface was mounted (zero for the immediate paint
/// that follows a resize). Returning `Err` or panicking discards the partial
/// frame; the previous frame stays visible.
pub trait PaintRoutine {
    fn paint(&mut self, canvas: &mut Canvas<'_>, size: Viewport, timestamp: Duration) -> anyhow::Result<()>;

    /// Pointer press inside the surface, in surface-local logical units.
    fn pointer_down(&mut self, _pos: Vec2, _timestamp: Duration) {}
}

impl<F> PaintRoutine for F
where
    F: FnMut(&mut Canvas<'_>, Viewport, Duration) -> anyhow::Result<()>,
{
    fn paint(&mut self, canvas: &mut Canvas<'_>, size: Viewport, timestamp: Duration) -> anyhow::Result<()> {
        self(canvas, size, timestamp)
    }
}

/// Host-side notifications the driver listens for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    ContainerResized,
    WindowResized,
    ScaleFactorChanged(f64),
    VisibilityChanged(bool),
    /// Pointer press in surface-local logical units.
    PointerDown(Vec2),
}

/// Listener kinds attached while mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// Container, window and scale-factor changes.
    Resize,
    Visibility,
    Pointer,
}

#[derive(Debug, Default, Clone, Copy)]
struct Listeners {
    resize: bool,
    visibility: bool,
    pointer: bool,
}

impl Listeners {
    fn all() -> Self {
        Self { resize: true, visibility: true, pointer: true }
    }

    fn slot(&mut self, kind: Listener) -> &mut bool {
        match kind {
            Listener::Resize => &mut self.resize,
            Listener::Visibility => &mut self.visibility,
            Listener::Pointer => &mut self.pointer,
        }
    }

    fn is_attached(&self, kind: Listener) -> bool {
        match kind {
            Listener::Resize => self.resize,
            Listener::Visibility => self.visibility,
            Listener::Pointer => self.pointer,
        }
    }
}

/// Counters for diagnostics and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceStats {
    pub frames_painted: u64,
    pub paint_failures: u64,
    pub deferred_measures: u64,
    pub resizes: u64,
}

/// Drives one drawable surface: tracks its container size, repaints it once
/// per frame slot and keeps the last good frame.
///
/// The driver owns no window or GPU resources. Each slot records a fresh
/// `DrawList` through a `Canvas`; the host presents whatever `frame` returns.
pub struct SurfaceDriver<P: PaintRoutine, C: Container = LayoutSlot> {
    container: C,
    painter: P,
    config: SurfaceConfig,

    committed: Viewport,
    scale: f32,
    backing: Option<BackingSize>,
    sizing: SizingState,
    listeners: Listeners,

    clock: FrameClock,
    last_timestamp: Duration,

    scratch: DrawList,
    last_good: Option<DrawList>,

    stats: SurfaceStats,
    mounted: bool,
}

impl<P: PaintRoutine, C: Container> SurfaceDriver<P, C> {
    /// Mounts a surface over `container` at time `now` (host clock).
    ///
    /// Nothing is measured or painted until the first `frame` call.
    pub fn mount(container: C, painter: P, config: SurfaceConfig, now: Duration) -> Self {
        log::debug!("surface mounted (max_scale={}, min_extent={})", config.max_scale, config.min_extent);
        Self {
            container,
            painter,
            config,
            committed: Viewport::default(),
            scale: 1.0,
            backing: None,
            sizing: SizingState::Measuring,
            listeners: Listeners::all(),
            clock: FrameClock::starting_at(now),
            last_timestamp: Duration::ZERO,
            scratch: DrawList::new(),
            last_good: None,
            stats: SurfaceStats::default(),
            mounted: true,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[inline]
    pub fn committed_size(&self) -> Viewport {
        self.committed
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn backing_size(&self) -> Option<BackingSize> {
        self.backing
    }

    #[inline]
    pub fn sizing_state(&self) -> SizingState {
        self.sizing
    }

    #[inline]
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    #[inline]
    pub fn config(&self) -> SurfaceConfig {
        self.config
    }

    /// Placement of the committed surface at `clip` in host space, or `None`
    /// before the first commit and after unmount.
    ///
    /// During a deferred re-measure this still describes the last committed
    /// size, matching the frame `frame` keeps showing.
    pub fn placement(&self, clip: Rect) -> Option<SurfacePlacement> {
        if !self.mounted {
            return None;
        }
        self.backing.map(|backing| SurfacePlacement { clip, backing, scale: self.scale })
    }

    /// Most recent successfully painted frame, if any.
    #[inline]
    pub fn last_frame(&self) -> Option<&DrawList> {
        if self.mounted { self.last_good.as_ref() } else { None }
    }

    #[inline]
    pub fn container(&self) -> &C {
        &self.container
    }

    #[inline]
    pub fn painter(&self) -> &P {
        &self.painter
    }

    /// Mutable access for parameter updates between frames.
    #[inline]
    pub fn painter_mut(&mut self) -> &mut P {
        &mut self.painter
    }

    /// Swaps the paint routine; the old one is returned. The last good frame
    /// stays visible until the new routine paints successfully.
    pub fn set_painter(&mut self, painter: P) -> P {
        mem::replace(&mut self.painter, painter)
    }

    pub fn is_listening(&self, kind: Listener) -> bool {
        self.mounted && self.listeners.is_attached(kind)
    }

    /// Detaches a single listener; events of that kind are ignored afterwards.
    pub fn detach(&mut self, kind: Listener) {
        *self.listeners.slot(kind) = false;
    }

    // ── events ────────────────────────────────────────────────────────────

    /// Feeds a host event to the driver.
    ///
    /// Size-related events mark the surface for re-measure at the next frame.
    /// Events for detached listeners, or after unmount, are ignored.
    pub fn on_event(&mut self, event: SurfaceEvent) {
        if !self.mounted {
            return;
        }

        match event {
            SurfaceEvent::ContainerResized | SurfaceEvent::WindowResized => {
                if self.listeners.resize {
                    self.sizing = SizingState::Measuring;
                }
            }
            SurfaceEvent::ScaleFactorChanged(ratio) => {
                if self.listeners.resize {
                    log::debug!("surface scale factor changed to {ratio}");
                    self.sizing = SizingState::Measuring;
                }
            }
            SurfaceEvent::VisibilityChanged(visible) => {
                if self.listeners.visibility {
                    log::trace!("surface visibility changed: {visible}");
                    self.sizing = SizingState::Measuring;
                }
            }
            SurfaceEvent::PointerDown(pos) => {
                let inside = Rect::from_viewport(self.committed).contains(pos);
                if self.listeners.pointer && self.backing.is_some() && inside {
                    self.painter.pointer_down(pos, self.last_timestamp);
                }
            }
        }
    }

    // ── sizing ────────────────────────────────────────────────────────────

    /// Measures the container and commits a new size if it changed.
    ///
    /// A committed resize paints once immediately with timestamp zero.
    pub fn remeasure(&mut self) -> MeasureOutcome {
        if !self.mounted {
            return MeasureOutcome::Unchanged;
        }

        let size = self.container.layout_size();
        if !size.is_at_least(self.config.min_extent) {
            self.sizing = SizingState::Measuring;
            self.stats.deferred_measures += 1;
            log::trace!("surface measure deferred: {}x{}", size.width, size.height);
            return MeasureOutcome::Deferred;
        }

        self.sizing = SizingState::Stable;

        let scale = self.config.resolve_scale(self.container.device_ratio());
        if self.backing.is_some() && size == self.committed && scale == self.scale {
            return MeasureOutcome::Unchanged;
        }

        let backing = BackingSize::for_layout(size, scale);
        self.committed = size;
        self.scale = scale;
        self.backing = Some(backing);
        self.stats.resizes += 1;
        log::debug!(
            "surface resized to {}x{} @{scale} ({}x{} px)",
            size.width,
            size.height,
            backing.width,
            backing.height
        );

        self.paint_at(Duration::ZERO);
        MeasureOutcome::Resized(backing)
    }

    // ── frame loop ────────────────────────────────────────────────────────

    /// Runs one repaint slot at host time `now` and returns the frame to
    /// present.
    ///
    /// A pending re-measure runs first; if it commits a resize, its immediate
    /// paint is this slot's paint. While the container measures below the
    /// minimum extent the routine is not invoked and the last good frame (if
    /// any) is returned.
    pub fn frame(&mut self, now: Duration) -> Option<&DrawList> {
        if !self.mounted {
            return None;
        }

        let time = self.clock.tick(now);
        self.last_timestamp = time.timestamp;

        if self.sizing == SizingState::Measuring {
            match self.remeasure() {
                MeasureOutcome::Resized(_) | MeasureOutcome::Deferred => return self.last_good.as_ref(),
                MeasureOutcome::Unchanged => {}
            }
        }

        if self.backing.is_some() {
            self.paint_at(time.timestamp);
        }

        self.last_good.as_ref()
    }

    /// Detaches all listeners and stops painting. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.listeners = Listeners::default();
        self.sizing = SizingState::Measuring;
        self.last_good = None;
        self.scratch.clear();
        log::debug!(
            "surface unmounted after {} frames ({} failed)",
            self.stats.frames_painted,
            self.stats.paint_failures
        );
    }

    fn paint_at(&mut self, timestamp: Duration) {
        let size = self.committed;
        self.scratch.clear();

        let result = {
            let mut canvas = Canvas::new(&mut self.scratch, size);
            let painter = &mut self.painter;
            panic::catch_unwind(AssertUnwindSafe(|| painter.paint(&mut canvas, size, timestamp)))
        };

        match result {
            Ok(Ok(())) => {
                match self.last_good.as_mut() {
                    Some(good) => mem::swap(good, &mut self.scratch),
                    None => self.last_good = Some(mem::take(&mut self.scratch)),
                }
                self.stats.frames_painted += 1;
            }
            Ok(Err(err)) => {
                self.stats.paint_failures += 1;
                log::debug!("surface paint failed: {err:#}");
            }
            Err(payload) => {
                self.stats.paint_failures += 1;
                log::debug!("surface paint panicked: {}", panic_message(payload.as_ref()));
            }
        }
    }
}

impl<P: PaintRoutine, C: Container> Drop for SurfaceDriver<P, C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
