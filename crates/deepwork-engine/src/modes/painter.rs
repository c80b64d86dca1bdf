use std::time::Duration;

use crate::coords::{Vec2, Viewport};
use crate::surface::{Canvas, PaintRoutine};

use super::{ModeId, ModeParams, ModeRegistry, ModeRoutine};

/// Surface paint routine showing one mode at a time.
///
/// Switching modes replaces the routine wholesale; routine-local state (user
/// ripples, seeded cracks) starts fresh.
pub struct ModePainter {
    registry: ModeRegistry,
    mode: ModeId,
    routine: Box<dyn ModeRoutine>,
    params: ModeParams,
}

impl ModePainter {
    pub fn new(mode: ModeId) -> Self {
        Self::with_registry(ModeRegistry::builtin(), mode)
    }

    pub fn with_registry(registry: ModeRegistry, mode: ModeId) -> Self {
        let routine = registry.create(mode);
        Self { registry, mode, routine, params: ModeParams::default() }
    }

    #[inline]
    pub fn mode(&self) -> ModeId {
        self.mode
    }

    #[inline]
    pub fn params(&self) -> ModeParams {
        self.params
    }

    pub fn set_params(&mut self, params: ModeParams) {
        self.params = params;
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.params.progress = progress;
    }

    pub fn params_mut(&mut self) -> &mut ModeParams {
        &mut self.params
    }

    /// Switches to `mode`. Re-selecting the active mode keeps its state.
    pub fn select(&mut self, mode: ModeId) {
        if mode == self.mode {
            return;
        }
        log::info!("mode: {} -> {}", self.mode, mode);
        self.routine = self.registry.create(mode);
        self.mode = mode;
    }
}

impl PaintRoutine for ModePainter {
    fn paint(&mut self, canvas: &mut Canvas<'_>, _size: Viewport, timestamp: Duration) -> anyhow::Result<()> {
        let params = self.params.sanitized();
        self.routine.paint(canvas, &params, timestamp)
    }

    fn pointer_down(&mut self, pos: Vec2, timestamp: Duration) {
        let params = self.params.sanitized();
        self.routine.pointer_down(pos, timestamp, &params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::test_support::paint_once;
    use crate::scene::DrawList;
    use crate::surface::{LayoutSlot, SurfaceConfig, SurfaceDriver};

    struct Blank;

    impl ModeRoutine for Blank {
        fn paint(&mut self, _: &mut Canvas<'_>, _: &ModeParams, _: Duration) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn every_builtin_mode_paints_something() {
        let registry = ModeRegistry::builtin();
        for mode in ModeId::ALL {
            for progress in [0.0, 0.5, 1.0] {
                let params = ModeParams { progress, is_break: true, interruption_detected: true, ..Default::default() };
                let list = paint_once(registry.create(mode).as_mut(), params, Duration::from_millis(1234));
                assert!(!list.is_empty(), "{mode} at {progress} painted nothing");
            }
        }
    }

    #[test]
    fn registered_factory_overrides_builtin() {
        let mut registry = ModeRegistry::builtin();
        registry.register(ModeId::Orbit, || Box::new(Blank));
        let list = paint_once(registry.create(ModeId::Orbit).as_mut(), ModeParams::default(), Duration::ZERO);
        assert!(list.is_empty());
    }

    #[test]
    fn select_swaps_routine() {
        let mut registry = ModeRegistry::builtin();
        registry.register(ModeId::Drift, || Box::new(Blank));
        let mut painter = ModePainter::with_registry(registry, ModeId::Ice);

        let slot = LayoutSlot::new(Viewport::new(64.0, 64.0), 1.0);
        let mut surface = SurfaceDriver::mount(slot, painter, SurfaceConfig::default(), Duration::ZERO);
        assert!(surface.frame(Duration::ZERO).is_some_and(|l| !l.is_empty()));

        surface.painter_mut().select(ModeId::Drift);
        assert_eq!(surface.painter().mode(), ModeId::Drift);
        assert!(surface.frame(Duration::from_millis(16)).is_some_and(DrawList::is_empty));

        painter = ModePainter::new(ModeId::Growth);
        let old = surface.set_painter(painter);
        assert_eq!(old.mode(), ModeId::Drift);
    }

    #[test]
    fn params_are_sanitized_before_painting() {
        let mut painter = ModePainter::new(ModeId::Drift);
        painter.set_progress(f32::NAN);
        let mut list = DrawList::new();
        let mut canvas = Canvas::new(&mut list, Viewport::new(100.0, 100.0));
        painter.paint(&mut canvas, Viewport::new(100.0, 100.0), Duration::ZERO).unwrap();
        drop(canvas);
        assert!(list.items().iter().all(|item| match &item.cmd {
            crate::scene::DrawCmd::Triangle(t) => t.points.iter().all(|p| p.is_finite()),
            _ => true,
        }));
    }
}
