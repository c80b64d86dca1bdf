//! The focus screen without its window: timer, surface, session bookkeeping
//! and the key map. `app::StudioApp` drives it from the runtime.

use deepwork_engine::coords::{Rect, Vec2, Viewport};
use deepwork_engine::core::AppControl;
use deepwork_engine::input::Key;
use deepwork_engine::modes::{ModeId, ModePainter, ModeParams};
use deepwork_engine::scene::{DrawList, ZIndex};
use deepwork_engine::session::{SessionBackend, SessionTracker};
use deepwork_engine::surface::{
    Container, LayoutSlot, SurfaceConfig, SurfaceDriver, SurfaceEvent, SurfacePlacement,
};
use deepwork_engine::time::{Clock, SystemClock};
use deepwork_engine::timer::{FocusTimer, TimerError};
use deepwork_engine::window::WindowEvent;

use crate::hud::{self, HudState, PANEL_WIDTH};

const MIN_MINUTES: u32 = 5;
const MAX_MINUTES: u32 = 600;
const MINUTE_STEP: u32 = 5;

/// Startup configuration, built from the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusSettings {
    pub duration_secs: u32,
    pub mode: ModeId,
    pub surface: SurfaceConfig,
}

/// Where the surface and the panel sit in the window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Layout {
    pub stage: Rect,
    pub hud: Option<Rect>,
}

/// One composed frame, ready for presentation.
#[derive(Debug, Default)]
pub struct Composition {
    /// Latest surface frame in surface-local logical units.
    pub surface: DrawList,
    /// Where the surface frame goes; `None` until the surface first commits.
    pub placement: Option<SurfacePlacement>,
    /// Window-space panel drawing, presented above the surface.
    pub overlay: DrawList,
}

pub struct FocusScreen<C: Clock + Clone = SystemClock> {
    clock: C,
    timer: FocusTimer<C>,
    slot: LayoutSlot,
    surface: SurfaceDriver<ModePainter>,
    sessions: SessionTracker,
    backend: Box<dyn SessionBackend>,
    layout: Layout,
    hud_visible: bool,
    completion_reported: bool,
}

impl FocusScreen<SystemClock> {
    pub fn new(settings: FocusSettings, backend: Box<dyn SessionBackend>) -> Result<Self, TimerError> {
        Self::with_clock(settings, SystemClock::new(), backend)
    }
}

impl<C: Clock + Clone> FocusScreen<C> {
    pub fn with_clock(
        settings: FocusSettings,
        clock: C,
        backend: Box<dyn SessionBackend>,
    ) -> Result<Self, TimerError> {
        let timer = FocusTimer::with_clock(settings.duration_secs, clock.clone())?;
        let slot = LayoutSlot::default();
        let surface = SurfaceDriver::mount(slot.clone(), ModePainter::new(settings.mode), settings.surface, clock.now());

        Ok(Self {
            clock,
            timer,
            slot,
            surface,
            sessions: SessionTracker::new(),
            backend,
            layout: Layout::default(),
            hud_visible: true,
            completion_reported: false,
        })
    }

    pub fn timer(&self) -> &FocusTimer<C> {
        &self.timer
    }

    pub fn surface(&self) -> &SurfaceDriver<ModePainter> {
        &self.surface
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn mode(&self) -> ModeId {
        self.surface.painter().mode()
    }

    pub fn params(&self) -> ModeParams {
        self.surface.painter().params()
    }

    /// Window title for the current state, e.g. `24:59 · orbit`.
    pub fn title(&self) -> String {
        let phase = if self.params().is_break { "break" } else { self.mode().name() };
        format!("{} · {phase}", self.timer.format_remaining())
    }

    fn params_mut(&mut self) -> &mut ModeParams {
        self.surface.painter_mut().params_mut()
    }

    // ── layout ────────────────────────────────────────────────────────────

    /// Lays the screen out for a window of logical size `window` and pushes
    /// the stage size into the surface's container.
    pub fn set_window(&mut self, window: Viewport, device_ratio: f64) {
        let bounds = Rect::from_viewport(window);
        self.layout = if self.hud_visible {
            let (stage, panel) = bounds.split_right(PANEL_WIDTH.min(window.width * 0.4));
            Layout { stage, hud: Some(panel) }
        } else {
            Layout { stage: bounds, hud: None }
        };

        let stage = self.layout.stage.viewport();
        if stage != self.slot.layout_size() {
            self.slot.set_size(stage);
            self.surface.on_event(SurfaceEvent::ContainerResized);
        }
        if device_ratio != self.slot.device_ratio() {
            self.slot.set_device_ratio(device_ratio);
            self.surface.on_event(SurfaceEvent::ScaleFactorChanged(device_ratio));
        }
    }

    // ── input ─────────────────────────────────────────────────────────────

    pub fn on_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(_) => self.surface.on_event(SurfaceEvent::WindowResized),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.slot.set_device_ratio(*scale_factor);
                self.surface.on_event(SurfaceEvent::ScaleFactorChanged(*scale_factor));
            }
            WindowEvent::Occluded(occluded) => {
                self.surface.on_event(SurfaceEvent::VisibilityChanged(!*occluded));
            }
            WindowEvent::CloseRequested => self.shutdown(),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: Key) -> AppControl {
        match key {
            Key::Escape => {
                self.shutdown();
                return AppControl::Exit;
            }
            Key::Space => self.toggle_running(),
            Key::R => self.reset(None),
            Key::E => {
                self.timer.pause();
                self.end_session();
            }
            Key::ArrowUp => self.adjust_minutes(MINUTE_STEP as i64),
            Key::ArrowDown => self.adjust_minutes(-(MINUTE_STEP as i64)),
            Key::Tab => self.select_mode(self.mode().next()),
            Key::B => {
                let params = self.params_mut();
                params.is_break = !params.is_break;
                log::info!("break: {}", params.is_break);
            }
            Key::I => {
                let params = self.params_mut();
                params.allow_interaction = !params.allow_interaction;
                log::info!("interaction: {}", params.allow_interaction);
            }
            Key::H => {
                self.hud_visible = !self.hud_visible;
                log::debug!("hud visible: {}", self.hud_visible);
            }
            other => {
                if let Some(d) = other.digit().filter(|d| (1..=ModeId::COUNT as u8).contains(d)) {
                    self.select_mode(ModeId::ALL[d as usize - 1]);
                }
            }
        }
        AppControl::Continue
    }

    /// Pointer press at `pos` in window coordinates.
    pub fn pointer_down(&mut self, pos: Vec2) {
        let stage = self.layout.stage;
        if stage.contains(pos) {
            self.surface.on_event(SurfaceEvent::PointerDown(pos - stage.origin));
        }
    }

    fn select_mode(&mut self, mode: ModeId) {
        self.surface.painter_mut().select(mode);
    }

    fn toggle_running(&mut self) {
        if self.timer.is_running() {
            self.timer.pause();
            if self.sessions.is_active() {
                self.sessions.interrupt();
                self.params_mut().interruption_detected = true;
            }
            return;
        }

        if self.timer.remaining() == 0 {
            log::debug!("timer finished; reset before starting again");
            return;
        }

        self.timer.start();
        self.params_mut().interruption_detected = false;

        if !self.sessions.is_active() {
            let (mode, remaining) = (self.mode(), self.timer.remaining());
            if let Err(e) = self.sessions.begin(self.backend.as_mut(), mode, remaining) {
                log::warn!("failed to start session: {e}");
            }
        }
    }

    fn reset(&mut self, duration: Option<u32>) {
        if let Err(e) = self.timer.reset(duration) {
            log::warn!("reset rejected: {e}");
            return;
        }
        self.end_session();
        self.completion_reported = false;

        let params = self.params_mut();
        params.interruption_detected = false;
        params.progress = 0.0;
    }

    fn adjust_minutes(&mut self, delta: i64) {
        if self.timer.is_running() {
            log::debug!("duration is fixed while running");
            return;
        }
        let minutes = (self.timer.duration() / 60) as i64 + delta;
        let minutes = minutes.clamp(MIN_MINUTES as i64, MAX_MINUTES as i64) as u32;
        self.reset(Some(minutes * 60));
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Applies due timer ticks, reports completion and feeds progress to the
    /// active mode.
    pub fn update(&mut self) {
        self.timer.pump();

        if self.timer.remaining() == 0 && !self.completion_reported {
            self.completion_reported = true;
            if self.sessions.is_active() {
                match self.sessions.end(self.backend.as_mut()) {
                    Ok(n) => log::info!("focus block complete with {n} interruptions"),
                    Err(e) => log::warn!("failed to end session: {e}"),
                }
                let streak = self.sessions.completed() + 1;
                self.params_mut().streak_level = streak;
            }
        }

        let progress = self.timer.progress();
        self.surface.painter_mut().set_progress(progress);
    }

    /// Runs one surface slot and records the frame into `out`.
    pub fn compose(&mut self, out: &mut Composition) {
        out.surface.clear();
        out.overlay.clear();

        let now = self.clock.now();
        if let Some(frame) = self.surface.frame(now) {
            out.surface.append_translated(frame, Vec2::zero(), ZIndex::SURFACE);
        }
        out.placement = self.surface.placement(self.layout.stage);

        if let Some(panel) = self.layout.hud {
            hud::draw(&mut out.overlay, panel, &self.hud_state());
        }
    }

    /// One runtime frame. Keys go first so a layout change they cause (the
    /// panel toggle) applies to this frame; clicks then hit the fresh layout.
    pub fn step(
        &mut self,
        window: Viewport,
        device_ratio: f64,
        keys: impl IntoIterator<Item = Key>,
        clicks: impl IntoIterator<Item = Vec2>,
        out: &mut Composition,
    ) -> AppControl {
        for key in keys {
            if self.handle_key(key) == AppControl::Exit {
                return AppControl::Exit;
            }
        }

        self.set_window(window, device_ratio);
        for pos in clicks {
            self.pointer_down(pos);
        }

        self.update();
        self.compose(out);
        AppControl::Continue
    }

    pub fn hud_state(&self) -> HudState {
        let params = self.params();
        HudState {
            countdown: self.timer.format_remaining(),
            progress: self.timer.progress(),
            running: self.timer.is_running(),
            is_break: params.is_break,
            mode: self.mode(),
            interruptions: self.sessions.interruptions(),
            completed: self.sessions.completed(),
        }
    }

    /// Reports the active session, if any, to the backend.
    fn end_session(&mut self) {
        if !self.sessions.is_active() {
            return;
        }
        match self.sessions.end(self.backend.as_mut()) {
            Ok(n) => log::info!("session ended early with {n} interruptions"),
            Err(e) => log::warn!("failed to end session: {e}"),
        }
    }

    fn shutdown(&mut self) {
        self.end_session();
        self.surface.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use deepwork_engine::scene::DrawCmd;
    use deepwork_engine::session::{SessionError, SessionId};
    use deepwork_engine::time::ManualClock;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Start(ModeId, u32),
        End(String, u32),
    }

    #[derive(Clone, Default)]
    struct Recording(Rc<RefCell<Vec<Call>>>);

    impl SessionBackend for Recording {
        fn start_session(&mut self, mode: ModeId, estimated_secs: u32) -> Result<SessionId, SessionError> {
            self.0.borrow_mut().push(Call::Start(mode, estimated_secs));
            Ok(SessionId("s1".into()))
        }

        fn end_session(&mut self, id: &SessionId, interruptions: u32) -> Result<(), SessionError> {
            self.0.borrow_mut().push(Call::End(id.0.clone(), interruptions));
            Ok(())
        }
    }

    fn screen(secs: u32) -> (FocusScreen<ManualClock>, ManualClock, Recording) {
        let clock = ManualClock::new();
        let calls = Recording::default();
        let settings = FocusSettings { duration_secs: secs, mode: ModeId::Ice, surface: SurfaceConfig::default() };
        let mut screen = FocusScreen::with_clock(settings, clock.clone(), Box::new(calls.clone())).unwrap();
        screen.set_window(Viewport::new(1000.0, 600.0), 1.0);
        (screen, clock, calls)
    }

    #[test]
    fn zero_duration_is_rejected() {
        let settings = FocusSettings { duration_secs: 0, mode: ModeId::Ice, surface: SurfaceConfig::default() };
        assert!(FocusScreen::with_clock(settings, ManualClock::new(), Box::new(Recording::default())).is_err());
    }

    #[test]
    fn space_starts_timer_and_session() {
        let (mut screen, _clock, calls) = screen(600);
        screen.handle_key(Key::Space);

        assert!(screen.timer().is_running());
        assert!(screen.sessions().is_active());
        assert_eq!(*calls.0.borrow(), vec![Call::Start(ModeId::Ice, 600)]);
    }

    #[test]
    fn pausing_counts_an_interruption() {
        let (mut screen, clock, _calls) = screen(600);
        screen.handle_key(Key::Space);
        clock.advance_secs(3);
        screen.update();
        screen.handle_key(Key::Space);

        assert!(!screen.timer().is_running());
        assert_eq!(screen.timer().remaining(), 597);
        assert_eq!(screen.sessions().interruptions(), 1);
        assert!(screen.params().interruption_detected);

        // Resuming continues the same session.
        screen.handle_key(Key::Space);
        assert!(!screen.params().interruption_detected);
        assert_eq!(screen.sessions().interruptions(), 1);
    }

    #[test]
    fn reaching_zero_ends_the_session_once() {
        let (mut screen, clock, calls) = screen(60);
        screen.handle_key(Key::Space);
        clock.advance_secs(61);
        screen.update();
        clock.advance_secs(5);
        screen.update();

        assert_eq!(screen.timer().remaining(), 0);
        // The timer itself does not stop at zero.
        assert!(screen.timer().is_running());
        assert!(!screen.sessions().is_active());
        assert_eq!(screen.sessions().completed(), 1);
        assert_eq!(screen.params().streak_level, 2);
        assert_eq!(screen.params().progress, 1.0);
        assert_eq!(
            *calls.0.borrow(),
            vec![Call::Start(ModeId::Ice, 60), Call::End("s1".into(), 0)]
        );
    }

    #[test]
    fn reset_ends_the_session_with_its_interruptions() {
        let (mut screen, clock, calls) = screen(300);
        screen.handle_key(Key::Space);
        clock.advance_secs(75);
        screen.update();
        screen.handle_key(Key::Space);
        screen.handle_key(Key::R);
        screen.update();

        assert_eq!(screen.timer().remaining(), 300);
        assert!(!screen.timer().is_running());
        assert!(!screen.sessions().is_active());
        assert_eq!(screen.params().progress, 0.0);
        assert_eq!(
            *calls.0.borrow(),
            vec![Call::Start(ModeId::Ice, 300), Call::End("s1".into(), 1)]
        );
    }

    #[test]
    fn end_key_pauses_and_reports_the_session() {
        let (mut screen, clock, calls) = screen(600);
        screen.handle_key(Key::Space);
        clock.advance_secs(10);
        screen.update();
        screen.handle_key(Key::E);

        assert!(!screen.timer().is_running());
        assert_eq!(screen.timer().remaining(), 590);
        assert!(!screen.sessions().is_active());
        assert_eq!(screen.sessions().completed(), 1);
        assert_eq!(
            *calls.0.borrow(),
            vec![Call::Start(ModeId::Ice, 600), Call::End("s1".into(), 0)]
        );

        // Nothing to end the second time.
        screen.handle_key(Key::E);
        assert_eq!(calls.0.borrow().len(), 2);
    }

    #[test]
    fn duration_change_without_a_session_reports_nothing() {
        let (mut screen, _clock, calls) = screen(600);
        screen.handle_key(Key::ArrowUp);
        screen.handle_key(Key::R);
        assert!(calls.0.borrow().is_empty());
    }

    #[test]
    fn arrows_change_duration_only_while_paused() {
        let (mut screen, _clock, _calls) = screen(25 * 60);
        screen.handle_key(Key::ArrowUp);
        assert_eq!(screen.timer().duration(), 30 * 60);

        screen.handle_key(Key::Space);
        screen.handle_key(Key::ArrowDown);
        assert_eq!(screen.timer().duration(), 30 * 60);
    }

    #[test]
    fn duration_is_clamped_to_five_minutes() {
        let (mut screen, _clock, _calls) = screen(5 * 60);
        screen.handle_key(Key::ArrowDown);
        assert_eq!(screen.timer().duration(), 5 * 60);
    }

    #[test]
    fn digits_select_modes() {
        let (mut screen, _clock, _calls) = screen(600);
        screen.handle_key(Key::Digit4);
        assert_eq!(screen.mode(), ModeId::Ripple);
        screen.handle_key(Key::Digit7);
        assert_eq!(screen.mode(), ModeId::Ripple);
        screen.handle_key(Key::Digit0);
        assert_eq!(screen.mode(), ModeId::Ripple);
        screen.handle_key(Key::Tab);
        assert_eq!(screen.mode(), ModeId::Ripple.next());
    }

    #[test]
    fn hud_toggle_resizes_the_stage_in_the_same_frame() {
        let (mut screen, _clock, _calls) = screen(600);
        let window = Viewport::new(1000.0, 600.0);
        let mut out = Composition::default();
        screen.step(window, 1.0, [], [], &mut out);
        assert_eq!(screen.surface().committed_size(), Viewport::new(1000.0 - PANEL_WIDTH, 600.0));

        screen.step(window, 1.0, [Key::H], [], &mut out);

        assert_eq!(screen.layout().hud, None);
        assert!(out.overlay.is_empty());
        assert_eq!(screen.surface().committed_size(), window);
        assert_eq!(out.placement.map(|p| p.clip), Some(Rect::from_viewport(window)));
        assert_eq!(screen.surface().stats().resizes, 2);
    }

    #[test]
    fn clicks_reach_the_surface_in_the_frame_they_arrive() {
        let (mut screen, _clock, _calls) = screen(600);
        let window = Viewport::new(1000.0, 600.0);
        let mut out = Composition::default();
        let rings = |out: &Composition| {
            out.surface.items().iter().filter(|i| matches!(i.cmd, DrawCmd::Ellipse(_))).count()
        };

        screen.step(window, 1.0, [Key::Digit4], [], &mut out);
        let idle = rings(&out);
        screen.step(window, 1.0, [], [Vec2::new(100.0, 100.0)], &mut out);
        assert_eq!(rings(&out), idle + 2);

        // Presses on the panel stay out of the surface.
        screen.step(window, 1.0, [], [Vec2::new(900.0, 100.0)], &mut out);
        assert_eq!(rings(&out), idle + 2);
    }

    #[test]
    fn surface_frame_is_placed_on_the_stage() {
        let (mut screen, _clock, _calls) = screen(600);
        let mut out = Composition::default();
        screen.compose(&mut out);

        let stage = screen.layout().stage;
        assert!(!out.surface.is_empty());
        assert!(out.surface.items().iter().all(|i| i.key.z == ZIndex::SURFACE));

        let placement = out.placement.unwrap();
        assert_eq!(placement.clip, stage);
        assert_eq!(placement.dest(), stage);

        let panel = screen.layout().hud.unwrap();
        assert!(!out.overlay.is_empty());
        assert!(out.overlay.items().iter().all(|i| i.clip_rect == Some(panel)));
    }

    #[test]
    fn occlusion_and_device_ratio_reach_the_surface() {
        let (mut screen, _clock, _calls) = screen(600);
        let mut out = Composition::default();
        screen.compose(&mut out);

        screen.set_window(Viewport::new(1000.0, 600.0), 3.0);
        screen.compose(&mut out);
        // Capped by the default max scale, and presented at the capped scale.
        assert_eq!(screen.surface().scale(), 2.0);
        let placement = out.placement.unwrap();
        assert_eq!(placement.scale, 2.0);
        assert_eq!(placement.backing.width, ((1000.0 - PANEL_WIDTH) * 2.0) as u32);

        screen.on_window_event(&WindowEvent::Occluded(true));
        screen.compose(&mut out);
        assert_eq!(screen.surface().stats().resizes, 2);
    }

    #[test]
    fn max_scale_setting_bounds_the_presented_density() {
        let clock = ManualClock::new();
        let surface = SurfaceConfig { max_scale: 1.25, ..SurfaceConfig::default() };
        let settings = FocusSettings { duration_secs: 600, mode: ModeId::Drift, surface };
        let mut screen = FocusScreen::with_clock(settings, clock, Box::new(Recording::default())).unwrap();

        let mut out = Composition::default();
        screen.step(Viewport::new(800.0, 400.0), 2.0, [Key::H], [], &mut out);

        let placement = out.placement.unwrap();
        assert_eq!(placement.scale, 1.25);
        assert_eq!((placement.backing.width, placement.backing.height), (1000, 500));
    }

    #[test]
    fn escape_exits_unmounts_and_reports() {
        let (mut screen, _clock, calls) = screen(600);
        screen.handle_key(Key::Space);
        let mut out = Composition::default();
        let control = screen.step(Viewport::new(1000.0, 600.0), 1.0, [Key::Escape], [], &mut out);

        assert_eq!(control, AppControl::Exit);
        assert!(!screen.surface().is_mounted());
        assert!(!screen.sessions().is_active());
        assert_eq!(calls.0.borrow().last(), Some(&Call::End("s1".into(), 0)));
    }

    #[test]
    fn close_request_reports_the_session() {
        let (mut screen, _clock, calls) = screen(600);
        screen.handle_key(Key::Space);
        screen.on_window_event(&WindowEvent::CloseRequested);

        assert!(!screen.surface().is_mounted());
        assert_eq!(calls.0.borrow().len(), 2);
    }

    #[test]
    fn title_shows_countdown_and_phase() {
        let (mut screen, _clock, _calls) = screen(1500);
        assert_eq!(screen.title(), "25:00 · ice");
        screen.handle_key(Key::B);
        assert_eq!(screen.title(), "25:00 · break");
    }
}
