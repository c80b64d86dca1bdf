use deepwork_engine::core::{App, AppControl, FrameCtx};
use deepwork_engine::paint::Color;
use deepwork_engine::render::{SceneRenderer, SurfaceCompositor};
use deepwork_engine::window::{WindowEvent, WindowId};

use crate::focus::{Composition, FocusScreen};

/// Shown wherever neither the surface nor the panel paints.
const BACKGROUND: Color = Color { r: 0.02, g: 0.03, b: 0.06, a: 1.0 };

/// Runtime adapter: feeds window input to the focus screen and presents its
/// composition every frame.
pub struct StudioApp {
    screen: FocusScreen,
    compositor: SurfaceCompositor,
    overlay: SceneRenderer,
    frame: Composition,
    title: String,
}

impl StudioApp {
    pub fn new(screen: FocusScreen) -> Self {
        Self {
            screen,
            compositor: SurfaceCompositor::new(),
            overlay: SceneRenderer::new(),
            frame: Composition::default(),
            title: String::new(),
        }
    }
}

impl App for StudioApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        self.screen.on_window_event(event);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let control = self.screen.step(
            ctx.window.logical_size(),
            ctx.window.scale_factor(),
            ctx.input_frame.keys_pressed.iter().copied(),
            ctx.input_frame.left_clicks(),
            &mut self.frame,
        );
        if control == AppControl::Exit {
            return AppControl::Exit;
        }

        let title = self.screen.title();
        if title != self.title {
            ctx.runtime.set_title(ctx.window.id, title.clone());
            self.title = title;
        }

        // Surface at its own capped density first, then the panel on top.
        let (compositor, overlay, frame) = (&mut self.compositor, &mut self.overlay, &mut self.frame);
        ctx.render(|rctx, target| {
            compositor.render(rctx, target, &mut frame.surface, frame.placement, Some(BACKGROUND));
            overlay.render(rctx, target, &mut frame.overlay, None);
        })
    }
}
