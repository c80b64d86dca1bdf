//! deepwork studio: a full-window focus screen.
//!
//! Keys: Space start/pause, E end session, R reset, Up/Down ±5 min (paused),
//! 1-6 or Tab mode, B break, I interaction, H panel, Esc quit. Clicks go to
//! the mode.

mod app;
mod backend;
mod cli;
mod focus;
mod hud;

use anyhow::Context;
use clap::Parser;

use deepwork_engine::device::GpuInit;
use deepwork_engine::logging::init_logging;
use deepwork_engine::window::Runtime;

use crate::app::StudioApp;
use crate::backend::LogSessionBackend;
use crate::cli::StudioArgs;
use crate::focus::FocusScreen;

fn main() -> anyhow::Result<()> {
    let args = StudioArgs::parse();
    init_logging(args.logging_config());

    let settings = args.focus_settings();
    log::info!(
        "deepwork studio: {} min, mode {}, max scale {}",
        args.minutes,
        settings.mode,
        settings.surface.max_scale
    );

    let screen = FocusScreen::new(settings, Box::new(LogSessionBackend::default()))
        .context("invalid focus settings")?;

    Runtime::run(args.runtime_config(), GpuInit::default(), StudioApp::new(screen))
}
