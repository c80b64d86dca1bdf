//! Command-line configuration.

use clap::Parser;

use deepwork_engine::logging::LoggingConfig;
use deepwork_engine::modes::ModeId;
use deepwork_engine::surface::SurfaceConfig;
use deepwork_engine::window::{LogicalSize, RuntimeConfig};

use crate::focus::FocusSettings;

#[derive(Debug, Parser)]
#[command(name = "deepwork-studio")]
#[command(about = "Immersive focus timer with animated focus modes")]
pub struct StudioArgs {
    /// Session length in minutes
    #[arg(short, long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..=600))]
    pub minutes: u32,

    /// Initial focus mode (ice, flight, orbit, ripple, growth, drift)
    #[arg(long, default_value = "ice")]
    pub mode: ModeId,

    /// Upper bound on the surface's device pixel ratio
    #[arg(long, default_value_t = 2.0)]
    pub max_scale: f32,

    /// Log filter, e.g. "debug" or "deepwork_engine=trace"
    #[arg(long)]
    pub log: Option<String>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1100.0)]
    pub width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 700.0)]
    pub height: f64,
}

impl StudioArgs {
    pub fn logging_config(&self) -> LoggingConfig {
        match &self.log {
            Some(filter) => LoggingConfig::with_filter(filter.clone()),
            None => LoggingConfig::default(),
        }
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: "deepwork".to_string(),
            initial_size: LogicalSize::new(self.width, self.height),
            ..RuntimeConfig::default()
        }
    }

    pub fn focus_settings(&self) -> FocusSettings {
        let max_scale = if self.max_scale.is_finite() && self.max_scale >= 1.0 {
            self.max_scale
        } else {
            log::warn!("ignoring --max-scale {}, using default", self.max_scale);
            SurfaceConfig::default().max_scale
        };

        FocusSettings {
            duration_secs: self.minutes * 60,
            mode: self.mode,
            surface: SurfaceConfig { max_scale, ..SurfaceConfig::default() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_pomodoro() {
        let args = StudioArgs::try_parse_from(["deepwork-studio"]).unwrap();
        let settings = args.focus_settings();
        assert_eq!(settings.duration_secs, 1500);
        assert_eq!(settings.mode, ModeId::Ice);
        assert_eq!(settings.surface.max_scale, 2.0);
        assert!(args.log.is_none());
    }

    #[test]
    fn mode_accepts_aliases() {
        let args = StudioArgs::try_parse_from(["deepwork-studio", "--mode", "Water Ripple"]).unwrap();
        assert_eq!(args.mode, ModeId::Ripple);
    }

    #[test]
    fn rejects_unknown_mode_and_zero_minutes() {
        assert!(StudioArgs::try_parse_from(["deepwork-studio", "--mode", "lava"]).is_err());
        assert!(StudioArgs::try_parse_from(["deepwork-studio", "--minutes", "0"]).is_err());
    }

    #[test]
    fn max_scale_flag_reaches_the_surface() {
        let args = StudioArgs::try_parse_from(["deepwork-studio", "--max-scale", "1.5"]).unwrap();
        let surface = args.focus_settings().surface;
        assert_eq!(surface.max_scale, 1.5);
        assert_eq!(surface.resolve_scale(3.0), 1.5);
    }

    #[test]
    fn bogus_max_scale_falls_back() {
        let args = StudioArgs::try_parse_from(["deepwork-studio", "--max-scale", "0.5"]).unwrap();
        assert_eq!(args.focus_settings().surface.max_scale, 2.0);
    }
}
