use super::{DriftMode, FlightMode, GrowthMode, IceMode, ModeId, ModeRoutine, OrbitMode, RippleMode};

/// Builds a fresh routine instance.
pub type ModeFactory = fn() -> Box<dyn ModeRoutine>;

/// Lookup table from `ModeId` to routine factory.
///
/// Every mode always has a factory; `register` replaces one.
#[derive(Clone)]
pub struct ModeRegistry {
    factories: [ModeFactory; ModeId::COUNT],
}

impl ModeRegistry {
    /// Registry with the built-in routines.
    pub fn builtin() -> Self {
        Self {
            factories: [
                || Box::new(IceMode::new()),
                || Box::new(FlightMode),
                || Box::new(OrbitMode),
                || Box::new(RippleMode::new()),
                || Box::new(GrowthMode),
                || Box::new(DriftMode),
            ],
        }
    }

    pub fn register(&mut self, mode: ModeId, factory: ModeFactory) {
        self.factories[mode.index()] = factory;
    }

    pub fn create(&self, mode: ModeId) -> Box<dyn ModeRoutine> {
        (self.factories[mode.index()])()
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
