use std::sync::Arc;

use arc_swap::ArcSwap;

use studyassist_common::GlobalConfig;

/// Process-wide state. Handlers read config through `global.load()` at call time.
pub struct AppState {
    pub global: ArcSwap<GlobalConfig>,
}

impl AppState {
    pub fn new(global: GlobalConfig) -> Self {
        Self {
            global: ArcSwap::from_pointee(global),
        }
    }

    pub fn config(&self) -> Arc<GlobalConfig> {
        self.global.load_full()
    }

    pub fn apply_global_config(&self, config: GlobalConfig) {
        self.global.store(Arc::new(config));
    }
}
