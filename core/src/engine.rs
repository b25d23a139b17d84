//! The top-level handle applications hold: owns the module registry and
//! configuration, and decides whether scans it creates run local or remote.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::module::ModuleRegistry;

/// `is_remote` is an immutable construction parameter, not mutable
/// process-wide state: two engines, one local and one remote, can coexist
/// in the same process.
pub struct Engine {
    is_remote: bool,
    verbose: AtomicI32,
    config: Config,
    registry: Arc<ModuleRegistry>,
}

impl Engine {
    pub fn open(is_remote: bool) -> Self {
        tracing::info!(is_remote, "engine opened");
        Self {
            is_remote,
            verbose: AtomicI32::new(0),
            config: Config::from_env(),
            registry: Arc::new(ModuleRegistry::new()),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Registers an inspection module against a MIME-type pattern before
    /// any scan is created. Loading modules from external configuration is
    /// out of scope; this is the direct registration path a test harness
    /// or an embedding application uses.
    pub fn register_module(&self, pattern: impl Into<String>, module: Arc<dyn crate::module::ScanModule>) {
        self.registry.register(pattern, module);
    }

    pub fn set_verbose(&self, level: i32) {
        self.verbose.store(level, Ordering::Relaxed);
    }

    pub fn get_verbose(&self) -> i32 {
        self.verbose.load(Ordering::Relaxed)
    }

    pub fn is_remote(&self) -> bool {
        self.is_remote
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn registry(&self) -> Arc<ModuleRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn close(self) {
        tracing::info!("engine closed");
    }
}
