//! The pluggable inspection chain: a small capability trait for inspection
//! modules, a registry that looks them up by MIME type, and the
//! lattice-driven evaluator that aggregates their verdicts into one Report.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::report::{Action, Report};
use crate::verdict::FileStatus;

/// Whether a module is available to be consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Ok,
    Disabled,
    Failed,
}

/// An inspection plugin scoped to one or more MIME types via the registry.
///
/// Deliberately a small capability set, not an inheritance hierarchy: the
/// registry holds `Arc<dyn ScanModule>` and dispatches by calling `scan`
/// directly, the way the engine queries "the applicable ordered list."
pub trait ScanModule: Send + Sync {
    fn name(&self) -> &str;

    /// Modules that are not `Ok` are skipped by the evaluator without being
    /// called.
    fn mod_status(&self) -> ModuleStatus {
        ModuleStatus::Ok
    }

    /// Inspects one file, returning a verdict and an optional diagnostic.
    fn scan(&self, path: &Path, mime: Option<&str>) -> (FileStatus, Option<String>);
}

/// In-memory, append-only table mapping a MIME-type pattern (exact,
/// `"type/*"`, or `"*"`) to an ordered list of modules. Read-only during a
/// scan; registration happens before `Scan::start`.
pub struct ModuleRegistry {
    patterns: RwLock<Vec<(String, Vec<Arc<dyn ScanModule>>)>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            patterns: RwLock::new(Vec::new()),
        }
    }

    pub fn register(&self, pattern: impl Into<String>, module: Arc<dyn ScanModule>) {
        let pattern = pattern.into();
        let mut patterns = self.patterns.write();
        match patterns.iter_mut().find(|(p, _)| *p == pattern) {
            Some((_, modules)) => modules.push(module),
            None => patterns.push((pattern, vec![module])),
        }
    }

    /// Returns the modules registered against the most specific matching
    /// pattern, in registration order, filtered to `ModuleStatus::Ok`.
    pub fn applicable_modules(&self, mime: Option<&str>) -> Vec<Arc<dyn ScanModule>> {
        let patterns = self.patterns.read();
        let lookup = |pattern: &str| -> Vec<Arc<dyn ScanModule>> {
            patterns
                .iter()
                .find(|(p, _)| p == pattern)
                .map(|(_, modules)| {
                    modules
                        .iter()
                        .filter(|m| m.mod_status() == ModuleStatus::Ok)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some(mime) = mime {
            let exact = lookup(mime);
            if !exact.is_empty() {
                return exact;
            }
            if let Some((family, _)) = mime.split_once('/') {
                let wildcard = lookup(&format!("{family}/*"));
                if !wildcard.is_empty() {
                    return wildcard;
                }
            }
        }
        lookup("*")
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Default disposition policy: `Action` has no documented verdict-to-action
/// mapping, so this engine raises an alert on anything `Suspicious` and
/// alerts-plus-quarantines `Malware`.
fn default_action(status: FileStatus) -> Action {
    match status {
        FileStatus::Suspicious => Action::ALERT,
        FileStatus::Malware => Action::ALERT | Action::QUARANTINE,
        _ => Action::NONE,
    }
}

/// Runs the applicable module chain over one file and produces its Report.
///
/// No applicable modules (MIME unrecognized by the registry) yields
/// `UnknownFileType` with no module attribution. Otherwise each module's
/// verdict is adopted only if it strictly outranks the current one
/// (`module_name`/`module_report` are replaced together, never
/// independently); the chain terminates early once a short-circuit verdict
/// is adopted.
pub fn scan_file(path: &Path, mime: Option<&str>, registry: &ModuleRegistry) -> Report {
    let modules = registry.applicable_modules(mime);
    if modules.is_empty() {
        tracing::debug!(path = %path.display(), "no applicable module, unknown file type");
        return Report::new(path.to_path_buf(), FileStatus::UnknownFileType, Action::NONE);
    }

    let mut status = FileStatus::Undecided;
    let mut module_name = String::new();
    let mut module_report = String::new();

    for module in &modules {
        let (verdict, diagnostic) = module.scan(path, mime);
        if verdict.outranks(status) {
            status = verdict;
            module_name = module.name().to_string();
            module_report = diagnostic.unwrap_or_default();
            tracing::debug!(path = %path.display(), module = %module_name, ?status, "verdict adopted");
            if status.is_short_circuit() {
                break;
            }
        }
    }

    let action = default_action(status);
    Report {
        path: path.to_path_buf(),
        status,
        action,
        module_name,
        module_report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedVerdict {
        name: &'static str,
        status: FileStatus,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl FixedVerdict {
        fn new(name: &'static str, status: FileStatus) -> Self {
            Self {
                name,
                status,
                calls: std::sync::atomic::AtomicUsize::new(0),
            }
        }
    }

    impl ScanModule for FixedVerdict {
        fn name(&self) -> &str {
            self.name
        }

        fn scan(&self, _path: &Path, _mime: Option<&str>) -> (FileStatus, Option<String>) {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            (self.status, None)
        }
    }

    #[test]
    fn no_applicable_modules_is_unknown_file_type() {
        let registry = ModuleRegistry::new();
        let report = scan_file(Path::new("/t/a.bin"), Some("application/x-nonsense"), &registry);
        assert_eq!(report.status, FileStatus::UnknownFileType);
        assert!(report.module_name.is_empty());
    }

    #[test]
    fn malware_short_circuits_remaining_modules() {
        let registry = ModuleRegistry::new();
        let malware = Arc::new(FixedVerdict::new("m1", FileStatus::Malware));
        let never_called = Arc::new(FixedVerdict::new("m2", FileStatus::Clean));
        registry.register("application/x-exe", malware.clone());
        registry.register("application/x-exe", never_called.clone());

        let report = scan_file(Path::new("/t/bad.exe"), Some("application/x-exe"), &registry);
        assert_eq!(report.status, FileStatus::Malware);
        assert_eq!(report.module_name, "m1");
        assert_eq!(never_called.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert!(report.action.contains(Action::QUARANTINE));
    }

    #[test]
    fn first_module_establishing_top_rank_is_attributed() {
        let registry = ModuleRegistry::new();
        let first = Arc::new(FixedVerdict::new("first", FileStatus::Suspicious));
        let second = Arc::new(FixedVerdict::new("second", FileStatus::Suspicious));
        registry.register("text/plain", first);
        registry.register("text/plain", second);

        let report = scan_file(Path::new("/t/a.txt"), Some("text/plain"), &registry);
        assert_eq!(report.module_name, "first");
    }

    #[test]
    fn wildcard_pattern_matches_family() {
        let registry = ModuleRegistry::new();
        let module = Arc::new(FixedVerdict::new("catch-all", FileStatus::Clean));
        registry.register("text/*", module);

        let report = scan_file(Path::new("/t/a.csv"), Some("text/csv"), &registry);
        assert_eq!(report.status, FileStatus::Clean);
        assert_eq!(report.module_name, "catch-all");
    }
}
