//! Composes the walker, the worker pool, and the module-chain evaluator
//! into the in-process scan path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::mime;
use crate::module::{self, ModuleRegistry};
use crate::observer::ObserverList;
use crate::pool::WorkerPool;
use crate::report::Report;
use crate::walker::{self, WalkEvent};

use super::{Flags, Status};

pub(super) struct LocalDriver {
    registry: Arc<ModuleRegistry>,
    observers: Arc<ObserverList>,
    pool_size: usize,
    pool: Option<WorkerPool>,
}

impl LocalDriver {
    pub(super) fn new(registry: Arc<ModuleRegistry>, observers: Arc<ObserverList>, pool_size: usize) -> Self {
        Self {
            registry,
            observers,
            pool_size,
            pool: None,
        }
    }

    pub(super) fn start(&mut self, flags: Flags) -> Status {
        if flags.contains(Flags::THREADED) {
            self.pool = Some(WorkerPool::new(
                self.pool_size,
                Arc::clone(&self.registry),
                Arc::clone(&self.observers),
            ));
            tracing::debug!(size = self.pool_size, "worker pool started");
        }
        Status::Ok
    }

    pub(super) fn run(&mut self, root: &Path, flags: Flags) -> Status {
        let metadata = match std::fs::symlink_metadata(root) {
            Ok(metadata) => metadata,
            Err(err) => {
                self.observers
                    .notify(&Report::io_error(root.to_path_buf(), err.to_string()));
                return Status::Completed;
            }
        };

        if metadata.is_file() {
            self.dispatch(root.to_path_buf());
        } else if metadata.is_dir() {
            for event in walker::walk(root, flags.contains(Flags::RECURSE)) {
                match event {
                    WalkEvent::Regular(path) => self.dispatch(path),
                    WalkEvent::Error { path, message } => {
                        self.observers.notify(&Report::io_error(path, message));
                    }
                }
            }
        }

        if let Some(pool) = self.pool.take() {
            pool.join();
        }
        Status::Completed
    }

    fn dispatch(&self, path: PathBuf) {
        match &self.pool {
            Some(pool) => pool.submit(path),
            None => {
                let report =
                    mime::with_mime_handle(&path, |mime| module::scan_file(&path, mime, &self.registry));
                self.observers.notify(&report);
            }
        }
    }

    pub(super) fn free(self) {
        if let Some(pool) = self.pool {
            pool.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::AlwaysCleanModule;
    use crate::verdict::FileStatus;
    use parking_lot::Mutex;
    use std::fs;

    fn driver() -> LocalDriver {
        let registry = Arc::new(ModuleRegistry::new());
        registry.register("*", Arc::new(AlwaysCleanModule));
        LocalDriver::new(registry, Arc::new(ObserverList::new()), 4)
    }

    #[test]
    fn root_stat_failure_reports_ierror_for_the_root_itself() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gone.txt");
        fs::write(&file, b"will be removed before run").unwrap();

        let mut driver = driver();
        let reports = Arc::new(Mutex::new(Vec::new()));
        let reports_clone = Arc::clone(&reports);
        driver.observers.register(move |report| reports_clone.lock().push(report.clone()));

        // Removing the file right before `run` forces `symlink_metadata`
        // to fail inside `run` itself (a real `Scan` would have
        // canonicalized this same path moments earlier, while it still
        // existed).
        fs::remove_file(&file).unwrap();

        let status = driver.run(&file, Flags::NONE);
        assert_eq!(status, Status::Completed);

        let reports = reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, FileStatus::IError);
        assert_eq!(reports[0].path, file);
        assert!(!reports[0].module_report.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_yields_ierror_report_and_scan_continues() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"plain text").unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret.txt"), b"unreadable").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let mut driver = driver();
        let reports = Arc::new(Mutex::new(Vec::new()));
        let reports_clone = Arc::clone(&reports);
        driver.observers.register(move |report| reports_clone.lock().push(report.clone()));

        let status = driver.run(dir.path(), Flags::RECURSE);

        // Restore permissions so the tempdir can be cleaned up regardless
        // of test outcome.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(status, Status::Completed);
        let reports = reports.lock();

        let clean = reports.iter().find(|r| r.path.ends_with("a.txt"));
        assert_eq!(clean.map(|r| r.status), Some(FileStatus::Clean));

        let error_report = reports.iter().find(|r| r.status == FileStatus::IError);
        assert!(error_report.is_some(), "expected an IError report for the unreadable subdirectory");
        assert!(!error_report.unwrap().module_report.is_empty());
    }
}
