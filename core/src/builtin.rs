//! A couple of illustrative inspection modules, plus the alert/quarantine
//! observers local-mode scans pre-register. The side effects themselves
//! (actually alerting, actually quarantining) are out of scope here; these
//! only log, standing in for whatever collaborator a caller would plug in.

use std::path::Path;

use crate::module::{ModuleStatus, ScanModule};
use crate::report::{Action, Report};
use crate::verdict::FileStatus;

/// Always reports `Clean`. Useful as a catch-all default and in tests.
pub struct AlwaysCleanModule;

impl ScanModule for AlwaysCleanModule {
    fn name(&self) -> &str {
        "always-clean"
    }

    fn scan(&self, _path: &Path, _mime: Option<&str>) -> (FileStatus, Option<String>) {
        (FileStatus::Clean, None)
    }
}

/// Flags files whose extension appears in a fixed denylist as `Malware`.
/// Stands in for a real signature-matching module.
pub struct ExtensionDenylistModule {
    denied: Vec<String>,
}

impl ExtensionDenylistModule {
    pub fn new(denied: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            denied: denied.into_iter().map(Into::into).collect(),
        }
    }
}

impl ScanModule for ExtensionDenylistModule {
    fn name(&self) -> &str {
        "extension-denylist"
    }

    fn mod_status(&self) -> ModuleStatus {
        ModuleStatus::Ok
    }

    fn scan(&self, path: &Path, _mime: Option<&str>) -> (FileStatus, Option<String>) {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if self.denied.iter().any(|d| d.eq_ignore_ascii_case(extension)) {
            (
                FileStatus::Malware,
                Some(format!("extension '{extension}' is denylisted")),
            )
        } else {
            (FileStatus::Clean, None)
        }
    }
}

pub(crate) fn alert_observer(report: &Report) {
    if report.action.contains(Action::ALERT) {
        tracing::warn!(path = %report.path.display(), status = ?report.status, "alert raised");
    }
}

pub(crate) fn quarantine_observer(report: &Report) {
    if report.action.contains(Action::QUARANTINE) {
        tracing::warn!(path = %report.path.display(), "file flagged for quarantine");
    }
}
