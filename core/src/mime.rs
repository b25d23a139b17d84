//! Worker-local MIME classification.
//!
//! The underlying content sniffer is treated as non-reentrant, the way a
//! native `libmagic` handle would be: one instance is created lazily per
//! worker thread and lives for that thread's lifetime, never shared or
//! locked across threads.

use std::cell::RefCell;
use std::path::Path;

struct MimeHandle;

impl MimeHandle {
    fn new() -> Self {
        tracing::debug!(thread = ?std::thread::current().id(), "mime handle created");
        MimeHandle
    }

    fn classify(&self, path: &Path) -> Option<String> {
        match infer::get_from_path(path) {
            Ok(Some(kind)) => Some(kind.mime_type().to_string()),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "mime classification failed");
                None
            }
        }
    }
}

impl Drop for MimeHandle {
    fn drop(&mut self) {
        tracing::debug!(thread = ?std::thread::current().id(), "mime handle released");
    }
}

thread_local! {
    static MIME_HANDLE: RefCell<Option<MimeHandle>> = const { RefCell::new(None) };
}

/// Classifies `path` using this thread's MIME handle, creating it on first
/// use, and hands the result to `f`. Never call recursively from within
/// `f` — the handle is borrowed for the duration of the call.
pub fn with_mime_handle<R>(path: &Path, f: impl FnOnce(Option<&str>) -> R) -> R {
    MIME_HANDLE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let handle = slot.get_or_insert_with(MimeHandle::new);
        let mime = handle.classify(path);
        f(mime.as_deref())
    })
}
