//! Construction- and connect-time errors. Per-file failures never surface
//! here — they stay Report data (`FileStatus::IError`), per the engine's
//! propagation policy: a single bad file must never abort a scan.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan path could not be canonicalized")]
    PathInvalid(#[source] std::io::Error),

    #[error("poll_fd is not available outside remote mode")]
    NotPollable,
}
