//! The public scan facade. A single type whose behavior is selected at
//! construction by the owning Engine's mode — a tagged variant
//! (`ScanMode::Local`/`ScanMode::Remote`), not an inheritance hierarchy.

mod local;
mod remote;

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::builtin::{alert_observer, quarantine_observer};
use crate::engine::Engine;
use crate::error::ScanError;
use crate::observer::ObserverList;
use crate::report::Report;

use local::LocalDriver;
use remote::RemoteDriver;

/// Bitmask over scan behavior flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    pub const THREADED: Flags = Flags(1 << 0);
    pub const RECURSE: Flags = Flags(1 << 1);

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

/// Outcome of `start`/`run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    CannotConnect,
    Continue,
    Completed,
    IError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Created,
    Started,
    Running,
    Completed,
}

enum ScanMode {
    Local(LocalDriver),
    Remote(RemoteDriver),
}

/// A single scan against one root path. Constructed by `Scan::new`,
/// transitions `Created -> Started -> Running -> Completed`, and is torn
/// down by consuming `free`.
pub struct Scan {
    path: PathBuf,
    flags: Flags,
    observers: Arc<ObserverList>,
    state: Mutex<ScanState>,
    mode: Mutex<ScanMode>,
}

impl Scan {
    /// Canonicalizes `path`, fails with `PathInvalid` if it does not exist.
    /// In local mode, pre-registers the built-in alert/quarantine
    /// observers so their side effects always occur unless the caller's
    /// own observers supersede them; in remote mode composes the daemon
    /// socket path from the engine's configuration.
    pub fn new(engine: &Engine, path: impl Into<PathBuf>, flags: Flags) -> Result<Self, ScanError> {
        let canonical = std::fs::canonicalize(path.into()).map_err(ScanError::PathInvalid)?;
        let observers = Arc::new(ObserverList::new());

        let mode = if engine.is_remote() {
            ScanMode::Remote(RemoteDriver::new(engine.config().socket_path()))
        } else {
            observers.register(alert_observer);
            observers.register(quarantine_observer);
            ScanMode::Local(LocalDriver::new(
                engine.registry(),
                Arc::clone(&observers),
                engine.config().batch_size,
            ))
        };

        tracing::info!(path = %canonical.display(), remote = engine.is_remote(), "scan created");

        Ok(Self {
            path: canonical,
            flags,
            observers,
            state: Mutex::new(ScanState::Created),
            mode: Mutex::new(mode),
        })
    }

    /// Registers an additional observer. Must happen before `start`;
    /// registering afterward yields undefined observer visibility, as
    /// there is no synchronization against an in-flight scan.
    pub fn add_observer(&self, callback: impl Fn(&Report) + Send + Sync + 'static) {
        self.observers.register(callback);
    }

    /// One-shot transition from `Created` to `Started`. Calling it again
    /// is a no-op that returns `Ok` without re-initializing driver state.
    pub fn start(&self) -> Status {
        let mut state = self.state.lock();
        if *state != ScanState::Created {
            return Status::Ok;
        }

        let mut mode = self.mode.lock();
        let status = match &mut *mode {
            ScanMode::Local(driver) => driver.start(self.flags),
            ScanMode::Remote(driver) => driver.start(&self.path),
        };

        if status == Status::Ok {
            *state = ScanState::Started;
        }
        status
    }

    /// Performs the scan's work. Local mode blocks until traversal and
    /// pool drain complete; remote mode decodes one frame per call.
    pub fn run(&self) -> Status {
        {
            let mut state = self.state.lock();
            if *state == ScanState::Created {
                return Status::IError;
            }
            *state = ScanState::Running;
        }

        let mut mode = self.mode.lock();
        let status = match &mut *mode {
            ScanMode::Local(driver) => driver.run(&self.path, self.flags),
            ScanMode::Remote(driver) => driver.run(&self.observers),
        };

        if status == Status::Completed {
            *self.state.lock() = ScanState::Completed;
        }
        status
    }

    /// The client socket fd in remote mode, for embedding in an external
    /// event loop; local mode fails explicitly since callers there
    /// integrate via `run` blocking.
    pub fn poll_fd(&self) -> Result<std::os::unix::io::RawFd, ScanError> {
        match &*self.mode.lock() {
            ScanMode::Local(_) => Err(ScanError::NotPollable),
            ScanMode::Remote(driver) => driver.poll_fd(),
        }
    }

    /// Releases observer list and mode-specific resources: in local
    /// threaded mode, drains the pool with wait=true; in remote mode,
    /// closes the socket.
    pub fn free(self) {
        match self.mode.into_inner() {
            ScanMode::Local(driver) => driver.free(),
            ScanMode::Remote(driver) => driver.free(),
        }
        tracing::info!("scan freed");
    }
}
