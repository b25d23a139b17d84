//! Ordered fan-out of Reports to caller-registered callbacks.

use parking_lot::Mutex;

use crate::report::Report;

type ObserverFn = Box<dyn Fn(&Report) + Send + Sync>;

/// Append-only, registration-ordered list of observer callbacks. Not
/// synchronized against concurrent registration during a scan — callers
/// must finish registering before `Scan::start`, per the observer entry
/// invariant.
pub struct ObserverList {
    observers: Mutex<Vec<ObserverFn>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn register(&self, callback: impl Fn(&Report) + Send + Sync + 'static) {
        self.observers.lock().push(Box::new(callback));
    }

    /// Invokes every observer in registration order with a borrowed Report.
    /// An observer that panics is not caught; observers are responsible for
    /// handling their own errors.
    pub fn notify(&self, report: &Report) {
        for observer in self.observers.lock().iter() {
            observer(report);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ObserverList {
    fn default() -> Self {
        Self::new()
    }
}
