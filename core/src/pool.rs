//! A bounded pool of real OS threads, each owning its own MIME handle for
//! its entire lifetime. Jobs are file paths; the producer is the walker
//! running on the caller's thread, consumers are the pool's workers.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Sender};

use crate::mime;
use crate::module::{self, ModuleRegistry};
use crate::observer::ObserverList;

pub struct WorkerPool {
    sender: Option<Sender<PathBuf>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `size` worker threads backed by a channel bounded to
    /// `size * 4` in flight, the way a bounded producer/consumer pipeline
    /// applies backpressure to a fast walker outrunning slow inspection.
    pub fn new(size: usize, registry: Arc<ModuleRegistry>, observers: Arc<ObserverList>) -> Self {
        let (sender, receiver) = bounded::<PathBuf>(size.max(1) * 4);
        let mut handles = Vec::with_capacity(size);

        for worker_id in 0..size {
            let receiver = receiver.clone();
            let registry = Arc::clone(&registry);
            let observers = Arc::clone(&observers);

            let handle = thread::Builder::new()
                .name(format!("wardenscan-worker-{worker_id}"))
                .spawn(move || {
                    while let Ok(path) = receiver.recv() {
                        let report =
                            mime::with_mime_handle(&path, |mime| module::scan_file(&path, mime, &registry));
                        observers.notify(&report);
                    }
                    tracing::debug!(worker_id, "worker thread exiting");
                })
                .expect("spawn wardenscan worker thread");

            handles.push(handle);
        }

        Self {
            sender: Some(sender),
            handles,
        }
    }

    /// Enqueues a path, blocking if the channel is full.
    pub fn submit(&self, path: PathBuf) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(path);
        }
    }

    /// Closes the input channel and waits for every queued job to drain,
    /// then joins all worker threads.
    pub fn join(mut self) {
        self.sender.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}
