//! # wardenscan-core
//!
//! A scan orchestration engine: given a filesystem path, classify every
//! regular file beneath it by dispatching to a pluggable set of inspection
//! modules, aggregate their verdicts into one status per file via a
//! verdict lattice, and fan the resulting [`report::Report`] out to
//! registered observers.
//!
//! One [`engine::Engine`] serves two deployment modes, selected at
//! construction: **local**, which walks the filesystem in-process and
//! drives inspection modules directly (optionally across a bounded pool of
//! worker threads, see [`pool`]), and **remote**, which forwards the
//! request to a daemon over a local Unix socket and decodes the reports it
//! streams back (see [`protocol`]).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wardenscan_core::builtin::AlwaysCleanModule;
//! use wardenscan_core::engine::Engine;
//! use wardenscan_core::scan::{Flags, Scan};
//!
//! let engine = Engine::open(false);
//! engine.register_module("*", Arc::new(AlwaysCleanModule));
//!
//! let scan = Scan::new(&engine, "/tmp", Flags::RECURSE).unwrap();
//! scan.add_observer(|report| println!("{:?}: {:?}", report.path, report.status));
//! scan.start();
//! scan.run();
//! scan.free();
//! ```
//!
//! ## Module map
//!
//! - [`report`] / [`verdict`] — the Report value type and the status
//!   lattice that decides which module's verdict wins.
//! - [`module`] — the `ScanModule` trait, the MIME-pattern registry, and
//!   the chain evaluator.
//! - [`mime`] — per-worker-thread content classification.
//! - [`walker`] — directory traversal adapter.
//! - [`pool`] — the bounded worker-thread pool.
//! - [`observer`] — synchronous, registration-ordered report fan-out.
//! - [`protocol`] — the remote-mode wire frame codec.
//! - [`scan`] — the public facade (`Scan`) and its local/remote drivers.
//! - [`engine`] — the owning handle (`Engine`) applications hold.
//! - [`config`] — socket directory / batch size / user knobs.
//! - [`error`] — construction/connect-time errors.
//! - [`builtin`] — example inspection modules and the default observers.

pub mod builtin;
pub mod config;
pub mod engine;
pub mod error;
pub mod mime;
pub mod module;
pub mod observer;
pub(crate) mod pool;
pub mod protocol;
pub mod report;
pub mod scan;
pub mod verdict;
pub mod walker;
