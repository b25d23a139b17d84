//! A thin demonstrator binary: opens a local-mode engine, registers the
//! built-in inspection modules, scans a path from argv, and prints one
//! line per [`wardenscan_core::report::Report`]. No business logic of its
//! own lives here — it exists to exercise the library end to end.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use wardenscan_core::builtin::{AlwaysCleanModule, ExtensionDenylistModule};
use wardenscan_core::config::Config;
use wardenscan_core::engine::Engine;
use wardenscan_core::scan::{Flags, Scan, Status};

/// Scan a filesystem path and print one line per inspected file.
#[derive(Parser, Debug)]
#[command(name = "wardenscan", version, about)]
struct Args {
    /// Root path to scan.
    path: String,

    /// Walk subdirectories recursively.
    #[arg(short, long)]
    recurse: bool,

    /// Dispatch files to a bounded worker pool instead of scanning
    /// single-threaded on the caller's thread.
    #[arg(short, long)]
    threaded: bool,

    /// Connect to a daemon over the given local socket instead of
    /// scanning in-process.
    #[arg(long, value_name = "SOCKET_PATH")]
    remote: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let is_remote = args.remote.is_some();

    let mut engine = Engine::open(is_remote);
    if let Some(socket_path) = &args.remote {
        let config = Config {
            socket_path_override: Some(socket_path.into()),
            ..engine.config().clone()
        };
        engine = engine.with_config(config);
    } else {
        engine.register_module("*", Arc::new(AlwaysCleanModule));
        engine.register_module(
            "application/x-msdownload",
            Arc::new(ExtensionDenylistModule::new(["exe", "scr", "bat"])),
        );
    }

    let mut flags = Flags::NONE;
    if args.recurse {
        flags = flags | Flags::RECURSE;
    }
    if args.threaded {
        flags = flags | Flags::THREADED;
    }

    let scan = match Scan::new(&engine, &args.path, flags) {
        Ok(scan) => scan,
        Err(err) => {
            eprintln!("wardenscan: {err}");
            return ExitCode::FAILURE;
        }
    };

    scan.add_observer(move |report| {
        println!(
            "{}\t{:?}\t{}",
            report.path.display(),
            report.status,
            report.module_name
        );
    });

    let exit_code = match scan.start() {
        Status::CannotConnect => {
            eprintln!("wardenscan: could not connect to scan daemon");
            ExitCode::FAILURE
        }
        _ => {
            loop {
                match scan.run() {
                    Status::Continue => continue,
                    _ => break,
                }
            }
            ExitCode::SUCCESS
        }
    };

    scan.free();
    exit_code
}
