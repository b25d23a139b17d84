//! A thin client over the request/response frame protocol on a local Unix
//! domain socket.

use std::io::BufReader;
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::error::ScanError;
use crate::observer::ObserverList;
use crate::protocol::{self, Frame};

use super::Status;

const MAX_CONNECT_ATTEMPTS: u32 = 10;
const RETRY_DELAY: Duration = Duration::from_millis(50);

pub(super) struct RemoteDriver {
    socket_path: PathBuf,
    stream: Option<BufReader<UnixStream>>,
    done: bool,
}

impl RemoteDriver {
    pub(super) fn new(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            stream: None,
            done: false,
        }
    }

    /// Opens the socket with a bounded retry, then sends one `SCAN` frame
    /// carrying the root path.
    pub(super) fn start(&mut self, path: &Path) -> Status {
        let mut connected = None;
        for attempt in 1..=MAX_CONNECT_ATTEMPTS {
            match UnixStream::connect(&self.socket_path) {
                Ok(stream) => {
                    connected = Some(stream);
                    break;
                }
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "remote connect attempt failed");
                    if attempt < MAX_CONNECT_ATTEMPTS {
                        thread::sleep(RETRY_DELAY);
                    }
                }
            }
        }

        let Some(stream) = connected else {
            tracing::error!(attempts = MAX_CONNECT_ATTEMPTS, "could not reach scan daemon");
            return Status::CannotConnect;
        };

        let mut writer = match stream.try_clone() {
            Ok(writer) => writer,
            Err(_) => return Status::CannotConnect,
        };

        let frame = Frame::new("SCAN").with_header("Path", path.display().to_string());
        if protocol::write_frame(&mut writer, &frame).is_err() {
            return Status::CannotConnect;
        }

        self.stream = Some(BufReader::new(stream));
        Status::Ok
    }

    /// Decodes one frame per call: `SCAN_FILE` fans out a Report and
    /// returns `Continue`; `SCAN_END` or a closed stream returns
    /// `Completed`.
    pub(super) fn run(&mut self, observers: &ObserverList) -> Status {
        if self.done {
            return Status::Completed;
        }
        let Some(reader) = self.stream.as_mut() else {
            return Status::Completed;
        };

        match protocol::read_frame(reader) {
            Ok(Some(frame)) if frame.verb == "SCAN_FILE" => {
                let report = protocol::report_from_scan_file_frame(&frame);
                observers.notify(&report);
                Status::Continue
            }
            Ok(Some(frame)) if frame.verb == "SCAN_END" => {
                self.done = true;
                Status::Completed
            }
            Ok(Some(_)) => Status::Continue,
            Ok(None) => {
                self.done = true;
                Status::Completed
            }
            Err(err) => {
                tracing::error!(error = %err, "remote frame decode failed");
                self.done = true;
                Status::Completed
            }
        }
    }

    pub(super) fn poll_fd(&self) -> Result<RawFd, ScanError> {
        self.stream
            .as_ref()
            .map(|reader| reader.get_ref().as_raw_fd())
            .ok_or(ScanError::NotPollable)
    }

    pub(super) fn free(self) {
        drop(self.stream);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::FileStatus;
    use parking_lot::Mutex;
    use std::os::unix::net::UnixListener;
    use std::sync::Arc;

    /// Spawns a fake daemon on a fresh socket that reads one `SCAN` frame
    /// and replies with `SCAN_FILE` x2 then `SCAN_END`, mirroring the
    /// remote happy-path described for the wire protocol.
    fn spawn_fake_daemon(socket_path: PathBuf) -> thread::JoinHandle<()> {
        let listener = UnixListener::bind(&socket_path).unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = stream;

            protocol::read_frame(&mut reader).unwrap(); // consume the SCAN request

            let file_one = Frame::new("SCAN_FILE")
                .with_header("Path", "/t/a.txt")
                .with_header("Status", "1")
                .with_header("Module-Name", "m1");
            let file_two = Frame::new("SCAN_FILE")
                .with_header("Path", "/t/b.txt")
                .with_header("Status", "1")
                .with_header("Module-Name", "m1");

            protocol::write_frame(&mut writer, &file_one).unwrap();
            protocol::write_frame(&mut writer, &file_two).unwrap();
            protocol::write_frame(&mut writer, &Frame::new("SCAN_END")).unwrap();
        })
    }

    #[test]
    fn remote_happy_path_decodes_two_scan_file_frames_then_completes() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("daemon.sock");
        let daemon = spawn_fake_daemon(socket_path.clone());

        let mut driver = RemoteDriver::new(socket_path);
        assert_eq!(driver.start(Path::new("/t")), Status::Ok);

        let observers = ObserverList::new();
        let reports = Arc::new(Mutex::new(Vec::new()));
        let reports_clone = Arc::clone(&reports);
        observers.register(move |report| reports_clone.lock().push(report.clone()));

        assert_eq!(driver.run(&observers), Status::Continue);
        assert_eq!(driver.run(&observers), Status::Continue);
        assert_eq!(driver.run(&observers), Status::Completed);

        driver.free();
        daemon.join().unwrap();

        let reports = reports.lock();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.status == FileStatus::Clean));
        assert!(reports.iter().any(|r| r.path.to_str() == Some("/t/a.txt")));
        assert!(reports.iter().any(|r| r.path.to_str() == Some("/t/b.txt")));
    }

    #[test]
    fn connect_failure_on_missing_socket_is_cannot_connect() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = RemoteDriver::new(dir.path().join("no-such-daemon.sock"));
        assert_eq!(driver.start(Path::new("/t")), Status::CannotConnect);
    }
}
