//! The remote-mode wire protocol: a text frame is a verb line, zero or
//! more `Name: Value` header lines, and a blank line terminator.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::report::{Action, Report};
use crate::verdict::FileStatus;

#[derive(Debug, Clone)]
pub struct Frame {
    pub verb: String,
    pub headers: Vec<(String, String)>,
}

impl Frame {
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Decimal header parse with a best-effort default of 0 on failure,
    /// matching the protocol's "unparseable values are treated as 0" policy.
    pub fn header_i64(&self, name: &str) -> i64 {
        self.header(name).and_then(|v| v.parse().ok()).unwrap_or(0)
    }

    fn encode(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.verb);
        out.push('\n');
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

pub fn write_frame(writer: &mut impl Write, frame: &Frame) -> io::Result<()> {
    writer.write_all(frame.encode().as_bytes())
}

/// Reads one frame. Returns `Ok(None)` when the stream closed before a verb
/// line arrived (end of scan, connection dropped).
pub fn read_frame(reader: &mut impl BufRead) -> io::Result<Option<Frame>> {
    let mut verb_line = String::new();
    if reader.read_line(&mut verb_line)? == 0 {
        return Ok(None);
    }
    let verb = verb_line.trim_end_matches(['\r', '\n']).to_string();
    if verb.is_empty() {
        return Ok(None);
    }

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    Ok(Some(Frame { verb, headers }))
}

/// Decodes a `SCAN_FILE` frame into a Report. Missing headers default to
/// empty strings, unparseable integers to 0 — the frame is still emitted
/// as a best-effort Report rather than dropped.
pub fn report_from_scan_file_frame(frame: &Frame) -> Report {
    Report {
        path: PathBuf::from(frame.header("Path").unwrap_or_default()),
        status: FileStatus::from_wire_code(frame.header_i64("Status")),
        action: Action::from_bits(frame.header_i64("Action") as u8),
        module_name: frame.header("Module-Name").unwrap_or_default().to_string(),
        module_report: frame.header("X-Status").unwrap_or_default().to_string(),
    }
}
