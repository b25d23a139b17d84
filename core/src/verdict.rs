//! The verdict lattice: a total order over per-file statuses used to decide
//! which module's result "wins" when several modules inspect the same file.

use serde::{Deserialize, Serialize};

/// Classification assigned to a scanned file.
///
/// Ranked low to high: `Undecided < Clean < UnknownFileType/Unsupported <
/// Suspicious < Malware`, with `WhiteListed` tied with `Malware` for
/// short-circuit purposes. `IError` is not part of the lattice — it is an
/// absorbing state reported independently of module results (see
/// [`crate::walker::WalkEvent::Error`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    Undecided,
    Clean,
    UnknownFileType,
    Unsupported,
    Suspicious,
    Malware,
    WhiteListed,
    IError,
}

impl FileStatus {
    fn rank(self) -> u8 {
        match self {
            FileStatus::Undecided => 0,
            FileStatus::Clean => 1,
            FileStatus::UnknownFileType | FileStatus::Unsupported => 2,
            FileStatus::Suspicious => 3,
            FileStatus::Malware | FileStatus::WhiteListed => 4,
            FileStatus::IError => u8::MAX,
        }
    }

    /// True if `self` is strictly above `other` in the lattice.
    pub fn outranks(self, other: FileStatus) -> bool {
        self.rank() > other.rank()
    }

    /// `WhiteListed` and `Malware` both end the module chain immediately.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, FileStatus::WhiteListed | FileStatus::Malware)
    }

    /// Decodes a wire-protocol status code. Unrecognized codes default to
    /// `Undecided` rather than erroring, matching the remote decoder's
    /// best-effort policy.
    pub fn from_wire_code(code: i64) -> Self {
        match code {
            1 => FileStatus::Clean,
            2 => FileStatus::UnknownFileType,
            3 => FileStatus::Unsupported,
            4 => FileStatus::Suspicious,
            5 => FileStatus::Malware,
            6 => FileStatus::WhiteListed,
            7 => FileStatus::IError,
            _ => FileStatus::Undecided,
        }
    }

    pub fn wire_code(self) -> i64 {
        match self {
            FileStatus::Undecided => 0,
            FileStatus::Clean => 1,
            FileStatus::UnknownFileType => 2,
            FileStatus::Unsupported => 3,
            FileStatus::Suspicious => 4,
            FileStatus::Malware => 5,
            FileStatus::WhiteListed => 6,
            FileStatus::IError => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malware_outranks_suspicious() {
        assert!(FileStatus::Malware.outranks(FileStatus::Suspicious));
        assert!(!FileStatus::Suspicious.outranks(FileStatus::Malware));
    }

    #[test]
    fn unknown_and_unsupported_tie() {
        assert!(!FileStatus::UnknownFileType.outranks(FileStatus::Unsupported));
        assert!(!FileStatus::Unsupported.outranks(FileStatus::UnknownFileType));
    }

    #[test]
    fn white_listed_and_malware_both_short_circuit() {
        assert!(FileStatus::WhiteListed.is_short_circuit());
        assert!(FileStatus::Malware.is_short_circuit());
        assert!(!FileStatus::Suspicious.is_short_circuit());
    }

    #[test]
    fn wire_code_roundtrip() {
        for status in [
            FileStatus::Undecided,
            FileStatus::Clean,
            FileStatus::UnknownFileType,
            FileStatus::Unsupported,
            FileStatus::Suspicious,
            FileStatus::Malware,
            FileStatus::WhiteListed,
            FileStatus::IError,
        ] {
            assert_eq!(FileStatus::from_wire_code(status.wire_code()), status);
        }
    }

    #[test]
    fn unparseable_wire_code_defaults_to_undecided() {
        assert_eq!(FileStatus::from_wire_code(99), FileStatus::Undecided);
    }
}
