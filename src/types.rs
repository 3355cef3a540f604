//! Core types used throughout the project.

use std::fmt;
use std::str::FromStr;

/// Line reference of a `<location>` annotation.
///
/// `lupdate` writes absolute lines by default and `+N` / `-N` offsets when
/// run with `-locations relative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineNumber {
    Absolute(u32),
    Relative(i32),
}

impl FromStr for LineNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(['+', '-']) {
            s.parse::<i32>().map(Self::Relative)
        } else {
            s.parse::<u32>().map(Self::Absolute)
        }
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(line) => write!(f, "{line}"),
            Self::Relative(offset) => write!(f, "{offset:+}"),
        }
    }
}

/// Provenance annotation of a message (file + line).
///
/// Documentation only: locations never take part in lookup and may be stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// `None` means "same file as the previous location" in relative mode.
    pub filename: Option<String>,
    pub line: Option<LineNumber>,
}

/// A location with relative references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedLocation {
    pub filename: String,
    pub line: Option<u32>,
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.filename),
            None => f.write_str(&self.filename),
        }
    }
}

impl Location {
    #[must_use]
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self { filename: Some(filename.into()), line: Some(LineNumber::Absolute(line)) }
    }

    /// Resolves a sequence of locations, carrying the file name and line
    /// forward the way `lupdate` does for relative locations.
    ///
    /// The carried state spans the whole sequence passed in, so callers
    /// resolving a full document should pass every location in document
    /// order.
    #[must_use]
    pub fn resolve_all(locations: &[Self]) -> Vec<ResolvedLocation> {
        let mut current_file = String::new();
        let mut current_line: u32 = 0;

        locations
            .iter()
            .map(|location| {
                if let Some(filename) = &location.filename
                    && *filename != current_file
                {
                    current_file.clone_from(filename);
                    current_line = 0;
                }
                let line = match location.line {
                    Some(LineNumber::Absolute(line)) => Some(line),
                    Some(LineNumber::Relative(offset)) => {
                        Some(current_line.saturating_add_signed(offset))
                    }
                    None => None,
                };
                if let Some(line) = line {
                    current_line = line;
                }
                ResolvedLocation { filename: current_file.clone(), line }
            })
            .collect()
    }
}
