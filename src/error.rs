//! Error types for section timing and export
//!
//! None of these are fatal: instrumentation must never take down the
//! instrumented program. Callers may inspect or ignore them.

use std::path::PathBuf;

use thiserror::Error;

use crate::section::SectionName;

/// Errors reported by the profiler
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// Exit called for a section with no open enter
    #[error("Mismatched section exit for {name}")]
    MismatchedExit { name: SectionName },

    /// Sections still open when the session was finalized
    #[error("{} section(s) still open at finalization: {}", .sections.len(), format_open(.sections))]
    DanglingOpenSections { sections: Vec<(SectionName, usize)> },

    /// Export destination could not be written
    #[error("Failed to write profiler stats to {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Per-thread session used outside its lifecycle
    #[error("Profiling session {0}")]
    Session(&'static str),

    #[error("Failed to serialize profiler stats: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid profiler configuration: {0}")]
    Config(String),

    #[error("Failed to parse profiler configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to read profiler configuration {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ProfilerError>;

fn format_open(sections: &[(SectionName, usize)]) -> String {
    sections
        .iter()
        .map(|(name, depth)| format!("{name} (depth {depth})"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_exit_message() {
        let err = ProfilerError::MismatchedExit {
            name: SectionName::from("Z"),
        };
        assert_eq!(err.to_string(), "Mismatched section exit for Z");
    }

    #[test]
    fn test_dangling_message_lists_sections() {
        let err = ProfilerError::DanglingOpenSections {
            sections: vec![(SectionName::from("A"), 2), (SectionName::from("B"), 1)],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 section(s) still open"));
        assert!(msg.contains("A (depth 2)"));
        assert!(msg.contains("B (depth 1)"));
    }

    #[test]
    fn test_export_error_keeps_source() {
        use std::error::Error as _;

        let err = ProfilerError::Export {
            path: PathBuf::from("/nonexistent/out.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nonexistent/out.csv"));
        assert!(err.source().is_some());
    }
}
