//! Section identifiers and completed timing records

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Name of an instrumented section
///
/// Compared, hashed and ordered by its text, so two names built from
/// different call sites with the same content are the same section.
/// Cloning is cheap; the text is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionName(Arc<str>);

impl SectionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionName {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for SectionName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for SectionName {
    fn from(name: &String) -> Self {
        Self::from(name.as_str())
    }
}

impl Borrow<str> for SectionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source location where a section was exited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub line: u32,
    pub file: String,
    pub function: String,
}

impl CallSite {
    pub fn new(line: u32, file: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            line,
            file: file.into(),
            function: function.into(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.file, self.line, self.function)
    }
}

/// An enter that has not been matched by an exit yet
#[derive(Debug, Clone, PartialEq)]
pub struct OpenStart {
    pub name: SectionName,
    pub started_at: f64,
}

/// One completed enter/exit pair
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub name: SectionName,
    pub elapsed_seconds: f64,
    pub call_site: Option<CallSite>,
}

impl Interval {
    pub fn new(name: impl Into<SectionName>, elapsed_seconds: f64) -> Self {
        Self {
            name: name.into(),
            elapsed_seconds,
            call_site: None,
        }
    }

    pub fn with_call_site(mut self, call_site: CallSite) -> Self {
        self.call_site = Some(call_site);
        self
    }
}
