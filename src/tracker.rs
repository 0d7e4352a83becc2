//! Enter/exit pairing for named sections
//!
//! Each section name owns an independent LIFO stack of open starts.
//! An exit always matches the most recent unmatched enter of the *same*
//! name, which gives both behaviors instrumented code relies on:
//!
//! - recursion: `enter(X) enter(X) exit(X) exit(X)` pairs innermost first
//! - interleaving: `enter(A) enter(B) exit(A) exit(B)` is legal, since
//!   no ordering is imposed across distinct names
//!
//! The tracker does not read a clock itself; callers pass the timestamp
//! they took for the event.

use std::collections::HashMap;

use crate::error::{ProfilerError, Result};
use crate::section::{CallSite, Interval, OpenStart, SectionName};

/// Owns in-flight section state and emits completed intervals
#[derive(Debug, Default)]
pub struct SectionTracker {
    open: HashMap<SectionName, Vec<OpenStart>>,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an open start for `name`; always succeeds
    pub fn enter(&mut self, name: impl Into<SectionName>, now: f64) {
        let name = name.into();
        tracing::trace!(section = %name, at = now, "enter");
        self.open.entry(name.clone()).or_default().push(OpenStart {
            name,
            started_at: now,
        });
    }

    /// Pop the innermost open start for `name` and build its interval
    ///
    /// Returns [`ProfilerError::MismatchedExit`] without touching any state
    /// if `name` has no open enter.
    pub fn exit(&mut self, name: &str, now: f64, call_site: Option<CallSite>) -> Result<Interval> {
        let start = self
            .open
            .get_mut(name)
            .and_then(Vec::pop)
            .ok_or_else(|| ProfilerError::MismatchedExit { name: name.into() })?;
        if self.open.get(name).is_some_and(Vec::is_empty) {
            self.open.remove(name);
        }

        let elapsed = now - start.started_at;
        tracing::trace!(section = %start.name, elapsed, "exit");
        Ok(Interval {
            name: start.name,
            elapsed_seconds: elapsed,
            call_site,
        })
    }

    /// Number of unmatched enters for `name`
    pub fn depth(&self, name: &str) -> usize {
        self.open.get(name).map_or(0, Vec::len)
    }

    pub fn is_idle(&self) -> bool {
        self.open.is_empty()
    }

    /// Sections with unmatched enters and their open depth, sorted by name
    pub fn open_sections(&self) -> Vec<(SectionName, usize)> {
        let mut open: Vec<_> = self
            .open
            .iter()
            .map(|(name, stack)| (name.clone(), stack.len()))
            .collect();
        open.sort_by(|a, b| a.0.cmp(&b.0));
        open
    }

    /// Drop every open start, returning what was dangling
    pub fn clear(&mut self) -> Vec<(SectionName, usize)> {
        let dangling = self.open_sections();
        self.open.clear();
        dangling
    }
}
