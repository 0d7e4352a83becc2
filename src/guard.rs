//! Scope-bound section timing
//!
//! A [`SectionGuard`] enters its section on construction and exits it when
//! dropped, so every way out of the scope (fall-through, early return, `?`,
//! or a panic unwinding through it) produces exactly one exit.
//!
//! ```
//! use sectimer::profiler::Profiler;
//!
//! let mut profiler = Profiler::new();
//! {
//!     let mut outer = profiler.scope("outer");
//!     let _inner = outer.scope("inner");
//! }
//! assert_eq!(profiler.stats().get("outer").unwrap().count, 1);
//! assert_eq!(profiler.stats().get("inner").unwrap().count, 1);
//! ```

use std::ops::{Deref, DerefMut};

use crate::clock::Clock;
use crate::profiler::Profiler;
use crate::section::SectionName;

/// Exits its section when dropped
///
/// Dereferences to the owning [`Profiler`] so further sections can be
/// opened while it is alive.
#[must_use = "the section is exited as soon as the guard is dropped"]
pub struct SectionGuard<'p, C: Clock> {
    profiler: &'p mut Profiler<C>,
    name: SectionName,
}

impl<'p, C: Clock> SectionGuard<'p, C> {
    pub(crate) fn new(profiler: &'p mut Profiler<C>, name: SectionName) -> Self {
        profiler.enter_section(name.clone());
        Self { profiler, name }
    }

    pub fn name(&self) -> &SectionName {
        &self.name
    }
}

impl<C: Clock> Deref for SectionGuard<'_, C> {
    type Target = Profiler<C>;

    fn deref(&self) -> &Self::Target {
        self.profiler
    }
}

impl<C: Clock> DerefMut for SectionGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.profiler
    }
}

impl<C: Clock> Drop for SectionGuard<'_, C> {
    fn drop(&mut self) {
        // Mismatches are already logged by the profiler
        let _ = self.profiler.exit_section(self.name.as_str());
    }
}
