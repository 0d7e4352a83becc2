//! Per-thread default profiling session
//!
//! Instrumented code that cannot easily thread a [`Profiler`] through its
//! call graph can use this module instead. Each thread gets its own
//! independent profiler, created lazily on first use (or explicitly with
//! [`init`]) and torn down once with [`shutdown`]. After shutdown the
//! session on that thread stays closed: further calls are ignored.
//!
//! ```
//! use sectimer::{section_enter, section_exit, section_scope, session};
//!
//! fn work() {
//!     section_scope!("work");
//!     section_enter!("inner");
//!     section_exit!("inner");
//! }
//!
//! work();
//! let report = session::shutdown().unwrap();
//! assert_eq!(report.stats.len(), 2);
//! ```

use std::cell::RefCell;
use std::path::Path;

use crate::config::ProfilerConfig;
use crate::error::{ProfilerError, Result};
use crate::profiler::{Profiler, SessionReport};
use crate::section::{CallSite, SectionName};

enum SessionState {
    Uninit,
    Active(Box<Profiler>),
    Closed,
}

thread_local! {
    static SESSION: RefCell<SessionState> = const { RefCell::new(SessionState::Uninit) };
}

/// Start this thread's session with an explicit configuration
///
/// Fails if the session was already started (explicitly or lazily) or has
/// been shut down.
pub fn init(config: ProfilerConfig) -> Result<()> {
    config.validate()?;
    SESSION
        .try_with(|cell| {
            let mut state = cell
                .try_borrow_mut()
                .map_err(|_| ProfilerError::Session("is busy"))?;
            match *state {
                SessionState::Uninit => {
                    *state = SessionState::Active(Box::new(Profiler::with_config(config)));
                    Ok(())
                }
                SessionState::Active(_) => Err(ProfilerError::Session("already started")),
                SessionState::Closed => Err(ProfilerError::Session("already shut down")),
            }
        })
        .unwrap_or(Err(ProfilerError::Session("is unavailable during thread teardown")))
}

/// Run `f` against this thread's profiler, creating it if needed
///
/// Returns `None` once the session is closed or if called re-entrantly.
pub fn with<R>(f: impl FnOnce(&mut Profiler) -> R) -> Option<R> {
    SESSION
        .try_with(|cell| {
            let mut state = cell.try_borrow_mut().ok()?;
            if matches!(*state, SessionState::Uninit) {
                *state = SessionState::Active(Box::default());
            }
            match *state {
                SessionState::Active(ref mut profiler) => Some(f(profiler)),
                _ => {
                    tracing::debug!("profiling session closed; call ignored");
                    None
                }
            }
        })
        .ok()
        .flatten()
}

pub fn is_active() -> bool {
    SESSION
        .try_with(|cell| {
            cell.try_borrow()
                .map(|state| matches!(*state, SessionState::Active(_)))
                .unwrap_or(false)
        })
        .unwrap_or(false)
}

pub fn enter_section(name: impl Into<SectionName>) {
    let name = name.into();
    with(|p| p.enter_section(name));
}

pub fn exit_section(name: &str) -> Result<f64> {
    with(|p| p.exit_section(name)).unwrap_or(Err(ProfilerError::Session("is closed")))
}

pub fn exit_section_at(name: &str, call_site: CallSite) -> Result<f64> {
    with(|p| p.exit_section_at(name, call_site)).unwrap_or(Err(ProfilerError::Session("is closed")))
}

pub fn calculate_stats() -> usize {
    with(|p| p.calculate_stats()).unwrap_or(0)
}

pub fn export_csv(path: impl AsRef<Path>) -> Result<()> {
    with(|p| p.export_csv(path)).unwrap_or(Err(ProfilerError::Session("is closed")))
}

pub fn export_json(path: impl AsRef<Path>) -> Result<()> {
    with(|p| p.export_json(path)).unwrap_or(Err(ProfilerError::Session("is closed")))
}

pub fn print_summary() {
    with(|p| p.print_summary());
}

/// Close this thread's session and return its final report
///
/// Returns `None` if no profiler was ever created. The session cannot be
/// restarted on this thread afterwards.
pub fn shutdown() -> Option<SessionReport> {
    SESSION
        .try_with(|cell| {
            let mut state = cell.try_borrow_mut().ok()?;
            match std::mem::replace(&mut *state, SessionState::Closed) {
                SessionState::Active(profiler) => Some(profiler.shutdown()),
                SessionState::Uninit | SessionState::Closed => None,
            }
        })
        .ok()
        .flatten()
}

/// Exits its section in the thread's session when dropped
#[must_use = "the section is exited as soon as the guard is dropped"]
pub struct SessionScope {
    name: SectionName,
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        let _ = exit_section(self.name.as_str());
    }
}

/// Time the current scope as `name` in this thread's session
pub fn scope(name: impl Into<SectionName>) -> SessionScope {
    let name = name.into();
    enter_section(name.clone());
    SessionScope { name }
}

/// Fully qualified name of the enclosing function
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// [`CallSite`](crate::section::CallSite) for the macro invocation point
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::section::CallSite::new(line!(), file!(), $crate::function_name!())
    };
}

/// Enter a section in this thread's session
#[macro_export]
macro_rules! section_enter {
    ($name:expr) => {
        $crate::session::enter_section($name)
    };
}

/// Exit a section in this thread's session, recording the call-site
#[macro_export]
macro_rules! section_exit {
    ($name:expr) => {{
        let _ = $crate::session::exit_section_at($name, $crate::call_site!());
    }};
}

/// Time the rest of the enclosing block in this thread's session
#[macro_export]
macro_rules! section_scope {
    ($name:expr) => {
        let _section_scope = $crate::session::scope($name);
    };
}
