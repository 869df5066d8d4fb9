//! Middleware layer.
//!
//! Middleware wraps the handler call and is the place for cross-cutting
//! concerns. Today that is one layer:
//!
//! - [`trace`] — per-request span with method, target, status, latency

mod trace;

pub(crate) use trace::trace;
