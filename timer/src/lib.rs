//! Single-shot, cancellable delayed callbacks.
//!
//! A [`Timer`] runs its job once after a duration elapses unless it is stopped first.
//! [`AsyncTimer`] offers the same contract for jobs that live on a tokio runtime.

pub mod timer;

pub use timer::*;
