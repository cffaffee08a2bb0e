//! Test infrastructure for netcfg
//!
//! Provides:
//! - `FakeRunner`: scripted `ip` responses with command capture
//! - `SimulatedHost`: a stateful stand-in for `ip` and the kernel tables
//! - Canned `ip -j` output and iproute2 diagnostics
//! - Command log verification helpers

pub mod fixtures;
mod host;
mod runner;
mod verification;

pub use host::SimulatedHost;
pub use runner::FakeRunner;
pub use verification::*;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, ignoring poisoning from a panicked test thread.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
