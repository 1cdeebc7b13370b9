//! Availability signal for the remote cache tier

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Availability of the remote cache tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAvailability {
    /// Connected; remote operations are attempted
    Available,
    /// Not connected; remote operations are skipped
    Unavailable,
    /// Reconnecting after an error; remote operations are skipped
    Probing,
}

impl CacheAvailability {
    fn as_u8(self) -> u8 {
        match self {
            CacheAvailability::Available => 0,
            CacheAvailability::Unavailable => 1,
            CacheAvailability::Probing => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => CacheAvailability::Available,
            2 => CacheAvailability::Probing,
            _ => CacheAvailability::Unavailable,
        }
    }
}

impl fmt::Display for CacheAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheAvailability::Available => write!(f, "available"),
            CacheAvailability::Unavailable => write!(f, "unavailable"),
            CacheAvailability::Probing => write!(f, "probing"),
        }
    }
}

/// Shared health state of the remote cache tier
///
/// Written by the connection monitor only. Every cache operation reads it to
/// pick a tier. Starts out `Unavailable` until a connection succeeds.
#[derive(Debug)]
pub struct CacheHealth {
    state: AtomicU8,
}

impl CacheHealth {
    pub fn new() -> Self {
        Self::with_state(CacheAvailability::Unavailable)
    }

    pub fn with_state(state: CacheAvailability) -> Self {
        Self {
            state: AtomicU8::new(state.as_u8()),
        }
    }

    pub fn state(&self) -> CacheAvailability {
        CacheAvailability::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_available(&self) -> bool {
        self.state() == CacheAvailability::Available
    }

    pub fn set(&self, state: CacheAvailability) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    pub fn mark_available(&self) {
        self.set(CacheAvailability::Available);
    }

    pub fn mark_unavailable(&self) {
        self.set(CacheAvailability::Unavailable);
    }

    pub fn mark_probing(&self) {
        self.set(CacheAvailability::Probing);
    }
}

impl Default for CacheHealth {
    fn default() -> Self {
        Self::new()
    }
}
