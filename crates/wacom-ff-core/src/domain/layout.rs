//! Monitor layout snapshot.
//!
//! A [`MonitorLayout`] is one immutable enumeration of all active monitors,
//! in the order the enumerator reported them.  It is rebuilt from scratch on
//! every refresh and swapped in as a whole value; nothing mutates it in place.
//!
//! # Resolution order
//!
//! [`MonitorLayout::resolve`] returns the **first** monitor in stored order
//! whose rectangle contains the point.  Monitor rectangles do not overlap in a
//! normal extended desktop; when they do (mirroring, misconfigured offsets),
//! the earliest-declared monitor wins.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use super::geometry::{CursorPosition, MonitorGeometry};

/// Errors that can occur when building a layout snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// Two monitors in the same snapshot share an id.
    #[error("duplicate monitor id {0} in layout snapshot")]
    DuplicateMonitorId(u32),
}

/// An ordered, immutable snapshot of monitor geometries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorLayout {
    monitors: Vec<MonitorGeometry>,
}

impl MonitorLayout {
    /// Builds a snapshot, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateMonitorId`] if two monitors share an id.
    pub fn new(monitors: Vec<MonitorGeometry>) -> Result<Self, LayoutError> {
        let mut seen = HashSet::with_capacity(monitors.len());
        for m in &monitors {
            if !seen.insert(m.id()) {
                return Err(LayoutError::DuplicateMonitorId(m.id()));
            }
        }

        for (i, a) in monitors.iter().enumerate() {
            for b in &monitors[i + 1..] {
                if a.overlaps(b) {
                    debug!("monitors {} and {} overlap; {} takes precedence", a, b, a.name());
                }
            }
        }

        Ok(Self { monitors })
    }

    /// Returns a snapshot with no monitors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of monitors in the snapshot.
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Returns `true` for snapshots with fewer than two monitors, where
    /// remapping a device is meaningless.
    pub fn is_degenerate(&self) -> bool {
        self.monitors.len() < 2
    }

    /// Iterates the monitors in stored order.
    pub fn monitors(&self) -> impl Iterator<Item = &MonitorGeometry> {
        self.monitors.iter()
    }

    /// Returns the first monitor, in stored order, that contains `position`.
    ///
    /// Returns `None` when no monitor contains the point, including when the
    /// snapshot is empty.
    pub fn resolve(&self, position: CursorPosition) -> Option<&MonitorGeometry> {
        self.monitors.iter().find(|m| m.contains(position))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
