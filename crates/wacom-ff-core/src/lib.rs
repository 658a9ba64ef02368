//! # wacom-ff-core
//!
//! Shared library for wacom-ff containing the monitor geometry model and the
//! "which monitor is under this point" resolution.
//!
//! It has zero dependencies on OS APIs, external tools, or the async runtime.
//!
//! # Architecture overview
//!
//! wacom-ff is a focus-following daemon: whenever it is poked (by a timer or a
//! Unix signal) it asks the X server where the cursor is, works out which
//! monitor contains that point, and tells the tablet driver to map the
//! tablet's active area onto that monitor.
//!
//! This crate is the pure part of that pipeline:
//!
//! - **`domain::interval`** – [`IntervalRange`], a half-open integer range with
//!   a step.  Both axes of a monitor are expressed as one of these.
//!
//! - **`domain::geometry`** – [`MonitorGeometry`], one monitor's pixel
//!   rectangle and identity.
//!
//! - **`domain::layout`** – [`MonitorLayout`], an ordered snapshot of all
//!   monitors with first-match point resolution.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `wacom_ff_core::MonitorLayout` instead of the full module path.
pub use domain::geometry::{CursorPosition, GeometryError, MonitorGeometry};
pub use domain::interval::IntervalRange;
pub use domain::layout::{LayoutError, MonitorLayout};
