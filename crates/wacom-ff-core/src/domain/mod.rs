//! Domain entities: pure geometry with no OS dependencies.
//!
//! # Sub-modules
//!
//! - **`interval`** – Half-open stepped integer ranges and membership tests.
//! - **`geometry`** – A single monitor rectangle built from two intervals.
//! - **`layout`** – The ordered monitor snapshot and cursor resolution.

pub mod geometry;
pub mod interval;
pub mod layout;
