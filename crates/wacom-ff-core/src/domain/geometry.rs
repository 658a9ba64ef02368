//! Monitor geometry domain entity.
//!
//! Every monitor occupies a rectangle in the X server's virtual screen
//! coordinate space.  The rectangle is stored as pixel size plus offset; the
//! horizontal and vertical [`IntervalRange`]s are derived on demand and never
//! stored, so a geometry is always internally consistent.

use std::fmt;
use std::num::NonZeroU32;

use thiserror::Error;

use super::interval::IntervalRange;

/// Errors raised when constructing geometry values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// A monitor reported a width of zero pixels.
    #[error("monitor {id} has zero width")]
    ZeroWidth { id: u32 },

    /// A monitor reported a height of zero pixels.
    #[error("monitor {id} has zero height")]
    ZeroHeight { id: u32 },

    /// An interval was requested with `stop <= start`.
    #[error("empty interval: stop {stop} must be greater than start {start}")]
    EmptyInterval { start: i64, stop: i64 },

    /// An interval was requested with a step of zero.
    #[error("interval step must be at least 1")]
    ZeroStep,
}

/// A pointer location in virtual screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One physical monitor: identity plus pixel rectangle.
///
/// `name` is the output name the tablet driver understands (e.g. `DP-1`);
/// `alt_name` is the secondary name reported by the enumerator, which for
/// xrandr is the monitor name and usually equals the output name.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorGeometry {
    id: u32,
    name: String,
    alt_name: String,
    width_px: NonZeroU32,
    height_px: NonZeroU32,
    x_offset: i32,
    y_offset: i32,
    width_phys: Option<f64>,
    height_phys: Option<f64>,
}

impl MonitorGeometry {
    /// Creates a monitor geometry.
    ///
    /// `alt_name` defaults to `name` and the physical size is unknown until set
    /// with the builder methods.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroWidth`] or [`GeometryError::ZeroHeight`]
    /// when either pixel dimension is zero.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        width_px: u32,
        height_px: u32,
        x_offset: i32,
        y_offset: i32,
    ) -> Result<Self, GeometryError> {
        let width_px = NonZeroU32::new(width_px).ok_or(GeometryError::ZeroWidth { id })?;
        let height_px = NonZeroU32::new(height_px).ok_or(GeometryError::ZeroHeight { id })?;
        let name = name.into();
        Ok(Self {
            id,
            alt_name: name.clone(),
            name,
            width_px,
            height_px,
            x_offset,
            y_offset,
            width_phys: None,
            height_phys: None,
        })
    }

    /// Sets the secondary monitor name.
    pub fn with_alt_name(mut self, alt_name: impl Into<String>) -> Self {
        self.alt_name = alt_name.into();
        self
    }

    /// Sets the physical size in millimetres.
    pub fn with_physical_size(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.width_phys = Some(width_mm);
        self.height_phys = Some(height_mm);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alt_name(&self) -> &str {
        &self.alt_name
    }

    pub fn width_px(&self) -> u32 {
        self.width_px.get()
    }

    pub fn height_px(&self) -> u32 {
        self.height_px.get()
    }

    pub fn x_offset(&self) -> i32 {
        self.x_offset
    }

    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    /// Physical width in millimetres, if the enumerator reported one.
    pub fn width_phys(&self) -> Option<f64> {
        self.width_phys
    }

    /// Physical height in millimetres, if the enumerator reported one.
    pub fn height_phys(&self) -> Option<f64> {
        self.height_phys
    }

    /// Horizontal pixel range `[x_offset, x_offset + width_px)`.
    pub fn horizontal_range(&self) -> IntervalRange {
        IntervalRange::with_len(i64::from(self.x_offset), self.width_px)
    }

    /// Vertical pixel range `[y_offset, y_offset + height_px)`.
    pub fn vertical_range(&self) -> IntervalRange {
        IntervalRange::with_len(i64::from(self.y_offset), self.height_px)
    }

    /// Returns `true` if `(x, y)` lies inside this monitor.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.horizontal_range().contains(i64::from(x)) && self.vertical_range().contains(i64::from(y))
    }

    /// Returns `true` if the position lies inside this monitor.
    pub fn contains(&self, position: CursorPosition) -> bool {
        self.contains_point(position.x, position.y)
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &MonitorGeometry) -> bool {
        let (ax, bx) = (self.horizontal_range(), other.horizontal_range());
        let (ay, by) = (self.vertical_range(), other.vertical_range());
        ax.start() < bx.stop()
            && bx.start() < ax.stop()
            && ay.start() < by.stop()
            && by.start() < ay.stop()
    }
}

impl fmt::Display for MonitorGeometry {
    /// Formats as `name WxH+X+Y`, the notation xrandr uses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{}{:+}{:+}",
            self.name, self.width_px, self.height_px, self.x_offset, self.y_offset
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(id: u32, x: i32, y: i32, w: u32, h: u32) -> MonitorGeometry {
        MonitorGeometry::new(id, format!("OUT-{id}"), w, h, x, y).expect("valid geometry")
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_rejects_zero_width() {
        let result = MonitorGeometry::new(3, "DP-1", 0, 1080, 0, 0);
        assert_eq!(result, Err(GeometryError::ZeroWidth { id: 3 }));
    }

    #[test]
    fn test_new_rejects_zero_height() {
        let result = MonitorGeometry::new(4, "DP-1", 1920, 0, 0, 0);
        assert_eq!(result, Err(GeometryError::ZeroHeight { id: 4 }));
    }

    #[test]
    fn test_new_defaults_alt_name_to_name_and_no_physical_size() {
        let m = MonitorGeometry::new(0, "HDMI-0", 1920, 1080, 0, 0).unwrap();
        assert_eq!(m.alt_name(), "HDMI-0");
        assert_eq!(m.width_phys(), None);
        assert_eq!(m.height_phys(), None);
    }

    #[test]
    fn test_builders_set_alt_name_and_physical_size() {
        let m = MonitorGeometry::new(0, "DP-1", 2560, 1440, 0, 0)
            .unwrap()
            .with_alt_name("*DP-1")
            .with_physical_size(597.0, 336.0);
        assert_eq!(m.alt_name(), "*DP-1");
        assert_eq!(m.width_phys(), Some(597.0));
        assert_eq!(m.height_phys(), Some(336.0));
    }

    // ── Ranges ────────────────────────────────────────────────────────────────

    #[test]
    fn test_ranges_are_derived_from_offset_and_size() {
        let m = monitor(1, 1920, -200, 2560, 1440);
        assert_eq!(m.horizontal_range().start(), 1920);
        assert_eq!(m.horizontal_range().stop(), 4480);
        assert_eq!(m.vertical_range().start(), -200);
        assert_eq!(m.vertical_range().stop(), 1240);
    }

    // ── contains_point ────────────────────────────────────────────────────────

    #[test]
    fn test_contains_point_at_corners() {
        let m = monitor(0, 0, 0, 1920, 1080);
        assert!(m.contains_point(0, 0));
        assert!(m.contains_point(1919, 1079));
        assert!(!m.contains_point(1920, 0));
        assert!(!m.contains_point(0, 1080));
    }

    #[test]
    fn test_contains_point_with_negative_offsets() {
        let m = monitor(0, -1280, -1024, 1280, 1024);
        assert!(m.contains_point(-1280, -1024));
        assert!(m.contains_point(-1, -1));
        assert!(!m.contains_point(0, 0));
    }

    #[test]
    fn test_contains_point_at_i32_extremes_does_not_overflow() {
        let m = monitor(0, i32::MAX - 10, i32::MAX - 10, u32::MAX, u32::MAX);
        assert!(m.contains_point(i32::MAX, i32::MAX));
        assert!(!m.contains_point(i32::MIN, i32::MIN));
    }

    #[test]
    fn test_edge_to_edge_monitors_contain_every_point_exactly_once() {
        // Left 1920x1080, right 1280x1024 bottom-aligned: asymmetric but touching.
        let left = monitor(0, 0, 0, 1920, 1080);
        let right = monitor(1, 1920, 56, 1280, 1024);

        for x in (0..3200).step_by(7) {
            for y in (56..1080).step_by(5) {
                let hits = [&left, &right]
                    .iter()
                    .filter(|m| m.contains_point(x, y))
                    .count();
                assert_eq!(hits, 1, "point ({x}, {y}) must be on exactly one monitor");
            }
        }
    }

    #[test]
    fn test_contains_accepts_cursor_position() {
        let m = monitor(0, 0, 0, 100, 100);
        assert!(m.contains(CursorPosition::new(50, 50)));
        assert!(!m.contains(CursorPosition::new(150, 50)));
    }

    // ── overlaps ──────────────────────────────────────────────────────────────

    #[test]
    fn test_overlaps_when_rectangles_share_area() {
        assert!(monitor(0, 0, 0, 100, 100).overlaps(&monitor(1, 50, 50, 100, 100)));
    }

    #[test]
    fn test_does_not_overlap_when_adjacent() {
        assert!(!monitor(0, 0, 0, 100, 100).overlaps(&monitor(1, 100, 0, 100, 100)));
    }

    #[test]
    fn test_mirrored_monitors_overlap() {
        assert!(monitor(0, 0, 0, 1920, 1080).overlaps(&monitor(1, 0, 0, 1920, 1080)));
    }

    // ── Display ───────────────────────────────────────────────────────────────

    #[test]
    fn test_display_uses_xrandr_geometry_notation() {
        let m = MonitorGeometry::new(0, "DP-2", 1920, 1080, -1920, 0).unwrap();
        assert_eq!(m.to_string(), "DP-2 1920x1080-1920+0");
    }
}
