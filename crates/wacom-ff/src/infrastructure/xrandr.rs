//! Monitor enumeration via `xrandr --listactivemonitors`.
//!
//! Example output:
//!
//! ```text
//! Monitors: 2
//!  0: +*DP-1 2560/597x1440/336+0+0  DP-1
//!  1: +HDMI-1 1920/531x1080/299+2560+0  HDMI-1
//! ```
//!
//! Each monitor line is `<id>: <flags><alt-name> <w>/<w-mm>x<h>/<h-mm>+<x>+<y> <name>`.
//! A negative offset is printed as `+-1920`.  The header and any line that
//! does not look like a monitor are skipped.

use async_trait::async_trait;
use tracing::debug;
use wacom_ff_core::{MonitorGeometry, MonitorLayout};

use super::command::ExternalTool;
use crate::application::{ExternalCallError, MonitorEnumerator};

/// [`MonitorEnumerator`] backed by xrandr.
pub struct XrandrMonitorEnumerator {
    tool: ExternalTool,
}

impl XrandrMonitorEnumerator {
    pub fn new(tool: ExternalTool) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl MonitorEnumerator for XrandrMonitorEnumerator {
    async fn enumerate_monitors(&self) -> Result<MonitorLayout, ExternalCallError> {
        let output = self.tool.run(&["--listactivemonitors"]).await?;
        let layout = parse_active_monitors(&output).map_err(|detail| {
            ExternalCallError::InvalidOutput {
                program: self.tool.program().to_string(),
                detail,
            }
        })?;
        debug!(monitors = layout.len(), "enumerated monitors");
        Ok(layout)
    }
}

/// Parses the full output of `xrandr --listactivemonitors`.
///
/// Order is preserved.  If an id is listed twice the later line replaces the
/// earlier one in place.
///
/// # Errors
///
/// Returns a description of the problem if a monitor line reports a zero
/// pixel size; the snapshot is then discarded as a whole.
pub fn parse_active_monitors(output: &str) -> Result<MonitorLayout, String> {
    let mut monitors: Vec<MonitorGeometry> = Vec::new();

    for line in output.lines() {
        let Some(monitor) = parse_monitor_line(line)? else {
            continue;
        };
        match monitors.iter_mut().find(|m| m.id() == monitor.id()) {
            Some(existing) => *existing = monitor,
            None => monitors.push(monitor),
        }
    }

    MonitorLayout::new(monitors).map_err(|e| e.to_string())
}

/// Parses one line; `Ok(None)` for lines that are not monitor entries.
fn parse_monitor_line(line: &str) -> Result<Option<MonitorGeometry>, String> {
    let Some((id, rest)) = line.trim().split_once(':') else {
        return Ok(None);
    };
    let Ok(id) = id.parse::<u32>() else {
        return Ok(None);
    };

    let mut tokens = rest.split_whitespace();
    let (Some(flagged_name), Some(geometry)) = (tokens.next(), tokens.next()) else {
        return Ok(None);
    };
    let name = tokens.collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Ok(None);
    }
    let Some(geometry) = parse_geometry(geometry) else {
        return Ok(None);
    };

    let alt_name = flagged_name.trim_start_matches(['+', '*']);
    let monitor = MonitorGeometry::new(
        id,
        name,
        geometry.width_px,
        geometry.height_px,
        geometry.x_offset,
        geometry.y_offset,
    )
    .map_err(|e| format!("{e} in line {line:?}"))?
    .with_alt_name(alt_name)
    .with_physical_size(geometry.width_mm, geometry.height_mm);

    Ok(Some(monitor))
}

struct RawGeometry {
    width_px: u32,
    width_mm: f64,
    height_px: u32,
    height_mm: f64,
    x_offset: i32,
    y_offset: i32,
}

/// Parses `<w>/<w-mm>x<h>/<h-mm>+<x>+<y>`.
fn parse_geometry(token: &str) -> Option<RawGeometry> {
    let (width, rest) = token.split_once('x')?;
    let (height, offsets) = rest.split_once('+')?;
    let (x_offset, y_offset) = offsets.split_once('+')?;
    let (width_px, width_mm) = width.split_once('/')?;
    let (height_px, height_mm) = height.split_once('/')?;

    Some(RawGeometry {
        width_px: width_px.parse().ok()?,
        width_mm: width_mm.parse().ok()?,
        height_px: height_px.parse().ok()?,
        height_mm: height_mm.parse().ok()?,
        x_offset: x_offset.parse().ok()?,
        y_offset: y_offset.parse().ok()?,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wacom_ff_core::CursorPosition;

    const DUAL: &str = "Monitors: 2\n \
                        0: +*DP-1 2560/597x1440/336+0+0  DP-1\n \
                        1: +HDMI-1 1920/531x1080/299+2560+0  HDMI-1\n";

    #[test]
    fn test_parse_active_monitors_reads_all_monitor_lines_in_order() {
        // Act
        let layout = parse_active_monitors(DUAL).expect("parse");

        // Assert
        let monitors: Vec<_> = layout.monitors().collect();
        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[0].id(), 0);
        assert_eq!(monitors[0].name(), "DP-1");
        assert_eq!(monitors[0].alt_name(), "DP-1");
        assert_eq!((monitors[0].width_px(), monitors[0].height_px()), (2560, 1440));
        assert_eq!(monitors[0].width_phys(), Some(597.0));
        assert_eq!(monitors[1].name(), "HDMI-1");
        assert_eq!((monitors[1].x_offset(), monitors[1].y_offset()), (2560, 0));
    }

    #[test]
    fn test_parsed_layout_resolves_cursor() {
        let layout = parse_active_monitors(DUAL).unwrap();
        assert_eq!(layout.resolve(CursorPosition::new(3000, 100)).map(|m| m.name()), Some("HDMI-1"));
    }

    #[test]
    fn test_parse_accepts_negative_offsets() {
        let output = "Monitors: 2\n 0: +*eDP-1 1920/344x1080/193+0+0  eDP-1\n 1: +DP-2 1280/338x1024/270+-1280+-200  DP-2\n";

        let layout = parse_active_monitors(output).unwrap();

        let left = layout.monitors().nth(1).unwrap();
        assert_eq!((left.x_offset(), left.y_offset()), (-1280, -200));
        assert!(left.contains_point(-1, -200));
    }

    #[test]
    fn test_parse_skips_header_and_garbage_lines() {
        let output = "Monitors: 1\nsomething else\n\n 0: +*DP-1 2560/597x1440/336+0+0  DP-1\n";

        let layout = parse_active_monitors(output).unwrap();

        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_parse_empty_output_yields_empty_layout() {
        assert!(parse_active_monitors("Monitors: 0\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_duplicate_id_keeps_later_line_in_earlier_position() {
        let output = " 0: +*DP-1 2560/597x1440/336+0+0  DP-1\n \
                      1: +HDMI-1 1920/531x1080/299+2560+0  HDMI-1\n \
                      0: +*DP-3 1920/531x1080/299+0+0  DP-3\n";

        let layout = parse_active_monitors(output).unwrap();

        let names: Vec<_> = layout.monitors().map(|m| m.name()).collect();
        assert_eq!(names, ["DP-3", "HDMI-1"]);
    }

    #[test]
    fn test_parse_zero_sized_monitor_fails_whole_snapshot() {
        let output = " 0: +*DP-1 2560/597x1440/336+0+0  DP-1\n 1: +VIRTUAL1 0/0x0/0+0+0  VIRTUAL1\n";

        let err = parse_active_monitors(output).unwrap_err();

        assert!(err.contains("zero width"), "got {err}");
    }

    #[test]
    fn test_parse_monitor_with_distinct_alt_name() {
        let output = " 0: +*HDMI-A-0 1920/531x1080/299+0+0  HDMI-A-0~1\n";

        let layout = parse_active_monitors(output).unwrap();

        let m = layout.monitors().next().unwrap();
        assert_eq!(m.name(), "HDMI-A-0~1");
        assert_eq!(m.alt_name(), "HDMI-A-0");
    }

    #[test]
    fn test_parse_geometry_rejects_malformed_token() {
        assert!(parse_geometry("1920x1080+0+0").is_none());
        assert!(parse_geometry("1920/531x1080/299").is_none());
        assert!(parse_geometry("abc/1xdef/2+0+0").is_none());
    }
}
