//! Cursor position via `xdotool getmouselocation`.
//!
//! xdotool prints a single line such as:
//!
//! ```text
//! x:2113 y:640 screen:0 window:58720263
//! ```
//!
//! Only `x` and `y` are used; the other keys are ignored.

use async_trait::async_trait;
use wacom_ff_core::CursorPosition;

use super::command::ExternalTool;
use crate::application::{CursorLocator, ExternalCallError};

/// [`CursorLocator`] backed by xdotool.
pub struct XdotoolCursorLocator {
    tool: ExternalTool,
}

impl XdotoolCursorLocator {
    pub fn new(tool: ExternalTool) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl CursorLocator for XdotoolCursorLocator {
    async fn cursor_position(&self) -> Result<CursorPosition, ExternalCallError> {
        let output = self.tool.run(&["getmouselocation"]).await?;
        parse_mouse_location(&output).map_err(|detail| ExternalCallError::InvalidOutput {
            program: self.tool.program().to_string(),
            detail,
        })
    }
}

/// Parses the `key:value` output of `xdotool getmouselocation`.
///
/// # Errors
///
/// Returns a description of the problem if `x` or `y` is missing or is not
/// an integer.
pub fn parse_mouse_location(output: &str) -> Result<CursorPosition, String> {
    let mut x = None;
    let mut y = None;

    for token in output.split_whitespace() {
        let Some((key, value)) = token.split_once(':') else {
            return Err(format!("unexpected token {token:?} in {output:?}"));
        };
        let slot = match key {
            "x" => &mut x,
            "y" => &mut y,
            _ => continue,
        };
        let parsed = value
            .parse::<i32>()
            .map_err(|e| format!("invalid {key} coordinate {value:?}: {e}"))?;
        *slot = Some(parsed);
    }

    match (x, y) {
        (Some(x), Some(y)) => Ok(CursorPosition::new(x, y)),
        _ => Err(format!("missing x or y coordinate in {output:?}")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
