use serde::{Deserialize, Serialize};

use super::DEFAULT_TAB_WIDTH;

/// Layout settings for an [`IndentedBuffer`](super::IndentedBuffer).
///
/// Missing fields take their defaults, so a config table only needs the
/// keys it overrides:
///
/// ```toml
/// [codegen]
/// tab_width = 2
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Spaces per indentation level.
    pub tab_width: usize,
    /// Depth a new buffer starts at.
    pub initial_indent: isize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            initial_indent: 0,
        }
    }
}
