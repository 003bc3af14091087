//! Settings for loading and writing PGN.

use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::Tags;

/// Narrowest line the writer will wrap to.
const MIN_LINE_WIDTH: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PgnOptions {
    /// Movetext lines are kept shorter than this.
    pub line_width: usize,
    /// Write engine stats as `{...}` comments after each move.
    pub include_stats: bool,
    /// Tags a freshly loaded game starts with before its own tags are read.
    pub default_tags: Tags,
}

impl Default for PgnOptions {
    fn default() -> Self {
        PgnOptions {
            line_width: 80,
            include_stats: true,
            default_tags: Tags::seven_tag_roster(),
        }
    }
}

impl PgnOptions {
    #[must_use]
    pub fn new() -> Self {
        PgnOptions::default()
    }

    /// Apply a named setting. Names are case-insensitive; `"tag <Key>"`
    /// sets a default tag. Unknown names and unparsable values are ignored.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "line width" | "linewidth" => {
                match value.and_then(|v| v.trim().parse::<usize>().ok()) {
                    Some(width) => self.line_width = width.max(MIN_LINE_WIDTH),
                    None => warn!("bad value {value:?} for option {name}"),
                }
            }
            "include stats" | "stats" => {
                if let Some(v) = value {
                    self.include_stats =
                        matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "on");
                }
            }
            _ if normalized.starts_with("tag ") => {
                let key = name.trim()[4..].trim();
                match value {
                    Some(v) if !key.is_empty() => self.default_tags.set(key, v.trim()),
                    _ => {
                        self.default_tags.remove(key);
                    }
                }
            }
            _ => warn!("unknown option {name}"),
        }
    }
}
