use serde::{Deserialize, Serialize};

/// Tree-wide defaults inherited by every newly created node.
///
/// Serde-friendly so an embedding application can keep it in its own
/// configuration file:
///
/// ```toml
/// expand_new = false
/// visible_new = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// New nodes start out expanded.
    pub expand_new: bool,
    /// New nodes start out visible.
    pub visible_new: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            expand_new: true,
            visible_new: true,
        }
    }
}

impl TreeConfig {
    pub fn collapsed() -> Self {
        Self {
            expand_new: false,
            ..Self::default()
        }
    }
}
