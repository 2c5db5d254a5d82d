//! Scanner configuration.

use koka_lexer_core::DEFAULT_TAB_WIDTH;

/// Tunables for [`LayoutScanner`](crate::LayoutScanner).
///
/// Structural limits (stack depth, state size) are fixed constants, not
/// configuration, so a serialized state is valid under any config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScannerConfig {
    /// Columns added per tab character. Each tab counts the full width;
    /// there are no tab stops.
    pub tab_width: u32,
    /// Apply the layout rule inside explicit `{ }` blocks.
    ///
    /// When set, an explicit block seats its reference column at its first
    /// token and new lines at that column receive a `Semicolon`. Explicit
    /// blocks are still only closed by a literal `}`.
    pub layout_in_braces: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            layout_in_braces: false,
        }
    }
}

impl ScannerConfig {
    /// Set the tab width.
    #[must_use]
    pub const fn with_tab_width(mut self, tab_width: u32) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Enable or disable layout inside explicit braces.
    #[must_use]
    pub const fn with_layout_in_braces(mut self, enabled: bool) -> Self {
        self.layout_in_braces = enabled;
        self
    }
}
