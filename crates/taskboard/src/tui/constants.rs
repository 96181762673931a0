//! Shared constants for the TUI to keep layout and timing in sync.

/// Interval in milliseconds between UI ticks/redraws.
pub const TUI_TICK_RATE_MS: u64 = 200;
/// Time-to-live in seconds for transient status messages.
pub const UI_MESSAGE_TTL_SECS: u64 = 5;
/// Highlight symbol shown beside the selected row.
pub const TASK_LIST_HIGHLIGHT_SYMBOL: &str = "▶ ";
/// Highlight symbol shown beside a row that is being dragged.
pub const DRAG_HIGHLIGHT_SYMBOL: &str = "↕ ";
/// Longest title shown in the list before truncation.
pub const TASK_TITLE_MAX_GRAPHEMES: usize = 60;
/// Width percentage for the form popup before clamping.
pub const FORM_POPUP_WIDTH_PERCENT: u16 = 60;
/// Minimum width for the form popup.
pub const FORM_POPUP_MIN_WIDTH: u16 = 44;
/// Height of the form popup: five bordered inputs, a hint line and the frame.
pub const FORM_POPUP_HEIGHT: u16 = 19;
