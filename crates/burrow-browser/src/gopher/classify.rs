//! Menu-versus-content heuristic.
//!
//! Gopher responses carry no type information, so the client looks at the
//! text itself: a menu is dominated by lines with at least three tabs (the
//! four fields of a menu line). A share strictly above
//! [`MENU_DENSITY_THRESHOLD`] counts as a menu. This tolerates a few blank,
//! informational or malformed lines in a menu, while plain text with the
//! odd tab stays content.

/// Share of menu-shaped lines above which a response is a menu.
pub const MENU_DENSITY_THRESHOLD: f64 = 0.20;

/// Tabs needed for a line to look like a menu line.
const MENU_LINE_TABS: usize = 3;

/// What a response turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Menu,
    Content,
}

/// Classify response text.
pub fn classify(text: &str) -> ResponseKind {
    let mut total = 0usize;
    let mut menu_lines = 0usize;
    for line in text.split('\n') {
        total += 1;
        if line.matches('\t').count() >= MENU_LINE_TABS {
            menu_lines += 1;
        }
    }

    if menu_lines as f64 > total as f64 * MENU_DENSITY_THRESHOLD {
        ResponseKind::Menu
    } else {
        ResponseKind::Content
    }
}
