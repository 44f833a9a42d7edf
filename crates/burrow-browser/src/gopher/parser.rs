//! Parser for Gopher menus.
//!
//! A menu line is `<type><label>\t<selector>\t<host>\t<port>`, optionally
//! followed by more tab-separated fields (Gopher+) and a trailing `\r`.
//! Real servers emit blank lines, a `.` terminator and other debris, so a
//! line that does not fit is skipped rather than treated as an error. Each
//! line parses to a [`ParsedLine`] so the skip decisions stay visible.

use super::{ItemType, MenuEntry};

/// Minimum number of tab-separated fields in a menu line.
const MIN_FIELDS: usize = 4;

/// Why a line did not produce an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than four tab-separated fields (blank lines, the `.`
    /// terminator, plain text).
    TooFewFields(usize),
    /// Enough fields, but the first one is empty so there is no type code.
    MissingItemType,
}

/// Outcome of parsing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Valid(MenuEntry),
    Skipped(SkipReason),
}

/// A parsed Gopher menu.
#[derive(Debug, Clone, Default)]
pub struct GopherMenu {
    /// One result per input line, in order.
    pub lines: Vec<ParsedLine>,
}

impl GopherMenu {
    /// Parse menu text line by line.
    pub fn parse(input: &str) -> Self {
        let lines: Vec<ParsedLine> = input.split('\n').map(parse_line).collect();
        let menu = GopherMenu { lines };
        let skipped = menu.skipped_count();
        if skipped > 0 {
            log::debug!(
                "parsed menu: {} entries, {skipped} lines skipped",
                menu.lines.len() - skipped
            );
        }
        menu
    }

    /// The valid entries, in order.
    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.lines.iter().filter_map(|line| match line {
            ParsedLine::Valid(entry) => Some(entry),
            ParsedLine::Skipped(_) => None,
        })
    }

    /// Consume the menu, keeping only the valid entries.
    pub fn into_entries(self) -> Vec<MenuEntry> {
        self.lines
            .into_iter()
            .filter_map(|line| match line {
                ParsedLine::Valid(entry) => Some(entry),
                ParsedLine::Skipped(_) => None,
            })
            .collect()
    }

    /// Number of lines that did not produce an entry.
    pub fn skipped_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, ParsedLine::Skipped(_)))
            .count()
    }
}

/// Parse menu text into its valid entries.
pub fn parse_menu(input: &str) -> Vec<MenuEntry> {
    GopherMenu::parse(input).into_entries()
}

/// Parse a single menu line.
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MIN_FIELDS {
        return ParsedLine::Skipped(SkipReason::TooFewFields(fields.len()));
    }

    let mut head = fields[0].chars();
    let Some(code) = head.next() else {
        return ParsedLine::Skipped(SkipReason::MissingItemType);
    };

    ParsedLine::Valid(MenuEntry {
        item_type: ItemType::from_code(code),
        label: head.as_str().to_string(),
        selector: fields[1].to_string(),
        host: fields[2].to_string(),
        port: fields[3].to_string(),
    })
}
