//! Presentation seam between the navigation engine and the user.
//!
//! The engine never touches stdin/stdout directly. It hands menus and
//! content to a [`Renderer`] and reads raw choice strings back, which are
//! interpreted here.

use crate::gopher::MenuEntry;

/// Prompt shown under a menu.
pub const MENU_PROMPT: &str = "Select an option: ";
/// Prompt shown under a text document.
pub const CONTENT_PROMPT: &str = "\nPress 'b' to go back, 'f' to go forward or 'q' to quit:\n> ";
/// Printed when a choice is not understood.
pub const INVALID_CHOICE: &str = "Invalid choice. Please try again.";

/// Blocking user-facing output and input.
pub trait Renderer {
    /// Show a parsed menu.
    fn render_menu(&mut self, entries: &[MenuEntry]);

    /// Show a text document verbatim.
    fn render_content(&mut self, text: &str);

    /// Prompt and block for one line of input. `None` means input is
    /// exhausted and is treated as quit.
    fn read_choice(&mut self, prompt: &str) -> Option<String>;

    /// Show a one-line message (errors, history boundaries).
    fn notify(&mut self, message: &str);
}

/// An interpreted user choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Follow the menu entry at this index.
    Select(usize),
    Back,
    Forward,
    Quit,
}

fn parse_navigation(input: &str) -> Option<Choice> {
    match input.to_ascii_lowercase().as_str() {
        "b" | "back" => Some(Choice::Back),
        "f" | "forward" => Some(Choice::Forward),
        "q" | "quit" => Some(Choice::Quit),
        _ => None,
    }
}

/// Interpret input typed under a menu of `entry_count` entries.
pub fn parse_menu_choice(input: &str, entry_count: usize) -> Option<Choice> {
    let input = input.trim();
    if let Some(choice) = parse_navigation(input) {
        return Some(choice);
    }
    match input.parse::<usize>() {
        Ok(index) if index < entry_count => Some(Choice::Select(index)),
        _ => None,
    }
}

/// Interpret input typed under a text document. Entry numbers are not
/// accepted here.
pub fn parse_content_choice(input: &str) -> Option<Choice> {
    parse_navigation(input.trim())
}

/// Menu listing as display lines: `N. [LINK] label`, then the key legend.
pub fn menu_lines(entries: &[MenuEntry]) -> Vec<String> {
    let mut lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry.item_type.label_prefix() {
            "" => format!("{i}. {}", entry.label),
            prefix => format!("{i}. {prefix} {}", entry.label),
        })
        .collect();
    lines.push("q. Quit".to_string());
    lines.push("b. Go back".to_string());
    lines.push("f. Go forward".to_string());
    lines
}

/// Prompt until the input is a valid menu choice. End of input is quit.
pub fn prompt_menu_choice(renderer: &mut dyn Renderer, entry_count: usize) -> Choice {
    loop {
        let Some(input) = renderer.read_choice(MENU_PROMPT) else {
            return Choice::Quit;
        };
        log::debug!("menu choice: {input:?}");
        match parse_menu_choice(&input, entry_count) {
            Some(choice) => return choice,
            None => renderer.notify(INVALID_CHOICE),
        }
    }
}

/// Prompt until the input is back, forward or quit. End of input is quit.
pub fn prompt_content_choice(renderer: &mut dyn Renderer) -> Choice {
    loop {
        let Some(input) = renderer.read_choice(CONTENT_PROMPT) else {
            return Choice::Quit;
        };
        match parse_content_choice(&input) {
            Some(choice) => return choice,
            None => renderer.notify(INVALID_CHOICE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gopher::parse_menu;
    use crate::test_utils::ScriptedRenderer;

    #[test]
    fn menu_choice_keys() {
        assert_eq!(parse_menu_choice("b", 2), Some(Choice::Back));
        assert_eq!(parse_menu_choice(" Q ", 2), Some(Choice::Quit));
        assert_eq!(parse_menu_choice("forward", 2), Some(Choice::Forward));
        assert_eq!(parse_menu_choice("1", 2), Some(Choice::Select(1)));
    }

    #[test]
    fn menu_choice_rejects_out_of_range_and_garbage() {
        assert_eq!(parse_menu_choice("2", 2), None);
        assert_eq!(parse_menu_choice("-1", 2), None);
        assert_eq!(parse_menu_choice("x", 2), None);
        assert_eq!(parse_menu_choice("", 2), None);
        assert_eq!(parse_menu_choice("0", 0), None);
    }

    #[test]
    fn content_choice_rejects_numbers() {
        assert_eq!(parse_content_choice("0"), None);
        assert_eq!(parse_content_choice("back"), Some(Choice::Back));
        assert_eq!(parse_content_choice("q"), Some(Choice::Quit));
    }

    #[test]
    fn menu_lines_use_type_prefixes() {
        let entries = parse_menu(
            "1Dir A\t/a\th\t70\r\n0Readme\t/r\th\t70\r\niWelcome\t\th\t70\r\n",
        );
        assert_eq!(
            menu_lines(&entries),
            vec![
                "0. [LINK] Dir A",
                "1. [TEXT] Readme",
                "2. Welcome",
                "q. Quit",
                "b. Go back",
                "f. Go forward",
            ]
        );
    }

    #[test]
    fn prompt_reprompts_after_invalid_input() {
        let mut r = ScriptedRenderer::new(["nope", "7", "1"]);
        assert_eq!(prompt_menu_choice(&mut r, 2), Choice::Select(1));
        assert_eq!(r.notices, vec![INVALID_CHOICE, INVALID_CHOICE]);
        assert_eq!(r.prompts.len(), 3);
    }

    #[test]
    fn exhausted_input_quits() {
        let mut r = ScriptedRenderer::new(Vec::<&str>::new());
        assert_eq!(prompt_content_choice(&mut r), Choice::Quit);
        assert_eq!(prompt_menu_choice(&mut r, 3), Choice::Quit);
    }
}
