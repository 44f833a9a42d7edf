//! Line-oriented renderer over any reader/writer pair (stdin/stdout in the
//! binary, in-memory buffers in tests).

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use burrow_browser::{MenuEntry, Renderer, menu_lines};

pub struct TerminalRenderer<I, O> {
    input: I,
    output: O,
}

impl TerminalRenderer<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<I: BufRead, O: Write> TerminalRenderer<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn emit(&mut self, text: &str) {
        let written = self
            .output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush());
        if let Err(e) = written {
            log::warn!("terminal write failed: {e}");
        }
    }
}

impl<I: BufRead, O: Write> Renderer for TerminalRenderer<I, O> {
    fn render_menu(&mut self, entries: &[MenuEntry]) {
        let mut text = String::from("\n");
        for line in menu_lines(entries) {
            text.push_str(&line);
            text.push('\n');
        }
        self.emit(&text);
    }

    fn render_content(&mut self, text: &str) {
        self.emit(text);
        if !text.ends_with('\n') {
            self.emit("\n");
        }
    }

    fn read_choice(&mut self, prompt: &str) -> Option<String> {
        self.emit(prompt);
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                log::error!("reading input failed: {e}");
                None
            },
        }
    }

    fn notify(&mut self, message: &str) {
        self.emit(message);
        self.emit("\n");
    }
}
