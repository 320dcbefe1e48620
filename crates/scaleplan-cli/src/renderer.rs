//! Terminal output.
//!
//! Markdown is rendered with termimad when color is enabled and printed as
//! is otherwise. Machine-readable output (YAML, JSON) always bypasses the
//! skin.

use termimad::{
    crossterm::style::{Color, Stylize},
    MadSkin,
};

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Prints markdown, styled when color is enabled.
    pub fn render(&self, markdown: &str) {
        if !self.rich_enabled {
            print!("{markdown}");
            return;
        }
        for line in markdown.lines() {
            // Headers keep their hashes so nesting stays visible
            if line.starts_with('#') {
                println!("{}", line.with(Color::Blue));
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
    }

    /// Prints text untouched.
    pub fn raw(&self, text: &str) {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
