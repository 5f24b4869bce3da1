//! Terminal output: group listings and the crontab line

use anstyle::{AnsiColor, Color, Style};
use curfew_api::GroupView;
use std::io::IsTerminal;
use std::path::Path;

/// Colours for status words, or plain text when disabled
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn colored() -> Self {
        Self { enabled: true }
    }

    /// Colour only when stdout is a terminal whose TERM is not `dumb`.
    pub fn detect(no_color: bool) -> Self {
        let term_ok = std::env::var("TERM").is_ok_and(|term| !term.is_empty() && term != "dumb");
        Self {
            enabled: !no_color && term_ok && std::io::stdout().is_terminal(),
        }
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(AnsiColor::Green, text)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(AnsiColor::Red, text)
    }

    fn paint(&self, color: AnsiColor, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let style = Style::new().fg_color(Some(Color::Ansi(color)));
        format!("{style}{text}{style:#}")
    }
}

/// Listing block for one group
pub fn render_view(view: &GroupView, palette: &Palette) -> String {
    let active = if view.active {
        palette.green("Yes")
    } else {
        palette.red("No")
    };
    let status = if view.running() {
        palette.green("Running")
    } else {
        palette.red("Not Running")
    };

    format!(
        "\nGroup: {}\n\nIn Active List: {}\nCurrent Status: {}\n\nHours:\n{}\nDays:\n{}\nDomains:\n{}",
        view.name,
        active,
        status,
        indented(&view.hours),
        indented(&view.days),
        indented(&view.domains),
    )
}

fn indented(values: &[String]) -> String {
    let mut block: String = values.iter().map(|v| format!("\t{}\n", v)).collect();
    if values.is_empty() {
        block.push_str("\t\n");
    }
    block
}

/// Hourly root crontab entry that runs curfew in cron mode
pub fn crontab_line(exe: &Path, log_file: &Path) -> String {
    format!(
        "0 * * * * {} --cron >> {} 2>&1",
        exe.display(),
        log_file.display()
    )
}
