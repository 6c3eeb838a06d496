//! Terminal status output for the tilesmith CLI.
//!
//! Cargo-style lines with a right-aligned coloured verb, written to stderr so
//! stdout stays free for `inspect` listings. Colour is only emitted when stderr
//! is a terminal.

use std::io::{self, IsTerminal, Write};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// How chatty the printer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Only warnings and errors.
    Quiet,
    #[default]
    Normal,
    /// Also per-sprite and per-block detail lines.
    Verbose,
}

/// Status printer shared by every pipeline stage.
pub struct Printer {
    color: bool,
    verbosity: Verbosity,
}

impl Printer {
    pub fn new() -> Self {
        Self::with_verbosity(Verbosity::Normal)
    }

    pub fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            color: io::stderr().is_terminal(),
            verbosity,
        }
    }

    /// Printer that never writes anything but warnings/errors, for tests and benches.
    pub fn quiet() -> Self {
        Self {
            color: false,
            verbosity: Verbosity::Quiet,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Progress line, e.g. "     Slicing Wall.png (7x3 grid)".
    pub fn status(&self, verb: &str, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            self.print_line(GREEN, verb, message);
        }
    }

    /// Summary line with a cyan verb.
    pub fn info(&self, verb: &str, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            self.print_line(CYAN, verb, message);
        }
    }

    /// Detail line, only shown with `--verbose`.
    pub fn verbose(&self, verb: &str, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            self.print_line(DIM, verb, message);
        }
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Format a string as cyan (paths).
    pub fn cyan(&self, text: &str) -> String {
        if self.color {
            format!("{CYAN}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pluralize a count: `plural(1, "sprite", "sprites")` → "1 sprite".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a path relative to `base` when possible, as given otherwise.
pub fn display_path(path: &std::path::Path, base: &std::path::Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.display().to_string(),
        Ok(_) => ".".to_string(),
        Err(_) => path.display().to_string(),
    }
}
