//! Handles all user-facing output for the CLI.
//!
//! Rendering of compiled programs and colored status lines lives here so
//! every subcommand formats output the same way.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::output::listing;
use crate::ast::Node;
use crate::cli::args::Format;

/// Renders an output program in the requested format.
pub fn render(program: &Node, format: Format) -> Result<String, serde_json::Error> {
    let text = match format {
        Format::Json => serde_json::to_string_pretty(program)?,
        Format::Tree => program.pretty(),
        Format::Listing => listing(program).join("\n"),
    };
    Ok(text)
}

/// Prints a green status line to stderr, so stdout stays machine-readable.
pub fn print_status(message: &str) {
    let choice = if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stderr, "ok");
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::output::{assign, line, number, program};

    #[test]
    fn test_listing_and_tree_formats() {
        let p = program(vec![line(vec![assign("a", number("1"))])]);
        assert_eq!(render(&p, Format::Listing).unwrap(), "a=1");
        assert_eq!(
            render(&p, Format::Tree).unwrap(),
            "(program (line (multi (assign (variable a) (number 1)))))"
        );
        assert!(render(&p, Format::Json).unwrap().contains("\"multi\""));
    }
}
