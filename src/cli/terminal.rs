//! Terminal capability detection and color helpers.

use std::fmt;

use owo_colors::{OwoColorize, colors::css};

/// Whether colored output should be used on stdout.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Current terminal width in columns, if it can be detected.
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Whether the terminal is too narrow for tabular layouts (< 60 columns).
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// Semantic coloring that degrades to plain text on dumb terminals.
///
/// Implemented for everything displayable, so counts can be colored
/// without an intermediate `to_string`.
pub trait Colorize: fmt::Display + Sized {
    /// Green, for healthy figures.
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    /// Amber, for figures that need attention.
    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    /// Dimmed, for secondary detail.
    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl<T: fmt::Display> Colorize for T {}
