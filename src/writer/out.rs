// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for writing output.

use std::{borrow::Cow, io, str};

use console::{Style, Term};
use derive_more::with_trait::{Deref, DerefMut, Display, From, Into};

use crate::cli::Coloring;

/// Colors the report is painted with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tone {
    /// Passed and total counts.
    Green,

    /// Failures.
    Red,

    /// Skips and warnings.
    Yellow,

    /// Outcomes without a result.
    Gray,

    /// Neutral emphasis.
    White,
}

impl Tone {
    /// Returns a [`Style`] coloring the text itself with this [`Tone`].
    #[must_use]
    pub fn foreground(self) -> Style {
        let style = Style::new().force_styling(true);
        match self {
            Self::Green => style.green(),
            Self::Red => style.red(),
            Self::Yellow => style.yellow(),
            Self::Gray => style.color256(250),
            Self::White => style.white(),
        }
    }

    /// Returns a [`Style`] rendering black text on this [`Tone`].
    #[must_use]
    pub fn background(self) -> Style {
        let style = Style::new().force_styling(true).black();
        match self {
            Self::Green => style.on_green(),
            Self::Red => style.on_red(),
            Self::Yellow => style.on_yellow(),
            Self::Gray => style.on_color256(250),
            Self::White => style.on_white(),
        }
    }
}

/// [`Style`]s for terminal output.
#[derive(Clone, Debug)]
pub struct Styles {
    /// [`Style`] for rendering the alerting part of an error message.
    pub alert: Style,

    /// [`Style`] for rendering the rest of an error message and line
    /// numbers.
    pub neutral: Style,

    /// [`Style`] for rendering stack frames.
    pub frame: Style,

    /// [`Style`] for rendering file paths.
    pub link: Style,

    /// [`Style`] for rendering durations of slow tests.
    pub slow: Style,

    /// [`Style`] for rendering section captions like `StackTrace:`.
    pub caption: Style,

    /// [`Style`] for rendering the `Messages:` caption.
    pub heading: Style,

    /// [`Style`] for rendering skip messages and locations.
    pub muted: Style,

    /// Indicates whether the output should be colored.
    pub is_present: bool,
}

impl Default for Styles {
    fn default() -> Self {
        let mut styles = Self {
            alert: Tone::Red.foreground(),
            neutral: Tone::White.foreground(),
            frame: Style::new().force_styling(true).cyan(),
            link: Style::new().force_styling(true).blue(),
            slow: Tone::Yellow.foreground(),
            caption: Style::new().force_styling(true).blue(),
            heading: Tone::Yellow.foreground(),
            muted: Tone::Gray.foreground(),
            is_present: false,
        };
        styles.apply_coloring(Coloring::Auto);
        styles
    }
}

impl Styles {
    /// Creates new [`Styles`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates new [`Styles`] following the given [`Coloring`] policy.
    #[must_use]
    pub fn with_coloring(color: Coloring) -> Self {
        let mut styles = Self::default();
        styles.apply_coloring(color);
        styles
    }

    /// Applies the given [`Coloring`] to these [`Styles`].
    pub fn apply_coloring(&mut self, color: Coloring) {
        self.is_present = match color {
            Coloring::Auto => {
                Term::stdout().is_term() && console::colors_enabled()
            }
            Coloring::Always => true,
            Coloring::Never => false,
        };
    }

    /// If coloring is enabled applies `style` to the `input` or leaves it
    /// "as is" otherwise.
    #[must_use]
    pub fn paint<'a>(
        &self,
        style: &Style,
        input: impl Into<Cow<'a, str>>,
    ) -> Cow<'a, str> {
        if self.is_present {
            style.apply_to(input.into()).to_string().into()
        } else {
            input.into()
        }
    }

    /// Colors `input` with [`Styles::alert`].
    #[must_use]
    pub fn alert<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.alert, input)
    }

    /// Colors `input` with [`Styles::neutral`].
    #[must_use]
    pub fn neutral<'a>(
        &self,
        input: impl Into<Cow<'a, str>>,
    ) -> Cow<'a, str> {
        self.paint(&self.neutral, input)
    }

    /// Colors `input` with [`Styles::frame`].
    #[must_use]
    pub fn frame<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.frame, input)
    }

    /// Colors `input` with [`Styles::link`].
    #[must_use]
    pub fn link<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.link, input)
    }

    /// Colors `input` with [`Styles::slow`].
    #[must_use]
    pub fn slow<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.slow, input)
    }

    /// Colors `input` with [`Styles::caption`].
    #[must_use]
    pub fn caption<'a>(
        &self,
        input: impl Into<Cow<'a, str>>,
    ) -> Cow<'a, str> {
        self.paint(&self.caption, input)
    }

    /// Colors `input` with [`Styles::heading`].
    #[must_use]
    pub fn heading<'a>(
        &self,
        input: impl Into<Cow<'a, str>>,
    ) -> Cow<'a, str> {
        self.paint(&self.heading, input)
    }

    /// Colors `input` with [`Styles::muted`].
    #[must_use]
    pub fn muted<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.muted, input)
    }

    /// Colors `input` with the foreground of the given [`Tone`].
    #[must_use]
    pub fn tint<'a>(
        &self,
        tone: Tone,
        input: impl Into<Cow<'a, str>>,
    ) -> Cow<'a, str> {
        self.paint(&tone.foreground(), input)
    }

    /// Renders `input` as black text on the given [`Tone`].
    #[must_use]
    pub fn badge<'a>(
        &self,
        tone: Tone,
        input: impl Into<Cow<'a, str>>,
    ) -> Cow<'a, str> {
        self.paint(&tone.background(), input)
    }
}

/// Width of the terminal the report is rendered into.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TermWidth {
    /// Reads the current width of [`Term::stdout()`] on every call, as the
    /// terminal may be resized in the middle of a run.
    #[default]
    Terminal,

    /// Always the same width.
    Fixed(usize),
}

impl TermWidth {
    /// Width used when no terminal is attached.
    pub const FALLBACK: usize = 120;

    /// Returns the current width in columns.
    #[must_use]
    pub fn get(self) -> usize {
        match self {
            Self::Terminal => Term::stdout()
                .size_checked()
                .map_or(Self::FALLBACK, |(_, cols)| usize::from(cols)),
            Self::Fixed(width) => width,
        }
    }
}

/// [`io::Write`] extension for easier manipulation with strings.
pub trait WriteStrExt: io::Write {
    /// Writes the given `string` into this writer.
    ///
    /// # Errors
    ///
    /// If this writer fails to write the given `string`.
    fn write_str(&mut self, string: impl AsRef<str>) -> io::Result<()> {
        self.write_all(string.as_ref().as_bytes())
    }

    /// Writes the given `string` into this writer followed by a newline.
    ///
    /// # Errors
    ///
    /// If this writer fails to write the given `string`.
    fn write_line(&mut self, string: impl AsRef<str>) -> io::Result<()> {
        self.write_str(string.as_ref())
            .and_then(|()| self.write_str("\n"))
    }
}

impl<T: io::Write + ?Sized> WriteStrExt for T {}

/// [`String`] wrapper implementing [`io::Write`].
#[derive(
    Clone,
    Debug,
    Default,
    Deref,
    DerefMut,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct WritableString(pub String);

impl io::Write for WritableString {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.push_str(
            str::from_utf8(buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
        );
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_coloring_leaves_input_as_is() {
        let styles = Styles::with_coloring(Coloring::Never);

        assert_eq!(styles.alert("boom"), "boom");
        assert_eq!(styles.badge(Tone::Red, " FAIL "), " FAIL ");
    }

    #[test]
    fn always_coloring_emits_escape_sequences() {
        let styles = Styles::with_coloring(Coloring::Always);

        let painted = styles.alert("boom");

        assert!(painted.contains("\u{1b}["), "{painted:?}");
        assert_eq!(console::strip_ansi_codes(&painted), "boom");
    }

    #[test]
    fn fixed_width_is_stable() {
        assert_eq!(TermWidth::Fixed(42).get(), 42);
    }

    #[test]
    fn writable_string_collects_lines() {
        let mut out = WritableString::default();

        out.write_line("first").unwrap();
        out.write_str("second").unwrap();

        assert_eq!(out.0, "first\nsecond");
    }
}
