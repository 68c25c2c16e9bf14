// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Boxed announcement lines, used for the start banner and the summary.

use console::measure_text_width;

use super::out::{Styles, Tone};

/// Single announcement: a `text` on a white band, optionally followed by a
/// `value` cell painted with its own [`Tone`].
#[derive(Clone, Copy, Debug)]
pub struct Banner<'a> {
    text: &'a str,
    value: Option<(&'a str, Tone)>,
}

impl<'a> Banner<'a> {
    /// Creates a new [`Banner`] announcing the given `text`.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            value: None,
        }
    }

    /// Adds a `value` cell painted with the given [`Tone`].
    ///
    /// Blank `value`s are ignored.
    #[must_use]
    pub fn value(mut self, value: &'a str, tone: Tone) -> Self {
        self.value = (!value.trim().is_empty()).then_some((value, tone));
        self
    }

    /// Renders this [`Banner`] into output lines.
    ///
    /// A [`Banner`] without a value is preceded by an empty line and framed
    /// by margin rows.
    #[must_use]
    pub fn render(&self, styles: &Styles) -> Vec<String> {
        let mut band = styles.badge(Tone::White, format!("  {}", self.text));
        if let Some((value, tone)) = self.value {
            let gutter = styles.badge(Tone::Gray, "   ");
            band.to_mut()
                .push_str(&styles.badge(tone, format!(" {value} ")));
            band.to_mut().push_str(&styles.badge(Tone::White, "  "));
            return vec![format!("{gutter}{band}")];
        }
        band.to_mut().push_str(&styles.badge(Tone::White, "  "));

        let width = measure_text_width(self.text) + 4;
        let margin = styles.badge(Tone::White, " ".repeat(width)).into_owned();
        vec![String::new(), margin.clone(), band.into_owned(), margin]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::Coloring;

    fn plain() -> Styles {
        Styles::with_coloring(Coloring::Never)
    }

    #[test]
    fn value_banner_is_a_single_line() {
        let lines = Banner::new("🧪 TOTAL:")
            .value("3", Tone::Green)
            .render(&plain());

        assert_eq!(lines, ["     🧪 TOTAL: 3   "]);
    }

    #[test]
    fn text_banner_has_margins() {
        let lines = Banner::new("SUMMARY").render(&plain());

        assert_eq!(lines, ["", "           ", "  SUMMARY  ", "           "]);
    }

    #[test]
    fn blank_value_is_ignored() {
        let lines =
            Banner::new("START").value("  ", Tone::Green).render(&plain());

        assert_eq!(lines.len(), 4);
    }
}
