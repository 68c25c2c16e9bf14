// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Word wrapping of arbitrary text to a terminal width.
//!
//! [`reflow()`] produces a hanging indent: the first line of a paragraph is
//! emitted without a prefix, while all the following lines are shifted by
//! `indent + offset` spaces.

use smart_default::SmartDefault;
use unicode_width::UnicodeWidthChar as _;

/// Marker replacing the tail of an abbreviated paragraph.
pub const ABBREVIATED: &str = " ..abbreviated..";

/// Options of [`reflow()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct ReflowOptions {
    /// Number of spaces a tab is expanded to.
    #[default(4)]
    pub tab_size: usize,

    /// Indentation the paragraph is laid out with.
    #[default(10)]
    pub indent: usize,

    /// Additional indentation of every line following the first one.
    #[default(2)]
    pub offset: usize,

    /// Keep only the first line, followed by an [`ABBREVIATED`] marker.
    pub abbreviate: bool,
}

impl ReflowOptions {
    /// Returns these [`ReflowOptions`] with the given `indent`.
    #[must_use]
    pub const fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Returns these [`ReflowOptions`] with the given `offset`.
    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns these [`ReflowOptions`] with the given `abbreviate` flag.
    #[must_use]
    pub const fn abbreviate(mut self, abbreviate: bool) -> Self {
        self.abbreviate = abbreviate;
        self
    }
}

/// Re-breaks the given `paragraph` into lines fitting into `width` columns.
///
/// Explicit line breaks are preserved and every resulting segment is wrapped
/// on its own, breaking at the last space before the limit. Runs of spaces
/// at a break are consumed. A token wider than the limit is never split, and
/// is emitted on its own line instead.
///
/// Widths are measured in terminal columns, so wide characters count twice.
///
/// Empty or whitespace-only `paragraph` results in a single empty line.
#[must_use]
pub fn reflow(
    paragraph: &str,
    width: usize,
    opts: &ReflowOptions,
) -> Vec<String> {
    if paragraph.trim().is_empty() {
        return vec![String::new()];
    }

    let text = paragraph.replace('\t', &" ".repeat(opts.tab_size));
    let mut lines = Wrapper::new(width, opts);
    for segment in text.split('\n') {
        lines.segment(segment.strip_suffix('\r').unwrap_or(segment));
    }
    let mut lines = lines.finish();

    if opts.abbreviate && lines.len() > 1 {
        lines.truncate(1);
        lines.push(format!("{}{ABBREVIATED}", " ".repeat(opts.indent)));
    }
    lines
}

/// Accumulator of the lines produced by [`reflow()`].
struct Wrapper {
    width: usize,
    indent: usize,
    offset: usize,
    lines: Vec<String>,
}

impl Wrapper {
    fn new(width: usize, opts: &ReflowOptions) -> Self {
        Self {
            width,
            indent: opts.indent,
            offset: opts.offset,
            lines: Vec::new(),
        }
    }

    /// Indentation of the next line: none before the first line, and
    /// stepped-in by the offset once after it.
    fn prefix(&self) -> usize {
        if self.lines.is_empty() {
            0
        } else {
            self.indent + self.offset
        }
    }

    /// Maximum number of columns the next line may hold.
    fn limit(&self) -> usize {
        let indent = if self.lines.is_empty() {
            self.indent
        } else {
            self.indent + self.offset
        };
        self.width.saturating_sub(indent).max(1)
    }

    fn push(&mut self, chars: &[(char, usize)]) {
        let mut line = " ".repeat(self.prefix());
        line.extend(chars.iter().map(|(c, _)| c));
        self.lines.push(line);
    }

    fn segment(&mut self, segment: &str) {
        let chars = segment
            .chars()
            .map(|c| (c, c.width().unwrap_or(0)))
            .collect::<Vec<_>>();
        let mut rest = chars.as_slice();

        while columns(rest) > self.limit() {
            let limit = self.limit();
            let fit = rest
                .iter()
                .scan(0, |cols, (_, w)| {
                    *cols += w;
                    Some(*cols)
                })
                .take_while(|cols| *cols <= limit)
                .count();

            // A break needs some text before it, so leading spaces of the
            // segment never make up a line on their own.
            let at = rest[..=fit]
                .iter()
                .rposition(|(c, _)| *c == ' ')
                .filter(|at| rest[..*at].iter().any(|(c, _)| *c != ' '));
            let (line, next) = match at {
                Some(at) => (trim_end(&rest[..at]), at),
                None => {
                    let start = rest
                        .iter()
                        .position(|(c, _)| *c != ' ')
                        .unwrap_or(rest.len());
                    let end = rest[start..]
                        .iter()
                        .position(|(c, _)| *c == ' ')
                        .map_or(rest.len(), |len| start + len);
                    (&rest[start..end], end)
                }
            };
            self.push(line);
            rest = trim_start(&rest[next..]);
            if rest.is_empty() {
                return;
            }
        }
        self.push(rest);
    }

    fn finish(self) -> Vec<String> {
        self.lines
    }
}

/// Number of terminal columns the given `chars` occupy.
fn columns(chars: &[(char, usize)]) -> usize {
    chars.iter().map(|(_, w)| w).sum()
}

fn trim_start(chars: &[(char, usize)]) -> &[(char, usize)] {
    let start = chars
        .iter()
        .position(|(c, _)| *c != ' ')
        .unwrap_or(chars.len());
    &chars[start..]
}

fn trim_end(chars: &[(char, usize)]) -> &[(char, usize)] {
    let end = chars
        .iter()
        .rposition(|(c, _)| *c != ' ')
        .map_or(0, |at| at + 1);
    &chars[..end]
}
