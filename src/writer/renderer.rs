// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rendering of a single [`TestRecord`] into a block of terminal output.

use std::{
    env,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        PoisonError, RwLock,
    },
    time::Duration,
};

use lazy_regex::regex_is_match;
use tracing::debug;

use crate::{
    event::{OutcomeKind, TestRecord},
    settings::RunSettings,
};

use super::{
    duration::format_duration,
    out::{Styles, TermWidth, Tone},
    path::relativize,
    reflow::{reflow, ReflowOptions},
};

/// Prefix of the stack trace lines representing frames.
pub const FRAME_MARKER: &str = "   at";

/// Separator between a frame and its `file:line` suffix.
const FRAME_LOCATION: &str = ") in ";

/// Block of output lines being rendered.
#[derive(Debug, Default)]
struct Block(String);

impl Block {
    fn line(&mut self, line: impl AsRef<str>) {
        self.0.push_str(line.as_ref());
        self.0.push('\n');
    }
}

/// Renderer of [`TestRecord`]s, keeping the run-wide counters of slow tests,
/// prettified stack traces and seen failures.
///
/// All the counters are atomic, so a single [`OutcomeRenderer`] may be shared
/// between threads rendering concurrently.
#[derive(Debug)]
pub struct OutcomeRenderer {
    /// [`Styles`] for terminal output.
    styles: Styles,

    /// Source of the terminal width, read anew for every paragraph.
    width: TermWidth,

    /// Root directory file paths are displayed relatively to.
    root: PathBuf,

    /// Duration above which a test is considered slow.
    slow_threshold: Duration,

    /// Number of stack traces prettified before falling back to verbatim
    /// output.
    trace_budget: usize,

    /// [`RunSettings`] of the current run.
    settings: RwLock<RunSettings>,

    /// Number of slow tests rendered.
    slow: AtomicUsize,

    /// Number of stack traces handed over for rendering.
    reflowed_traces: AtomicUsize,

    /// Number of failed tests rendered.
    seen_failures: AtomicUsize,
}

impl Default for OutcomeRenderer {
    fn default() -> Self {
        Self::new(Styles::new(), TermWidth::Terminal)
    }
}

impl OutcomeRenderer {
    /// Default duration above which a test is considered slow.
    pub const SLOW_THRESHOLD: Duration = Duration::from_secs(2);

    /// Default number of prettified stack traces.
    pub const TRACE_BUDGET: usize = 100;

    /// Creates a new [`OutcomeRenderer`] displaying paths relatively to the
    /// current directory.
    #[must_use]
    pub fn new(styles: Styles, width: TermWidth) -> Self {
        Self {
            styles,
            width,
            root: env::current_dir().unwrap_or_default(),
            slow_threshold: Self::SLOW_THRESHOLD,
            trace_budget: Self::TRACE_BUDGET,
            settings: RwLock::default(),
            slow: AtomicUsize::new(0),
            reflowed_traces: AtomicUsize::new(0),
            seen_failures: AtomicUsize::new(0),
        }
    }

    /// Sets the root directory file paths are displayed relatively to.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the duration above which a test is considered slow.
    #[must_use]
    pub const fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    /// Sets the number of stack traces prettified before falling back to
    /// verbatim output.
    #[must_use]
    pub const fn with_trace_budget(mut self, budget: usize) -> Self {
        self.trace_budget = budget;
        self
    }

    /// Replaces the [`RunSettings`] of the current run.
    pub fn apply_settings(&self, settings: RunSettings) {
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) =
            settings;
    }

    /// Returns the [`Styles`] this [`OutcomeRenderer`] paints with.
    #[must_use]
    pub const fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Returns the root directory file paths are displayed relatively to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the current terminal width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width.get()
    }

    /// Number of slow tests rendered so far.
    #[must_use]
    pub fn slow_count(&self) -> usize {
        self.slow.load(Ordering::Relaxed)
    }

    /// Number of stack traces handed over for rendering so far.
    #[must_use]
    pub fn reflowed_trace_count(&self) -> usize {
        self.reflowed_traces.load(Ordering::Relaxed)
    }

    /// Number of failed tests rendered so far.
    #[must_use]
    pub fn seen_failure_count(&self) -> usize {
        self.seen_failures.load(Ordering::Relaxed)
    }

    /// Indicates whether the given `record` took longer than the slow
    /// threshold.
    #[must_use]
    pub fn is_slow(&self, record: &TestRecord) -> bool {
        record.duration > self.slow_threshold
    }

    /// Renders the given `record` as it arrives.
    ///
    /// `verbose` selects the long form of a failure: source location, full
    /// error message, stack trace and messages. Otherwise the error message
    /// is abbreviated to its first line.
    ///
    /// Fast passed tests render nothing at all.
    #[must_use]
    pub fn render(&self, record: &TestRecord, verbose: bool) -> String {
        self.render_block(record, verbose, true)
    }

    /// Renders the long form of the given `record` once again, without
    /// counting it as a slow test or a seen failure.
    #[must_use]
    pub fn replay(&self, record: &TestRecord) -> String {
        self.render_block(record, true, false)
    }

    fn render_block(
        &self,
        record: &TestRecord,
        verbose: bool,
        live: bool,
    ) -> String {
        if record.outcome == OutcomeKind::Passed && !self.is_slow(record) {
            return String::new();
        }

        let mut block = Block::default();
        self.header(&mut block, record, verbose, live);
        match record.outcome {
            OutcomeKind::Skipped => self.skipped(&mut block, record),
            OutcomeKind::Failed => {
                if live {
                    _ = self.seen_failures.fetch_add(1, Ordering::Relaxed);
                }
                self.failed(&mut block, record, verbose);
            }
            OutcomeKind::Passed
            | OutcomeKind::None
            | OutcomeKind::NotFound => {}
        }
        block.0
    }

    /// Outputs the badge, the name and, for slow tests, the duration.
    fn header(
        &self,
        block: &mut Block,
        record: &TestRecord,
        verbose: bool,
        live: bool,
    ) {
        let (tone, glyph) = match record.outcome {
            OutcomeKind::Passed => (Tone::Green, "✅"),
            OutcomeKind::Failed => (Tone::Red, "⚡\u{fe0f}"),
            OutcomeKind::Skipped => (Tone::Yellow, "⏩"),
            OutcomeKind::None | OutcomeKind::NotFound => (Tone::Gray, " "),
        };
        let label = record.outcome.label();
        let label = if verbose && record.outcome == OutcomeKind::Failed {
            format!("[{label}]")
        } else {
            format!(" {label} ")
        };
        let name = if record.name.is_empty() {
            "[unknown test]"
        } else {
            record.name.as_str()
        };

        let mut line = format!(
            "{}{}",
            self.styles.badge(tone, format!(" {glyph}{label}")),
            self.styles.tint(tone, format!(" {name}")),
        );
        if self.is_slow(record) {
            if live {
                _ = self.slow.fetch_add(1, Ordering::Relaxed);
            }
            line.push_str(&self.styles.slow(format!(
                " [{}]",
                format_duration(record.duration),
            )));
        }
        block.line(line);
    }

    /// Outputs the messages of a skipped test, unless they're suppressed by
    /// the [`RunSettings`].
    fn skipped(&self, block: &mut Block, record: &TestRecord) {
        let suppressed = self
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .suppresses_skip_messages(&record.name);
        if suppressed {
            return;
        }

        for message in &record.messages {
            for line in self.paragraph(message, ReflowOptions::default()) {
                block.line(self.styles.muted(line));
            }
        }
    }

    /// Outputs the error message and, in the `verbose` form, the location,
    /// the stack trace and the messages of a failed test.
    fn failed(&self, block: &mut Block, record: &TestRecord, verbose: bool) {
        if verbose {
            self.location(block, record);
        }

        let opts = ReflowOptions::default()
            .indent(if verbose { 3 } else { 10 })
            .abbreviate(!verbose);
        let message = record.error_message.as_deref().unwrap_or_default();
        for line in self.paragraph(message, opts) {
            block.line(self.highlight_exception(&line));
        }

        if !verbose {
            return;
        }
        self.stack_trace(block, record.stack_trace.as_deref());

        if !record.messages.is_empty() {
            block.line(self.styles.heading("   Messages:"));
            let opts = ReflowOptions::default().indent(5).offset(0);
            for message in &record.messages {
                for line in self.paragraph(message, opts) {
                    block.line(self.styles.neutral(line));
                }
            }
        }
    }

    /// Outputs the `Line: N, File: path` of a test, if known.
    fn location(&self, block: &mut Block, record: &TestRecord) {
        let Some(location) = record.location.as_ref().filter(|l| l.is_known())
        else {
            return;
        };

        block.line(format!(
            "{}{}",
            self.styles.muted(format!(
                "{}Line: {}, File: ",
                " ".repeat(ReflowOptions::default().indent),
                location.line,
            )),
            self.styles.link(relativize(&location.file, &self.root)),
        ));
    }

    /// Outputs the given stack `trace`, prettifying its frames while the
    /// trace budget lasts.
    fn stack_trace(&self, block: &mut Block, trace: Option<&str>) {
        let Some(trace) = trace.filter(|t| !t.trim().is_empty()) else {
            return;
        };

        let seen = self.reflowed_traces.fetch_add(1, Ordering::Relaxed) + 1;
        if seen > self.trace_budget {
            if seen == self.trace_budget + 1 {
                debug!(
                    budget = self.trace_budget,
                    "stack trace budget exhausted, writing traces verbatim",
                );
            }
            block.line(trace);
            return;
        }

        let caption = ReflowOptions::default().indent(3);
        for line in self.paragraph("StackTrace:", caption) {
            block.line(self.styles.caption(line));
        }
        for line in trace.lines() {
            if line.starts_with(FRAME_MARKER) {
                block.line(self.frame(line));
            } else {
                block.line(line);
            }
        }
        block.line("");
    }

    /// Renders a single stack frame `line`, splitting off its `file:line`
    /// suffix, if any.
    fn frame(&self, line: &str) -> String {
        let Some((frame, suffix)) = line.split_once(FRAME_LOCATION) else {
            return self.styles.frame(format!("  {line}")).into_owned();
        };

        let (file, line_no) = match suffix.rsplit_once(':') {
            Some((file, no)) if !no.contains(['/', '\\']) => (file, Some(no)),
            _ => (suffix, None),
        };

        let mut out = self.styles.frame(format!("  {frame})")).into_owned();
        out.push(' ');
        if let Some(no) = line_no {
            out.push_str(&self.styles.neutral(no.trim()));
            out.push(' ');
        }
        out.push_str(&self.styles.link(relativize(file, &self.root)));
        out
    }

    /// Paints the exception type of a `Some.Exception : message` line with an
    /// alert color, and the rest of it with a neutral one.
    fn highlight_exception(&self, line: &str) -> String {
        if regex_is_match!(r"^.*?Exception :", line) {
            if let Some((head, rest)) = line.split_once(':') {
                return format!(
                    "{}{}",
                    self.styles.alert(head.trim_end()),
                    self.styles.neutral(format!(": {}", rest.trim())),
                );
            }
        }
        line.to_owned()
    }

    /// Reflows the given `text` to the current terminal width, indenting its
    /// first line as well.
    fn paragraph(&self, text: &str, opts: ReflowOptions) -> Vec<String> {
        let mut lines = reflow(text, self.width(), &opts);
        if let Some(first) = lines.first_mut() {
            first.insert_str(0, &" ".repeat(opts.indent));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{cli::Coloring, event::SourceLocation};

    fn renderer() -> OutcomeRenderer {
        OutcomeRenderer::new(
            Styles::with_coloring(Coloring::Never),
            TermWidth::Fixed(80),
        )
        .with_root("/work/repo")
    }

    fn failure() -> TestRecord {
        TestRecord::new("Tests.Unit.Fails", OutcomeKind::Failed)
            .with_duration(Duration::from_millis(12))
            .with_error_message("System.Exception : boom!")
            .with_stack_trace(
                "   at Tests.Unit.Helper()\n   \
                 at Tests.Unit.Fails() in /work/repo/Tests/Unit.cs:line 42",
            )
            .with_messages(["captured output"])
            .with_location(SourceLocation::new("/work/repo/Tests/Unit.cs", 40))
    }

    #[test]
    fn fast_pass_renders_nothing() {
        let r = renderer();
        let record = TestRecord::new("Tests.Passes", OutcomeKind::Passed)
            .with_duration(Duration::from_millis(10));

        assert_eq!(r.render(&record, false), "");
        assert_eq!(r.slow_count(), 0);
    }

    #[test]
    fn slow_pass_renders_header_with_duration() {
        let r = renderer();
        let record = TestRecord::new("Tests.Slow", OutcomeKind::Passed)
            .with_duration(Duration::from_millis(2_500));

        assert_eq!(r.render(&record, false), " ✅ PASS  Tests.Slow [2.5 s]\n");
        assert_eq!(r.slow_count(), 1);
    }

    #[test]
    fn short_failure_is_abbreviated() {
        let r = OutcomeRenderer::new(
            Styles::with_coloring(Coloring::Never),
            TermWidth::Fixed(30),
        );
        let record = TestRecord::new("Tests.Fails", OutcomeKind::Failed)
            .with_error_message(
                "System.Exception : a rather long message here",
            );

        let out = r.render(&record, false);

        assert_eq!(
            out,
            " ⚡\u{fe0f} FAIL  Tests.Fails\n\
             \x20         System.Exception: a\n\
             \x20          ..abbreviated..\n",
        );
        assert_eq!(r.seen_failure_count(), 1);
        assert_eq!(r.reflowed_trace_count(), 0);
    }

    #[test]
    fn long_failure_renders_everything() {
        let r = renderer();

        let out = r.render(&failure(), true);

        assert_eq!(
            out,
            " ⚡\u{fe0f}[FAIL] Tests.Unit.Fails\n\
             \x20         Line: 40, File: Tests/Unit.cs\n\
             \x20  System.Exception: boom!\n\
             \x20  StackTrace:\n\
             \x20    at Tests.Unit.Helper()\n\
             \x20    at Tests.Unit.Fails() line 42 Tests/Unit.cs\n\
             \n\
             \x20  Messages:\n\
             \x20    captured output\n",
        );
        assert_eq!(r.reflowed_trace_count(), 1);
    }

    #[test]
    fn replay_does_not_count() {
        let r = renderer();
        let record = failure().with_duration(Duration::from_secs(3));

        let out = r.replay(&record);

        assert!(out.contains("[FAIL]"));
        assert!(out.contains("[3 s]"));
        assert_eq!(r.seen_failure_count(), 0);
        assert_eq!(r.slow_count(), 0);
        assert_eq!(r.reflowed_trace_count(), 1);
    }

    #[test]
    fn highlights_exception_prefix() {
        let r = OutcomeRenderer::new(
            Styles::with_coloring(Coloring::Always),
            TermWidth::Fixed(80),
        );

        let line = r.highlight_exception("System.Exception : boom!");

        assert_eq!(
            line,
            format!(
                "{}{}",
                r.styles.alert.apply_to("System.Exception"),
                r.styles.neutral.apply_to(": boom!"),
            ),
        );
        assert_eq!(r.highlight_exception("plain failure"), "plain failure");
    }

    #[test]
    fn malformed_frames_never_fault() {
        let r = renderer();

        assert_eq!(r.frame("   at Foo.Bar()"), "     at Foo.Bar()");
        assert_eq!(
            r.frame("   at Foo.Bar() in /work/repo/a.cs"),
            "     at Foo.Bar() a.cs",
        );
        assert_eq!(
            r.frame("   at Foo.Bar() in /work/repo/a.cs:17"),
            "     at Foo.Bar() 17 a.cs",
        );
    }

    #[test]
    fn traces_past_budget_are_verbatim() {
        let r = renderer().with_trace_budget(1);
        let trace = "   at A() in /work/repo/a.cs:1";
        let record = TestRecord::new("T", OutcomeKind::Failed)
            .with_error_message("boom")
            .with_stack_trace(trace);

        let first = r.render(&record, true);
        let second = r.render(&record, true);

        assert!(first.contains("StackTrace:"));
        assert!(!second.contains("StackTrace:"));
        assert!(second.contains(&format!("{trace}\n")));
        assert_eq!(r.reflowed_trace_count(), 2);
    }

    #[test]
    fn skipped_messages_respect_settings() {
        let r = renderer();
        r.apply_settings(RunSettings::from_pairs([(
            "DisableFullSkipMessages",
            "Tests.Integration",
        )]));
        let skip = |name| {
            TestRecord::new(name, OutcomeKind::Skipped)
                .with_messages(["reason"])
        };

        assert_eq!(
            r.render(&skip("Tests.Integration.Db"), false),
            " ⏩ SKIP  Tests.Integration.Db\n",
        );
        assert_eq!(
            r.render(&skip("Tests.Unit.Db"), false),
            " ⏩ SKIP  Tests.Unit.Db\n          reason\n",
        );
    }

    #[test]
    fn none_and_not_found_have_no_body() {
        let r = renderer();

        assert_eq!(
            r.render(&TestRecord::new("", OutcomeKind::None), false),
            "   NONE  [unknown test]\n",
        );
        assert_eq!(
            r.render(&TestRecord::new("T", OutcomeKind::NotFound), true),
            "   MISS  T\n",
        );
    }

    #[test]
    fn missing_error_message_renders_empty_line() {
        let r = renderer();

        let out = r.render(&TestRecord::new("T", OutcomeKind::Failed), false);

        assert_eq!(out, " ⚡\u{fe0f} FAIL  T\n          \n");
    }

    #[test]
    fn concurrent_slow_renders_lose_no_updates() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let r = Arc::new(renderer());
        let record = TestRecord::new("Tests.Slow", OutcomeKind::Passed)
            .with_duration(Duration::from_secs(3));

        let handles = (0..THREADS)
            .map(|_| {
                let r = Arc::clone(&r);
                let record = record.clone();
                thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        _ = r.render(&record, false);
                    }
                })
            })
            .collect::<Vec<_>>();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(r.slow_count(), THREADS * PER_THREAD);
    }
}
