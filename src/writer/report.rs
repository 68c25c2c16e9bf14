// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Console [`Writer`] reporting a test run as it happens.

use std::{
    io, mem,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError, RwLock,
    },
    time::Duration,
};

use smart_default::SmartDefault;
use tracing::{debug, trace};

use crate::{
    cli::{Cli, Coloring},
    error::Result,
    event::{self, OutcomeKind, RunFinished, RunStarted, TestRecord},
    settings::RunSettings,
};

use super::{
    banner::Banner,
    out::{Styles, TermWidth, Tone, WriteStrExt as _},
    renderer::OutcomeRenderer,
    summarize::{source_label, FailureReplayQueue, StatsAccumulator},
    Verbosity, Writer,
};

/// Configuration of a [`RunReportWriter`].
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// [`Verbosity`] of live failures.
    pub verbosity: Verbosity,

    /// Coloring policy of the output.
    #[default(Coloring::Auto)]
    pub coloring: Coloring,

    /// Width the output is reflowed to.
    pub width: TermWidth,

    /// Number of failed tests replayed at the end of a run.
    #[default(FailureReplayQueue::DEFAULT_LIMIT)]
    pub replay_limit: usize,

    /// Duration above which a test is reported as slow.
    #[default(OutcomeRenderer::SLOW_THRESHOLD)]
    pub slow_threshold: Duration,

    /// Number of stack traces prettified before falling back to verbatim
    /// output.
    #[default(OutcomeRenderer::TRACE_BUDGET)]
    pub trace_budget: usize,

    /// Indicates whether fast passed tests are reported with progress dots.
    #[default(true)]
    pub progress: bool,

    /// Directory file paths are displayed relatively to.
    ///
    /// The current directory, if [`None`].
    pub root: Option<PathBuf>,
}

impl Config {
    /// Creates a new [`Config`] out of the given [`Cli`] options.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::default();
        config.apply_cli(cli);
        config
    }

    /// Applies the given [`Cli`] options to this [`Config`].
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(extra) = cli.verbose.checked_sub(1) {
            self.verbosity = Verbosity::from(extra);
        }
        self.coloring = cli.color;
        self.replay_limit = cli.replay_limit;
        self.slow_threshold = cli.slow_threshold;
        self.trace_budget = cli.trace_budget;
        self.progress = !cli.no_progress;
    }

    /// Sets the [`TermWidth`] the output is reflowed to.
    #[must_use]
    pub const fn with_width(mut self, width: TermWidth) -> Self {
        self.width = width;
        self
    }

    /// Sets the directory file paths are displayed relatively to.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
}

/// Display-only information about the current run.
#[derive(Clone, Debug, Default)]
struct RunInfo {
    sources: Vec<String>,
    filter: Option<String>,
}

/// Output along with the number of progress dots on its last line.
#[derive(Debug)]
struct Output<Out> {
    out: Out,
    dots: usize,
}

impl<Out: io::Write> Output<Out> {
    /// Terminates the line of pending progress dots, if any.
    fn end_progress(&mut self) -> io::Result<()> {
        if mem::take(&mut self.dots) > 0 {
            self.out.write_str("\n")?;
        }
        Ok(())
    }

    /// Writes the given `block` on its own lines.
    fn write_block(&mut self, block: &str) -> io::Result<()> {
        self.end_progress()?;
        self.out.write_str(block)?;
        self.out.flush()
    }

    /// Writes each of the given `lines` followed by a newline.
    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        self.end_progress()?;
        for line in lines {
            self.out.write_line(line)?;
        }
        self.out.flush()
    }
}

/// [`Writer`] rendering a test run to an [`io::Write`] implementor
/// ([`io::Stdout`] by default).
///
/// Every [`TestRecord`] is rendered into a buffer first and written under a
/// single lock, so output of concurrently completing tests never interleaves.
/// At the end of a run the failures are replayed in full, followed by the
/// summary table.
#[derive(Debug)]
pub struct RunReportWriter<Out: io::Write = io::Stdout> {
    /// [`io::Write`] implementor to write the output into.
    output: Mutex<Output<Out>>,

    /// Renderer of single [`TestRecord`]s.
    renderer: OutcomeRenderer,

    /// Run-wide statistics and failures to replay.
    stats: StatsAccumulator,

    /// Information about the current run.
    run: RwLock<RunInfo>,

    /// [`Verbosity`] of live failures.
    verbosity: Verbosity,

    /// Indicates whether progress dots are written.
    progress: bool,

    /// Number of fast passed tests seen so far.
    fast_passes: AtomicUsize,
}

impl RunReportWriter {
    /// Creates a new [`RunReportWriter`] outputting to [`io::Stdout`] with
    /// the default [`Config`].
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout(), Config::default())
    }
}

impl<Out: io::Write> RunReportWriter<Out> {
    /// Creates a new [`RunReportWriter`] outputting to the given `output`.
    #[must_use]
    pub fn new(output: Out, config: Config) -> Self {
        let mut renderer = OutcomeRenderer::new(
            Styles::with_coloring(config.coloring),
            config.width,
        )
        .with_slow_threshold(config.slow_threshold)
        .with_trace_budget(config.trace_budget);
        if let Some(root) = config.root {
            renderer = renderer.with_root(root);
        }

        Self {
            output: Mutex::new(Output { out: output, dots: 0 }),
            renderer,
            stats: StatsAccumulator::new(config.replay_limit),
            run: RwLock::default(),
            verbosity: config.verbosity,
            progress: config.progress,
            fast_passes: AtomicUsize::new(0),
        }
    }

    /// Returns the [`OutcomeRenderer`] of this [`RunReportWriter`].
    #[must_use]
    pub const fn renderer(&self) -> &OutcomeRenderer {
        &self.renderer
    }

    /// Returns the [`StatsAccumulator`] of this [`RunReportWriter`].
    #[must_use]
    pub const fn stats(&self) -> &StatsAccumulator {
        &self.stats
    }

    /// Consumes this [`RunReportWriter`] returning its output.
    #[must_use]
    pub fn into_inner(self) -> Out {
        self.output
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }

    fn output(&self) -> MutexGuard<'_, Output<Out>> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Outputs the start banner of a test run.
    fn run_started(&self, started: RunStarted) -> Result<()> {
        self.renderer
            .apply_settings(RunSettings::from_map(&started.settings));

        let sources = source_label(&started.sources);
        debug!(%sources, filter = ?started.filter, "test run started");

        let head = format!("🧪 {sources}: ");
        let banner = Banner::new(&head)
            .value("START", Tone::Green)
            .render(self.renderer.styles());

        *self.run.write().unwrap_or_else(PoisonError::into_inner) = RunInfo {
            sources: started.sources,
            filter: started.filter,
        };

        Ok(self.output().write_lines(&banner)?)
    }

    /// Outputs a single completed test.
    fn test_completed(&self, record: TestRecord) -> Result<()> {
        trace!(
            test = %record.name,
            outcome = %record.outcome,
            duration = ?record.duration,
            "test completed",
        );

        let fast_pass = record.outcome == OutcomeKind::Passed
            && !self.renderer.is_slow(&record);
        let block = self.renderer.render(&record, self.verbosity.is_full());
        self.stats.record(record);

        if fast_pass {
            return self.progress_tick();
        }
        if block.is_empty() {
            return Ok(());
        }
        Ok(self.output().write_block(&block)?)
    }

    /// Outputs a progress dot for every 10th fast passed test.
    fn progress_tick(&self) -> Result<()> {
        let seen = self.fast_passes.fetch_add(1, Ordering::Relaxed) + 1;
        if !self.progress || seen % 10 != 0 {
            return Ok(());
        }

        let dot = self.renderer.styles().tint(Tone::Green, ".");
        let mut output = self.output();
        output.out.write_str(dot)?;
        output.dots += 1;
        if output.dots > self.renderer.width() / 2 {
            output.end_progress()?;
        }
        Ok(output.out.flush()?)
    }

    /// Outputs the replayed failures and the summary of a finished run.
    fn run_finished(&self, finished: RunFinished) -> Result<()> {
        let replay = self.stats.drain_failures()?;
        let info = mem::take(
            &mut *self.run.write().unwrap_or_else(PoisonError::into_inner),
        );
        let summary = self.stats.summarize(finished, info.sources, info.filter);
        debug!(
            total = summary.total_executed,
            failed = replay.total,
            slow = self.renderer.slow_count(),
            "test run finished",
        );

        let block = summary.render(&replay, &self.renderer);
        Ok(self.output().write_block(&block)?)
    }
}

impl<Out: io::Write + Send> Writer for RunReportWriter<Out> {
    fn handle_event(&self, event: event::Run) -> Result<()> {
        match event {
            event::Run::Started(started) => self.run_started(started),
            event::Run::Result(record) => self.test_completed(record),
            event::Run::Finished(finished) => self.run_finished(finished),
        }
    }
}
