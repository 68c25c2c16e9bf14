// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Collecting of the run statistics and rendering of the final summary.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    path::Path,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, PoisonError,
    },
    time::Duration,
};

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use crate::{
    error::{ReportError, Result},
    event::{OutcomeKind, RunFinished, TestRecord},
};

use super::{
    banner::Banner,
    duration::{format_duration, group_thousands},
    out::Tone,
    renderer::OutcomeRenderer,
};

/// FIFO of [`Failed`] records replayed at the end of a run.
///
/// Records may be enqueued from many threads at once, and the queue is
/// drained exactly once, yielding at most `limit` of them.
///
/// [`Failed`]: OutcomeKind::Failed
#[derive(Debug)]
pub struct FailureReplayQueue {
    sender: Sender<TestRecord>,
    receiver: Mutex<Option<Receiver<TestRecord>>>,
    limit: usize,
}

impl Default for FailureReplayQueue {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

impl FailureReplayQueue {
    /// Default number of records yielded by [`FailureReplayQueue::drain()`].
    pub const DEFAULT_LIMIT: usize = 20;

    /// Creates a new [`FailureReplayQueue`] yielding at most `limit` records.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
            limit,
        }
    }

    /// Enqueues the given `record`.
    ///
    /// Records arriving after the queue was drained are dropped.
    pub fn enqueue(&self, record: TestRecord) {
        if let Err(e) = self.sender.send(record) {
            debug!(test = %e.0.name, "failure arrived after replay drain");
        }
    }

    /// Number of records waiting in this queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    /// Indicates whether there are no records waiting in this queue.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    /// Drains this queue, returning at most `limit` records in their enqueue
    /// order.
    ///
    /// # Errors
    ///
    /// With [`ReportError::AlreadyDrained`] if called more than once.
    pub fn drain(&self) -> Result<Replay> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(ReportError::AlreadyDrained)?;

        let mut records = receiver.try_iter().collect::<Vec<_>>();
        let total = records.len();
        records.truncate(self.limit);
        if total > records.len() {
            debug!(shown = records.len(), total, "failure replay truncated");
        }
        Ok(Replay { records, total })
    }
}

/// Outcome of draining a [`FailureReplayQueue`].
#[derive(Clone, Debug, Default)]
pub struct Replay {
    /// Records to replay, in their enqueue order.
    pub records: Vec<TestRecord>,

    /// Number of records the queue held before truncation.
    pub total: usize,
}

impl Replay {
    /// Indicates whether there is nothing to replay.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the [`Truncation`] of this [`Replay`], if any records were
    /// left out.
    #[must_use]
    pub fn truncation(&self) -> Option<Truncation> {
        (self.total > self.records.len()).then_some(Truncation {
            shown: self.records.len(),
            total: self.total,
        })
    }
}

/// Indicator of a truncated [`Replay`], displayed as `shown of total`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Truncation {
    /// Number of replayed records.
    pub shown: usize,

    /// Number of records before truncation.
    pub total: usize,
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {}",
            group_thousands(widen(self.shown)),
            group_thousands(widen(self.total)),
        )
    }
}

/// Aggregated statistics of a finished run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Number of tests per [`OutcomeKind`].
    pub counts: BTreeMap<OutcomeKind, u64>,

    /// Number of executed tests, as reported by the host.
    pub total_executed: u64,

    /// Time spent running the tests.
    pub elapsed: Duration,

    /// Discovered test containers.
    pub sources: Vec<String>,

    /// Active test-selection filter.
    pub filter: Option<String>,
}

impl RunSummary {
    /// Returns the number of tests with the given [`OutcomeKind`], if it was
    /// reported at all.
    #[must_use]
    pub fn count(&self, kind: OutcomeKind) -> Option<u64> {
        self.counts.get(&kind).copied()
    }

    /// Returns the display name of the run's sources: the file stem of a
    /// single source, or their number otherwise.
    #[must_use]
    pub fn source_label(&self) -> String {
        source_label(&self.sources)
    }

    /// Indicates whether an active filter selected no tests at all.
    #[must_use]
    pub fn is_filtered_out(&self) -> bool {
        self.total_executed == 0
            && self.filter.as_deref().is_some_and(|f| !f.trim().is_empty())
    }

    /// Renders this [`RunSummary`] along with the given [`Replay`] of
    /// failures.
    ///
    /// If a filter selected no tests, only the filter and the elapsed time
    /// are rendered.
    #[must_use]
    pub fn render(
        &self,
        replay: &Replay,
        renderer: &OutcomeRenderer,
    ) -> String {
        let styles = renderer.styles();
        let sources = self.source_label();
        let elapsed = format_duration(self.elapsed);
        let mut lines = Vec::new();

        if self.is_filtered_out() {
            let head = format!("⏩ {sources}: ");
            let filter = format!(
                "FILTERED: {}",
                self.filter.as_deref().unwrap_or_default(),
            );
            let time = format!("⏳{elapsed}");
            for value in [&filter, &time] {
                let banner = Banner::new(&head).value(value, Tone::Yellow);
                lines.extend(banner.render(styles));
            }
            return lines.into_iter().map(|l| l + "\n").collect();
        }

        let mut out = String::new();
        if !replay.is_empty() {
            let announce = match replay.truncation() {
                Some(t) => {
                    format!("⚡\u{fe0f}REPLAY {t} FAILED TESTS ⚡\u{fe0f}")
                }
                None => format!(
                    "⚡\u{fe0f}REPLAY {} FAILED TEST{} ⚡\u{fe0f}",
                    group_thousands(widen(replay.total)),
                    if replay.total == 1 { "" } else { "S" },
                ),
            };
            for line in Banner::new(&announce).render(styles) {
                out.push_str(&line);
                out.push('\n');
            }
            for record in &replay.records {
                out.push_str(&renderer.replay(record));
            }
        }

        let total = group_thousands(self.total_executed);
        let width = total.len();
        let pad = |n: u64| format!("{:<width$}", group_thousands(n));
        let slow = widen(renderer.slow_count());

        let mut rows =
            vec![("🧪 TOTAL:", pad(self.total_executed), Tone::Green)];
        if let Some(passed) = self.count(OutcomeKind::Passed) {
            rows.push(("✅  PASS:", pad(passed), Tone::Green));
        }
        let positive = |kind| self.count(kind).filter(|n| *n > 0);
        if let Some(failed) = positive(OutcomeKind::Failed) {
            rows.push(("⚡\u{fe0f}  FAIL:", pad(failed), Tone::Red));
        }
        if slow > 0 {
            rows.push(("🐢  SLOW:", pad(slow), Tone::Gray));
        }
        if let Some(skipped) = positive(OutcomeKind::Skipped) {
            rows.push(("⏩  SKIP:", pad(skipped), Tone::Yellow));
        }
        if let Some(none) = positive(OutcomeKind::None) {
            rows.push(("   NONE:", pad(none), Tone::Gray));
        }
        if let Some(missing) = positive(OutcomeKind::NotFound) {
            rows.push(("🔍  MISS:", pad(missing), Tone::Gray));
        }
        rows.push(("⏳  TIME:", elapsed, Tone::White));

        let heading = format!("🌈  SUMMARY: {sources} 🌈");
        lines.extend(Banner::new(&heading).render(styles));
        for (label, value, tone) in &rows {
            lines.extend(Banner::new(label).value(value, *tone).render(styles));
        }
        lines.extend([String::new(), String::new()]);

        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// Concurrency-safe collector of per-[`OutcomeKind`] counts and failures to
/// replay.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    /// Locally observed counts, indexed by [`OutcomeKind::index()`].
    observed: [AtomicU64; 5],

    /// Failures to replay at the end of the run.
    failures: FailureReplayQueue,
}

impl StatsAccumulator {
    /// Creates a new [`StatsAccumulator`] replaying at most `replay_limit`
    /// failures.
    #[must_use]
    pub fn new(replay_limit: usize) -> Self {
        Self {
            observed: Default::default(),
            failures: FailureReplayQueue::new(replay_limit),
        }
    }

    /// Counts the given `record`, and enqueues it for replay if it failed.
    pub fn record(&self, record: TestRecord) {
        _ = self.observed[record.outcome.index()]
            .fetch_add(1, Ordering::Relaxed);
        if record.outcome == OutcomeKind::Failed {
            self.failures.enqueue(record);
        }
    }

    /// Returns the non-zero counts observed so far.
    #[must_use]
    pub fn observed(&self) -> BTreeMap<OutcomeKind, u64> {
        OutcomeKind::ALL
            .into_iter()
            .map(|kind| {
                (kind, self.observed[kind.index()].load(Ordering::Relaxed))
            })
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    /// Returns the total number of records observed so far.
    #[must_use]
    pub fn observed_total(&self) -> u64 {
        self.observed.iter().map(|n| n.load(Ordering::Relaxed)).sum()
    }

    /// Returns the [`FailureReplayQueue`] of this [`StatsAccumulator`].
    #[must_use]
    pub const fn failures(&self) -> &FailureReplayQueue {
        &self.failures
    }

    /// Drains the [`FailureReplayQueue`].
    ///
    /// # Errors
    ///
    /// With [`ReportError::AlreadyDrained`] if called more than once.
    pub fn drain_failures(&self) -> Result<Replay> {
        self.failures.drain()
    }

    /// Assembles the [`RunSummary`] of a finished run.
    ///
    /// Host-reported counts win over the locally observed ones, unless the
    /// host reported none. The host's `total_executed` is taken as is, even
    /// if it disagrees with the counts.
    #[must_use]
    pub fn summarize(
        &self,
        finished: RunFinished,
        sources: Vec<String>,
        filter: Option<String>,
    ) -> RunSummary {
        let observed = self.observed_total();
        if observed != finished.total_executed {
            debug!(
                observed,
                reported = finished.total_executed,
                "host and observed totals differ",
            );
        }

        let counts = if finished.counts.is_empty() {
            self.observed()
        } else {
            into_sorted(finished.counts)
        };
        RunSummary {
            counts,
            total_executed: finished.total_executed,
            elapsed: finished.elapsed,
            sources,
            filter,
        }
    }
}

/// Returns the display name of the given run `sources`: the file stem of a
/// single source, or their number otherwise.
#[must_use]
pub fn source_label(sources: &[String]) -> String {
    match sources {
        [single] => Path::new(single)
            .file_stem()
            .map_or_else(|| single.clone(), |s| s.to_string_lossy().into()),
        many => format!(
            "{} TEST PROJECTS",
            group_thousands(widen(many.len())),
        ),
    }
}

/// Widens a `usize` count into the `u64` the summary displays.
fn widen(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

fn into_sorted(
    counts: HashMap<OutcomeKind, u64>,
) -> BTreeMap<OutcomeKind, u64> {
    counts.into_iter().collect()
}
