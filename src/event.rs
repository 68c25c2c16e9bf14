// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Key occurrences in the lifecycle of a test run.
//!
//! The top-level enum here is [`Run`]. The host test-execution system pushes
//! one [`Run::Started`], any number of [`Run::Result`]s (possibly from many
//! threads at once) and a single [`Run::Finished`].

use std::{collections::HashMap, fmt, str::FromStr, time::Duration};

use crate::error::ReportError;

/// Top-level test run event.
#[derive(Clone, Debug)]
pub enum Run {
    /// Test run started.
    Started(RunStarted),

    /// Single test completed.
    Result(TestRecord),

    /// Test run finished.
    Finished(RunFinished),
}

/// Payload of a [`Run::Started`] event.
#[derive(Clone, Debug, Default)]
pub struct RunStarted {
    /// Discovered test containers, display-only.
    pub sources: Vec<String>,

    /// Active test-selection filter, display-only.
    pub filter: Option<String>,

    /// Flat key/value run settings, as extracted by the host.
    pub settings: HashMap<String, String>,
}

/// Payload of a [`Run::Finished`] event.
#[derive(Clone, Debug, Default)]
pub struct RunFinished {
    /// Per-[`OutcomeKind`] counts as reported by the host.
    ///
    /// May be empty, in which case locally observed counts are used.
    pub counts: HashMap<OutcomeKind, u64>,

    /// Number of executed tests as reported by the host.
    ///
    /// Isn't required to agree with the sum of `counts`.
    pub total_executed: u64,

    /// Time spent running the tests.
    pub elapsed: Duration,
}

/// Terminal result of a single test.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum OutcomeKind {
    /// Test wasn't found by the host.
    NotFound,

    /// Test finished without any outcome.
    None,

    /// Test passed.
    Passed,

    /// Test was skipped.
    Skipped,

    /// Test failed.
    Failed,
}

impl OutcomeKind {
    /// All the [`OutcomeKind`]s, in summary order.
    pub const ALL: [Self; 5] = [
        Self::Passed,
        Self::Failed,
        Self::Skipped,
        Self::None,
        Self::NotFound,
    ];

    /// Short upper-case label of this [`OutcomeKind`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotFound => "MISS",
            Self::None => "NONE",
            Self::Passed => "PASS",
            Self::Skipped => "SKIP",
            Self::Failed => "FAIL",
        }
    }

    /// Index of this [`OutcomeKind`] in [`OutcomeKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Passed => 0,
            Self::Failed => 1,
            Self::Skipped => 2,
            Self::None => 3,
            Self::NotFound => 4,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "NotFound",
            Self::None => "None",
            Self::Passed => "Passed",
            Self::Skipped => "Skipped",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Maps the numeric outcome of a VSTest-like host
/// (`None = 0`, `Passed = 1`, `Failed = 2`, `Skipped = 3`, `NotFound = 4`).
impl TryFrom<i32> for OutcomeKind {
    type Error = ReportError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::None),
            1 => Ok(Self::Passed),
            2 => Ok(Self::Failed),
            3 => Ok(Self::Skipped),
            4 => Ok(Self::NotFound),
            _ => Err(ReportError::unknown_outcome(raw)),
        }
    }
}

impl FromStr for OutcomeKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            "notfound" => Ok(Self::NotFound),
            _ => Err(ReportError::unknown_outcome(s)),
        }
    }
}

/// Location of a test in its source code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceLocation {
    /// Path to the file, possibly a `file://` URI. Empty means unknown.
    pub file: String,

    /// Line number in the `file`. Anything `<= -1` means unknown.
    pub line: i64,
}

impl SourceLocation {
    /// Creates a new [`SourceLocation`].
    #[must_use]
    pub fn new(file: impl Into<String>, line: i64) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Indicates whether both the file and the line are known.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.line > -1 && !self.file.is_empty()
    }
}

/// Normalized result of a single test, as handed over by the host.
#[derive(Clone, Debug)]
pub struct TestRecord {
    /// Fully qualified name of the test.
    pub name: String,

    /// [`OutcomeKind`] of the test.
    pub outcome: OutcomeKind,

    /// Time the test took.
    pub duration: Duration,

    /// Error message of a failed test.
    pub error_message: Option<String>,

    /// Raw stack trace of a failed test, one frame per line.
    pub stack_trace: Option<String>,

    /// Diagnostic output lines of the test.
    pub messages: Vec<String>,

    /// [`SourceLocation`] of the test.
    pub location: Option<SourceLocation>,
}

impl TestRecord {
    /// Creates a new [`TestRecord`] with all the optional parts empty.
    #[must_use]
    pub fn new(name: impl Into<String>, outcome: OutcomeKind) -> Self {
        Self {
            name: name.into(),
            outcome,
            duration: Duration::ZERO,
            error_message: None,
            stack_trace: None,
            messages: Vec::new(),
            location: None,
        }
    }

    /// Sets the [`Duration`] of this [`TestRecord`].
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the error message of this [`TestRecord`].
    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Sets the raw stack trace of this [`TestRecord`].
    #[must_use]
    pub fn with_stack_trace(mut self, trace: impl Into<String>) -> Self {
        self.stack_trace = Some(trace.into());
        self
    }

    /// Sets the diagnostic messages of this [`TestRecord`].
    #[must_use]
    pub fn with_messages<I>(mut self, messages: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the [`SourceLocation`] of this [`TestRecord`].
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}
